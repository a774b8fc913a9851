//! User-controlled query parameters driving the derived catalog view.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ParseFilterFlagError, ParseSortKeyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    None,
    PriceAsc,
    PriceDesc,
}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "" | "none" => Ok(Self::None),
            "price-asc" | "price_asc" | "priceLowToHigh" => Ok(Self::PriceAsc),
            "price-desc" | "price_desc" | "priceHighToLow" => Ok(Self::PriceDesc),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterFlag {
    New,
    Old,
}

impl FromStr for FilterFlag {
    type Err = ParseFilterFlagError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("new") {
            Ok(Self::New)
        } else if trimmed.eq_ignore_ascii_case("old") {
            Ok(Self::Old)
        } else {
            Err(ParseFilterFlagError(trimmed.to_string()))
        }
    }
}

impl fmt::Display for FilterFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => f.write_str("new"),
            Self::Old => f.write_str("old"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterFlags {
    pub new: bool,
    pub old: bool,
}

impl FilterFlags {
    pub fn is_set(&self, flag: FilterFlag) -> bool {
        match flag {
            FilterFlag::New => self.new,
            FilterFlag::Old => self.old,
        }
    }

    pub fn toggle(&mut self, flag: FilterFlag) {
        match flag {
            FilterFlag::New => self.new = !self.new,
            FilterFlag::Old => self.old = !self.old,
        }
    }

    pub fn any(&self) -> bool {
        self.new || self.old
    }
}

/// Search term, sort key and filter flags. Each setter replaces exactly one
/// field; nothing else writes to a `QueryState`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryState {
    search_term: String,
    sort_key: SortKey,
    filter_flags: FilterFlags,
}

impl QueryState {
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn filter_flags(&self) -> FilterFlags {
        self.filter_flags
    }

    pub fn set_search_term(&mut self, text: impl Into<String>) {
        self.search_term = text.into();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    pub fn toggle_filter_flag(&mut self, flag: FilterFlag) {
        self.filter_flags.toggle(flag);
    }

    pub fn with_search_term(mut self, text: impl Into<String>) -> Self {
        self.set_search_term(text);
        self
    }

    pub fn with_sort_key(mut self, key: SortKey) -> Self {
        self.set_sort_key(key);
        self
    }

    pub fn with_filter_flag(mut self, flag: FilterFlag, enabled: bool) -> Self {
        if self.filter_flags.is_set(flag) != enabled {
            self.toggle_filter_flag(flag);
        }
        self
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
