use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ProductShapeError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ProductId);
id_newtype!(CategoryId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub image: String,
}

/// A catalog record as served by the products endpoint.
///
/// `creation_at` and `updated_at` are kept in their wire form. The service
/// emits ISO 8601 text, so comparing the strings orders records
/// chronologically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: Category,
    pub creation_at: String,
    pub updated_at: String,
}

impl Product {
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Checks the value constraints serde cannot express.
    pub fn check_shape(&self) -> Result<(), ProductShapeError> {
        if !self.price.is_finite() {
            return Err(ProductShapeError::NonFinitePrice);
        }
        if self.price < 0.0 {
            return Err(ProductShapeError::NegativePrice(self.price));
        }
        check_timestamp("creationAt", &self.creation_at)?;
        check_timestamp("updatedAt", &self.updated_at)?;
        Ok(())
    }
}

fn check_timestamp(field: &'static str, value: &str) -> Result<(), ProductShapeError> {
    let parses = DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    if parses {
        Ok(())
    } else {
        Err(ProductShapeError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
