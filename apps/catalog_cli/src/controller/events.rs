//! View events and error modeling for the catalog controller.

use catalog_client::{LoadOutcome, LoadTicket};
use shared::query::{FilterFlag, SortKey};

pub enum UiEvent {
    SearchChanged(String),
    SortChanged(SortKey),
    FilterToggled(FilterFlag),
    ReloadRequested,
    ShowRequested,
    StatusRequested,
    CatalogLoaded {
        ticket: LoadTicket,
        outcome: LoadOutcome,
    },
    Error(UiError),
    Quit,
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SearchChanged(_) => "search_changed",
            Self::SortChanged(_) => "sort_changed",
            Self::FilterToggled(_) => "filter_toggled",
            Self::ReloadRequested => "reload_requested",
            Self::ShowRequested => "show_requested",
            Self::StatusRequested => "status_requested",
            Self::CatalogLoaded { .. } => "catalog_loaded",
            Self::Error(_) => "error",
            Self::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    CatalogLoad,
    Command,
}

pub fn classify_load_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
        || lower.contains("request failed")
    {
        "Catalog service unreachable; check the service url/network and reload.".to_string()
    } else if lower.contains("status") {
        format!("Catalog service rejected the request ({message}); reload to retry.")
    } else {
        format!("Catalog load error: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("unknown")
            || message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("expected")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connect")
            || message_lower.contains("network")
            || message_lower.contains("request failed")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Parses one interactive input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<UiEvent>, UiError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let invalid = |message: String| UiError::from_message(UiErrorContext::Command, message);

    let event = match verb.to_ascii_lowercase().as_str() {
        "search" => UiEvent::SearchChanged(rest.to_string()),
        "sort" => UiEvent::SortChanged(rest.parse().map_err(|err| invalid(format!("{err}")))?),
        "toggle" => {
            UiEvent::FilterToggled(rest.parse().map_err(|err| invalid(format!("{err}")))?)
        }
        "reload" => UiEvent::ReloadRequested,
        "show" => UiEvent::ShowRequested,
        "status" => UiEvent::StatusRequested,
        "quit" | "exit" => UiEvent::Quit,
        other => {
            return Err(invalid(format!(
                "unknown command {other:?}; expected search, sort, toggle, reload, show, status or quit"
            )))
        }
    };
    Ok(Some(event))
}

#[cfg(test)]
#[path = "../tests/events_tests.rs"]
mod tests;
