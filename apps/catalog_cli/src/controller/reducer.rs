//! Applies view events to the catalog session, one at a time, on the controller thread.

use catalog_client::{CatalogSession, LoadStatus};
use crossbeam_channel::Sender;
use shared::{query::QueryState, view::ProductCard};
use tracing::debug;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{classify_load_failure, UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Render,
    Notice(String),
    Idle,
    Quit,
}

pub struct ViewController {
    session: CatalogSession,
    status: String,
    last_error: Option<UiError>,
}

impl ViewController {
    pub fn new(initial: QueryState) -> Self {
        Self {
            session: CatalogSession::with_state(initial),
            status: String::new(),
            last_error: None,
        }
    }

    pub fn session(&self) -> &CatalogSession {
        &self.session
    }

    pub fn cards(&self) -> Vec<ProductCard> {
        self.session.cards()
    }

    /// Queues a fetch on the backend. The ticket is only issued once the
    /// command is queued, so a failed dispatch leaves any in-flight load
    /// current.
    pub fn request_load(&mut self, cmd_tx: &Sender<BackendCommand>) {
        let ticket = self.session.next_load_ticket();
        self.status.clear();
        if dispatch_backend_command(cmd_tx, BackendCommand::LoadCatalog { ticket }, &mut self.status)
        {
            self.session.begin_load();
        }
    }

    pub fn handle(&mut self, event: UiEvent, cmd_tx: &Sender<BackendCommand>) -> Effect {
        debug!(event = event.name(), "handling view event");
        if !matches!(event, UiEvent::Error(_)) {
            self.clear_command_error();
        }
        match event {
            UiEvent::SearchChanged(text) => {
                self.session.set_search_term(text);
                Effect::Render
            }
            UiEvent::SortChanged(key) => {
                self.session.set_sort_key(key);
                Effect::Render
            }
            UiEvent::FilterToggled(flag) => {
                self.session.toggle_filter_flag(flag);
                Effect::Render
            }
            UiEvent::ReloadRequested => {
                self.request_load(cmd_tx);
                if self.status.is_empty() {
                    Effect::Notice("Reloading catalog...".to_string())
                } else {
                    Effect::Notice(self.status.clone())
                }
            }
            UiEvent::ShowRequested => Effect::Render,
            UiEvent::StatusRequested => Effect::Notice(self.describe_status()),
            UiEvent::CatalogLoaded { ticket, outcome } => {
                if !self.session.finish_load(ticket, outcome) {
                    return Effect::Idle;
                }
                if let LoadStatus::Failed(message) = self.session.store().status() {
                    let err = UiError::from_message(
                        UiErrorContext::CatalogLoad,
                        classify_load_failure(message),
                    );
                    self.status = err.message().to_string();
                    self.last_error = Some(err);
                } else {
                    self.status.clear();
                    self.last_error = None;
                }
                Effect::Render
            }
            UiEvent::Error(err) => {
                let notice = err.message().to_string();
                self.last_error = Some(err);
                Effect::Notice(notice)
            }
            UiEvent::Quit => Effect::Quit,
        }
    }

    fn clear_command_error(&mut self) {
        if self
            .last_error
            .as_ref()
            .is_some_and(|err| err.context() == UiErrorContext::Command)
        {
            self.last_error = None;
        }
    }

    pub fn describe_status(&self) -> String {
        let state = self.session.state();
        let flags = state.filter_flags();
        let load = match self.session.store().status() {
            LoadStatus::NotLoaded => "not loaded".to_string(),
            LoadStatus::Loading => "loading".to_string(),
            LoadStatus::Loaded(report) => format!(
                "{} products ({} skipped)",
                report.accepted,
                report.skipped.len()
            ),
            LoadStatus::Failed(_) => self.status.clone(),
        };
        format!(
            "catalog: {load}; search: {:?}; sort: {}; new: {}; old: {}; showing {}",
            state.search_term(),
            state.sort_key(),
            flags.new,
            flags.old,
            self.session.view().len()
        )
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn last_error(&self) -> Option<&UiError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
