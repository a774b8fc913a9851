use query_engine::apply;
use shared::{
    domain::Product,
    query::{FilterFlag, QueryState, SortKey},
    view::ProductCard,
};
use tracing::debug;

pub mod error;
pub mod service;
pub mod store;

pub use error::{CatalogLoadError, MalformedRecordError};
pub use service::{CatalogService, HttpCatalogService};
pub use store::{
    fetch_catalog, parse_records, CatalogStore, LoadOutcome, LoadReport, LoadStatus,
    ParsedCatalog,
};

/// Identifies one load request. Only the most recently issued ticket may
/// install a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Couples the baseline with the current query and the view derived from
/// both.
///
/// Every mutation re-runs the query against the stored baseline. The derived
/// view is only ever written by `recompute`.
#[derive(Debug, Default)]
pub struct CatalogSession {
    store: CatalogStore,
    state: QueryState,
    view: Vec<Product>,
    issued_loads: u64,
}

impl CatalogSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: QueryState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn view(&self) -> &[Product] {
        &self.view
    }

    pub fn cards(&self) -> Vec<ProductCard> {
        self.view.iter().map(ProductCard::from).collect()
    }

    pub fn set_search_term(&mut self, text: impl Into<String>) -> &[Product] {
        self.state.set_search_term(text);
        self.recompute()
    }

    pub fn set_sort_key(&mut self, key: SortKey) -> &[Product] {
        self.state.set_sort_key(key);
        self.recompute()
    }

    pub fn toggle_filter_flag(&mut self, flag: FilterFlag) -> &[Product] {
        self.state.toggle_filter_flag(flag);
        self.recompute()
    }

    /// The ticket the next `begin_load` will issue. Peeking does not
    /// supersede the load currently in flight.
    pub fn next_load_ticket(&self) -> LoadTicket {
        LoadTicket(self.issued_loads + 1)
    }

    /// Starts a load, superseding any ticket issued earlier.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued_loads += 1;
        self.store.mark_loading();
        LoadTicket(self.issued_loads)
    }

    /// Installs `outcome` if `ticket` is still current. Returns whether the
    /// outcome was applied.
    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: LoadOutcome) -> bool {
        if ticket != LoadTicket(self.issued_loads) {
            debug!(
                ticket = ticket.0,
                current = self.issued_loads,
                "discarding superseded catalog load"
            );
            return false;
        }
        self.store.commit(outcome);
        self.recompute();
        true
    }

    pub async fn load(&mut self, service: &dyn CatalogService) -> &LoadStatus {
        let ticket = self.begin_load();
        let outcome = fetch_catalog(service).await;
        self.finish_load(ticket, outcome);
        self.store.status()
    }

    fn recompute(&mut self) -> &[Product] {
        self.view = apply(self.store.baseline(), &self.state);
        &self.view
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
