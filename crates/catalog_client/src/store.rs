//! The baseline catalog and its load contract.

use std::collections::HashSet;

use serde_json::Value;
use shared::domain::{Product, ProductId};
use tracing::{info, warn};

use crate::{
    error::{CatalogLoadError, MalformedRecordError},
    service::CatalogService,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedCatalog {
    pub products: Vec<Product>,
    pub skipped: Vec<MalformedRecordError>,
}

pub type LoadOutcome = Result<ParsedCatalog, CatalogLoadError>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub accepted: usize,
    pub skipped: Vec<MalformedRecordError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    NotLoaded,
    Loading,
    Loaded(LoadReport),
    Failed(String),
}

impl LoadStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Holds the baseline. The baseline is only ever replaced as a whole.
#[derive(Debug, Default)]
pub struct CatalogStore {
    baseline: Vec<Product>,
    status: LoadStatus,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn baseline(&self) -> &[Product] {
        &self.baseline
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn mark_loading(&mut self) {
        self.status = LoadStatus::Loading;
    }

    /// Installs a finished load. A failure leaves the baseline empty.
    pub fn commit(&mut self, outcome: LoadOutcome) -> &LoadStatus {
        match outcome {
            Ok(parsed) => {
                info!(
                    records = parsed.products.len(),
                    skipped = parsed.skipped.len(),
                    "catalog loaded"
                );
                self.status = LoadStatus::Loaded(LoadReport {
                    accepted: parsed.products.len(),
                    skipped: parsed.skipped,
                });
                self.baseline = parsed.products;
            }
            Err(err) => {
                warn!(error = %err, "catalog load failed");
                self.baseline = Vec::new();
                self.status = LoadStatus::Failed(err.to_string());
            }
        }
        &self.status
    }
}

pub async fn fetch_catalog(service: &dyn CatalogService) -> LoadOutcome {
    let records = service.fetch_all().await?;
    Ok(parse_records(records))
}

/// Validates each raw record on its own; a bad record is skipped, never the
/// whole response.
pub fn parse_records(records: Vec<Value>) -> ParsedCatalog {
    let mut parsed = ParsedCatalog::default();
    let mut seen = HashSet::<ProductId>::new();

    for (index, record) in records.into_iter().enumerate() {
        let id = record.get("id").and_then(Value::as_i64);
        match parse_record(record, &seen) {
            Ok(product) => {
                seen.insert(product.id);
                parsed.products.push(product);
            }
            Err(reason) => {
                warn!(index, id = ?id, %reason, "skipping malformed catalog record");
                parsed
                    .skipped
                    .push(MalformedRecordError { index, id, reason });
            }
        }
    }

    parsed
}

fn parse_record(record: Value, seen: &HashSet<ProductId>) -> Result<Product, String> {
    let mut product: Product = serde_json::from_value(record).map_err(|err| err.to_string())?;
    product.check_shape().map_err(|err| err.to_string())?;
    if product.price == 0.0 {
        // -0.0 passes the shape check; store it unsigned.
        product.price = 0.0;
    }
    if seen.contains(&product.id) {
        return Err(format!("duplicate product id {}", product.id.0));
    }
    Ok(product)
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
