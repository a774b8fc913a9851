//! The remote Catalog Service boundary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::error::CatalogLoadError;

/// `limit=0&offset=0` asks the service for every record it has.
const FULL_COLLECTION: [(&str, u32); 2] = [("limit", 0), ("offset", 0)];

#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetches the unfiltered collection as raw JSON records.
    async fn fetch_all(&self) -> Result<Vec<Value>, CatalogLoadError>;
}

pub struct HttpCatalogService {
    http: Client,
    products_url: Url,
}

impl HttpCatalogService {
    pub fn new(service_url: &str, timeout: Duration) -> Result<Self, CatalogLoadError> {
        let products_url = products_endpoint(service_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CatalogLoadError::Transport)?;
        Ok(Self { http, products_url })
    }

}

#[async_trait]
impl CatalogService for HttpCatalogService {
    async fn fetch_all(&self) -> Result<Vec<Value>, CatalogLoadError> {
        info!(endpoint = %self.products_url, "fetching catalog");
        let response = self
            .http
            .get(self.products_url.clone())
            .query(&FULL_COLLECTION)
            .send()
            .await
            .map_err(CatalogLoadError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogLoadError::Status {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| CatalogLoadError::Body(err.to_string()))?;
        match body {
            Value::Array(records) => Ok(records),
            other => Err(CatalogLoadError::Body(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            ))),
        }
    }
}

pub(crate) fn products_endpoint(service_url: &str) -> Result<Url, CatalogLoadError> {
    let raw = format!("{}/products", service_url.trim().trim_end_matches('/'));
    Url::parse(&raw).map_err(|source| CatalogLoadError::InvalidEndpoint { url: raw, source })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
