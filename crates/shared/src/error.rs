use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProductShapeError {
    #[error("price must be non-negative, got {0}")]
    NegativePrice(f64),
    #[error("price must be a finite number")]
    NonFinitePrice,
    #[error("{field} is not an ISO 8601 timestamp: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key {0:?}; expected none, price-asc or price-desc")]
pub struct ParseSortKeyError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter flag {0:?}; expected new or old")]
pub struct ParseFilterFlagError(pub String);
