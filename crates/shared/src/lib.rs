pub mod domain;
pub mod error;
pub mod query;
pub mod view;
