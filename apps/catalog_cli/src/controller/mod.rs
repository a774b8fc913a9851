//! Controller layer: view events, the reducer over the catalog session, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;
