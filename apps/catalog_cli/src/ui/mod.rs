//! Terminal rendering of the derived view.

pub mod listing;

pub use listing::render_listing;
