//! Pure derivation of the displayed catalog from the baseline and a query.
//!
//! [`apply`] always starts from the baseline it is handed. Callers keep the
//! baseline separately from any view they produced and pass it in on every
//! evaluation, so one query's output never feeds the next.

use std::cmp::Ordering;

use shared::{
    domain::Product,
    query::{FilterFlags, QueryState, SortKey},
};
use tracing::trace;

/// Boundary between "old" and "new" products, compared lexically against
/// `Product::creation_at`.
pub const CUTOFF_DATE: &str = "2021-01-01";

pub fn apply(baseline: &[Product], state: &QueryState) -> Vec<Product> {
    let needle = state.search_term().to_lowercase();
    let flags = state.filter_flags();

    let mut view: Vec<Product> = baseline
        .iter()
        .filter(|product| matches_search(product, &needle))
        .filter(|product| passes_temporal_filter(product, flags))
        .cloned()
        .collect();
    sort_by_price(&mut view, state.sort_key());

    trace!(
        baseline = baseline.len(),
        view = view.len(),
        sort = %state.sort_key(),
        "query applied"
    );
    view
}

/// Case-insensitive substring match on the title. `needle` must already be
/// lowercased; an empty needle matches everything.
pub fn matches_search(product: &Product, needle: &str) -> bool {
    needle.is_empty() || product.title.to_lowercase().contains(needle)
}

/// Keeps a product when it satisfies any enabled flag. With no flag enabled
/// every product passes.
pub fn passes_temporal_filter(product: &Product, flags: FilterFlags) -> bool {
    if !flags.any() {
        return true;
    }
    let created = product.creation_at.as_str();
    (flags.new && created > CUTOFF_DATE) || (flags.old && created < CUTOFF_DATE)
}

/// Stable sort; equal prices keep their incoming relative order.
pub fn sort_by_price(products: &mut [Product], key: SortKey) {
    match key {
        SortKey::None => {}
        SortKey::PriceAsc => products.sort_by(|a, b| compare_price(a, b)),
        SortKey::PriceDesc => products.sort_by(|a, b| compare_price(b, a)),
    }
}

/// Prices are finite once validated, so `partial_cmp` is total here and
/// `0.0` and `-0.0` compare equal.
fn compare_price(a: &Product, b: &Product) -> Ordering {
    a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
