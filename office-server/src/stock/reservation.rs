//! Reservation Calculator
//!
//! Pure aggregation: how much of each product's physical stock is earmarked
//! by qualifying orders. No I/O; determinism here is what makes the
//! reconciliation pass convergent.

use std::collections::{HashMap, HashSet};

use super::traits::{LedgerLineItem, LedgerOrder};

/// Canonical product id form: trimmed, non-empty
///
/// Product ids reach us as both numeric and string values from different
/// source tables; everything downstream compares the trimmed string form.
pub fn normalize_product_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Sum reserved quantities per product across the given qualifying orders
///
/// Line items whose order is not in `orders`, whose product id normalizes
/// to nothing, or whose quantity is not positive contribute zero. Malformed
/// rows are a data-quality fact of the upstream ledger, not an error.
pub fn compute_reservations(
    orders: &[LedgerOrder],
    line_items: &[LedgerLineItem],
) -> HashMap<String, i64> {
    let order_ids: HashSet<&str> = orders.iter().map(|o| o.id.as_str()).collect();

    let mut totals: HashMap<String, i64> = HashMap::new();
    for item in line_items {
        if !order_ids.contains(item.order_id.as_str()) {
            continue;
        }
        if item.quantity <= 0 {
            continue;
        }
        let Some(product_id) = normalize_product_id(&item.product_id) else {
            continue;
        };
        *totals.entry(product_id).or_insert(0) += item.quantity;
    }
    totals
}
