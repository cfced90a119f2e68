//! Business-rule overrides applied after field resolution.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Built-in `(customer name, forced order number)` pairs.
///
/// BENJAMIN ATTARD shipments never carry an order number.
pub const BUILTIN_ORDER_OVERRIDES: &[(&str, &str)] = &[("BENJAMIN ATTARD", "")];

/// Forces the order number of every record with a given customer name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOverride {
    /// Exact customer name to match.
    pub customer_name: String,
    /// Order number to use instead (may be empty).
    pub order_number: String,
}

impl OrderOverride {
    pub fn new(customer_name: impl Into<String>, order_number: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            order_number: order_number.into(),
        }
    }
}

/// Apply configured overrides, then the built-in ones.
///
/// Built-in rules run last so configuration can add rules but never
/// undo one.
pub fn apply_order_overrides(
    customer_name: &str,
    order_number: String,
    extra: &[OrderOverride],
) -> String {
    let configured = extra
        .iter()
        .map(|o| (o.customer_name.as_str(), o.order_number.as_str()));
    let builtin = BUILTIN_ORDER_OVERRIDES.iter().copied();

    configured
        .chain(builtin)
        .filter(|(name, _)| *name == customer_name)
        .last()
        .map(|(_, forced)| {
            debug!("Order number for {} forced to {:?}", customer_name, forced);
            forced.to_string()
        })
        .unwrap_or(order_number)
}
