//! Rule-based field resolution for shipment blocks.

pub mod fields;
pub mod format;
pub mod overrides;
pub mod patterns;

pub use fields::{AIR_WAYBILL_MARKER, air_waybill_number, last_two_tokens, ship_date, total_amount};
pub use format::BlockFormat;
pub use overrides::{BUILTIN_ORDER_OVERRIDES, OrderOverride, apply_order_overrides};
