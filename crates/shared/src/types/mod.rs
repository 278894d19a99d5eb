//! Common types used across the application.

pub mod id;
pub mod pagination;

pub use id::*;
pub use pagination::{PageMeta, PageRequest, PageResponse};

/// Decimal places kept for stored money amounts.
///
/// Amounts with more places cannot be persisted without rounding and are
/// rejected before any write.
pub const AMOUNT_SCALE: u32 = 4;
