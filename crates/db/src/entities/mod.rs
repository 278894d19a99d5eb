//! `SeaORM` entity definitions.
//!
//! `ledger_entries` and `settlements` are owned by the ledger. The document
//! and stock tables are read-only mirrors of other systems.

pub mod goods_receipt_items;
pub mod goods_receipts;
pub mod ledger_entries;
pub mod materials;
pub mod product_deliveries;
pub mod purchase_order_items;
pub mod purchase_orders;
pub mod purchase_request_items;
pub mod purchase_requests;
pub mod sea_orm_active_enums;
pub mod settlements;
pub mod storage_tanks;
