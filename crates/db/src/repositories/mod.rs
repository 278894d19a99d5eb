//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod inventory;
pub mod ledger;
pub mod reconciliation;
pub mod report;
pub mod settlement;
pub mod source;

pub use inventory::InventoryRepository;
pub use ledger::LedgerRepository;
pub use reconciliation::ReconciliationRepository;
pub use report::ReportRepository;
pub use settlement::SettlementRepository;
pub use source::SourceDocumentRepository;
