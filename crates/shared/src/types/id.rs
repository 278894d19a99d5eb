//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `UserId` where an `OrganizationId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for the acting user recording a settlement.");
typed_id!(OrganizationId, "Unique identifier for a tenant (company scope).");
typed_id!(LedgerEntryId, "Unique identifier for a payable or receivable entry.");
typed_id!(SettlementId, "Unique identifier for a payment or receipt record.");
typed_id!(CounterpartyId, "Unique identifier for a supplier or buyer in master data.");
typed_id!(
    SourceDocumentId,
    "Unique identifier for an operational document that originated a ledger entry."
);
typed_id!(ContractId, "Unique identifier for a sales contract.");
typed_id!(MaterialId, "Unique identifier for an inventory material.");
typed_id!(StorageTankId, "Unique identifier for a bulk storage tank.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
