//! `SeaORM` active enums backed by Postgres enum types.
//!
//! Each enum mirrors a domain enum from `subledger-core` and converts both
//! ways, so repositories hand domain values to callers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use subledger_core::ledger::types::{
    LedgerDirection as DomainDirection, SettlementMethod as DomainMethod,
    SettlementStatus as DomainStatus, SourceType as DomainSourceType,
};

/// Stored `ledger_direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ledger_direction")]
pub enum LedgerDirection {
    #[sea_orm(string_value = "payable")]
    Payable,
    #[sea_orm(string_value = "receivable")]
    Receivable,
}

/// Stored `ledger_source_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ledger_source_type")]
pub enum LedgerSourceType {
    #[sea_orm(string_value = "goods_receipt")]
    GoodsReceipt,
    #[sea_orm(string_value = "purchase_order")]
    PurchaseOrder,
    #[sea_orm(string_value = "direct_purchase_request")]
    DirectPurchaseRequest,
    #[sea_orm(string_value = "product_delivery")]
    ProductDelivery,
    #[sea_orm(string_value = "manual")]
    Manual,
}

/// Stored `settlement_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "settlement_status")]
pub enum SettlementStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "partial")]
    Partial,
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Stored `settlement_method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "settlement_method")]
pub enum SettlementMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "cheque")]
    Cheque,
    #[sea_orm(string_value = "giro")]
    Giro,
    #[sea_orm(string_value = "paid_in_full")]
    PaidInFull,
}

/// Implements `From` in both directions between a stored enum and its
/// domain counterpart. Variant names match one to one.
macro_rules! mirror_enum {
    ($db:ident, $domain:ident, [$($variant:ident),+ $(,)?]) => {
        impl From<$domain> for $db {
            fn from(value: $domain) -> Self {
                match value {
                    $($domain::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $domain {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(LedgerDirection, DomainDirection, [Payable, Receivable]);
mirror_enum!(
    LedgerSourceType,
    DomainSourceType,
    [GoodsReceipt, PurchaseOrder, DirectPurchaseRequest, ProductDelivery, Manual]
);
mirror_enum!(SettlementStatus, DomainStatus, [Unpaid, Partial, Paid]);
mirror_enum!(
    SettlementMethod,
    DomainMethod,
    [Cash, BankTransfer, Cheque, Giro, PaidInFull]
);

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveEnum, Iterable};

    #[test]
    fn test_source_type_mirrors_domain() {
        for variant in LedgerSourceType::iter() {
            let domain: DomainSourceType = variant.into();
            assert_eq!(LedgerSourceType::from(domain), variant);
            assert_eq!(variant.to_value(), domain.as_str());
        }
    }

    #[test]
    fn test_method_string_values_match_domain() {
        for variant in SettlementMethod::iter() {
            let domain: DomainMethod = variant.into();
            assert_eq!(variant.to_value(), domain.as_str());
        }
    }

    #[test]
    fn test_status_and_direction_mirror_domain() {
        for variant in SettlementStatus::iter() {
            let domain: DomainStatus = variant.into();
            assert_eq!(variant.to_value(), domain.as_str());
        }
        for variant in LedgerDirection::iter() {
            let domain: DomainDirection = variant.into();
            assert_eq!(variant.to_value(), domain.as_str());
        }
    }
}
