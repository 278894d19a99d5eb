//! Read access to finalized operational documents.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use subledger_core::sync::{LineItem, SourceDocument, SyncSource, ValuationBasis};
use subledger_shared::types::OrganizationId;
use uuid::Uuid;

use crate::entities::{
    goods_receipt_items, goods_receipts, product_deliveries, purchase_order_items, purchase_orders,
    purchase_request_items, purchase_requests,
};
use crate::error::StoreError;

/// Purchase type of requests that create payables directly.
const DIRECT_PURCHASE: &str = "direct";

/// Document statuses after which a document is final for a source.
#[must_use]
pub const fn finalized_statuses(source: SyncSource) -> &'static [&'static str] {
    match source {
        SyncSource::GoodsReceipt => &["completed"],
        SyncSource::PurchaseOrder => &["issued", "completed"],
        SyncSource::DirectPurchaseRequest => &["approved", "completed"],
        SyncSource::ProductDelivery => &["delivered"],
    }
}

/// Repository reading source documents owned by purchasing and sales.
#[derive(Debug, Clone)]
pub struct SourceDocumentRepository {
    db: DatabaseConnection,
}

impl SourceDocumentRepository {
    /// Creates a new source document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches every finalized document of one source for an organization,
    /// oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fetch_finalized(
        &self,
        organization_id: OrganizationId,
        source: SyncSource,
    ) -> Result<Vec<SourceDocument>, StoreError> {
        let organization_id = organization_id.into_inner();
        let statuses = finalized_statuses(source).iter().copied();

        let documents = match source {
            SyncSource::GoodsReceipt => goods_receipts::Entity::find()
                .filter(goods_receipts::Column::OrganizationId.eq(organization_id))
                .filter(goods_receipts::Column::Status.is_in(statuses))
                .order_by_asc(goods_receipts::Column::ReceiptDate)
                .find_with_related(goods_receipt_items::Entity)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|(header, items)| goods_receipt(header, items))
                .collect(),
            SyncSource::PurchaseOrder => purchase_orders::Entity::find()
                .filter(purchase_orders::Column::OrganizationId.eq(organization_id))
                .filter(purchase_orders::Column::Status.is_in(statuses))
                .order_by_asc(purchase_orders::Column::OrderDate)
                .find_with_related(purchase_order_items::Entity)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|(header, items)| purchase_order(header, items))
                .collect(),
            SyncSource::DirectPurchaseRequest => purchase_requests::Entity::find()
                .filter(purchase_requests::Column::OrganizationId.eq(organization_id))
                .filter(purchase_requests::Column::PurchaseType.eq(DIRECT_PURCHASE))
                .filter(purchase_requests::Column::Status.is_in(statuses))
                .order_by_asc(purchase_requests::Column::RequestDate)
                .find_with_related(purchase_request_items::Entity)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|(header, items)| purchase_request(header, items))
                .collect(),
            SyncSource::ProductDelivery => product_deliveries::Entity::find()
                .filter(product_deliveries::Column::OrganizationId.eq(organization_id))
                .filter(product_deliveries::Column::Status.is_in(statuses))
                .order_by_asc(product_deliveries::Column::DeliveryDate)
                .order_by_asc(product_deliveries::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(product_delivery)
                .collect(),
        };

        Ok(documents)
    }
}

/// Builds a line-item basis with lines in document order.
fn line_items(mut lines: Vec<(i32, Uuid, LineItem)>) -> ValuationBasis {
    lines.sort_by_key(|(line_no, id, _)| (*line_no, *id));
    ValuationBasis::LineItems {
        lines: lines.into_iter().map(|(_, _, line)| line).collect(),
    }
}

fn goods_receipt(
    header: goods_receipts::Model,
    items: Vec<goods_receipt_items::Model>,
) -> SourceDocument {
    SourceDocument {
        source: SyncSource::GoodsReceipt,
        id: header.id.into(),
        reference_number: header.receipt_number,
        document_date: header.receipt_date,
        due_date: header.due_date,
        counterparty_id: header.supplier_id.map(Into::into),
        counterparty_name: header.supplier_name,
        counterparty_category: header.supplier_category,
        contract_id: None,
        contract_number: None,
        note: header.note,
        basis: line_items(
            items
                .into_iter()
                .map(|i| (i.line_no, i.id, LineItem { quantity: i.quantity, unit_price: i.unit_price }))
                .collect(),
        ),
    }
}

fn purchase_order(
    header: purchase_orders::Model,
    items: Vec<purchase_order_items::Model>,
) -> SourceDocument {
    SourceDocument {
        source: SyncSource::PurchaseOrder,
        id: header.id.into(),
        reference_number: header.order_number,
        document_date: header.order_date,
        due_date: header.due_date,
        counterparty_id: header.supplier_id.map(Into::into),
        counterparty_name: header.supplier_name,
        counterparty_category: header.supplier_category,
        contract_id: None,
        contract_number: None,
        note: header.note,
        basis: line_items(
            items
                .into_iter()
                .map(|i| (i.line_no, i.id, LineItem { quantity: i.quantity, unit_price: i.unit_price }))
                .collect(),
        ),
    }
}

fn purchase_request(
    header: purchase_requests::Model,
    items: Vec<purchase_request_items::Model>,
) -> SourceDocument {
    SourceDocument {
        source: SyncSource::DirectPurchaseRequest,
        id: header.id.into(),
        reference_number: header.request_number,
        document_date: header.request_date,
        due_date: header.due_date,
        counterparty_id: header.vendor_id.map(Into::into),
        counterparty_name: header.vendor_name,
        counterparty_category: header.vendor_category,
        contract_id: None,
        contract_number: None,
        note: header.note,
        basis: line_items(
            items
                .into_iter()
                .map(|i| (i.line_no, i.id, LineItem { quantity: i.quantity, unit_price: i.unit_price }))
                .collect(),
        ),
    }
}

fn product_delivery(delivery: product_deliveries::Model) -> SourceDocument {
    SourceDocument {
        source: SyncSource::ProductDelivery,
        id: delivery.id.into(),
        reference_number: delivery.delivery_number,
        document_date: delivery.delivery_date,
        due_date: delivery.due_date,
        counterparty_id: delivery.buyer_id.map(Into::into),
        counterparty_name: delivery.buyer_name,
        counterparty_category: delivery.buyer_category,
        contract_id: delivery.contract_id.map(Into::into),
        contract_number: delivery.contract_number,
        note: delivery.note,
        basis: ValuationBasis::Weight {
            weight: delivery.net_weight,
            unit_price: delivery.unit_price,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn item(line_no: i32, quantity: rust_decimal::Decimal) -> goods_receipt_items::Model {
        goods_receipt_items::Model {
            id: Uuid::new_v4(),
            goods_receipt_id: Uuid::nil(),
            line_no,
            material_id: None,
            quantity: Some(quantity),
            unit_price: Some(dec!(1000)),
        }
    }

    #[test]
    fn test_goods_receipt_lines_follow_line_number() {
        let header = goods_receipts::Model {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            receipt_number: "GR-0007".to_string(),
            receipt_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            due_date: None,
            supplier_id: None,
            supplier_name: "KUD Tani Jaya".to_string(),
            supplier_category: Some("smallholder".to_string()),
            status: "completed".to_string(),
            note: None,
            created_at: Utc::now().into(),
        };

        let doc = goods_receipt(header, vec![item(2, dec!(20)), item(1, dec!(10))]);

        assert_eq!(doc.source, SyncSource::GoodsReceipt);
        assert_eq!(doc.reference_number, "GR-0007");
        let ValuationBasis::LineItems { lines } = doc.basis else {
            panic!("expected line items");
        };
        assert_eq!(lines[0].quantity, Some(dec!(10)));
        assert_eq!(lines[1].quantity, Some(dec!(20)));
    }

    #[test]
    fn test_delivery_carries_contract_and_weight() {
        let contract = Uuid::new_v4();
        let delivery = product_deliveries::Model {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            delivery_number: "DO-0042".to_string(),
            delivery_date: NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 8, 2),
            buyer_id: Some(Uuid::new_v4()),
            buyer_name: "PT Minyak Nabati".to_string(),
            buyer_category: None,
            contract_id: Some(contract),
            contract_number: Some("K-2024-011".to_string()),
            net_weight: Some(dec!(25000)),
            unit_price: None,
            status: "delivered".to_string(),
            note: None,
            created_at: Utc::now().into(),
        };

        let doc = product_delivery(delivery);

        assert_eq!(doc.contract_id.map(|c| c.into_inner()), Some(contract));
        assert_eq!(
            doc.basis,
            ValuationBasis::Weight {
                weight: Some(dec!(25000)),
                unit_price: None,
            }
        );
    }

    #[test]
    fn test_finalized_statuses_exclude_drafts() {
        for source in SyncSource::ALL {
            assert!(!finalized_statuses(source).contains(&"draft"));
        }
        assert!(finalized_statuses(SyncSource::PurchaseOrder).contains(&"issued"));
    }
}
