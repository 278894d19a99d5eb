//! Source document migration.
//!
//! Operational documents and stock valuations are owned by other systems.
//! These tables mirror the columns the ledger reads so the engine can run
//! standalone in development and tests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(PURCHASING_SQL).await?;
        db.execute_unprepared(DELIVERIES_SQL).await?;
        db.execute_unprepared(STOCK_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const PURCHASING_SQL: &str = r"
-- Goods receipts of raw material
CREATE TABLE goods_receipts (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    receipt_number VARCHAR(100) NOT NULL,
    receipt_date DATE NOT NULL,
    due_date DATE,
    supplier_id UUID,
    supplier_name VARCHAR(255) NOT NULL,
    supplier_category VARCHAR(100),
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_goods_receipt_status CHECK (status IN ('draft', 'completed', 'cancelled'))
);

CREATE TABLE goods_receipt_items (
    id UUID PRIMARY KEY,
    goods_receipt_id UUID NOT NULL REFERENCES goods_receipts(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    material_id UUID,
    quantity NUMERIC(20, 4),
    unit_price NUMERIC(20, 4)
);

CREATE INDEX idx_goods_receipts_org_status ON goods_receipts(organization_id, status);
CREATE INDEX idx_goods_receipt_items_receipt ON goods_receipt_items(goods_receipt_id, line_no);

-- Purchase orders
CREATE TABLE purchase_orders (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    order_number VARCHAR(100) NOT NULL,
    order_date DATE NOT NULL,
    due_date DATE,
    supplier_id UUID,
    supplier_name VARCHAR(255) NOT NULL,
    supplier_category VARCHAR(100),
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_purchase_order_status CHECK (status IN ('draft', 'issued', 'completed', 'cancelled'))
);

CREATE TABLE purchase_order_items (
    id UUID PRIMARY KEY,
    purchase_order_id UUID NOT NULL REFERENCES purchase_orders(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    material_id UUID,
    quantity NUMERIC(20, 4),
    unit_price NUMERIC(20, 4)
);

CREATE INDEX idx_purchase_orders_org_status ON purchase_orders(organization_id, status);
CREATE INDEX idx_purchase_order_items_order ON purchase_order_items(purchase_order_id, line_no);

-- Purchase requests; only direct purchases create payables
CREATE TABLE purchase_requests (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    request_number VARCHAR(100) NOT NULL,
    request_date DATE NOT NULL,
    due_date DATE,
    vendor_id UUID,
    vendor_name VARCHAR(255) NOT NULL,
    vendor_category VARCHAR(100),
    purchase_type VARCHAR(20) NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_purchase_request_type CHECK (purchase_type IN ('direct', 'requisition')),
    CONSTRAINT chk_purchase_request_status CHECK (status IN ('draft', 'approved', 'completed', 'rejected'))
);

CREATE TABLE purchase_request_items (
    id UUID PRIMARY KEY,
    purchase_request_id UUID NOT NULL REFERENCES purchase_requests(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    description VARCHAR(255),
    quantity NUMERIC(20, 4),
    unit_price NUMERIC(20, 4)
);

CREATE INDEX idx_purchase_requests_org_status ON purchase_requests(organization_id, purchase_type, status);
CREATE INDEX idx_purchase_request_items_request ON purchase_request_items(purchase_request_id, line_no);
";

const DELIVERIES_SQL: &str = r"
-- Outbound product deliveries against sales contracts
CREATE TABLE product_deliveries (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    delivery_number VARCHAR(100) NOT NULL,
    delivery_date DATE NOT NULL,
    due_date DATE,
    buyer_id UUID,
    buyer_name VARCHAR(255) NOT NULL,
    buyer_category VARCHAR(100),
    contract_id UUID,
    contract_number VARCHAR(100),
    net_weight NUMERIC(20, 4),
    unit_price NUMERIC(20, 4),
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_product_delivery_status CHECK (status IN ('draft', 'in_transit', 'delivered', 'cancelled'))
);

CREATE INDEX idx_product_deliveries_org_status ON product_deliveries(organization_id, status);
";

const STOCK_SQL: &str = r"
-- Material stock valuation
CREATE TABLE materials (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    unit VARCHAR(20) NOT NULL DEFAULT 'kg',
    quantity_on_hand NUMERIC(20, 4) NOT NULL DEFAULT 0,
    unit_price NUMERIC(20, 4) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true
);

-- Bulk storage tanks
CREATE TABLE storage_tanks (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    current_level NUMERIC(20, 4) NOT NULL DEFAULT 0,
    unit_price NUMERIC(20, 4) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true
);

CREATE INDEX idx_materials_org ON materials(organization_id) WHERE is_active;
CREATE INDEX idx_storage_tanks_org ON storage_tanks(organization_id) WHERE is_active;
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS storage_tanks CASCADE;
DROP TABLE IF EXISTS materials CASCADE;
DROP TABLE IF EXISTS product_deliveries CASCADE;
DROP TABLE IF EXISTS purchase_request_items CASCADE;
DROP TABLE IF EXISTS purchase_requests CASCADE;
DROP TABLE IF EXISTS purchase_order_items CASCADE;
DROP TABLE IF EXISTS purchase_orders CASCADE;
DROP TABLE IF EXISTS goods_receipt_items CASCADE;
DROP TABLE IF EXISTS goods_receipts CASCADE;
";
