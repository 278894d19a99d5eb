//! Ledger migration.
//!
//! Creates payable/receivable entries, their settlement history and the
//! deferred trigger that keeps the two in agreement.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;
        db.execute_unprepared(SETTLEMENTS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE ledger_direction AS ENUM ('payable', 'receivable');

CREATE TYPE ledger_source_type AS ENUM (
    'goods_receipt',
    'purchase_order',
    'direct_purchase_request',
    'product_delivery',
    'manual'
);

CREATE TYPE settlement_status AS ENUM ('unpaid', 'partial', 'paid');

CREATE TYPE settlement_method AS ENUM (
    'cash',
    'bank_transfer',
    'cheque',
    'giro',
    'paid_in_full'
);
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    seq BIGSERIAL NOT NULL,
    organization_id UUID NOT NULL,
    direction ledger_direction NOT NULL,
    source_type ledger_source_type NOT NULL,
    reference_id UUID NOT NULL,
    reference_number VARCHAR(100) NOT NULL,
    transaction_date DATE NOT NULL,
    due_date DATE,
    counterparty_id UUID,
    counterparty_name VARCHAR(255) NOT NULL,
    counterparty_category VARCHAR(100),
    total_amount NUMERIC(20, 4) NOT NULL,
    settled_amount NUMERIC(20, 4) NOT NULL DEFAULT 0,
    remaining_amount NUMERIC(20, 4) NOT NULL,
    status settlement_status NOT NULL DEFAULT 'unpaid',
    note TEXT,
    contract_id UUID,
    contract_number VARCHAR(100),
    buyer_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_ledger_entries_reference UNIQUE (organization_id, source_type, reference_id),
    CONSTRAINT chk_total_positive CHECK (total_amount > 0),
    CONSTRAINT chk_settled_range CHECK (settled_amount >= 0 AND settled_amount <= total_amount),
    CONSTRAINT chk_remaining CHECK (remaining_amount = GREATEST(total_amount - settled_amount, 0)),
    CONSTRAINT chk_status CHECK (
        (status = 'paid' AND remaining_amount = 0)
        OR (status = 'unpaid' AND settled_amount = 0 AND remaining_amount > 0)
        OR (status = 'partial' AND settled_amount > 0 AND remaining_amount > 0)
    ),
    CONSTRAINT chk_receivable_links CHECK (
        direction = 'receivable'
        OR (contract_id IS NULL AND contract_number IS NULL AND buyer_id IS NULL)
    )
);

-- Listing: newest first, insertion order on ties
CREATE INDEX idx_ledger_entries_listing
    ON ledger_entries(organization_id, direction, transaction_date DESC, seq);

-- Open balances for aging and counterparty views
CREATE INDEX idx_ledger_entries_open
    ON ledger_entries(organization_id, direction, counterparty_id)
    WHERE status <> 'paid';

CREATE INDEX idx_ledger_entries_reference ON ledger_entries(organization_id, reference_id);
";

const SETTLEMENTS_SQL: &str = r"
CREATE TABLE settlements (
    id UUID PRIMARY KEY,
    ledger_entry_id UUID NOT NULL REFERENCES ledger_entries(id) ON DELETE CASCADE,
    organization_id UUID NOT NULL,
    amount NUMERIC(20, 4) NOT NULL,
    settled_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    method settlement_method,
    external_reference VARCHAR(100),
    note TEXT,
    recorded_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_settlement_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_settlements_entry ON settlements(ledger_entry_id, settled_at DESC);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_settlement_conservation
-- The settled amount of an entry must equal its settlement history.
-- Checked at commit so the entry update and the history insert can
-- be applied in either order inside one transaction.
-- ============================================================
CREATE OR REPLACE FUNCTION check_settlement_conservation()
RETURNS TRIGGER AS $$
DECLARE
    v_entry_id UUID;
    v_history NUMERIC(20, 4);
    v_settled NUMERIC(20, 4);
BEGIN
    IF TG_TABLE_NAME = 'settlements' THEN
        v_entry_id := NEW.ledger_entry_id;
    ELSE
        v_entry_id := NEW.id;
    END IF;

    SELECT settled_amount INTO v_settled
    FROM ledger_entries
    WHERE id = v_entry_id;

    IF NOT FOUND THEN
        RETURN NULL;
    END IF;

    SELECT COALESCE(SUM(amount), 0) INTO v_history
    FROM settlements
    WHERE ledger_entry_id = v_entry_id;

    IF v_history <> v_settled THEN
        RAISE EXCEPTION 'Settlement history % does not match settled amount % for entry %',
            v_history, v_settled, v_entry_id;
    END IF;

    RETURN NULL;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_conservation_entries
AFTER INSERT OR UPDATE ON ledger_entries
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_settlement_conservation();

CREATE CONSTRAINT TRIGGER trg_conservation_settlements
AFTER INSERT ON settlements
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_settlement_conservation();

-- ============================================================
-- FUNCTION: prevent_settlement_modification
-- Settlement records are immutable once written.
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_settlement_modification()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Settlement records cannot be modified';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_settlement_update
BEFORE UPDATE ON settlements
FOR EACH ROW
EXECUTE FUNCTION prevent_settlement_modification();

-- ============================================================
-- FUNCTION: protect_ledger_entry_terms
-- Total, identity and source linkage are fixed at creation.
-- ============================================================
CREATE OR REPLACE FUNCTION protect_ledger_entry_terms()
RETURNS TRIGGER AS $$
BEGIN
    IF NEW.total_amount <> OLD.total_amount
        OR NEW.organization_id <> OLD.organization_id
        OR NEW.direction <> OLD.direction
        OR NEW.source_type <> OLD.source_type
        OR NEW.reference_id <> OLD.reference_id THEN
        RAISE EXCEPTION 'Ledger entry % terms cannot be modified', OLD.id;
    END IF;

    IF NEW.settled_amount < OLD.settled_amount THEN
        RAISE EXCEPTION 'Settled amount of entry % cannot decrease', OLD.id;
    END IF;

    NEW.updated_at := now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_protect_ledger_entry_terms
BEFORE UPDATE ON ledger_entries
FOR EACH ROW
EXECUTE FUNCTION protect_ledger_entry_terms();
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS settlements CASCADE;
DROP TABLE IF EXISTS ledger_entries CASCADE;
DROP FUNCTION IF EXISTS check_settlement_conservation() CASCADE;
DROP FUNCTION IF EXISTS prevent_settlement_modification() CASCADE;
DROP FUNCTION IF EXISTS protect_ledger_entry_terms() CASCADE;
DROP TYPE IF EXISTS settlement_method;
DROP TYPE IF EXISTS settlement_status;
DROP TYPE IF EXISTS ledger_source_type;
DROP TYPE IF EXISTS ledger_direction;
";
