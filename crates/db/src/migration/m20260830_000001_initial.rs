//! Initial database migration.
//!
//! Creates the enums, chart of accounts, inventory, ledger, and payment
//! tables with their integrity constraints.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNT_CATEGORIES_SQL).await?;
        db.execute_unprepared(ACCOUNT_SUBCATEGORIES_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: INVENTORY
        // ============================================================
        db.execute_unprepared(PRODUCT_UNITS_SQL).await?;
        db.execute_unprepared(BATCHES_SQL).await?;

        // ============================================================
        // PART 4: JOURNALS & LEDGER
        // ============================================================
        db.execute_unprepared(JOURNALS_SQL).await?;
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;

        // ============================================================
        // PART 5: TRANSACTIONS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(PURCHASES_SQL).await?;
        db.execute_unprepared(SALES_SQL).await?;
        db.execute_unprepared(PURCHASE_LINES_SQL).await?;
        db.execute_unprepared(SALE_LINES_SQL).await?;
        db.execute_unprepared(ADJUSTMENT_LINES_SQL).await?;
        db.execute_unprepared(BATCH_DRAWS_SQL).await?;

        // ============================================================
        // PART 6: PAYMENTS
        // ============================================================
        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(PAYMENT_ALLOCATIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE normal_balance AS ENUM (
    'debit_increasing',
    'credit_increasing'
);

CREATE TYPE transaction_kind AS ENUM (
    'purchase',
    'sale',
    'adjustment'
);

CREATE TYPE transaction_status AS ENUM (
    'draft',
    'posted',
    'cancelled'
);

CREATE TYPE counterparty_type AS ENUM (
    'person',
    'company'
);

CREATE TYPE payment_kind AS ENUM (
    'receipt',
    'disbursement'
);

CREATE TYPE payment_method AS ENUM (
    'cash',
    'bank_transfer',
    'card',
    'cheque'
);
";

const ACCOUNT_CATEGORIES_SQL: &str = r"
CREATE TABLE account_categories (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    normal_balance normal_balance NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const ACCOUNT_SUBCATEGORIES_SQL: &str = r"
CREATE TABLE account_subcategories (
    id UUID PRIMARY KEY,
    category_id UUID NOT NULL REFERENCES account_categories(id),
    name VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_account_subcategories_category ON account_subcategories(category_id);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    subcategory_id UUID NOT NULL REFERENCES account_subcategories(id),
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(100) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    is_system BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_accounts_subcategory ON accounts(subcategory_id);
";

const PRODUCT_UNITS_SQL: &str = r"
CREATE TABLE product_units (
    id UUID PRIMARY KEY,
    name VARCHAR(200) NOT NULL,
    unit_label VARCHAR(50) NOT NULL,
    conversion_factor NUMERIC(20, 6) NOT NULL DEFAULT 1,
    sale_price NUMERIC(20, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_conversion_factor_positive CHECK (conversion_factor > 0),
    CONSTRAINT chk_sale_price_non_negative CHECK (sale_price >= 0)
);
";

const BATCHES_SQL: &str = r"
CREATE TABLE batches (
    id UUID PRIMARY KEY,
    product_unit_id UUID NOT NULL REFERENCES product_units(id),
    purchase_line_id UUID,
    total_quantity NUMERIC(20, 4) NOT NULL,
    remaining_quantity NUMERIC(20, 4) NOT NULL,
    unit_cost NUMERIC(20, 4) NOT NULL,
    production_date DATE,
    expiry_date DATE,
    sequence BIGINT NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_batch_quantities CHECK (
        remaining_quantity >= 0 AND remaining_quantity <= total_quantity
    ),
    CONSTRAINT chk_batch_unit_cost CHECK (unit_cost >= 0)
);

CREATE INDEX idx_batches_product_unit ON batches(product_unit_id);
CREATE INDEX idx_batches_consumption_order
    ON batches(product_unit_id, expiry_date NULLS LAST, sequence)
    WHERE remaining_quantity > 0;
";

const JOURNALS_SQL: &str = r"
CREATE TABLE journals (
    id UUID PRIMARY KEY,
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    reverses_journal_id UUID REFERENCES journals(id),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_journals_entry_date ON journals(entry_date);
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    journal_id UUID NOT NULL REFERENCES journals(id),
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit NUMERIC(20, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(20, 4) NOT NULL DEFAULT 0,
    memo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_entry_single_sided CHECK (
        (debit > 0 AND credit = 0) OR (credit > 0 AND debit = 0)
    )
);

CREATE INDEX idx_ledger_entries_journal ON ledger_entries(journal_id);
CREATE INDEX idx_ledger_entries_account ON ledger_entries(account_id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    kind transaction_kind NOT NULL,
    status transaction_status NOT NULL DEFAULT 'draft',
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    journal_id UUID REFERENCES journals(id),
    payment_id UUID,
    created_by UUID NOT NULL,
    finalized_by UUID,
    deleted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_transactions_status ON transactions(status);
CREATE INDEX idx_transactions_kind ON transactions(kind);
CREATE INDEX idx_transactions_entry_date ON transactions(entry_date);
";

const PURCHASES_SQL: &str = r"
CREATE TABLE purchases (
    transaction_id UUID PRIMARY KEY REFERENCES transactions(id),
    counterparty_type counterparty_type NOT NULL,
    counterparty_id UUID NOT NULL,
    actor_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const SALES_SQL: &str = r"
CREATE TABLE sales (
    transaction_id UUID PRIMARY KEY REFERENCES transactions(id),
    counterparty_type counterparty_type NOT NULL,
    counterparty_id UUID NOT NULL,
    actor_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PURCHASE_LINES_SQL: &str = r"
CREATE TABLE purchase_lines (
    id UUID PRIMARY KEY,
    transaction_id UUID NOT NULL REFERENCES transactions(id),
    product_unit_id UUID NOT NULL REFERENCES product_units(id),
    quantity NUMERIC(20, 4) NOT NULL,
    unit_cost NUMERIC(20, 4) NOT NULL,
    production_date DATE,
    expiry_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_purchase_line_quantity CHECK (quantity > 0),
    CONSTRAINT chk_purchase_line_unit_cost CHECK (unit_cost >= 0)
);

CREATE INDEX idx_purchase_lines_transaction ON purchase_lines(transaction_id);

ALTER TABLE batches
    ADD CONSTRAINT fk_batches_purchase_line
    FOREIGN KEY (purchase_line_id) REFERENCES purchase_lines(id);
";

const SALE_LINES_SQL: &str = r"
CREATE TABLE sale_lines (
    id UUID PRIMARY KEY,
    transaction_id UUID NOT NULL REFERENCES transactions(id),
    product_unit_id UUID NOT NULL REFERENCES product_units(id),
    quantity NUMERIC(20, 4) NOT NULL,
    unit_price NUMERIC(20, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_sale_line_quantity CHECK (quantity > 0),
    CONSTRAINT chk_sale_line_unit_price CHECK (unit_price > 0)
);

CREATE INDEX idx_sale_lines_transaction ON sale_lines(transaction_id);
";

const ADJUSTMENT_LINES_SQL: &str = r"
CREATE TABLE adjustment_lines (
    id UUID PRIMARY KEY,
    transaction_id UUID NOT NULL REFERENCES transactions(id),
    account_id UUID NOT NULL REFERENCES accounts(id),
    amount NUMERIC(20, 4) NOT NULL,
    is_debit BOOLEAN NOT NULL,
    memo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_adjustment_line_amount CHECK (amount > 0)
);

CREATE INDEX idx_adjustment_lines_transaction ON adjustment_lines(transaction_id);
";

const BATCH_DRAWS_SQL: &str = r"
CREATE TABLE batch_draws (
    id UUID PRIMARY KEY,
    transaction_id UUID NOT NULL REFERENCES transactions(id),
    batch_id UUID NOT NULL REFERENCES batches(id),
    quantity NUMERIC(20, 4) NOT NULL,
    unit_cost NUMERIC(20, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_batch_draw_quantity CHECK (quantity > 0)
);

CREATE INDEX idx_batch_draws_transaction ON batch_draws(transaction_id);
CREATE INDEX idx_batch_draws_batch ON batch_draws(batch_id);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    kind payment_kind NOT NULL,
    method payment_method NOT NULL,
    amount NUMERIC(20, 4) NOT NULL,
    paid_at DATE NOT NULL,
    memo TEXT,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_payment_amount_positive CHECK (amount > 0)
);

ALTER TABLE transactions
    ADD CONSTRAINT fk_transactions_payment
    FOREIGN KEY (payment_id) REFERENCES payments(id);
";

const PAYMENT_ALLOCATIONS_SQL: &str = r"
CREATE TABLE payment_allocations (
    id UUID PRIMARY KEY,
    payment_id UUID NOT NULL REFERENCES payments(id),
    transaction_id UUID NOT NULL REFERENCES transactions(id),
    amount NUMERIC(20, 4) NOT NULL,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_allocation_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_payment_allocations_payment ON payment_allocations(payment_id);
CREATE INDEX idx_payment_allocations_transaction ON payment_allocations(transaction_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS payment_allocations CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS batch_draws CASCADE;
DROP TABLE IF EXISTS adjustment_lines CASCADE;
DROP TABLE IF EXISTS sale_lines CASCADE;
DROP TABLE IF EXISTS purchase_lines CASCADE;
DROP TABLE IF EXISTS sales CASCADE;
DROP TABLE IF EXISTS purchases CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS ledger_entries CASCADE;
DROP TABLE IF EXISTS journals CASCADE;
DROP TABLE IF EXISTS batches CASCADE;
DROP TABLE IF EXISTS product_units CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS account_subcategories CASCADE;
DROP TABLE IF EXISTS account_categories CASCADE;

DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS payment_kind;
DROP TYPE IF EXISTS counterparty_type;
DROP TYPE IF EXISTS transaction_status;
DROP TYPE IF EXISTS transaction_kind;
DROP TYPE IF EXISTS normal_balance;
";

#[cfg(test)]
mod tests {
    use super::*;

    const UP_SQL: [&str; 17] = [
        ENUMS_SQL,
        ACCOUNT_CATEGORIES_SQL,
        ACCOUNT_SUBCATEGORIES_SQL,
        ACCOUNTS_SQL,
        PRODUCT_UNITS_SQL,
        BATCHES_SQL,
        JOURNALS_SQL,
        LEDGER_ENTRIES_SQL,
        TRANSACTIONS_SQL,
        PURCHASES_SQL,
        SALES_SQL,
        PURCHASE_LINES_SQL,
        SALE_LINES_SQL,
        ADJUSTMENT_LINES_SQL,
        BATCH_DRAWS_SQL,
        PAYMENTS_SQL,
        PAYMENT_ALLOCATIONS_SQL,
    ];

    #[test]
    fn test_receipt_sequence_has_unique_constraint() {
        // Concurrent purchase postings serialize on an advisory lock
        // before reading max(sequence); the constraint is the backstop
        // that turns a missed serialization into a hard failure instead
        // of silently duplicated receipt order.
        assert!(BATCHES_SQL.contains("sequence BIGINT NOT NULL UNIQUE"));
    }

    #[test]
    fn test_ledger_entries_are_single_sided() {
        assert!(LEDGER_ENTRIES_SQL.contains("chk_entry_single_sided"));
    }

    #[test]
    fn test_down_drops_everything_up_creates() {
        let up = UP_SQL.concat();
        assert_eq!(
            up.matches("CREATE TABLE").count(),
            DROP_ALL_SQL.matches("DROP TABLE").count()
        );
        assert_eq!(
            up.matches("CREATE TYPE").count(),
            DROP_ALL_SQL.matches("DROP TYPE").count()
        );
    }
}
