//! `SeaORM` active enums mirroring the Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mirrors the `normal_balance` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "normal_balance")]
#[serde(rename_all = "snake_case")]
pub enum NormalBalance {
    /// Debits increase the balance.
    #[sea_orm(string_value = "debit_increasing")]
    DebitIncreasing,
    /// Credits increase the balance.
    #[sea_orm(string_value = "credit_increasing")]
    CreditIncreasing,
}

/// Mirrors the `transaction_kind` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Stock received from a supplier.
    #[sea_orm(string_value = "purchase")]
    Purchase,
    /// Stock sold to a customer.
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Balanced journal without inventory effect.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

/// Mirrors the `transaction_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Editable, no effects yet.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Posted to the ledger.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Terminal.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Mirrors the `counterparty_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "counterparty_type")]
#[serde(rename_all = "snake_case")]
pub enum CounterpartyType {
    /// An individual.
    #[sea_orm(string_value = "person")]
    Person,
    /// A business.
    #[sea_orm(string_value = "company")]
    Company,
}

/// Mirrors the `payment_kind` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_kind")]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Money received.
    #[sea_orm(string_value = "receipt")]
    Receipt,
    /// Money paid out.
    #[sea_orm(string_value = "disbursement")]
    Disbursement,
}

/// Mirrors the `payment_method` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank transfer.
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// Card payment.
    #[sea_orm(string_value = "card")]
    Card,
    /// Cheque.
    #[sea_orm(string_value = "cheque")]
    Cheque,
}

impl From<NormalBalance> for kasira_core::accounts::NormalBalance {
    fn from(value: NormalBalance) -> Self {
        match value {
            NormalBalance::DebitIncreasing => Self::DebitIncreasing,
            NormalBalance::CreditIncreasing => Self::CreditIncreasing,
        }
    }
}

impl From<kasira_core::lifecycle::TransactionStatus> for TransactionStatus {
    fn from(value: kasira_core::lifecycle::TransactionStatus) -> Self {
        match value {
            kasira_core::lifecycle::TransactionStatus::Draft => Self::Draft,
            kasira_core::lifecycle::TransactionStatus::Posted => Self::Posted,
            kasira_core::lifecycle::TransactionStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<TransactionStatus> for kasira_core::lifecycle::TransactionStatus {
    fn from(value: TransactionStatus) -> Self {
        match value {
            TransactionStatus::Draft => Self::Draft,
            TransactionStatus::Posted => Self::Posted,
            TransactionStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<kasira_core::lifecycle::TransactionKind> for TransactionKind {
    fn from(value: kasira_core::lifecycle::TransactionKind) -> Self {
        match value {
            kasira_core::lifecycle::TransactionKind::Purchase => Self::Purchase,
            kasira_core::lifecycle::TransactionKind::Sale => Self::Sale,
            kasira_core::lifecycle::TransactionKind::Adjustment => Self::Adjustment,
        }
    }
}

impl From<TransactionKind> for kasira_core::lifecycle::TransactionKind {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Purchase => Self::Purchase,
            TransactionKind::Sale => Self::Sale,
            TransactionKind::Adjustment => Self::Adjustment,
        }
    }
}

impl From<kasira_core::payment::PaymentKind> for PaymentKind {
    fn from(value: kasira_core::payment::PaymentKind) -> Self {
        match value {
            kasira_core::payment::PaymentKind::Receipt => Self::Receipt,
            kasira_core::payment::PaymentKind::Disbursement => Self::Disbursement,
        }
    }
}

impl From<kasira_core::payment::PaymentMethod> for PaymentMethod {
    fn from(value: kasira_core::payment::PaymentMethod) -> Self {
        match value {
            kasira_core::payment::PaymentMethod::Cash => Self::Cash,
            kasira_core::payment::PaymentMethod::BankTransfer => Self::BankTransfer,
            kasira_core::payment::PaymentMethod::Card => Self::Card,
            kasira_core::payment::PaymentMethod::Cheque => Self::Cheque,
        }
    }
}

impl From<PaymentKind> for kasira_core::payment::PaymentKind {
    fn from(value: PaymentKind) -> Self {
        match value {
            PaymentKind::Receipt => Self::Receipt,
            PaymentKind::Disbursement => Self::Disbursement,
        }
    }
}

impl From<PaymentMethod> for kasira_core::payment::PaymentMethod {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::BankTransfer => Self::BankTransfer,
            PaymentMethod::Card => Self::Card,
            PaymentMethod::Cheque => Self::Cheque,
        }
    }
}
