//! Account hierarchy domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kasira_shared::types::{AccountCategoryId, AccountId, AccountSubCategoryId};

/// Whether an account's natural increase is recorded as a debit or a credit.
///
/// In double-entry bookkeeping:
/// - Debit-increasing: assets, expenses
/// - Credit-increasing: liabilities, equity, revenue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalBalance {
    /// Debits increase the account balance.
    DebitIncreasing,
    /// Credits increase the account balance.
    CreditIncreasing,
}

impl NormalBalance {
    /// Expresses raw debit/credit totals as the account's natural-direction
    /// balance.
    #[must_use]
    pub fn natural_balance(self, debit_total: Decimal, credit_total: Decimal) -> Decimal {
        match self {
            Self::DebitIncreasing => debit_total - credit_total,
            Self::CreditIncreasing => credit_total - debit_total,
        }
    }
}

/// Top of the account hierarchy; fixes `NormalBalance` for all descendants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCategory {
    /// The category ID.
    pub id: AccountCategoryId,
    /// Display name (e.g. "Assets").
    pub name: String,
    /// Polarity inherited by every account in this category.
    pub normal_balance: NormalBalance,
}

/// Pure grouping layer between category and account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSubCategory {
    /// The subcategory ID.
    pub id: AccountSubCategoryId,
    /// The owning category.
    pub category_id: AccountCategoryId,
    /// Display name (e.g. "Current Assets").
    pub name: String,
}

/// A postable account in the chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// The account ID.
    pub id: AccountId,
    /// The owning subcategory.
    pub subcategory_id: AccountSubCategoryId,
    /// Unique structured code (e.g. "1100"). Immutable once the account
    /// is referenced by a ledger entry.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Inactive accounts reject new postings but keep their history.
    pub is_active: bool,
    /// System accounts cannot be deactivated or renamed by users.
    pub is_system: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_increasing_natural_balance() {
        let nb = NormalBalance::DebitIncreasing;
        assert_eq!(nb.natural_balance(dec!(100), dec!(30)), dec!(70));
        assert_eq!(nb.natural_balance(dec!(0), dec!(50)), dec!(-50));
    }

    #[test]
    fn test_credit_increasing_natural_balance() {
        let nb = NormalBalance::CreditIncreasing;
        assert_eq!(nb.natural_balance(dec!(30), dec!(100)), dec!(70));
        assert_eq!(nb.natural_balance(dec!(50), dec!(0)), dec!(-50));
    }
}
