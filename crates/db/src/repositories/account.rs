//! Account repository: the read-only chart of accounts surface.

use std::sync::Arc;

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use kasira_core::accounts::{
    Account, AccountCategory, AccountDirectory, AccountError, AccountSubCategory, NormalBalance,
};
use kasira_shared::config::PostingAccountCodes;
use kasira_shared::types::{AccountCategoryId, AccountId, AccountSubCategoryId};

use kasira_core::ledger::{PurchaseAccounts, SaleAccounts};

use crate::entities::{account_categories, account_subcategories, accounts};

/// Error types for chart of accounts operations.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// A configured posting account code has no account row.
    #[error("No account exists with code {0}; check the ledger.accounts configuration")]
    MissingPostingAccount(String),

    /// The stored chart is inconsistent.
    #[error(transparent)]
    Chart(#[from] AccountError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One account row joined with its category polarity, for listings.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AccountView {
    /// The account ID.
    pub id: Uuid,
    /// Unique structured code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Whether the account accepts new postings.
    pub is_active: bool,
    /// Whether the account is protected from user edits.
    pub is_system: bool,
    /// Polarity inherited from the category.
    pub normal_balance: NormalBalance,
    /// Owning category name.
    pub category: String,
    /// Owning subcategory name.
    pub subcategory: String,
}

/// Repository for the chart of accounts.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: Arc<DatabaseConnection>,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Loads and validates the whole chart into a directory.
    ///
    /// # Errors
    ///
    /// Returns `ChartError` if the stored hierarchy is inconsistent or
    /// the query fails.
    pub async fn load_directory(&self) -> Result<AccountDirectory, ChartError> {
        let categories: Vec<AccountCategory> = account_categories::Entity::find()
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|c| AccountCategory {
                id: AccountCategoryId::from_uuid(c.id),
                name: c.name,
                normal_balance: c.normal_balance.into(),
            })
            .collect();

        let subcategories: Vec<AccountSubCategory> = account_subcategories::Entity::find()
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|s| AccountSubCategory {
                id: AccountSubCategoryId::from_uuid(s.id),
                category_id: AccountCategoryId::from_uuid(s.category_id),
                name: s.name,
            })
            .collect();

        let account_rows: Vec<Account> = accounts::Entity::find()
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|a| Account {
                id: AccountId::from_uuid(a.id),
                subcategory_id: AccountSubCategoryId::from_uuid(a.subcategory_id),
                code: a.code,
                name: a.name,
                is_active: a.is_active,
                is_system: a.is_system,
            })
            .collect();

        Ok(AccountDirectory::build(
            &categories,
            &subcategories,
            &account_rows,
        )?)
    }

    /// Resolves the configured posting account codes against the chart.
    ///
    /// # Errors
    ///
    /// Returns `MissingPostingAccount` naming the first code without an
    /// account row.
    pub async fn resolve_posting_accounts(
        &self,
        codes: &PostingAccountCodes,
    ) -> Result<(PurchaseAccounts, SaleAccounts), ChartError> {
        let directory = self.load_directory().await?;
        Self::resolve_posting_accounts_in(&directory, codes)
    }

    /// Resolves posting account codes against an already loaded directory.
    ///
    /// # Errors
    ///
    /// Returns `MissingPostingAccount` naming the first code without an
    /// account row.
    pub fn resolve_posting_accounts_in(
        directory: &AccountDirectory,
        codes: &PostingAccountCodes,
    ) -> Result<(PurchaseAccounts, SaleAccounts), ChartError> {
        let by_code = |code: &str| -> Result<AccountId, ChartError> {
            directory
                .iter()
                .find(|a| a.code == code)
                .map(|a| a.id)
                .ok_or_else(|| ChartError::MissingPostingAccount(code.to_string()))
        };

        let inventory = by_code(&codes.inventory)?;
        let purchase = PurchaseAccounts {
            inventory,
            payable: by_code(&codes.payable)?,
        };
        let sale = SaleAccounts {
            receivable: by_code(&codes.receivable)?,
            revenue: by_code(&codes.revenue)?,
            cogs: by_code(&codes.cogs)?,
            inventory,
        };
        Ok((purchase, sale))
    }

    /// Lists accounts with category context, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns `ChartError` if a query fails or the hierarchy dangles.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<AccountView>, ChartError> {
        let categories = account_categories::Entity::find().all(self.db.as_ref()).await?;
        let subcategories = account_subcategories::Entity::find().all(self.db.as_ref()).await?;

        let mut query = accounts::Entity::find().order_by_asc(accounts::Column::Code);
        if !include_inactive {
            query = query.filter(accounts::Column::IsActive.eq(true));
        }
        let rows = query.all(self.db.as_ref()).await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let subcategory = subcategories
                .iter()
                .find(|s| s.id == row.subcategory_id)
                .ok_or(AccountError::UnknownSubCategory {
                    account: AccountId::from_uuid(row.id),
                    subcategory: AccountSubCategoryId::from_uuid(row.subcategory_id),
                })?;
            let category = categories
                .iter()
                .find(|c| c.id == subcategory.category_id)
                .ok_or(AccountError::UnknownCategory {
                    subcategory: AccountSubCategoryId::from_uuid(subcategory.id),
                    category: AccountCategoryId::from_uuid(subcategory.category_id),
                })?;

            views.push(AccountView {
                id: row.id,
                code: row.code,
                name: row.name,
                is_active: row.is_active,
                is_system: row.is_system,
                normal_balance: category.normal_balance.into(),
                category: category.name.clone(),
                subcategory: subcategory.name.clone(),
            });
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(codes: &[&str]) -> AccountDirectory {
        let category = AccountCategory {
            id: AccountCategoryId::new(),
            name: "Assets".to_string(),
            normal_balance: NormalBalance::DebitIncreasing,
        };
        let subcategory = AccountSubCategory {
            id: AccountSubCategoryId::new(),
            category_id: category.id,
            name: "Current Assets".to_string(),
        };
        let accounts: Vec<Account> = codes
            .iter()
            .map(|code| Account {
                id: AccountId::new(),
                subcategory_id: subcategory.id,
                code: (*code).to_string(),
                name: (*code).to_string(),
                is_active: true,
                is_system: true,
            })
            .collect();
        AccountDirectory::build(&[category], &[subcategory], &accounts).unwrap()
    }

    #[test]
    fn test_resolve_posting_accounts_shares_inventory() {
        let dir = directory(&["1100", "1200", "2000", "4000", "5000"]);
        let (purchase, sale) =
            AccountRepository::resolve_posting_accounts_in(&dir, &PostingAccountCodes::default())
                .unwrap();

        // Purchases debit the same inventory account sales credit.
        assert_eq!(purchase.inventory, sale.inventory);
        assert_ne!(purchase.payable, sale.receivable);
    }

    #[test]
    fn test_missing_posting_account_names_the_code() {
        // No COGS account seeded.
        let dir = directory(&["1100", "1200", "2000", "4000"]);
        let err =
            AccountRepository::resolve_posting_accounts_in(&dir, &PostingAccountCodes::default())
                .unwrap_err();
        assert!(matches!(
            err,
            ChartError::MissingPostingAccount(code) if code == "5000"
        ));
    }
}
