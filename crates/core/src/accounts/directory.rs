//! Read-only account directory.
//!
//! Built once per unit of work from the stored chart of accounts and
//! consulted by the ledger poster and the balance calculator. No mutation
//! flows through this view.

use std::collections::{HashMap, HashSet};

use kasira_shared::types::AccountId;

use super::error::AccountError;
use super::types::{Account, AccountCategory, AccountSubCategory, NormalBalance};

/// A resolved account: the flattened view the engine works with.
#[derive(Debug, Clone)]
pub struct AccountRef {
    /// The account ID.
    pub id: AccountId,
    /// Unique structured code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Whether the account accepts new postings.
    pub is_active: bool,
    /// Polarity inherited from the account's category.
    pub normal_balance: NormalBalance,
}

/// Read-only view over the chart of accounts hierarchy.
#[derive(Debug, Clone)]
pub struct AccountDirectory {
    accounts: HashMap<AccountId, AccountRef>,
}

impl AccountDirectory {
    /// Builds the directory, validating the hierarchy:
    /// every account belongs to exactly one known subcategory, every
    /// subcategory to exactly one known category, and codes are unique.
    ///
    /// # Errors
    ///
    /// Returns `AccountError` if a reference dangles or a code repeats.
    pub fn build(
        categories: &[AccountCategory],
        subcategories: &[AccountSubCategory],
        accounts: &[Account],
    ) -> Result<Self, AccountError> {
        let category_polarity: HashMap<_, _> = categories
            .iter()
            .map(|c| (c.id, c.normal_balance))
            .collect();

        let mut subcategory_polarity = HashMap::with_capacity(subcategories.len());
        for sub in subcategories {
            let polarity = category_polarity.get(&sub.category_id).copied().ok_or(
                AccountError::UnknownCategory {
                    subcategory: sub.id,
                    category: sub.category_id,
                },
            )?;
            subcategory_polarity.insert(sub.id, polarity);
        }

        let mut seen_codes = HashSet::with_capacity(accounts.len());
        let mut resolved = HashMap::with_capacity(accounts.len());
        for account in accounts {
            let polarity = subcategory_polarity
                .get(&account.subcategory_id)
                .copied()
                .ok_or(AccountError::UnknownSubCategory {
                    account: account.id,
                    subcategory: account.subcategory_id,
                })?;

            if !seen_codes.insert(account.code.clone()) {
                return Err(AccountError::DuplicateCode(account.code.clone()));
            }

            resolved.insert(
                account.id,
                AccountRef {
                    id: account.id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    is_active: account.is_active,
                    normal_balance: polarity,
                },
            );
        }

        Ok(Self { accounts: resolved })
    }

    /// Looks up an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` for unknown IDs.
    pub fn resolve(&self, id: AccountId) -> Result<&AccountRef, AccountError> {
        self.accounts.get(&id).ok_or(AccountError::NotFound(id))
    }

    /// Iterates all accounts in the directory.
    pub fn iter(&self) -> impl Iterator<Item = &AccountRef> {
        self.accounts.values()
    }

    /// Number of accounts in the directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the directory holds no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
