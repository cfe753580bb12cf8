//! Account directory error types.

use kasira_shared::types::{AccountCategoryId, AccountId, AccountSubCategoryId};
use thiserror::Error;

/// Errors raised when building or querying the account directory.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account not found in the directory.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Account references a subcategory missing from the directory.
    #[error("Account {account} references unknown subcategory {subcategory}")]
    UnknownSubCategory {
        /// The offending account.
        account: AccountId,
        /// The dangling subcategory reference.
        subcategory: AccountSubCategoryId,
    },

    /// Subcategory references a category missing from the directory.
    #[error("Subcategory {subcategory} references unknown category {category}")]
    UnknownCategory {
        /// The offending subcategory.
        subcategory: AccountSubCategoryId,
        /// The dangling category reference.
        category: AccountCategoryId,
    },

    /// Two accounts share the same code.
    #[error("Duplicate account code: {0}")]
    DuplicateCode(String),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::UnknownSubCategory { .. } => "UNKNOWN_SUBCATEGORY",
            Self::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
        }
    }
}
