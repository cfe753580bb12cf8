//! Chart of accounts directory.
//!
//! Read-only view over the category → subcategory → account hierarchy.
//! The category fixes the normal-balance polarity for every account
//! beneath it; the subcategory is a pure grouping layer.

pub mod directory;
pub mod error;
pub mod types;

pub use directory::{AccountDirectory, AccountRef};
pub use error::AccountError;
pub use types::{Account, AccountCategory, AccountSubCategory, NormalBalance};
