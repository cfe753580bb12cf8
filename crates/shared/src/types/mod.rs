//! Common types used across the application.

pub mod actor;
pub mod id;
pub mod money;
pub mod pagination;

pub use actor::ActorContext;
pub use id::*;
pub use money::{Currency, Money};
pub use pagination::{PageRequest, PageResponse};
