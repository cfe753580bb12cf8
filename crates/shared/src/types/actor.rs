//! Actor context for audit columns.
//!
//! Every mutating operation records who performed it. The created-by /
//! updated-by relations self-reference at the schema level, so the context
//! is passed as a value instead of being resolved through a live object
//! graph. The very first actor in a fresh database is seeded with the
//! bootstrap context pointing at itself through the nil UUID.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::id::ActorId;

/// Identifies the actor performing a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// The acting user or system principal.
    pub actor_id: ActorId,
}

impl ActorContext {
    /// Creates a context for a known actor.
    #[must_use]
    pub const fn new(actor_id: ActorId) -> Self {
        Self { actor_id }
    }

    /// The bootstrap context used to seed the first actor.
    ///
    /// Uses the nil UUID; only the seeder may write rows with it.
    #[must_use]
    pub const fn bootstrap() -> Self {
        Self {
            actor_id: ActorId::from_uuid(Uuid::nil()),
        }
    }

    /// Returns true if this is the bootstrap context.
    #[must_use]
    pub fn is_bootstrap(&self) -> bool {
        self.actor_id.into_inner().is_nil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_is_nil() {
        let ctx = ActorContext::bootstrap();
        assert!(ctx.is_bootstrap());
        assert!(ctx.actor_id.into_inner().is_nil());
    }

    #[test]
    fn test_regular_actor_is_not_bootstrap() {
        let ctx = ActorContext::new(ActorId::new());
        assert!(!ctx.is_bootstrap());
    }
}
