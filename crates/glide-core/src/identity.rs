//! Entity identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a tracked entity
///
/// Assigned by the embedding application (typically the replication layer's
/// network object id). Glide only uses it as a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
