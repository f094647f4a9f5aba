//! Error types for glide-batch

use glide_core::EntityId;
use thiserror::Error;

/// Batch smoother error type
#[derive(Debug, Error)]
pub enum Error {
    /// Entity is already registered in the batch
    #[error("Entity already registered: {0}")]
    AlreadyRegistered(EntityId),

    /// Entity is not registered in the batch
    #[error("Entity not registered: {0}")]
    NotRegistered(EntityId),
}

/// Result type for batch operations
pub type Result<T> = std::result::Result<T, Error>;
