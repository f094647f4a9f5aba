//! Error types for glide-smoother

use glide_core::EntityId;
use thiserror::Error;

/// Smoother error type
#[derive(Debug, Error)]
pub enum Error {
    /// Entity is already registered with the host
    #[error("Entity already registered: {0}")]
    AlreadyRegistered(EntityId),

    /// Entity is not registered with the host
    #[error("Entity not registered: {0}")]
    NotRegistered(EntityId),
}

/// Result type for smoother operations
pub type Result<T> = std::result::Result<T, Error>;
