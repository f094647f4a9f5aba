//! Glide Core - Pose types and pure smoothing math
//!
//! This crate provides the value types and solvers shared by the glide
//! smoothing crates:
//!
//! - **Pose model**: `Pose` and `TickSnapshot` value types
//! - **Move rates**: per-property traversal rates with teleport detection
//! - **Settings**: per-role smoothing configuration and property masks
//! - **Adaptive estimation**: round-trip-time to buffer depth conversion
//! - **Tick timing**: tick rate / tick delta helpers
//!
//! Everything here is pure data and math: no queues, no entity lifecycle,
//! no engine access. The state machines live in `glide-smoother` (single
//! entity) and `glide-batch` (data-parallel over many entities).

mod estimator;
mod identity;
mod pose;
mod rate;
mod settings;
mod snapshot;
mod timing;

pub use estimator::AdaptiveInterpolationEstimator;
pub use identity::EntityId;
pub use pose::Pose;
pub use rate::{MoveRate, INSTANT_VALUE, UNSET_VALUE};
pub use settings::{
    AdaptiveLevel, PropertyMask, RoleSettings, SmootherRole, SmoothingSettings,
    MOVE_IMMEDIATELY_EASE_MAX, MOVE_IMMEDIATELY_EASE_MIN, OVER_INTERPOLATION_CORRECTION,
    QUEUE_SLACK, STARVATION_DEFICIT,
};
pub use snapshot::{TickSnapshot, UNSET_TICK};
pub use timing::TickTiming;

// Re-export the math types used throughout the public API.
pub use glam::{Quat, Vec3};
