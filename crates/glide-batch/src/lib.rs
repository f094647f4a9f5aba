//! Glide Batch - Data-parallel smoothing for many entities
//!
//! Re-expresses the `glide-smoother` state machine as structure-of-arrays
//! storage plus staged parallel passes, for scenes where hundreds of
//! entities must be smoothed at minimal per-entity overhead.
//!
//! # Execution model
//!
//! Each external event runs a fixed sequence of passes; one pass is one
//! parallel-for over all active slots. A pass only ever writes its own
//! slot's state; anything a later pass needs crosses the barrier in a
//! payload record (`{ execute, data }`) rather than through shared queue
//! state, so passes are free of write/write and read/write hazards:
//!
//! ```text
//! pre-tick:   mark-pretick ─▶ discard-excessive ─▶ apply-rates
//! post-tick:  teleport ─▶ capture ─▶ apply-rates
//! frame:      move
//! rtt:        estimate
//! replay:     correct-buffered-entry
//! ```
//!
//! Passes are sequenced fork-join: pass N+1 starts only after pass N's
//! parallel-for returns, which is the barrier. There is no cross-slot
//! shared mutable state inside a pass; the backing arrays only resize
//! outside any in-flight pass (registration is a caller-thread operation).
//!
//! # Example
//!
//! ```rust
//! use glide_batch::BatchSmoother;
//! use glide_core::{EntityId, Pose, RoleSettings, SmootherRole, TickTiming, Vec3};
//!
//! let mut batch = BatchSmoother::new(TickTiming::new(30));
//! batch
//!     .register(
//!         EntityId(1),
//!         RoleSettings::default(),
//!         SmootherRole::Spectator,
//!         Pose::IDENTITY,
//!     )
//!     .unwrap();
//!
//! // Simulation loop, per tick:
//! batch.on_pre_tick();
//! batch.set_tracker_pose(EntityId(1), Pose::from_position(Vec3::new(1.0, 0.0, 0.0)));
//! batch.on_post_tick(1);
//!
//! // Render loop, per frame:
//! batch.on_update(1.0 / 60.0);
//! ```

mod arrays;
mod batch;
mod error;

pub use batch::BatchSmoother;
pub use error::{Error, Result};

/// Number of workers passes are balanced across
pub fn max_workers() -> usize {
    num_cpus::get().max(1)
}

/// Minimum slots per work unit for `len` active slots
///
/// Splitting finer than a few units per worker buys no parallelism and
/// pays scheduling overhead per unit.
pub(crate) fn batch_granularity(len: usize) -> usize {
    (len / (max_workers() * 4)).max(1)
}
