//! Glide Smoother - Per-entity pose smoothing state machine
//!
//! Buffers fixed-rate authoritative pose snapshots and renders them as
//! smooth continuous motion, tolerating network jitter, rollback
//! corrections, and teleports.
//!
//! # Architecture
//!
//! ```text
//!            tick boundary                    render frame
//!  ┌───────────────────────────┐        ┌──────────────────────┐
//!  │ on_pre_tick               │        │ on_update(delta)     │
//!  │   discard excessive       │        │   gate on depth      │
//!  │   capture pre-tick pose   │        │   step toward head   │
//!  │ on_post_tick(tick)        │──────▶ │   chain on leftover  │
//!  │   restore + enqueue       │  queue │   write visual pose  │
//!  └───────────────────────────┘        └──────────────────────┘
//!            ▲                                    ▲
//!  on_round_trip_time(rtt)            on_replicate_replay(tick)
//!    adaptive buffer depth              ease buffered entries
//! ```
//!
//! The four event entry points are driven synchronously by the embedding
//! simulation; each entity's state is exclusive to it, so there is no
//! locking anywhere.
//!
//! # Example
//!
//! ```rust,ignore
//! use glide_core::{RoleSettings, SmootherRole, TickTiming};
//! use glide_smoother::{PoseBinding, TickSmoother};
//!
//! let mut smoother = TickSmoother::new(
//!     binding,
//!     RoleSettings::default(),
//!     SmootherRole::Spectator,
//!     TickTiming::new(30),
//! );
//!
//! // Driven by the simulation loop:
//! smoother.on_pre_tick();
//! run_simulation_tick();
//! smoother.on_post_tick(tick);
//!
//! // Driven by the render loop:
//! smoother.on_update(frame_delta);
//! ```

mod binding;
mod error;
mod host;
mod smoother;

pub use binding::PoseBinding;
pub use error::{Error, Result};
pub use host::SmootherHost;
pub use smoother::TickSmoother;

// Re-export the state-machine constants shared with the batch variant.
pub use glide_core::{QUEUE_SLACK, STARVATION_DEFICIT};
