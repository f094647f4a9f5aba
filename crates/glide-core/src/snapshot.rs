//! Tick-stamped pose snapshots

use crate::Pose;
use serde::{Deserialize, Serialize};

/// Sentinel tick value meaning "no tick recorded"
pub const UNSET_TICK: u32 = u32::MAX;

/// A pose captured at a specific simulation tick
///
/// Snapshots are created by the post-tick capture and consumed once fully
/// traversed. The only in-place mutation allowed is the replay correction
/// step, which eases a buffered-but-unconsumed entry toward recomputed
/// authoritative state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    /// Monotonically increasing local tick this pose was captured at
    pub tick: u32,
    /// Ground-truth pose sampled after the tick ran
    pub pose: Pose,
}

impl TickSnapshot {
    /// Create a snapshot for the given tick
    pub fn new(tick: u32, pose: Pose) -> Self {
        Self { tick, pose }
    }
}
