//! Dense per-slot storage and cross-pass payloads
//!
//! All arrays are kept index-aligned and dense: registration appends one
//! element to every array, unregistration swap-removes the same index from
//! every array. Hot data (queues, rates, poses) gets its own array for
//! contiguous access in the passes that touch it; the small per-slot flags
//! share one array of [`SlotState`] records.

use glide_core::{
    AdaptiveInterpolationEstimator, MoveRate, Pose, RoleSettings, SmootherRole, SmoothingSettings,
    UNSET_TICK,
};
use glide_ring::SnapshotQueue;

/// Cross-pass hand-off asking the apply-rates pass to recompute a slot's
/// move rate from `prev` to the slot's current queue head
///
/// Written by the discard-excessive and capture passes, consumed (and
/// reset) by the apply-rates pass that follows them.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RatePayload {
    pub execute: bool,
    /// Pose motion is re-based on: the last trimmed snapshot, or the
    /// visual pose at first capture
    pub prev: Pose,
}

impl Default for RatePayload {
    fn default() -> Self {
        Self {
            execute: false,
            prev: Pose::IDENTITY,
        }
    }
}

/// Cross-pass hand-off asking the teleport pass to reset a slot
///
/// Written from the caller thread by `request_teleport`, consumed (and
/// reset) by the teleport pass at the next tick boundary.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TeleportPayload {
    pub execute: bool,
    /// Tick being simulated when the teleport was requested
    pub tick: u32,
}

/// Small per-slot machine flags, one record per slot
#[derive(Debug, Clone, Copy)]
pub(crate) struct SlotState {
    pub pre_ticked: bool,
    pub moving: bool,
    pub enabled: bool,
    pub detached: bool,
    pub teleported_tick: u32,
    pub multiplier: f32,
}

impl Default for SlotState {
    fn default() -> Self {
        Self {
            pre_ticked: false,
            moving: false,
            enabled: true,
            detached: false,
            teleported_tick: UNSET_TICK,
            multiplier: 1.0,
        }
    }
}

/// The structure-of-arrays backing store
///
/// Index i across every field is one entity's state. The arrays only
/// resize on the caller thread, never while a pass is in flight.
#[derive(Default)]
pub(crate) struct SlotArrays {
    pub queues: Vec<SnapshotQueue>,
    pub rates: Vec<MoveRate>,
    pub visual: Vec<Pose>,
    pub tracker: Vec<Pose>,
    pub pre_tick_pose: Vec<Pose>,
    pub state: Vec<SlotState>,
    /// Settings for the slot's active role, resolved at registration and
    /// on role/settings changes so passes read a single array
    pub active: Vec<SmoothingSettings>,
    pub role_settings: Vec<RoleSettings>,
    pub roles: Vec<SmootherRole>,
    pub interpolation: Vec<u8>,
    pub estimators: Vec<AdaptiveInterpolationEstimator>,
    pub rate_payload: Vec<RatePayload>,
    pub teleport_payload: Vec<TeleportPayload>,
}

impl SlotArrays {
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    /// Append one slot; returns its index
    pub fn push(&mut self, settings: RoleSettings, role: SmootherRole, initial: Pose) -> usize {
        let active = *settings.for_role(role);
        self.queues.push(SnapshotQueue::default());
        self.rates.push(MoveRate::UNSET);
        self.visual.push(initial);
        self.tracker.push(initial);
        self.pre_tick_pose.push(initial);
        self.state.push(SlotState::default());
        self.active.push(active);
        self.role_settings.push(settings);
        self.roles.push(role);
        self.interpolation.push(active.interpolation_ticks.max(1));
        self.estimators.push(AdaptiveInterpolationEstimator::new());
        self.rate_payload.push(RatePayload::default());
        self.teleport_payload.push(TeleportPayload::default());
        self.len() - 1
    }

    /// Remove slot `index` by swapping the last slot into its place
    ///
    /// Every array swaps the same index, so alignment is preserved; the
    /// caller must update its lookup table for the slot that moved.
    pub fn swap_remove(&mut self, index: usize) {
        self.queues.swap_remove(index);
        self.rates.swap_remove(index);
        self.visual.swap_remove(index);
        self.tracker.swap_remove(index);
        self.pre_tick_pose.swap_remove(index);
        self.state.swap_remove(index);
        self.active.swap_remove(index);
        self.role_settings.swap_remove(index);
        self.roles.swap_remove(index);
        self.interpolation.swap_remove(index);
        self.estimators.swap_remove(index);
        self.rate_payload.swap_remove(index);
        self.teleport_payload.swap_remove(index);
    }

    /// Re-resolve the active settings for slot `index` after a role or
    /// settings change
    pub fn refresh_active(&mut self, index: usize) {
        let active = *self.role_settings[index].for_role(self.roles[index]);
        self.active[index] = active;
        if active.adaptive_level.is_adaptive() {
            self.interpolation[index] = self.estimators[index].current();
        } else {
            self.interpolation[index] = active.interpolation_ticks.max(1);
        }
    }
}
