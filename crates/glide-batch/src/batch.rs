//! The batched smoothing controller
//!
//! Same state machine as `glide-smoother`'s `TickSmoother`, executed as
//! staged parallel passes over the slot arrays. Visual and tracker poses
//! live in the arrays; the embedding application syncs them in and out
//! around the passes instead of handing the batch a scene-graph seam.

use crate::arrays::{RatePayload, SlotArrays, TeleportPayload};
use crate::{batch_granularity, Error, Result};
use glide_core::{
    EntityId, MoveRate, Pose, RoleSettings, SmootherRole, SmoothingSettings, TickSnapshot,
    TickTiming, MOVE_IMMEDIATELY_EASE_MAX, MOVE_IMMEDIATELY_EASE_MIN,
    OVER_INTERPOLATION_CORRECTION, QUEUE_SLACK, STARVATION_DEFICIT, UNSET_TICK,
};
use indexmap::IndexMap;
use rayon::prelude::*;

/// Smooths many entities through data-parallel passes
///
/// Registration and unregistration happen on the caller thread between
/// event dispatches; the arrays never resize while a pass is running.
pub struct BatchSmoother {
    timing: TickTiming,
    /// Entity id → slot index; kept aligned with the arrays by performing
    /// the identical swap-remove on both
    lookup: IndexMap<EntityId, ()>,
    arrays: SlotArrays,
    /// Minimum slots per parallel work unit, recomputed when the slot
    /// count changes
    granularity: usize,
    /// Whether a rollback replay window is open
    reconciling: bool,
}

impl BatchSmoother {
    /// Create an empty batch for the given tick timing
    pub fn new(timing: TickTiming) -> Self {
        Self {
            timing,
            lookup: IndexMap::new(),
            arrays: SlotArrays::default(),
            granularity: 1,
            reconciling: false,
        }
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Whether no entities are registered
    pub fn is_empty(&self) -> bool {
        self.arrays.len() == 0
    }

    /// Register an entity, returning its slot index
    ///
    /// The slot index is only valid until the next unregistration; use the
    /// [`EntityId`] for stable addressing.
    pub fn register(
        &mut self,
        id: EntityId,
        settings: RoleSettings,
        role: SmootherRole,
        initial: Pose,
    ) -> Result<usize> {
        if self.lookup.contains_key(&id) {
            return Err(Error::AlreadyRegistered(id));
        }
        self.lookup.insert(id, ());
        let index = self.arrays.push(settings, role, initial);
        debug_assert_eq!(index, self.lookup.len() - 1);
        self.granularity = batch_granularity(self.arrays.len());
        Ok(index)
    }

    /// Remove an entity by swapping the last slot into its place
    ///
    /// The lookup table and every backing array perform the identical
    /// swap, so the moved entity's id resolves to its new slot.
    pub fn unregister(&mut self, id: EntityId) -> Result<()> {
        let (index, _, _) = self
            .lookup
            .swap_remove_full(&id)
            .ok_or(Error::NotRegistered(id))?;
        self.arrays.swap_remove(index);
        self.granularity = batch_granularity(self.arrays.len());
        Ok(())
    }

    /// Slot index for an entity
    pub fn slot_of(&self, id: EntityId) -> Option<usize> {
        self.lookup.get_index_of(&id)
    }

    /// Write an entity's tracker pose; false when unregistered
    pub fn set_tracker_pose(&mut self, id: EntityId, pose: Pose) -> bool {
        match self.slot_of(id) {
            Some(i) => {
                self.arrays.tracker[i] = pose;
                true
            }
            None => false,
        }
    }

    /// Read an entity's smoothed visual pose
    pub fn visual_pose(&self, id: EntityId) -> Option<Pose> {
        self.slot_of(id).map(|i| self.arrays.visual[i])
    }

    /// Overwrite an entity's visual pose; false when unregistered
    pub fn set_visual_pose(&mut self, id: EntityId, pose: Pose) -> bool {
        match self.slot_of(id) {
            Some(i) => {
                self.arrays.visual[i] = pose;
                true
            }
            None => false,
        }
    }

    /// Replace an entity's settings for one role; false when unregistered
    pub fn set_settings(
        &mut self,
        id: EntityId,
        role: SmootherRole,
        settings: SmoothingSettings,
    ) -> bool {
        match self.slot_of(id) {
            Some(i) => {
                *self.arrays.role_settings[i].for_role_mut(role) = settings;
                self.arrays.refresh_active(i);
                true
            }
            None => false,
        }
    }

    /// Switch an entity's active role; false when unregistered
    pub fn set_role(&mut self, id: EntityId, role: SmootherRole) -> bool {
        match self.slot_of(id) {
            Some(i) => {
                self.arrays.roles[i] = role;
                self.arrays.refresh_active(i);
                true
            }
            None => false,
        }
    }

    /// Enable or disable smoothing for an entity; false when unregistered
    pub fn set_enabled(&mut self, id: EntityId, enabled: bool) -> bool {
        match self.slot_of(id) {
            Some(i) => {
                self.arrays.state[i].enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Keep an entity's visual pose where simulation leaves it
    pub fn set_detached(&mut self, id: EntityId, detached: bool) -> bool {
        match self.slot_of(id) {
            Some(i) => {
                self.arrays.state[i].detached = detached;
                true
            }
            None => false,
        }
    }

    /// Request a teleport, applied by the teleport pass at the next tick
    /// boundary; false when unregistered
    pub fn request_teleport(&mut self, id: EntityId, local_tick: u32) -> bool {
        match self.slot_of(id) {
            Some(i) => {
                self.arrays.teleport_payload[i] = TeleportPayload {
                    execute: true,
                    tick: local_tick,
                };
                true
            }
            None => false,
        }
    }

    /// Mark the start or end of a rollback replay window
    pub fn set_reconciling(&mut self, active: bool) {
        self.reconciling = active;
    }

    /// Whether an entity is currently consuming buffered snapshots
    pub fn is_moving(&self, id: EntityId) -> bool {
        self.slot_of(id)
            .map(|i| self.arrays.state[i].moving)
            .unwrap_or(false)
    }

    /// Number of buffered snapshots for an entity
    pub fn queue_len(&self, id: EntityId) -> usize {
        self.slot_of(id)
            .map(|i| self.arrays.queues[i].len())
            .unwrap_or(0)
    }

    /// Buffered snapshot at `index` (0 = oldest), for diagnostics
    pub fn snapshot_at(&self, id: EntityId, index: usize) -> Option<TickSnapshot> {
        let slot = self.slot_of(id)?;
        self.arrays.queues[slot].get(index).copied()
    }

    /// Interpolation depth currently in effect for an entity
    pub fn interpolation(&self, id: EntityId) -> Option<u8> {
        self.slot_of(id).map(|i| self.arrays.interpolation[i])
    }

    /// Fired once per simulation tick, before simulation runs
    ///
    /// Passes: mark-pretick → discard-excessive → apply-rates.
    pub fn on_pre_tick(&mut self) {
        if self.is_empty() {
            return;
        }
        self.pass_mark_pretick();
        self.pass_discard_excessive();
        self.pass_apply_rates();
    }

    /// Fired once per simulation tick, after simulation runs
    ///
    /// Passes: teleport → capture → apply-rates.
    pub fn on_post_tick(&mut self, tick: u32) {
        if self.is_empty() {
            return;
        }
        self.pass_teleport();
        self.pass_capture(tick);
        self.pass_apply_rates();
    }

    /// Fired once per render frame with elapsed seconds
    pub fn on_update(&mut self, delta: f32) {
        if self.is_empty() {
            return;
        }
        self.pass_move(delta);
    }

    /// Fired when the network layer produces a new latency estimate
    pub fn on_round_trip_time(&mut self, rtt_ms: i64) {
        if self.is_empty() {
            return;
        }
        self.pass_estimate(rtt_ms);
    }

    /// Fired during rollback replay of `tick`
    ///
    /// No-op unless a replay window was opened with
    /// [`BatchSmoother::set_reconciling`].
    pub fn on_replicate_replay(&mut self, tick: u32) {
        if !self.reconciling || self.is_empty() {
            return;
        }
        self.pass_replay(tick);
    }

    fn pass_mark_pretick(&mut self) {
        (
            self.arrays.visual.par_iter(),
            self.arrays.pre_tick_pose.par_iter_mut(),
            self.arrays.state.par_iter_mut(),
        )
            .into_par_iter()
            .with_min_len(self.granularity)
            .for_each(|(visual, pre_tick_pose, state)| {
                if !state.enabled {
                    return;
                }
                *pre_tick_pose = *visual;
                state.pre_ticked = true;
            });
    }

    fn pass_discard_excessive(&mut self) {
        (
            self.arrays.queues.par_iter_mut(),
            self.arrays.interpolation.par_iter(),
            self.arrays.state.par_iter(),
            self.arrays.rate_payload.par_iter_mut(),
        )
            .into_par_iter()
            .with_min_len(self.granularity)
            .for_each(|(queue, interpolation, state, payload)| {
                if !state.enabled {
                    return;
                }
                let limit = (*interpolation).max(1) as usize + QUEUE_SLACK;
                if queue.len() <= limit {
                    return;
                }
                let overage = queue.len() - limit;
                if let Some(trimmed) = queue.dequeue_up_to(overage) {
                    *payload = RatePayload {
                        execute: true,
                        prev: trimmed.pose,
                    };
                }
            });
    }

    /// Consume rate payloads written by the previous pass, re-basing each
    /// flagged slot's rate on `payload.prev` toward its queue head
    fn pass_apply_rates(&mut self) {
        let tick_delta = self.timing.tick_delta();
        (
            self.arrays.rate_payload.par_iter_mut(),
            self.arrays.queues.par_iter(),
            self.arrays.rates.par_iter_mut(),
            self.arrays.active.par_iter(),
        )
            .into_par_iter()
            .with_min_len(self.granularity)
            .for_each(|(payload, queue, rate, active)| {
                if payload.execute {
                    match queue.peek() {
                        Some(head) => {
                            *rate = MoveRate::between(
                                &payload.prev,
                                &head.pose,
                                tick_delta,
                                active.teleport_threshold(),
                            );
                        }
                        None => *rate = MoveRate::UNSET,
                    }
                }
                *payload = RatePayload::default();
            });
    }

    fn pass_teleport(&mut self) {
        (
            self.arrays.teleport_payload.par_iter_mut(),
            self.arrays.queues.par_iter_mut(),
            self.arrays.rates.par_iter_mut(),
            self.arrays.visual.par_iter_mut(),
            self.arrays.tracker.par_iter(),
            self.arrays.state.par_iter_mut(),
            self.arrays.active.par_iter(),
        )
            .into_par_iter()
            .with_min_len(self.granularity)
            .for_each(|(payload, queue, rate, visual, tracker, state, active)| {
                if !payload.execute {
                    return;
                }
                if active.adaptive_level.is_adaptive() {
                    state.teleported_tick = payload.tick;
                }
                queue.clear();
                *rate = MoveRate::UNSET;
                state.moving = false;
                // Back to first-observation state so the capture pass that
                // follows snaps instead of restoring the pre-tick pose.
                state.pre_ticked = false;
                if state.enabled {
                    *visual = *tracker;
                }
                *payload = TeleportPayload::default();
            });
    }

    fn pass_capture(&mut self, tick: u32) {
        (
            self.arrays.queues.par_iter_mut(),
            self.arrays.visual.par_iter_mut(),
            self.arrays.tracker.par_iter(),
            self.arrays.pre_tick_pose.par_iter(),
            self.arrays.state.par_iter_mut(),
            self.arrays.active.par_iter(),
            self.arrays.rate_payload.par_iter_mut(),
            self.arrays.rates.par_iter_mut(),
        )
            .into_par_iter()
            .with_min_len(self.granularity)
            .for_each(
                |(queue, visual, tracker, pre_tick_pose, state, active, payload, rate)| {
                    if !state.enabled {
                        return;
                    }
                    if state.teleported_tick != UNSET_TICK && tick <= state.teleported_tick {
                        return;
                    }

                    let tracker = *tracker;
                    if !state.pre_ticked {
                        // First tick since registration; nothing to
                        // interpolate from yet.
                        *visual = tracker;
                        return;
                    }
                    state.pre_ticked = false;

                    if !state.detached {
                        *visual = *pre_tick_pose;
                    }

                    // A capture past the teleport threshold resets the slot
                    // outright.
                    let previous = match queue.len() {
                        0 => *visual,
                        n => queue.get(n - 1).map(|s| s.pose).unwrap_or(tracker),
                    };
                    if let Some(threshold_sq) = active.teleport_threshold() {
                        if previous.position.distance_squared(tracker.position) >= threshold_sq {
                            if active.adaptive_level.is_adaptive() {
                                state.teleported_tick = tick;
                            }
                            queue.clear();
                            *rate = MoveRate::UNSET;
                            state.moving = false;
                            *visual = tracker;
                            return;
                        }
                    }

                    let was_empty = queue.is_empty();
                    queue.enqueue(TickSnapshot::new(tick, tracker));
                    if was_empty {
                        *payload = RatePayload {
                            execute: true,
                            prev: *visual,
                        };
                    }

                    if active.snap_non_smoothed && !active.smoothed_properties.is_all() {
                        let mask = active.smoothed_properties;
                        if !mask.position() {
                            visual.position = tracker.position;
                        }
                        if !mask.rotation() {
                            visual.rotation = tracker.rotation;
                        }
                        if !mask.scale() {
                            visual.scale = tracker.scale;
                        }
                    }
                },
            );
    }

    fn pass_move(&mut self, delta: f32) {
        let tick_delta = self.timing.tick_delta();
        (
            self.arrays.queues.par_iter_mut(),
            self.arrays.rates.par_iter_mut(),
            self.arrays.visual.par_iter_mut(),
            self.arrays.state.par_iter_mut(),
            self.arrays.active.par_iter(),
            self.arrays.interpolation.par_iter(),
        )
            .into_par_iter()
            .with_min_len(self.granularity)
            .for_each(|(queue, rate, visual, state, active, interpolation)| {
                if !state.enabled {
                    return;
                }
                if queue.is_empty() {
                    *rate = MoveRate::UNSET;
                    state.moving = false;
                    return;
                }

                let interpolation = (*interpolation).max(1) as i64;
                let deficit = queue.len() as i64 - interpolation;

                if !state.moving {
                    let ready = if active.move_immediately {
                        true
                    } else {
                        deficit >= 0
                    };
                    if !ready {
                        return;
                    }
                    state.moving = true;
                } else if deficit < STARVATION_DEFICIT {
                    state.moving = false;
                    return;
                }

                state.multiplier = if active.move_immediately {
                    let fill = queue.len() as f32 / interpolation as f32;
                    fill.clamp(MOVE_IMMEDIATELY_EASE_MIN, MOVE_IMMEDIATELY_EASE_MAX)
                } else if deficit > 0 {
                    1.0 + deficit as f32 * OVER_INTERPOLATION_CORRECTION
                } else {
                    1.0
                };

                let mut remaining_delta = delta * state.multiplier;
                loop {
                    let Some(goal) = queue.peek().copied() else {
                        *rate = MoveRate::UNSET;
                        break;
                    };

                    if rate.is_unset() {
                        *rate = MoveRate::between(
                            visual,
                            &goal.pose,
                            tick_delta,
                            active.teleport_threshold(),
                        );
                    }

                    if rate.is_instant() {
                        *visual = goal.pose;
                        queue.dequeue();
                        match queue.peek().copied() {
                            Some(next) => {
                                *rate = MoveRate::between(
                                    &goal.pose,
                                    &next.pose,
                                    tick_delta,
                                    active.teleport_threshold(),
                                );
                                continue;
                            }
                            None => {
                                *rate = MoveRate::UNSET;
                                break;
                            }
                        }
                    }

                    let remaining =
                        rate.step(visual, &goal.pose, active.smoothed_properties, remaining_delta);
                    if remaining > 0.0 {
                        break;
                    }

                    queue.dequeue();
                    match queue.peek().copied() {
                        Some(next) => {
                            *rate = MoveRate::between(
                                &goal.pose,
                                &next.pose,
                                tick_delta,
                                active.teleport_threshold(),
                            );
                            remaining_delta = -remaining;
                            if remaining_delta <= 0.0 {
                                break;
                            }
                        }
                        None => {
                            *rate = MoveRate::UNSET;
                            break;
                        }
                    }
                }
            });
    }

    fn pass_estimate(&mut self, rtt_ms: i64) {
        let timing = self.timing;
        (
            self.arrays.estimators.par_iter_mut(),
            self.arrays.interpolation.par_iter_mut(),
            self.arrays.role_settings.par_iter(),
            self.arrays.active.par_iter(),
        )
            .into_par_iter()
            .with_min_len(self.granularity)
            .for_each(|(estimator, interpolation, role_settings, active)| {
                if !role_settings.any_adaptive() {
                    return;
                }
                *interpolation = estimator.update(
                    rtt_ms,
                    &timing,
                    active.adaptive_level,
                    active.interpolation_ticks,
                );
            });
    }

    fn pass_replay(&mut self, tick: u32) {
        (
            self.arrays.queues.par_iter_mut(),
            self.arrays.tracker.par_iter(),
            self.arrays.state.par_iter(),
        )
            .into_par_iter()
            .with_min_len(self.granularity)
            .for_each(|(queue, tracker, state)| {
                if !state.enabled || queue.is_empty() {
                    return;
                }
                if state.teleported_tick != UNSET_TICK && tick <= state.teleported_tick {
                    return;
                }
                let Some(first) = queue.peek() else {
                    return;
                };
                let first_tick = first.tick;
                if tick <= first_tick {
                    return;
                }

                let index = (tick - first_tick) as usize;
                if index >= queue.len() {
                    return;
                }
                let Some(entry) = queue.get(index).copied() else {
                    return;
                };

                let adjusted = (queue.len() as i32 - 2).max(1);
                let ease = (index as f32 / adjusted as f32).powi(adjusted - index as i32);
                let corrected = entry.pose.lerp(tracker, ease);
                queue.set(index, TickSnapshot::new(entry.tick, corrected));
            });
    }
}
