//! Single-entity smoothing state machine
//!
//! Lifecycle: `Unregistered → Registered → {PreTicked ⇄ PostTicked} →
//! Unregistered`. Teleport is a transient action, not a resting state. All
//! methods run synchronously on the caller's thread; nothing here blocks.

use crate::PoseBinding;
use glide_core::{
    AdaptiveInterpolationEstimator, MoveRate, Pose, RoleSettings, SmootherRole, SmoothingSettings,
    TickSnapshot, TickTiming, MOVE_IMMEDIATELY_EASE_MAX, MOVE_IMMEDIATELY_EASE_MIN,
    OVER_INTERPOLATION_CORRECTION, QUEUE_SLACK, STARVATION_DEFICIT, UNSET_TICK,
};
use glide_ring::SnapshotQueue;

/// Smooths one entity's visual pose across tick boundaries
///
/// Generic over `B: PoseBinding`, the seam to the externally owned
/// transform. The smoother is driven by five external events: pre-tick,
/// post-tick, frame update, RTT update, and replicate-replay.
pub struct TickSmoother<B: PoseBinding> {
    binding: B,
    settings: RoleSettings,
    role: SmootherRole,
    timing: TickTiming,
    queue: SnapshotQueue,
    rate: MoveRate,
    estimator: AdaptiveInterpolationEstimator,
    /// Interpolation depth currently in effect, in ticks
    realtime_interpolation: u8,
    /// Per-frame speed scalar keeping the queue near its target depth
    movement_multiplier: f32,
    is_moving: bool,
    /// Captures and replay corrections are suppressed for ticks at or
    /// before this value; UNSET_TICK when no teleport is pending
    teleported_tick: u32,
    pre_ticked: bool,
    pre_tick_pose: Pose,
    /// When set, the visual pose is not restored to the pre-tick snapshot
    /// after simulation runs
    detached: bool,
    /// Whether a rollback replay is currently in progress
    reconciling: bool,
    smoothing_enabled: bool,
}

impl<B: PoseBinding> TickSmoother<B> {
    /// Create a smoother for one entity
    pub fn new(binding: B, settings: RoleSettings, role: SmootherRole, timing: TickTiming) -> Self {
        let realtime_interpolation = settings.for_role(role).interpolation_ticks.max(1);
        Self {
            binding,
            settings,
            role,
            timing,
            queue: SnapshotQueue::default(),
            rate: MoveRate::UNSET,
            estimator: AdaptiveInterpolationEstimator::new(),
            realtime_interpolation,
            movement_multiplier: 1.0,
            is_moving: false,
            teleported_tick: UNSET_TICK,
            pre_ticked: false,
            pre_tick_pose: Pose::IDENTITY,
            detached: false,
            reconciling: false,
            smoothing_enabled: true,
        }
    }

    /// Fired once per simulation tick, before simulation runs
    ///
    /// Trims the queue back to the interpolation depth plus slack and
    /// captures the visual pose so it can be restored after the simulation
    /// moves the transform.
    pub fn on_pre_tick(&mut self) {
        if !self.can_smooth() {
            return;
        }

        self.discard_excessive();
        self.pre_tick_pose = self.read_visual();
        self.pre_ticked = true;
    }

    /// Fired once per simulation tick, after simulation runs
    ///
    /// Restores the visual pose, captures the tracker pose for `tick`, and
    /// enqueues it. The very first observation (no pre-tick ran yet) snaps
    /// the visual pose directly since there is nothing to interpolate from.
    pub fn on_post_tick(&mut self, tick: u32) {
        if !self.can_smooth() {
            return;
        }
        if self.teleported_tick != UNSET_TICK && tick <= self.teleported_tick {
            return;
        }

        let tracker = self.read_tracker();

        if !self.pre_ticked {
            // First tick since registration; no frame update ran yet.
            self.write_visual(tracker);
            return;
        }
        self.pre_ticked = false;

        if !self.detached {
            self.write_visual(self.pre_tick_pose);
        }

        // A capture that jumps past the teleport threshold resets the
        // buffer outright instead of producing an instant-rate segment.
        let settings = *self.active_settings();
        let previous = match self.queue.len() {
            0 => self.read_visual(),
            n => self.queue.get(n - 1).map(|s| s.pose).unwrap_or(tracker),
        };
        if let Some(threshold_sq) = settings.teleport_threshold() {
            if previous.position.distance_squared(tracker.position) >= threshold_sq {
                self.teleport(tick);
                return;
            }
        }

        let was_empty = self.queue.is_empty();
        self.queue.enqueue(TickSnapshot::new(tick, tracker));

        if was_empty {
            let visual = self.read_visual();
            self.rate = MoveRate::between(
                &visual,
                &tracker,
                self.timing.tick_delta(),
                settings.teleport_threshold(),
            );
        }

        self.snap_non_smoothed(&tracker, &settings);
    }

    /// Fired once per render frame with elapsed seconds
    ///
    /// Advances the visual pose toward the queue head, consuming snapshots
    /// as they complete and chaining leftover frame time into the next
    /// segment.
    pub fn on_update(&mut self, delta: f32) {
        if !self.can_smooth() {
            return;
        }
        if self.queue.is_empty() {
            // Rate is only meaningful while the queue is non-empty.
            self.rate = MoveRate::UNSET;
            self.is_moving = false;
            return;
        }

        let settings = *self.active_settings();
        let interpolation = self.realtime_interpolation.max(1) as i64;
        let deficit = self.queue.len() as i64 - interpolation;

        if !self.is_moving {
            let ready = if settings.move_immediately {
                !self.queue.is_empty()
            } else {
                deficit >= 0
            };
            if !ready {
                return;
            }
            self.is_moving = true;
        } else if deficit < STARVATION_DEFICIT {
            // Badly starved; hold position while the buffer refills.
            self.is_moving = false;
            return;
        }

        self.movement_multiplier = if settings.move_immediately {
            let fill = self.queue.len() as f32 / interpolation as f32;
            fill.clamp(MOVE_IMMEDIATELY_EASE_MIN, MOVE_IMMEDIATELY_EASE_MAX)
        } else if deficit > 0 {
            1.0 + deficit as f32 * OVER_INTERPOLATION_CORRECTION
        } else {
            1.0
        };

        let mut remaining_delta = delta * self.movement_multiplier;
        let mut visual = self.read_visual();

        // Bounded by queue length: every pass either consumes a snapshot or
        // exits.
        loop {
            let Some(goal) = self.queue.peek().copied() else {
                self.rate = MoveRate::UNSET;
                break;
            };

            if self.rate.is_unset() {
                self.rate = MoveRate::between(
                    &visual,
                    &goal.pose,
                    self.timing.tick_delta(),
                    settings.teleport_threshold(),
                );
            }

            if self.rate.is_instant() {
                visual = goal.pose;
                self.queue.dequeue();
                match self.queue.peek().copied() {
                    Some(next) => {
                        self.rate = MoveRate::between(
                            &goal.pose,
                            &next.pose,
                            self.timing.tick_delta(),
                            settings.teleport_threshold(),
                        );
                        continue;
                    }
                    None => {
                        self.rate = MoveRate::UNSET;
                        break;
                    }
                }
            }

            let remaining = self.rate.step(
                &mut visual,
                &goal.pose,
                settings.smoothed_properties,
                remaining_delta,
            );
            if remaining > 0.0 {
                break;
            }

            self.queue.dequeue();
            match self.queue.peek().copied() {
                Some(next) => {
                    self.rate = MoveRate::between(
                        &goal.pose,
                        &next.pose,
                        self.timing.tick_delta(),
                        settings.teleport_threshold(),
                    );
                    remaining_delta = -remaining;
                    if remaining_delta <= 0.0 {
                        break;
                    }
                }
                None => {
                    self.rate = MoveRate::UNSET;
                    break;
                }
            }
        }

        self.write_visual(visual);
    }

    /// Fired when the network layer produces a new latency estimate
    ///
    /// No-op unless some configured role uses adaptive interpolation.
    pub fn on_round_trip_time(&mut self, rtt_ms: i64) {
        if !self.settings.any_adaptive() {
            return;
        }
        let settings = *self.active_settings();
        self.realtime_interpolation = self.estimator.update(
            rtt_ms,
            &self.timing,
            settings.adaptive_level,
            settings.interpolation_ticks,
        );
    }

    /// Fired during rollback replay of `tick`
    ///
    /// Eases the buffered-but-unconsumed snapshot for `tick` toward the
    /// freshly recomputed tracker pose. Entries about to be consumed take
    /// the correction almost fully; entries deep in the queue barely move,
    /// so rollback-heavy play never pops visually.
    ///
    /// Index arithmetic assumes strictly incrementing tick numbering in the
    /// queue; tick gaps are a caller contract violation.
    pub fn on_replicate_replay(&mut self, tick: u32) {
        if !self.reconciling || !self.can_smooth() || self.queue.is_empty() {
            return;
        }
        if self.teleported_tick != UNSET_TICK && tick <= self.teleported_tick {
            return;
        }

        let Some(first) = self.queue.peek() else {
            return;
        };
        let first_tick = first.tick;
        if tick <= first_tick {
            // Already in motion toward that entry, or it has passed.
            return;
        }

        let index = (tick - first_tick) as usize;
        if index >= self.queue.len() {
            return;
        }
        let Some(entry) = self.queue.get(index).copied() else {
            return;
        };

        let tracker = self.read_tracker();
        let adjusted = (self.queue.len() as i32 - 2).max(1);
        let ease = (index as f32 / adjusted as f32).powi(adjusted - index as i32);
        let corrected = entry.pose.lerp(&tracker, ease);
        self.queue.set(index, TickSnapshot::new(entry.tick, corrected));
    }

    /// Snap the visual pose to the tracker, bypassing interpolation
    ///
    /// `local_tick` is the tick currently being simulated; capture and
    /// replay correction are suppressed for it when adaptive interpolation
    /// is active, since the buffer was just reset.
    pub fn teleport(&mut self, local_tick: u32) {
        if self.active_settings().adaptive_level.is_adaptive() {
            self.teleported_tick = local_tick;
        }
        self.queue.clear();
        self.rate = MoveRate::UNSET;
        self.is_moving = false;
        // Back to first-observation state: the next capture snaps instead
        // of restoring a pre-tick pose from before the teleport.
        self.pre_ticked = false;

        if self.can_smooth() {
            let tracker = self.read_tracker();
            self.write_visual(tracker);
        }
    }

    /// Replace the settings for one role
    ///
    /// Returns false (and changes nothing) when no visual pose is bound.
    pub fn set_settings(&mut self, role: SmootherRole, settings: SmoothingSettings) -> bool {
        if !self.binding.is_bound() {
            return false;
        }
        *self.settings.for_role_mut(role) = settings;
        self.refresh_interpolation();
        true
    }

    /// Switch the active role
    pub fn set_role(&mut self, role: SmootherRole) {
        self.role = role;
        self.refresh_interpolation();
    }

    /// Mark the start or end of a rollback replay window
    pub fn set_reconciling(&mut self, active: bool) {
        self.reconciling = active;
    }

    /// Keep the visual pose where simulation left it instead of restoring
    /// the pre-tick snapshot
    pub fn set_detached(&mut self, detached: bool) {
        self.detached = detached;
    }

    /// Enable or disable smoothing entirely
    pub fn set_smoothing_enabled(&mut self, enabled: bool) {
        self.smoothing_enabled = enabled;
    }

    /// Whether the entity is currently consuming buffered snapshots
    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Interpolation depth currently in effect
    pub fn realtime_interpolation(&self) -> u8 {
        self.realtime_interpolation
    }

    /// Per-frame speed scalar from the last update
    pub fn movement_multiplier(&self) -> f32 {
        self.movement_multiplier
    }

    /// Number of buffered snapshots
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Buffered snapshot at `index` (0 = oldest), for diagnostics
    pub fn snapshot_at(&self, index: usize) -> Option<&TickSnapshot> {
        self.queue.get(index)
    }

    /// The bound transform seam
    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// Mutable access to the bound transform seam
    pub fn binding_mut(&mut self) -> &mut B {
        &mut self.binding
    }

    /// Settings for the active role
    pub fn active_settings(&self) -> &SmoothingSettings {
        self.settings.for_role(self.role)
    }

    fn can_smooth(&self) -> bool {
        self.smoothing_enabled && self.binding.is_bound()
    }

    fn refresh_interpolation(&mut self) {
        let settings = *self.active_settings();
        if settings.adaptive_level.is_adaptive() {
            self.realtime_interpolation = self.estimator.current();
        } else {
            self.realtime_interpolation = settings.interpolation_ticks.max(1);
        }
    }

    /// Trim the queue to the interpolation depth plus slack, re-basing the
    /// active rate on the trim point so motion continues smoothly
    fn discard_excessive(&mut self) {
        let limit = self.realtime_interpolation as usize + QUEUE_SLACK;
        if self.queue.len() <= limit {
            return;
        }

        let overage = self.queue.len() - limit;
        let threshold = self.active_settings().teleport_threshold();
        if let Some(trimmed) = self.queue.dequeue_up_to(overage) {
            match self.queue.peek() {
                Some(next) => {
                    self.rate = MoveRate::between(
                        &trimmed.pose,
                        &next.pose,
                        self.timing.tick_delta(),
                        threshold,
                    );
                }
                None => self.rate = MoveRate::UNSET,
            }
        }
    }

    /// Force properties excluded from smoothing to the tracker's values
    fn snap_non_smoothed(&mut self, tracker: &Pose, settings: &SmoothingSettings) {
        if !settings.snap_non_smoothed || settings.smoothed_properties.is_all() {
            return;
        }

        let mask = settings.smoothed_properties;
        let mut visual = self.read_visual();
        if !mask.position() {
            visual.position = tracker.position;
        }
        if !mask.rotation() {
            visual.rotation = tracker.rotation;
        }
        if !mask.scale() {
            visual.scale = tracker.scale;
        }
        self.write_visual(visual);
    }

    fn read_visual(&self) -> Pose {
        if self.active_settings().use_local_space {
            self.binding.visual_pose_local()
        } else {
            self.binding.visual_pose()
        }
    }

    fn write_visual(&mut self, pose: Pose) {
        if self.active_settings().use_local_space {
            self.binding.set_visual_pose_local(pose);
        } else {
            self.binding.set_visual_pose(pose);
        }
    }

    fn read_tracker(&self) -> Pose {
        if self.active_settings().use_local_space {
            self.binding.tracker_pose_local()
        } else {
            self.binding.tracker_pose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_core::{PropertyMask, Vec3};

    struct TestBinding {
        visual: Pose,
        tracker: Pose,
        bound: bool,
    }

    impl TestBinding {
        fn new() -> Self {
            Self {
                visual: Pose::IDENTITY,
                tracker: Pose::IDENTITY,
                bound: true,
            }
        }
    }

    impl PoseBinding for TestBinding {
        fn is_bound(&self) -> bool {
            self.bound
        }

        fn visual_pose(&self) -> Pose {
            self.visual
        }

        fn set_visual_pose(&mut self, pose: Pose) {
            self.visual = pose;
        }

        fn tracker_pose(&self) -> Pose {
            self.tracker
        }
    }

    fn smoother_at_rate(tick_rate: u16) -> TickSmoother<TestBinding> {
        TickSmoother::new(
            TestBinding::new(),
            RoleSettings::default(),
            SmootherRole::Spectator,
            TickTiming::new(tick_rate),
        )
    }

    /// Run one tick boundary: pre-tick, simulation moves the tracker,
    /// post-tick capture.
    fn deliver_tick(smoother: &mut TickSmoother<TestBinding>, tick: u32, tracker_x: f32) {
        smoother.on_pre_tick();
        smoother.binding_mut().tracker = Pose::from_position(Vec3::new(tracker_x, 0.0, 0.0));
        smoother.on_post_tick(tick);
    }

    #[test]
    fn test_first_observation_snaps() {
        let mut smoother = smoother_at_rate(20);

        // No pre-tick ran, so the very first post-tick snaps directly.
        smoother.binding_mut().tracker = Pose::from_position(Vec3::new(3.0, 0.0, 0.0));
        smoother.on_post_tick(1);

        assert_eq!(smoother.binding().visual.position.x, 3.0);
        assert_eq!(smoother.queue_len(), 0);
    }

    #[test]
    fn test_unbound_is_noop() {
        let mut smoother = smoother_at_rate(20);
        smoother.binding_mut().bound = false;

        smoother.on_pre_tick();
        smoother.on_post_tick(1);
        smoother.on_update(0.05);

        assert_eq!(smoother.queue_len(), 0);
        assert!(!smoother.set_settings(
            SmootherRole::Spectator,
            SmoothingSettings::default()
        ));
    }

    #[test]
    fn test_steady_state_tracks_two_ticks_behind() {
        // 20 Hz ticks, flat interpolation of 2, perfectly paced delivery.
        let mut smoother = smoother_at_rate(20);
        smoother.on_post_tick(0); // first observation snap at origin

        for tick in 1..=10u32 {
            smoother.on_update(0.05);
            deliver_tick(&mut smoother, tick, tick as f32);
        }

        let lag = smoother.binding().tracker.position.x - smoother.binding().visual.position.x;
        assert!(
            (lag - 2.0).abs() < 0.25,
            "expected ~2 ticks of lag, got {lag}"
        );
        assert!(smoother.is_moving());
    }

    #[test]
    fn test_discard_invariant() {
        let mut smoother = smoother_at_rate(20);
        smoother.on_post_tick(0);

        // Deliver far more ticks than the depth without any frame updates,
        // as happens when rendering stalls.
        for tick in 1..=20u32 {
            deliver_tick(&mut smoother, tick, tick as f32 * 0.1);
        }

        // The next pre-tick pass restores the invariant.
        smoother.on_pre_tick();
        let limit = smoother.realtime_interpolation() as usize + QUEUE_SLACK;
        assert!(smoother.queue_len() <= limit);

        // Motion continues from the trim point toward the new head.
        smoother.on_update(0.05);
        assert!(smoother.binding().visual.position.x > 0.0);
    }

    #[test]
    fn test_teleport_scenario_clears_and_snaps() {
        let mut smoother = smoother_at_rate(20);
        let mut settings = SmoothingSettings::default();
        settings.enable_teleport = true;
        settings.teleport_threshold_sq = 1.0;
        smoother.set_settings(SmootherRole::Spectator, settings);

        smoother.on_post_tick(0);
        for tick in 1..=3u32 {
            smoother.on_update(0.05);
            deliver_tick(&mut smoother, tick, tick as f32 * 0.1);
        }
        assert!(smoother.queue_len() > 0);

        // A tick lands 5.0 units away: past the threshold.
        deliver_tick(&mut smoother, 4, 5.3);

        assert_eq!(smoother.queue_len(), 0);
        assert!(
            (smoother.binding().visual.position.x - 5.3).abs() < 1e-6,
            "visual must snap to the new tracker pose with no interpolation frames"
        );
        assert!(!smoother.is_moving());
    }

    #[test]
    fn test_starvation_pauses_and_holds() {
        let mut smoother = smoother_at_rate(20);
        smoother.on_post_tick(0);

        for tick in 1..=4u32 {
            smoother.on_update(0.05);
            deliver_tick(&mut smoother, tick, tick as f32);
        }
        assert!(smoother.is_moving());

        // Delivery stops for six tick periods; frames keep running.
        let mut held = None;
        for _ in 0..6 {
            smoother.on_update(0.05);
            let x = smoother.binding().visual.position.x;
            if let Some(prev) = held {
                assert!(x >= prev, "pose must never move backwards");
            }
            held = Some(x);
        }

        assert!(!smoother.is_moving());
        let frozen = smoother.binding().visual.position.x;
        smoother.on_update(0.05);
        assert_eq!(
            smoother.binding().visual.position.x, frozen,
            "starved smoother must hold its last pose, not jitter"
        );
    }

    #[test]
    fn test_replay_correction_easing() {
        let mut smoother = smoother_at_rate(20);
        smoother.on_post_tick(99);

        // Buffer five entries for ticks 100..=104 without consuming any.
        for tick in 100..=104u32 {
            deliver_tick(&mut smoother, tick, (tick - 99) as f32);
        }
        assert_eq!(smoother.queue_len(), 5);

        let old = smoother.snapshot_at(2).copied().unwrap();
        assert_eq!(old.tick, 102);

        // Reconciliation recomputed the tracker; correct tick 102.
        let new_tracker = Pose::from_position(Vec3::new(10.0, 4.0, 0.0));
        smoother.binding_mut().tracker = new_tracker;
        smoother.set_reconciling(true);
        smoother.on_replicate_replay(102);

        // index 2 of 5 entries: adjusted = 3, ease = (2/3)^1.
        let ease = 2.0f32 / 3.0;
        let expected = old.pose.lerp(&new_tracker, ease);
        let corrected = smoother.snapshot_at(2).unwrap();
        assert!(corrected.pose.approx_eq(&expected, 1e-5));

        // Neither the raw old nor the raw new pose.
        assert!(!corrected.pose.approx_eq(&old.pose, 1e-3));
        assert!(!corrected.pose.approx_eq(&new_tracker, 1e-3));
    }

    #[test]
    fn test_replay_ignored_without_reconciliation() {
        let mut smoother = smoother_at_rate(20);
        smoother.on_post_tick(99);
        for tick in 100..=104u32 {
            deliver_tick(&mut smoother, tick, (tick - 99) as f32);
        }

        let before = smoother.snapshot_at(2).copied().unwrap();
        smoother.binding_mut().tracker = Pose::from_position(Vec3::new(50.0, 0.0, 0.0));
        smoother.on_replicate_replay(102);

        assert_eq!(smoother.snapshot_at(2).copied().unwrap(), before);
    }

    #[test]
    fn test_replay_ignores_head_and_past_ticks() {
        let mut smoother = smoother_at_rate(20);
        smoother.on_post_tick(99);
        for tick in 100..=104u32 {
            deliver_tick(&mut smoother, tick, (tick - 99) as f32);
        }
        smoother.set_reconciling(true);
        smoother.binding_mut().tracker = Pose::from_position(Vec3::new(50.0, 0.0, 0.0));

        let head = smoother.snapshot_at(0).copied().unwrap();
        smoother.on_replicate_replay(100);
        smoother.on_replicate_replay(42);
        assert_eq!(smoother.snapshot_at(0).copied().unwrap(), head);
    }

    #[test]
    fn test_teleported_tick_blocks_capture() {
        let mut smoother = smoother_at_rate(20);
        let mut settings = SmoothingSettings::default();
        settings.adaptive_level = glide_core::AdaptiveLevel::Low;
        smoother.set_settings(SmootherRole::Spectator, settings);

        smoother.on_post_tick(0);
        deliver_tick(&mut smoother, 1, 1.0);
        smoother.teleport(5);

        assert_eq!(smoother.queue_len(), 0);

        // Captures at or before the teleported tick are suppressed.
        deliver_tick(&mut smoother, 5, 6.0);
        assert_eq!(smoother.queue_len(), 0);

        deliver_tick(&mut smoother, 6, 7.0);
        assert_eq!(smoother.queue_len(), 1);
    }

    #[test]
    fn test_rtt_update_recomputes_adaptive_depth() {
        let mut smoother = smoother_at_rate(20);
        let mut settings = SmoothingSettings::default();
        settings.adaptive_level = glide_core::AdaptiveLevel::VeryLow;
        smoother.set_settings(SmootherRole::Spectator, settings);

        // 100 ms at 50 ms ticks: 3 rtt ticks + 2 level.
        smoother.on_round_trip_time(100);
        assert_eq!(smoother.realtime_interpolation(), 5);

        // Flat roles never recompute.
        let mut flat = smoother_at_rate(20);
        flat.on_round_trip_time(100);
        assert_eq!(flat.realtime_interpolation(), 2);
    }

    #[test]
    fn test_snap_non_smoothed_properties() {
        let mut smoother = smoother_at_rate(20);
        let mut settings = SmoothingSettings::default();
        settings.smoothed_properties = PropertyMask::POSITION | PropertyMask::ROTATION;
        settings.snap_non_smoothed = true;
        smoother.set_settings(SmootherRole::Spectator, settings);

        smoother.on_post_tick(0);
        smoother.on_pre_tick();
        smoother.binding_mut().tracker = Pose {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: glide_core::Quat::IDENTITY,
            scale: Vec3::splat(2.0),
        };
        smoother.on_post_tick(1);

        // Scale is excluded from smoothing, so it snaps to the tracker
        // while position remains buffered for interpolation.
        assert_eq!(smoother.binding().visual.scale, Vec3::splat(2.0));
        assert!(smoother.binding().visual.position.x < 1.0);
    }

    #[test]
    fn test_move_immediately_eases_in() {
        let mut smoother = smoother_at_rate(20);
        let mut settings = SmoothingSettings::default();
        settings.move_immediately = true;
        settings.interpolation_ticks = 4;
        smoother.set_settings(SmootherRole::Spectator, settings);

        smoother.on_post_tick(0);
        smoother.on_update(0.05);
        deliver_tick(&mut smoother, 1, 1.0);

        // One of four ticks buffered: fill 0.25, clamped up to the floor.
        smoother.on_update(0.05);
        assert!(smoother.is_moving());
        assert!((smoother.movement_multiplier() - MOVE_IMMEDIATELY_EASE_MIN).abs() < 1e-6);
        assert!(smoother.binding().visual.position.x > 0.0);
    }

    #[test]
    fn test_overage_speeds_consumption() {
        let mut smoother = smoother_at_rate(20);
        smoother.on_post_tick(0);

        // Buffer well past the interpolation depth of 2, then update once.
        for tick in 1..=4u32 {
            deliver_tick(&mut smoother, tick, tick as f32 * 0.1);
        }
        smoother.on_update(0.05);

        let expected = 1.0 + 2.0 * OVER_INTERPOLATION_CORRECTION;
        assert!((smoother.movement_multiplier() - expected).abs() < 1e-6);
    }
}
