//! Event fan-out across registered entities
//!
//! [`SmootherHost`] replaces engine-level event subscription: collaborators
//! register each entity's smoother once, then drive the whole set through
//! the five event entry points. Removal is swap-back, so registration order
//! is not preserved.

use crate::{Error, PoseBinding, Result, TickSmoother};
use glide_core::{EntityId, SmootherRole, SmoothingSettings};
use indexmap::IndexMap;

/// Owns and drives the smoothers for every registered entity
///
/// Keyed by [`EntityId`]; exactly one smoother exists per registered
/// entity. All event methods are synchronous pass-throughs — each entity's
/// state is exclusive to it, so fan-out is a plain loop.
pub struct SmootherHost<B: PoseBinding> {
    smoothers: IndexMap<EntityId, TickSmoother<B>>,
}

impl<B: PoseBinding> SmootherHost<B> {
    /// Create an empty host
    pub fn new() -> Self {
        Self {
            smoothers: IndexMap::new(),
        }
    }

    /// Register an entity's smoother
    pub fn register(&mut self, id: EntityId, smoother: TickSmoother<B>) -> Result<()> {
        if self.smoothers.contains_key(&id) {
            return Err(Error::AlreadyRegistered(id));
        }
        self.smoothers.insert(id, smoother);
        Ok(())
    }

    /// Remove an entity, returning its smoother
    ///
    /// Swap-back removal: O(1), does not preserve iteration order.
    pub fn unregister(&mut self, id: EntityId) -> Option<TickSmoother<B>> {
        self.smoothers.swap_remove(&id)
    }

    /// Access a registered entity's smoother
    pub fn get(&self, id: EntityId) -> Option<&TickSmoother<B>> {
        self.smoothers.get(&id)
    }

    /// Mutable access to a registered entity's smoother
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut TickSmoother<B>> {
        self.smoothers.get_mut(&id)
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.smoothers.len()
    }

    /// Whether no entities are registered
    pub fn is_empty(&self) -> bool {
        self.smoothers.is_empty()
    }

    /// Fan out the pre-tick event
    pub fn on_pre_tick(&mut self) {
        for smoother in self.smoothers.values_mut() {
            smoother.on_pre_tick();
        }
    }

    /// Fan out the post-tick event
    pub fn on_post_tick(&mut self, tick: u32) {
        for smoother in self.smoothers.values_mut() {
            smoother.on_post_tick(tick);
        }
    }

    /// Fan out the frame update
    pub fn on_update(&mut self, delta: f32) {
        for smoother in self.smoothers.values_mut() {
            smoother.on_update(delta);
        }
    }

    /// Fan out a new round-trip-time measurement
    pub fn on_round_trip_time(&mut self, rtt_ms: i64) {
        for smoother in self.smoothers.values_mut() {
            smoother.on_round_trip_time(rtt_ms);
        }
    }

    /// Fan out a replicate-replay event
    pub fn on_replicate_replay(&mut self, tick: u32) {
        for smoother in self.smoothers.values_mut() {
            smoother.on_replicate_replay(tick);
        }
    }

    /// Mark the start or end of a rollback replay window on all entities
    pub fn set_reconciling(&mut self, active: bool) {
        for smoother in self.smoothers.values_mut() {
            smoother.set_reconciling(active);
        }
    }

    /// Teleport one entity; false when it is not registered
    pub fn teleport(&mut self, id: EntityId, local_tick: u32) -> bool {
        match self.smoothers.get_mut(&id) {
            Some(smoother) => {
                smoother.teleport(local_tick);
                true
            }
            None => false,
        }
    }

    /// Replace one entity's settings for a role; false when it is not
    /// registered or has no bound pose
    pub fn set_settings(
        &mut self,
        id: EntityId,
        role: SmootherRole,
        settings: SmoothingSettings,
    ) -> bool {
        match self.smoothers.get_mut(&id) {
            Some(smoother) => smoother.set_settings(role, settings),
            None => false,
        }
    }
}

impl<B: PoseBinding> Default for SmootherHost<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_core::{Pose, RoleSettings, TickTiming, Vec3};

    struct StubBinding {
        visual: Pose,
        tracker: Pose,
    }

    impl PoseBinding for StubBinding {
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

    fn smoother(x: f32) -> TickSmoother<StubBinding> {
        TickSmoother::new(
            StubBinding {
                visual: Pose::from_position(Vec3::new(x, 0.0, 0.0)),
                tracker: Pose::from_position(Vec3::new(x, 0.0, 0.0)),
            },
            RoleSettings::default(),
            SmootherRole::Spectator,
            TickTiming::new(20),
        )
    }

    #[test]
    fn test_register_and_unregister() {
        let mut host = SmootherHost::new();
        host.register(EntityId(1), smoother(1.0)).unwrap();
        host.register(EntityId(2), smoother(2.0)).unwrap();
        host.register(EntityId(3), smoother(3.0)).unwrap();
        assert_eq!(host.len(), 3);

        assert!(matches!(
            host.register(EntityId(2), smoother(0.0)),
            Err(Error::AlreadyRegistered(EntityId(2)))
        ));

        // Swap-back removal must not disturb the other entities' state.
        assert!(host.unregister(EntityId(1)).is_some());
        assert_eq!(host.len(), 2);
        assert_eq!(
            host.get(EntityId(3)).unwrap().binding().visual.position.x,
            3.0
        );
        assert!(host.unregister(EntityId(1)).is_none());
    }

    #[test]
    fn test_events_fan_out() {
        let mut host = SmootherHost::new();
        host.register(EntityId(1), smoother(0.0)).unwrap();
        host.register(EntityId(2), smoother(0.0)).unwrap();

        // First observation snap reaches every registered entity.
        for smoother in host.smoothers.values_mut() {
            smoother.binding_mut().tracker = Pose::from_position(Vec3::new(9.0, 0.0, 0.0));
        }
        host.on_post_tick(1);

        for id in [EntityId(1), EntityId(2)] {
            assert_eq!(host.get(id).unwrap().binding().visual.position.x, 9.0);
        }
    }

    #[test]
    fn test_setters_on_unregistered_are_noops() {
        let mut host: SmootherHost<StubBinding> = SmootherHost::new();
        assert!(!host.set_settings(
            EntityId(7),
            SmootherRole::Owner,
            SmoothingSettings::default()
        ));
        assert!(!host.teleport(EntityId(7), 1));
    }
}
