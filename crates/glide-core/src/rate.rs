//! Per-property traversal rates
//!
//! A [`MoveRate`] describes how fast each pose property travels toward the
//! next buffered snapshot, plus how much traversal time remains. Sentinel
//! values are stored in-band instead of wrapping the struct in `Option` so
//! the representation stays fixed-size for dense batch storage.

use crate::{Pose, PropertyMask};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Sentinel rate value: no active traversal
pub const UNSET_VALUE: f32 = -2.0;

/// Sentinel rate value: move instantly (teleport), do not interpolate
pub const INSTANT_VALUE: f32 = -1.0;

/// Traversal rates between two poses over a fixed duration
///
/// Rates are scalar speeds: units/second for position and scale, radians/
/// second for rotation. `time_remaining` counts down as [`MoveRate::step`]
/// consumes frame time; a negative value means the goal was reached with
/// leftover time the caller can chain into the next segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveRate {
    /// Position speed in units per second
    pub position: f32,
    /// Rotation speed in radians per second
    pub rotation: f32,
    /// Scale speed in units per second
    pub scale: f32,
    /// Seconds of traversal left for the current segment
    pub time_remaining: f32,
}

impl MoveRate {
    /// No active traversal
    pub const UNSET: Self = Self {
        position: UNSET_VALUE,
        rotation: UNSET_VALUE,
        scale: UNSET_VALUE,
        time_remaining: UNSET_VALUE,
    };

    /// Teleport sentinel: the caller snaps instead of interpolating
    pub const INSTANT: Self = Self {
        position: INSTANT_VALUE,
        rotation: INSTANT_VALUE,
        scale: INSTANT_VALUE,
        time_remaining: INSTANT_VALUE,
    };

    /// Whether this rate is the unset sentinel
    pub fn is_unset(&self) -> bool {
        self.position == UNSET_VALUE
    }

    /// Whether this rate is the teleport sentinel
    pub fn is_instant(&self) -> bool {
        self.position == INSTANT_VALUE
    }

    /// Compute rates to traverse from `prev` to `next` over `duration` seconds
    ///
    /// When `teleport_threshold_sq` is set and the squared position distance
    /// meets or exceeds it, returns [`MoveRate::INSTANT`] and the caller is
    /// expected to snap.
    ///
    /// # Example
    ///
    /// ```
    /// use glide_core::{MoveRate, Pose, Vec3};
    ///
    /// let prev = Pose::from_position(Vec3::ZERO);
    /// let next = Pose::from_position(Vec3::new(2.0, 0.0, 0.0));
    ///
    /// let rate = MoveRate::between(&prev, &next, 1.0, None);
    /// assert!((rate.position - 2.0).abs() < 1e-6);
    /// assert!((rate.time_remaining - 1.0).abs() < 1e-6);
    /// ```
    pub fn between(
        prev: &Pose,
        next: &Pose,
        duration: f32,
        teleport_threshold_sq: Option<f32>,
    ) -> MoveRate {
        let distance_sq = prev.position.distance_squared(next.position);
        if let Some(threshold_sq) = teleport_threshold_sq {
            if distance_sq >= threshold_sq {
                return Self::INSTANT;
            }
        }

        // Zero-length traversal windows are floored; see estimator clamping.
        let duration = duration.max(f32::EPSILON);
        MoveRate {
            position: distance_sq.sqrt() / duration,
            rotation: prev.rotation.angle_between(next.rotation) / duration,
            scale: prev.scale.distance(next.scale) / duration,
            time_remaining: duration,
        }
    }

    /// Advance `pose` toward `goal` by `delta` seconds of traversal
    ///
    /// Only properties present in `mask` are moved; each moves at its rate,
    /// clamped not to overshoot the goal. Returns the signed remaining time
    /// (`time_remaining - delta`), which is also stored back into
    /// `time_remaining`. A negative result means the goal was reached before
    /// `delta` was consumed; the magnitude is leftover time for the caller
    /// to immediately begin the next queued segment.
    pub fn step(&mut self, pose: &mut Pose, goal: &Pose, mask: PropertyMask, delta: f32) -> f32 {
        if mask.position() {
            pose.position = move_towards(pose.position, goal.position, self.position * delta);
        }
        if mask.rotation() {
            pose.rotation = rotate_towards(pose.rotation, goal.rotation, self.rotation * delta);
        }
        if mask.scale() {
            pose.scale = move_towards(pose.scale, goal.scale, self.scale * delta);
        }

        self.time_remaining -= delta;
        self.time_remaining
    }
}

impl Default for MoveRate {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Move `current` toward `target` by at most `max_delta` units
fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to = target - current;
    let distance = to.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        target
    } else {
        current + to * (max_delta / distance)
    }
}

/// Rotate `current` toward `target` by at most `max_radians`
fn rotate_towards(current: Quat, target: Quat, max_radians: f32) -> Quat {
    let angle = current.angle_between(target);
    if angle <= max_radians || angle <= f32::EPSILON {
        target
    } else {
        current.slerp(target, max_radians / angle)
    }
}
