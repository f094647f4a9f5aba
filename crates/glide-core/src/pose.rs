//! Pose value type
//!
//! A pose is the position/rotation/scale triple of a transform. Poses are
//! plain `Copy` values; the smoothing crates shuttle them between the
//! simulation (tracker pose) and the renderer (visual pose).

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, rotation, and scale of a transform
///
/// # Example
///
/// ```
/// use glide_core::{Pose, Vec3};
///
/// let a = Pose::from_position(Vec3::ZERO);
/// let b = Pose::from_position(Vec3::new(10.0, 0.0, 0.0));
///
/// let mid = a.lerp(&b, 0.5);
/// assert_eq!(mid.position, Vec3::new(5.0, 0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Pose {
    /// The identity pose: zero position, identity rotation, unit scale
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a pose from explicit components
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create a pose at the given position with identity rotation and unit scale
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Compose this pose with a parent-relative offset
    ///
    /// Position and scale add component-wise; rotation composes by
    /// quaternion multiplication.
    pub fn offset_by(&self, offset: &Pose) -> Pose {
        Pose {
            position: self.position + offset.position,
            rotation: (offset.rotation * self.rotation).normalize(),
            scale: self.scale + offset.scale,
        }
    }

    /// Interpolate component-wise toward another pose
    ///
    /// Position and scale interpolate linearly; rotation takes the
    /// shortest-path spherical interpolation.
    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.slerp(other.rotation, t),
            scale: self.scale.lerp(other.scale, t),
        }
    }

    /// Check component-wise equality within an absolute epsilon
    pub fn approx_eq(&self, other: &Pose, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.rotation.abs_diff_eq(other.rotation, epsilon)
            && self.scale.abs_diff_eq(other.scale, epsilon)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}
