//! Seam to the externally owned transform
//!
//! The smoother never reaches into a scene graph. Embedding applications
//! implement [`PoseBinding`] over whatever owns the entity's transform and
//! its simulated ground truth.

use glide_core::Pose;

/// Read/write access to an entity's visual pose and read access to its
/// tracker pose
///
/// The *visual* pose is what the renderer displays; the smoother owns it
/// between ticks. The *tracker* pose is the ground-truth simulated pose
/// sampled after each tick; the smoother only ever reads it.
///
/// The `_local` variants serve bindings whose transform is parented;
/// implementations without a parent space can keep the defaults, which
/// forward to the world-space accessors. Which space the smoother uses is
/// selected per role via `SmoothingSettings::use_local_space`.
pub trait PoseBinding {
    /// Whether a visual transform is currently bound
    ///
    /// When false, every smoothing operation is a silent no-op.
    fn is_bound(&self) -> bool {
        true
    }

    /// Current visual pose, world space
    fn visual_pose(&self) -> Pose;

    /// Overwrite the visual pose, world space
    fn set_visual_pose(&mut self, pose: Pose);

    /// Ground-truth simulated pose, world space
    fn tracker_pose(&self) -> Pose;

    /// Current visual pose, local space
    fn visual_pose_local(&self) -> Pose {
        self.visual_pose()
    }

    /// Overwrite the visual pose, local space
    fn set_visual_pose_local(&mut self, pose: Pose) {
        self.set_visual_pose(pose)
    }

    /// Ground-truth simulated pose, local space
    fn tracker_pose_local(&self) -> Pose {
        self.tracker_pose()
    }
}
