//! Per-role smoothing configuration
//!
//! Settings are plain serde-derived structs passed in-process at
//! registration and mutable afterward through explicit setters. There is no
//! file format here; embedding applications decide how to persist them.

use serde::{Deserialize, Serialize};

/// Lower clamp on the move-immediately easing multiplier
///
/// Empirically tuned constant preserved from the reference behavior, not
/// re-derived.
pub const MOVE_IMMEDIATELY_EASE_MIN: f32 = 0.5;

/// Upper clamp on the move-immediately easing multiplier
pub const MOVE_IMMEDIATELY_EASE_MAX: f32 = 1.05;

/// Speed-up applied per buffered tick of queue overage
///
/// When the queue holds more ticks than the target interpolation depth,
/// consumption speeds up by this fraction per excess tick so the buffer
/// drains back toward its target without a visible speed spike.
pub const OVER_INTERPOLATION_CORRECTION: f32 = 0.015;

/// Extra buffered ticks tolerated past the interpolation depth before the
/// discard pass trims
pub const QUEUE_SLACK: usize = 3;

/// Signed buffer deficit at which movement pauses to let the buffer refill
pub const STARVATION_DEFICIT: i64 = -4;

/// Bitmask selecting which pose properties are smoothed
///
/// Properties outside the mask are never interpolated; with
/// [`SmoothingSettings::snap_non_smoothed`] enabled they are forced to the
/// tracker's value after each tick instead.
///
/// # Example
///
/// ```
/// use glide_core::PropertyMask;
///
/// let mask = PropertyMask::POSITION | PropertyMask::ROTATION;
/// assert!(mask.position());
/// assert!(!mask.scale());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMask(u8);

impl PropertyMask {
    /// No properties
    pub const NONE: Self = Self(0);
    /// Position only
    pub const POSITION: Self = Self(1);
    /// Rotation only
    pub const ROTATION: Self = Self(1 << 1);
    /// Scale only
    pub const SCALE: Self = Self(1 << 2);
    /// All three properties
    pub const ALL: Self = Self(0b111);

    /// Whether position is included
    pub fn position(&self) -> bool {
        self.0 & Self::POSITION.0 != 0
    }

    /// Whether rotation is included
    pub fn rotation(&self) -> bool {
        self.0 & Self::ROTATION.0 != 0
    }

    /// Whether scale is included
    pub fn scale(&self) -> bool {
        self.0 & Self::SCALE.0 != 0
    }

    /// Whether every property is included
    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL.0
    }
}

impl std::ops::BitOr for PropertyMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Default for PropertyMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// How aggressively interpolation depth adapts to measured latency
///
/// `Off` uses the flat configured depth. Levels 1 through 6 add their value
/// as a floor on top of the RTT-derived tick count: higher levels buffer
/// more, trading latency for jitter tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum AdaptiveLevel {
    /// Fixed interpolation depth, ignore RTT
    #[default]
    Off = 0,
    Minimal = 1,
    VeryLow = 2,
    Low = 3,
    Moderate = 4,
    High = 5,
    VeryHigh = 6,
}

impl AdaptiveLevel {
    /// Extra buffered ticks contributed by this level
    pub fn as_ticks(&self) -> u8 {
        *self as u8
    }

    /// Whether adaptation is enabled at all
    pub fn is_adaptive(&self) -> bool {
        !matches!(self, AdaptiveLevel::Off)
    }
}

/// Which view of an entity a peer has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SmootherRole {
    /// The local peer controls this entity
    Owner,
    /// The local peer only observes this entity
    #[default]
    Spectator,
}

/// Smoothing configuration for one role
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingSettings {
    /// Snap instead of interpolating when movement exceeds the threshold
    pub enable_teleport: bool,
    /// Squared position distance that counts as a teleport
    pub teleport_threshold_sq: f32,
    /// How interpolation depth responds to measured round-trip time
    pub adaptive_level: AdaptiveLevel,
    /// Flat interpolation depth in ticks, used when `adaptive_level` is Off
    pub interpolation_ticks: u8,
    /// Which properties are interpolated
    pub smoothed_properties: PropertyMask,
    /// Force non-smoothed properties to the tracker value each tick
    pub snap_non_smoothed: bool,
    /// Read and write poses in local space instead of world space
    pub use_local_space: bool,
    /// Start moving as soon as any snapshot is buffered, easing speed by
    /// buffer fill instead of waiting for the full interpolation depth
    pub move_immediately: bool,
}

impl SmoothingSettings {
    /// Set the teleport threshold from an unsquared distance
    pub fn set_teleport_distance(&mut self, distance: f32) {
        self.teleport_threshold_sq = distance * distance;
    }

    /// Teleport threshold to hand to the rate solver, `None` when disabled
    pub fn teleport_threshold(&self) -> Option<f32> {
        if self.enable_teleport {
            Some(self.teleport_threshold_sq)
        } else {
            None
        }
    }
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        Self {
            enable_teleport: false,
            teleport_threshold_sq: 1.0,
            adaptive_level: AdaptiveLevel::Off,
            interpolation_ticks: 2,
            smoothed_properties: PropertyMask::ALL,
            snap_non_smoothed: false,
            use_local_space: false,
            move_immediately: false,
        }
    }
}

/// Settings for both roles an entity can be observed under
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RoleSettings {
    pub owner: SmoothingSettings,
    pub spectator: SmoothingSettings,
}

impl RoleSettings {
    /// Use the same settings for both roles
    pub fn uniform(settings: SmoothingSettings) -> Self {
        Self {
            owner: settings,
            spectator: settings,
        }
    }

    /// Settings for the given role
    pub fn for_role(&self, role: SmootherRole) -> &SmoothingSettings {
        match role {
            SmootherRole::Owner => &self.owner,
            SmootherRole::Spectator => &self.spectator,
        }
    }

    /// Mutable settings for the given role
    pub fn for_role_mut(&mut self, role: SmootherRole) -> &mut SmoothingSettings {
        match role {
            SmootherRole::Owner => &mut self.owner,
            SmootherRole::Spectator => &mut self.spectator,
        }
    }

    /// Whether any role adapts interpolation depth to RTT
    ///
    /// Used to skip RTT recomputation entirely when both roles are flat.
    pub fn any_adaptive(&self) -> bool {
        self.owner.adaptive_level.is_adaptive() || self.spectator.adaptive_level.is_adaptive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_combinations() {
        let mask = PropertyMask::POSITION | PropertyMask::SCALE;
        assert!(mask.position());
        assert!(!mask.rotation());
        assert!(mask.scale());
        assert!(!mask.is_all());
        assert!(PropertyMask::ALL.is_all());
    }

    #[test]
    fn test_teleport_threshold_gating() {
        let mut settings = SmoothingSettings::default();
        assert_eq!(settings.teleport_threshold(), None);

        settings.enable_teleport = true;
        settings.set_teleport_distance(3.0);
        assert_eq!(settings.teleport_threshold(), Some(9.0));
    }

    #[test]
    fn test_any_adaptive() {
        let mut roles = RoleSettings::default();
        assert!(!roles.any_adaptive());

        roles.spectator.adaptive_level = AdaptiveLevel::Moderate;
        assert!(roles.any_adaptive());
    }

    #[test]
    fn test_settings_ron_round_trip() {
        let mut settings = SmoothingSettings::default();
        settings.enable_teleport = true;
        settings.adaptive_level = AdaptiveLevel::High;
        settings.smoothed_properties = PropertyMask::POSITION | PropertyMask::ROTATION;

        let text = ron::to_string(&settings).unwrap();
        let parsed: SmoothingSettings = ron::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
