//! Controller configuration.
//!
//! One [`BoxControllerConfig`] describes the box, how its edges are swept and
//! how fast it moves. It is set once when a body is created and never changes
//! afterwards; [`BoxBody`](crate::body::BoxBody) keeps its own validated copy.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionMask;
use crate::error::{ConfigError, ConfigLoadError};

/// Configuration parameters for a box controller.
///
/// All speeds are in world units per second. The defaults describe a 1×1
/// box that walks at 10 units/s and falls at 20 units/s.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct BoxControllerConfig {
    // === Box ===
    /// Half width and half height of the box. Both must be positive.
    pub half_extents: Vec2,

    // === Edge Sweeps ===
    /// Number of parallel rays cast along each edge (at least 2, so the
    /// corners are always sampled).
    pub sample_count: usize,

    /// Multiplier applied to every corrective push so the box ends up
    /// slightly clear of the surface it hit. Must be greater than 1.0.
    pub overshoot_factor: f32,

    /// Geometry layers that block movement.
    pub collision_mask: CollisionMask,

    // === Movement ===
    /// Speed contributed by each held direction key.
    pub move_speed: f32,

    /// Speed of gravity. Also the peak upward speed of a jump.
    pub fall_speed: f32,

    // === Jump ===
    /// How long a jump can sustain upward motion, in seconds.
    pub jump_duration: f32,

    /// Exponent of the jump decay curve. 1.0 decays linearly, larger values
    /// drop off faster after take-off.
    pub jump_speed_curve: f32,

    /// Reverse gravity while jump is held outside of a jump or dash.
    pub hold_to_float: bool,

    // === Dash ===
    /// Horizontal speed while dashing.
    pub dash_speed: f32,

    /// How long a dash lasts, in seconds.
    pub dash_duration: f32,
}

impl Default for BoxControllerConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec2::splat(0.5),

            sample_count: 3,
            overshoot_factor: 1.001,
            collision_mask: CollisionMask::DEFAULT,

            move_speed: 10.0,
            fall_speed: 20.0,

            jump_duration: 0.35,
            jump_speed_curve: 2.0,
            hold_to_float: false,

            dash_speed: 40.0,
            dash_duration: 0.15,
        }
    }
}

impl BoxControllerConfig {
    /// Create a config for the given box size (full width and height).
    pub fn from_size(size: Vec2) -> Self {
        Self {
            half_extents: size / 2.0,
            ..default()
        }
    }

    /// Create a config tuned for a responsive player character.
    pub fn player() -> Self {
        Self {
            jump_duration: 0.4,
            jump_speed_curve: 1.5,
            dash_speed: 45.0,
            ..default()
        }
    }

    /// Check every invariant the stepper relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Vec2 { x, y } = self.half_extents;
        if !(x > 0.0 && y > 0.0 && x.is_finite() && y.is_finite()) {
            return Err(ConfigError::InvalidHalfExtents { x, y });
        }
        if self.sample_count < 2 {
            return Err(ConfigError::TooFewSamples(self.sample_count));
        }
        if !(self.overshoot_factor > 1.0 && self.overshoot_factor.is_finite()) {
            return Err(ConfigError::InvalidOvershoot(self.overshoot_factor));
        }
        for (name, value) in [
            ("jump_duration", self.jump_duration),
            ("dash_duration", self.dash_duration),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidDuration { name, value });
            }
        }
        for (name, value) in [
            ("move_speed", self.move_speed),
            ("fall_speed", self.fall_speed),
            ("dash_speed", self.dash_speed),
            ("jump_speed_curve", self.jump_speed_curve),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidSpeed { name, value });
            }
        }
        Ok(())
    }

    /// Parse and validate a config from a RON document.
    ///
    /// Missing fields fall back to [`Default`].
    ///
    /// ```rust
    /// use sweep_box_controller::prelude::*;
    ///
    /// let config = BoxControllerConfig::from_ron_str("(move_speed: 12.0, sample_count: 5)").unwrap();
    /// assert_eq!(config.move_speed, 12.0);
    /// assert_eq!(config.sample_count, 5);
    /// ```
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = ron::de::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    /// Full box size (width, height).
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    /// Builder: set half extents.
    pub fn with_half_extents(mut self, half_extents: Vec2) -> Self {
        self.half_extents = half_extents;
        self
    }

    /// Builder: set the number of rays per edge.
    pub fn with_sample_count(mut self, count: usize) -> Self {
        self.sample_count = count;
        self
    }

    /// Builder: set the overshoot factor.
    pub fn with_overshoot_factor(mut self, factor: f32) -> Self {
        self.overshoot_factor = factor;
        self
    }

    /// Builder: set the blocking layers.
    pub fn with_collision_mask(mut self, mask: CollisionMask) -> Self {
        self.collision_mask = mask;
        self
    }

    /// Builder: set move speed.
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Builder: set fall speed.
    pub fn with_fall_speed(mut self, speed: f32) -> Self {
        self.fall_speed = speed;
        self
    }

    /// Builder: set jump duration and decay exponent.
    pub fn with_jump(mut self, duration: f32, speed_curve: f32) -> Self {
        self.jump_duration = duration;
        self.jump_speed_curve = speed_curve;
        self
    }

    /// Builder: set dash speed and duration.
    pub fn with_dash(mut self, speed: f32, duration: f32) -> Self {
        self.dash_speed = speed;
        self.dash_duration = duration;
        self
    }

    /// Builder: enable or disable reversed gravity while jump is held.
    pub fn with_hold_to_float(mut self, enabled: bool) -> Self {
        self.hold_to_float = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BoxControllerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.size(), Vec2::ONE);
        assert_eq!(config.sample_count, 3);
        assert_eq!(config.collision_mask, CollisionMask::DEFAULT);
    }

    #[test]
    fn player_preset_is_valid() {
        assert!(BoxControllerConfig::player().validate().is_ok());
    }

    #[test]
    fn from_size_halves_the_size() {
        let config = BoxControllerConfig::from_size(Vec2::new(2.0, 4.0));
        assert_eq!(config.half_extents, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn rejects_non_positive_half_extents() {
        let config = BoxControllerConfig::default().with_half_extents(Vec2::new(0.5, 0.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHalfExtents { .. })
        ));

        let config = BoxControllerConfig::default().with_half_extents(Vec2::new(-1.0, 1.0));
        assert!(config.validate().is_err());

        let config = BoxControllerConfig::default().with_half_extents(Vec2::new(f32::NAN, 1.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_single_sample() {
        let config = BoxControllerConfig::default().with_sample_count(1);
        assert_eq!(config.validate(), Err(ConfigError::TooFewSamples(1)));

        let config = BoxControllerConfig::default().with_sample_count(2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_overshoot_of_one_or_less() {
        let config = BoxControllerConfig::default().with_overshoot_factor(1.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidOvershoot(1.0)));

        let config = BoxControllerConfig::default().with_overshoot_factor(0.9);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_durations() {
        let config = BoxControllerConfig::default().with_jump(0.0, 2.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDuration {
                name: "jump_duration",
                value: 0.0
            })
        );

        let config = BoxControllerConfig::default().with_dash(40.0, -0.1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDuration { name: "dash_duration", .. })
        ));
    }

    #[test]
    fn rejects_negative_speeds() {
        let config = BoxControllerConfig::default().with_move_speed(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpeed { name: "move_speed", .. })
        ));

        // Zero speeds are allowed (e.g. a box that never falls)
        let config = BoxControllerConfig::default().with_fall_speed(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ron_fills_missing_fields_from_default() {
        let config =
            BoxControllerConfig::from_ron_str("(half_extents: (1.0, 2.0), collision_mask: 6)")
                .unwrap();
        assert_eq!(config.half_extents, Vec2::new(1.0, 2.0));
        assert_eq!(config.collision_mask, CollisionMask(6));
        assert_eq!(config.move_speed, 10.0);
    }

    #[test]
    fn ron_rejects_invalid_values() {
        let err = BoxControllerConfig::from_ron_str("(sample_count: 1)").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid(ConfigError::TooFewSamples(1))));
    }

    #[test]
    fn ron_reports_parse_errors() {
        let err = BoxControllerConfig::from_ron_str("(move_speed: fast)").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = BoxControllerConfig::load("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io { .. }));
    }

    #[test]
    fn bundled_player_config_parses() {
        let config = BoxControllerConfig::from_ron_str(include_str!("../demos/player.ron")).unwrap();
        assert_eq!(config.sample_count, 3);
        assert!(config.overshoot_factor > 1.0);
    }
}
