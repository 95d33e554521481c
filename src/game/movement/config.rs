// Controller configuration and slope thresholds

use serde::{Deserialize, Serialize};

use super::contact::SurfaceTag;
use crate::engine::physics::CollisionGroups;

/// Configuration errors, raised when a config is validated
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be within [0, 90] degrees, got {value}")]
    AngleOutOfRange { name: &'static str, value: f32 },

    #[error("max_ground_angle ({ground}) must not exceed max_stairs_angle ({stairs})")]
    StairsShallowerThanGround { ground: f32, stairs: f32 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("{name} must be finite")]
    NotFinite { name: &'static str },
}

/// Every tunable of the movement controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // Movement
    /// Target speed while grounded (units/second)
    pub movement_speed: f32,
    /// Target speed while airborne (units/second)
    pub air_movement_speed: f32,
    /// Acceleration cap; each slope axis changes by at most `max_speed * dt` per tick
    pub max_speed: f32,

    // Slopes
    /// Steepest walkable slope, in degrees
    pub max_ground_angle: f32,
    /// Steepest walkable slope on surfaces tagged as stairs, in degrees
    pub max_stairs_angle: f32,

    // Ground snapping
    /// Fastest speed at which ground snapping still activates
    pub max_snap_speed: f32,
    /// Length of the downward snap ray
    pub probe_distance: f32,
    /// Collision groups the snap ray can hit
    pub probe_mask: u32,

    // Jumping
    /// Apex height of a jump from rest
    pub jump_height: f32,
    /// Jumps allowed after leaving the ground
    pub max_air_jumps: u32,
    /// Extra gravity, as a multiple of |g|, applied while moving along gravity.
    /// Zero disables it.
    pub fall_gravity_multiplier: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            movement_speed: 1.0,
            air_movement_speed: 1.0,
            max_speed: 9.0,
            max_ground_angle: 25.0,
            max_stairs_angle: 50.0,
            max_snap_speed: 30.0,
            probe_distance: 2.0,
            probe_mask: CollisionGroups::Terrain as u32 | CollisionGroups::Prop as u32,
            jump_height: 1.0,
            max_air_jumps: 0,
            fall_gravity_multiplier: 0.0,
        }
    }
}

impl ControllerConfig {
    /// Check every invariant and derive the slope thresholds
    pub fn validate(&self) -> Result<SlopeThresholds, ConfigError> {
        let non_negative = [
            ("movement_speed", self.movement_speed),
            ("air_movement_speed", self.air_movement_speed),
            ("max_speed", self.max_speed),
            ("max_snap_speed", self.max_snap_speed),
            ("probe_distance", self.probe_distance),
            ("jump_height", self.jump_height),
            ("fall_gravity_multiplier", self.fall_gravity_multiplier),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }

        for (name, value) in [
            ("max_ground_angle", self.max_ground_angle),
            ("max_stairs_angle", self.max_stairs_angle),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name });
            }
            if !(0.0..=90.0).contains(&value) {
                return Err(ConfigError::AngleOutOfRange { name, value });
            }
        }

        if self.max_ground_angle > self.max_stairs_angle {
            return Err(ConfigError::StairsShallowerThanGround {
                ground: self.max_ground_angle,
                stairs: self.max_stairs_angle,
            });
        }

        Ok(SlopeThresholds::from_angles(
            self.max_ground_angle,
            self.max_stairs_angle,
        ))
    }
}

/// Minimum alignment with the up axis for a surface to count as ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeThresholds {
    pub min_ground_dot: f32,
    pub min_stairs_dot: f32,
}

impl SlopeThresholds {
    /// Derive thresholds from angles in degrees
    pub fn from_angles(max_ground_angle: f32, max_stairs_angle: f32) -> Self {
        // cos(90°) is slightly negative in f32
        Self {
            min_ground_dot: max_ground_angle.to_radians().cos().max(0.0),
            min_stairs_dot: max_stairs_angle.to_radians().cos().max(0.0),
        }
    }

    /// Threshold for a surface; stairs get the more lenient one
    pub fn for_surface(&self, tag: SurfaceTag) -> f32 {
        match tag {
            SurfaceTag::Stairs => self.min_stairs_dot,
            SurfaceTag::Walkable | SurfaceTag::Other => self.min_ground_dot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_is_valid() {
        let thresholds = ControllerConfig::default().validate().unwrap();
        assert_relative_eq!(thresholds.min_ground_dot, 0.906_307_8, epsilon = 1e-5);
        assert_relative_eq!(thresholds.min_stairs_dot, 0.642_787_6, epsilon = 1e-5);
    }

    #[test]
    fn test_cosine_is_monotonic() {
        for a1 in 0..90 {
            let t = SlopeThresholds::from_angles(a1 as f32, (a1 + 1) as f32);
            assert!(
                t.min_ground_dot > t.min_stairs_dot,
                "cos({a1}) should exceed cos({})",
                a1 + 1
            );
        }
    }

    #[test]
    fn test_thresholds_within_unit_range() {
        for angle in [0.0, 25.0, 45.0, 65.0, 90.0] {
            let t = SlopeThresholds::from_angles(angle, angle);
            assert!(t.min_ground_dot >= 0.0 && t.min_ground_dot <= 1.0);
        }
    }

    #[test]
    fn test_stairs_uses_stairs_threshold() {
        let t = SlopeThresholds::from_angles(25.0, 65.0);
        assert_eq!(t.for_surface(SurfaceTag::Stairs), t.min_stairs_dot);
        assert_eq!(t.for_surface(SurfaceTag::Walkable), t.min_ground_dot);
        assert_eq!(t.for_surface(SurfaceTag::Other), t.min_ground_dot);
        assert_relative_eq!(t.min_stairs_dot, 0.422_618_3, epsilon = 1e-5);
    }

    #[test]
    fn test_rejects_ground_steeper_than_stairs() {
        let config = ControllerConfig {
            max_ground_angle: 60.0,
            max_stairs_angle: 30.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::StairsShallowerThanGround {
                ground: 60.0,
                stairs: 30.0
            })
        );
    }

    #[test]
    fn test_rejects_angle_out_of_range() {
        let config = ControllerConfig {
            max_stairs_angle: 120.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AngleOutOfRange {
                name: "max_stairs_angle",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        let negative = ControllerConfig {
            probe_distance: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::Negative {
                name: "probe_distance",
                ..
            })
        ));

        let nan = ControllerConfig {
            max_speed: f32::NAN,
            ..Default::default()
        };
        assert_eq!(
            nan.validate(),
            Err(ConfigError::NotFinite { name: "max_speed" })
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Negative {
            name: "jump_height",
            value: -2.0,
        };
        assert_eq!(err.to_string(), "jump_height must not be negative, got -2");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ControllerConfig =
            serde_json::from_str(r#"{ "max_air_jumps": 2, "movement_speed": 6.5 }"#).unwrap();
        assert_eq!(config.max_air_jumps, 2);
        assert_eq!(config.movement_speed, 6.5);
        assert_eq!(config.max_ground_angle, 25.0);
    }
}
