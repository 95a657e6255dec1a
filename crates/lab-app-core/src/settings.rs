// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Lab tunables: physics constants, pour curve, stream, and pointer mapping.
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable config.

use serde::{Deserialize, Serialize};

/// Store key under which the lab config is persisted.
pub const LAB_CONFIG_KEY: &str = "lab";

/// Complete lab configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// World constants.
    pub physics: PhysicsConfig,
    /// Tilt → pour-rate curve and transfer efficiency.
    pub pour: PourConfig,
    /// Droplet stream parameters.
    pub stream: StreamConfig,
    /// Pointer mapping and return animation.
    pub interaction: InteractionConfig,
}

/// World constants shared by the stream and the frame loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration (negative is down), units/s².
    pub gravity: f32,
    /// Height of the floor plane droplets splash on.
    pub floor_y: f32,
    /// Largest frame delta accepted by the frame loop, in seconds.
    pub max_frame_dt: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.8,
            floor_y: 0.0,
            max_frame_dt: 0.1,
        }
    }
}

/// Tilt thresholds and transfer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PourConfig {
    /// Tilt (degrees) a vessel must exceed before it pours.
    pub threshold_deg: f32,
    /// Tilt (degrees) at which the rate saturates.
    pub full_rate_deg: f32,
    /// Saturated pour rate, volume units per second.
    pub max_rate: f32,
    /// Fraction of poured volume credited to the receiving vessel.
    pub efficiency: f32,
}

impl Default for PourConfig {
    fn default() -> Self {
        Self {
            threshold_deg: 30.0,
            full_rate_deg: 120.0,
            max_rate: 60.0,
            efficiency: 0.9,
        }
    }
}

/// Droplet spawning, lifetime, and splash parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Cap on live droplets.
    pub max_droplets: usize,
    /// Seconds a droplet may fly before it is culled.
    pub droplet_max_age: f32,
    /// Particles per splash burst.
    pub splash_count: usize,
    /// Seconds a splash particle lives.
    pub splash_life: f32,
    /// Seed for the stream's random generator.
    pub seed: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_droplets: 120,
            droplet_max_age: 2.0,
            splash_count: 6,
            splash_life: 0.4,
            seed: 0x5eed_1ab5,
        }
    }
}

/// Pointer → pose mapping and the return-to-upright animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Radians of tilt per pixel of vertical pointer motion.
    pub tilt_sensitivity: f32,
    /// Radians of yaw per pixel of horizontal pointer motion.
    pub yaw_sensitivity: f32,
    /// Largest tilt a drag can reach, degrees.
    pub max_tilt_deg: f32,
    /// Seconds the return-to-upright animation takes.
    pub return_duration: f32,
    /// Table half extent along x.
    pub table_half_width: f32,
    /// Table half extent along z.
    pub table_half_depth: f32,
    /// How far a held vessel is raised above its resting height.
    pub lift_height: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            tilt_sensitivity: 0.01,
            yaw_sensitivity: 0.001,
            max_tilt_deg: 120.0,
            return_duration: 0.5,
            table_half_width: 4.0,
            table_half_depth: 2.0,
            lift_height: 2.5,
        }
    }
}

/// Finite `value`, or `fallback` for NaN and infinities.
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Finite `value` floored at zero, or `fallback` for NaN and infinities.
fn non_negative_or(value: f32, fallback: f32) -> f32 {
    finite_or(value, fallback).max(0.0)
}

impl LabConfig {
    /// Repairs values the simulation cannot use.
    ///
    /// Non-finite numbers fall back to their defaults; ranges that must not
    /// be negative are floored at zero; fractions and angles are clamped to
    /// their meaningful range. A sanitized config never makes a range
    /// inverted, so every clamp downstream is well formed.
    pub fn sanitized(self) -> Self {
        Self {
            physics: self.physics.sanitized(),
            pour: self.pour.sanitized(),
            stream: self.stream.sanitized(),
            interaction: self.interaction.sanitized(),
        }
    }
}

impl PhysicsConfig {
    /// See [`LabConfig::sanitized`].
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            gravity: finite_or(self.gravity, d.gravity),
            floor_y: finite_or(self.floor_y, d.floor_y),
            max_frame_dt: non_negative_or(self.max_frame_dt, d.max_frame_dt),
        }
    }
}

impl PourConfig {
    /// See [`LabConfig::sanitized`].
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            threshold_deg: finite_or(self.threshold_deg, d.threshold_deg).clamp(0.0, 180.0),
            full_rate_deg: finite_or(self.full_rate_deg, d.full_rate_deg).clamp(0.0, 180.0),
            max_rate: non_negative_or(self.max_rate, d.max_rate),
            efficiency: finite_or(self.efficiency, d.efficiency).clamp(0.0, 1.0),
        }
    }
}

impl StreamConfig {
    /// See [`LabConfig::sanitized`].
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            droplet_max_age: non_negative_or(self.droplet_max_age, d.droplet_max_age),
            splash_life: non_negative_or(self.splash_life, d.splash_life),
            ..self
        }
    }
}

impl InteractionConfig {
    /// See [`LabConfig::sanitized`].
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            tilt_sensitivity: finite_or(self.tilt_sensitivity, d.tilt_sensitivity),
            yaw_sensitivity: finite_or(self.yaw_sensitivity, d.yaw_sensitivity),
            max_tilt_deg: finite_or(self.max_tilt_deg, d.max_tilt_deg).clamp(0.0, 180.0),
            return_duration: non_negative_or(self.return_duration, d.return_duration),
            table_half_width: non_negative_or(self.table_half_width, d.table_half_width),
            table_half_depth: non_negative_or(self.table_half_depth, d.table_half_depth),
            lift_height: non_negative_or(self.lift_height, d.lift_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_fills_defaults() {
        let cfg: LabConfig =
            serde_json::from_str(r#"{ "pour": { "max_rate": 30.0 } }"#).unwrap();
        assert!((cfg.pour.max_rate - 30.0).abs() < f32::EPSILON);
        assert!((cfg.pour.efficiency - 0.9).abs() < f32::EPSILON);
        assert_eq!(cfg.stream, StreamConfig::default());
    }

    #[test]
    fn empty_document_is_default() {
        let cfg: LabConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, LabConfig::default());
    }

    #[test]
    fn defaults_survive_sanitizing() {
        assert_eq!(LabConfig::default().sanitized(), LabConfig::default());
    }

    #[test]
    fn negative_ranges_floor_at_zero() {
        let cfg: LabConfig = serde_json::from_str(
            r#"{
                "physics": { "max_frame_dt": -0.1 },
                "interaction": { "max_tilt_deg": -5.0, "table_half_width": -1.0 },
                "stream": { "splash_life": -2.0 }
            }"#,
        )
        .unwrap();
        let cfg = cfg.sanitized();
        assert_eq!(cfg.physics.max_frame_dt, 0.0);
        assert_eq!(cfg.interaction.max_tilt_deg, 0.0);
        assert_eq!(cfg.interaction.table_half_width, 0.0);
        assert_eq!(cfg.stream.splash_life, 0.0);
        assert_eq!(cfg.interaction.table_half_depth, 2.0);
    }

    #[test]
    fn non_finite_values_fall_back_to_defaults() {
        let mut cfg = LabConfig::default();
        cfg.physics.max_frame_dt = f32::NAN;
        cfg.physics.gravity = f32::NEG_INFINITY;
        cfg.pour.efficiency = f32::NAN;
        cfg.interaction.max_tilt_deg = f32::INFINITY;
        let cfg = cfg.sanitized();
        assert_eq!(cfg, LabConfig::default());
    }

    #[test]
    fn fractions_and_angles_are_clamped() {
        let mut cfg = LabConfig::default();
        cfg.pour.efficiency = 1.5;
        cfg.pour.full_rate_deg = 400.0;
        cfg.interaction.max_tilt_deg = 270.0;
        let cfg = cfg.sanitized();
        assert_eq!(cfg.pour.efficiency, 1.0);
        assert_eq!(cfg.pour.full_rate_deg, 180.0);
        assert_eq!(cfg.interaction.max_tilt_deg, 180.0);
    }
}
