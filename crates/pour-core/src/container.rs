// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vessel state: volume, pose, and tilt-derived pour physics.

use glam::{Quat, Vec3};
use lab_app_core::settings::PourConfig;
use lab_scene_port::{ColorRgba8, Pose};

use crate::shape::{cavity_contains, ShapeDescriptor};

/// Squared horizontal lean below which a vessel counts as upright.
const LEAN_EPSILON: f32 = 1e-8;

/// Stable identifier of a vessel within a lab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(pub u32);

/// Euler rotation in radians, applied in X, Y, Z order (`R = Rx * Ry * Rz`).
///
/// Vessels tilt about local Z (negative Z tips the spout side down) and yaw
/// about Y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Euler {
    /// Pitch about X.
    pub x: f32,
    /// Yaw about Y.
    pub y: f32,
    /// Roll about Z.
    pub z: f32,
}

impl Euler {
    /// No rotation.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a rotation from its three angles.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Upright pose that keeps `yaw`.
    pub const fn upright(yaw: f32) -> Self {
        Self::new(0.0, yaw, 0.0)
    }

    /// Quaternion equivalent.
    pub fn to_quat(self) -> Quat {
        Quat::from_rotation_x(self.x) * Quat::from_rotation_y(self.y) * Quat::from_rotation_z(self.z)
    }

    /// Component-wise interpolation; `t = 1` returns `to` exactly.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        if t >= 1.0 {
            return to;
        }
        Self::new(
            self.x + (to.x - self.x) * t,
            self.y + (to.y - self.y) * t,
            self.z + (to.z - self.z) * t,
        )
    }
}

/// A vessel on the lab table.
///
/// The stored volume is always within `[0, max_volume]`; setters clamp
/// silently. Any volume change marks the liquid geometry for regeneration.
#[derive(Clone, Debug)]
pub struct Container {
    /// Identifier.
    pub id: ContainerId,
    /// Label used for scene keys and HUD element ids.
    pub label: String,
    /// Shape parameters.
    pub shape: ShapeDescriptor,
    /// Liquid color.
    pub liquid_color: ColorRgba8,
    /// World position of the pivot (vessel mid-height on the axis).
    pub position: Vec3,
    /// Current rotation.
    pub orientation: Euler,
    /// Liquid exit point in pivot-local space.
    pub spout_offset: Vec3,
    max_volume: f32,
    volume: f32,
    liquid_dirty: bool,
}

impl Container {
    /// Creates an upright vessel standing on `y = 0` at the origin.
    pub fn new(
        id: ContainerId,
        label: impl Into<String>,
        shape: ShapeDescriptor,
        max_volume: f32,
        volume: f32,
        liquid_color: ColorRgba8,
    ) -> Self {
        let spout_lip = (shape.neck_radius * 0.05).max(0.02);
        let mut c = Self {
            id,
            label: label.into(),
            shape,
            liquid_color,
            position: Vec3::new(0.0, shape.half_height(), 0.0),
            orientation: Euler::ZERO,
            spout_offset: Vec3::new(shape.neck_radius + spout_lip, shape.half_height(), 0.0),
            max_volume: max_volume.max(0.0),
            volume: 0.0,
            liquid_dirty: true,
        };
        c.set_volume(volume);
        c
    }

    /// Places the vessel upright with its base on `table_y` at `(x, z)`.
    pub fn placed(mut self, x: f32, table_y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, table_y + self.shape.half_height(), z);
        self.orientation = Euler::ZERO;
        self
    }

    /// Current volume.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Capacity.
    pub fn max_volume(&self) -> f32 {
        self.max_volume
    }

    /// Volume over capacity, in `[0, 1]`.
    pub fn fill_fraction(&self) -> f32 {
        if self.max_volume <= 0.0 {
            0.0
        } else {
            self.volume / self.max_volume
        }
    }

    /// Sets the volume, clamped to `[0, max_volume]`. NaN counts as empty.
    pub fn set_volume(&mut self, volume: f32) {
        let clamped = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, self.max_volume)
        };
        if clamped != self.volume {
            self.volume = clamped;
            self.liquid_dirty = true;
        }
    }

    /// Adds `delta` (may be negative), clamping the result.
    pub fn add_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }

    /// Removes up to `amount` and returns what was actually removed.
    pub fn drain(&mut self, amount: f32) -> f32 {
        let before = self.volume;
        self.add_volume(-amount.max(0.0));
        before - self.volume
    }

    /// Returns and clears the "liquid geometry needs rebuilding" flag.
    pub fn take_liquid_dirty(&mut self) -> bool {
        std::mem::take(&mut self.liquid_dirty)
    }

    /// Rotation as a quaternion.
    pub fn rotation(&self) -> Quat {
        self.orientation.to_quat()
    }

    /// Scene pose.
    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position.to_array(),
            rotation: self.rotation().to_array(),
        }
    }

    /// Angle in `[0, π]` between the vessel's local up and world up.
    pub fn tilt_angle(&self) -> f32 {
        let up = self.rotation() * Vec3::Y;
        up.dot(Vec3::Y).clamp(-1.0, 1.0).acos()
    }

    /// True when tilted past the threshold with liquid left.
    pub fn can_pour(&self, cfg: &PourConfig) -> bool {
        self.tilt_angle().to_degrees() > cfg.threshold_deg && self.volume > 0.0
    }

    /// Volume per second leaving the spout at the current tilt.
    ///
    /// Zero at or below the threshold, then linear up to `max_rate` at
    /// `full_rate_deg`, flat beyond.
    pub fn pour_rate(&self, cfg: &PourConfig) -> f32 {
        let tilt = self.tilt_angle().to_degrees();
        if tilt <= cfg.threshold_deg {
            return 0.0;
        }
        let span = cfg.full_rate_deg - cfg.threshold_deg;
        if span <= 0.0 {
            return cfg.max_rate;
        }
        cfg.max_rate * ((tilt - cfg.threshold_deg) / span).clamp(0.0, 1.0)
    }

    /// Pivot-local point to world space.
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation() * local
    }

    /// World point to pivot-local space.
    pub fn world_to_local(&self, world: Vec3) -> Vec3 {
        self.rotation().inverse() * (world - self.position)
    }

    /// Spout position in world space.
    pub fn spout_world(&self) -> Vec3 {
        self.local_to_world(self.spout_offset)
    }

    /// Horizontal unit vector the mouth leans toward.
    ///
    /// Uses the tipped up-axis; an upright vessel reports the direction its
    /// spout faces instead.
    pub fn pour_direction(&self) -> Vec3 {
        let rotation = self.rotation();
        let lean = (rotation * Vec3::Y).with_y(0.0);
        if lean.length_squared() > LEAN_EPSILON {
            return lean.normalize();
        }
        let spout = (rotation * self.spout_offset.with_y(0.0)).with_y(0.0);
        let spout = spout.normalize_or_zero();
        if spout == Vec3::ZERO {
            Vec3::X
        } else {
            spout
        }
    }

    /// World-space centre of the rim opening.
    pub fn opening_world(&self) -> Vec3 {
        self.local_to_world(Vec3::new(0.0, self.shape.half_height(), 0.0))
    }

    /// True when `world` lies inside the vessel's cavity.
    pub fn cavity_contains_world(&self, world: Vec3) -> bool {
        let local = self.world_to_local(world);
        let radial = (local.x * local.x + local.z * local.z).sqrt();
        cavity_contains(&self.shape, radial, local.y + self.shape.half_height())
    }
}
