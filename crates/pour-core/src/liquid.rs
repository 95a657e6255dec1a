// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Liquid body geometry.
//!
//! The liquid is a surface of revolution regenerated from scratch whenever a
//! vessel's volume changes. Profiles are base-relative; meshes are centred on
//! the vessel pivot.

use glam::Vec2;
use lab_scene_port::MeshGeometry;

use crate::lathe::lathe;
use crate::shape::{inner_radius_at, liquid_level, ShapeDescriptor};

/// Height the meniscus climbs the wall above the flat surface.
pub const MENISCUS_RISE: f32 = 0.03;
/// Radial fraction at which the curl meets the flat surface.
const MENISCUS_INSET: f32 = 0.92;
/// Wall samples between the floor and the surface.
const WALL_SAMPLES: usize = 8;
/// Liquid sits just inside the glass to avoid z-fighting.
const WALL_CLEARANCE: f32 = 0.005;

/// Builds the `(radius, y)` profile of the liquid for `volume` out of
/// `max_volume`. Returns `None` when the vessel is empty.
pub fn liquid_profile(volume: f32, max_volume: f32, shape: &ShapeDescriptor) -> Option<Vec<Vec2>> {
    if volume <= 0.0 || max_volume <= 0.0 {
        return None;
    }
    let fill = (volume / max_volume).clamp(0.0, 1.0);
    let base = shape.floor;
    let level = liquid_level(shape, fill);
    let wall_r = |y: f32| (inner_radius_at(shape, y) - WALL_CLEARANCE).max(0.0);

    let mut profile = Vec::with_capacity(WALL_SAMPLES + 4);
    profile.push(Vec2::new(0.0, base));
    for k in 0..WALL_SAMPLES {
        let y = base + (level - base) * k as f32 / WALL_SAMPLES as f32;
        profile.push(Vec2::new(wall_r(y), y));
    }
    let rim_r = wall_r(level + MENISCUS_RISE);
    profile.push(Vec2::new(rim_r, level + MENISCUS_RISE));
    profile.push(Vec2::new(rim_r * MENISCUS_INSET, level));
    profile.push(Vec2::new(0.0, level));
    Some(profile)
}

/// Revolves [`liquid_profile`] into a mesh centred on the vessel pivot.
pub fn liquid_mesh(volume: f32, max_volume: f32, shape: &ShapeDescriptor) -> Option<MeshGeometry> {
    liquid_profile(volume, max_volume, shape)
        .map(|profile| lathe(&profile, shape.segments, -shape.half_height()))
}
