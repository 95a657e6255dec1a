// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Glass vessel geometry, built once per vessel.

use glam::Vec2;
use lab_scene_port::MeshGeometry;

use crate::lathe::lathe;
use crate::shape::{inner_radius_at, outer_radius_at, ShapeDescriptor, ShapeKind};

const BODY_SAMPLES: usize = 6;

/// Closed `(radius, y)` profile of the glass: up the outside, over the rim,
/// down the inside to the floor.
pub fn glass_profile(shape: &ShapeDescriptor) -> Vec<Vec2> {
    let mut heights = vec![0.0];
    match shape.kind {
        ShapeKind::Cylindrical => {}
        ShapeKind::Conical => {
            for k in 1..=BODY_SAMPLES {
                heights.push(shape.body_height * k as f32 / BODY_SAMPLES as f32);
            }
        }
    }
    heights.push(shape.height);

    let mut profile = Vec::with_capacity(heights.len() * 2 + 2);
    profile.push(Vec2::new(0.0, 0.0));
    for &y in &heights {
        profile.push(Vec2::new(outer_radius_at(shape, y), y));
    }
    for &y in heights.iter().rev() {
        let y = y.max(shape.floor);
        profile.push(Vec2::new(inner_radius_at(shape, y), y));
    }
    profile.push(Vec2::new(0.0, shape.floor));
    profile
}

/// Revolves [`glass_profile`] into a mesh centred on the vessel pivot.
pub fn glass_mesh(shape: &ShapeDescriptor) -> MeshGeometry {
    lathe(&glass_profile(shape), shape.segments, -shape.half_height())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_reaches_rim_and_floor() {
        for shape in [ShapeDescriptor::beaker(), ShapeDescriptor::flask()] {
            let profile = glass_profile(&shape);
            let top = profile.iter().map(|p| p.y).fold(f32::MIN, f32::max);
            assert!((top - shape.height).abs() < 1e-6);
            assert_eq!(profile.last().copied(), Some(Vec2::new(0.0, shape.floor)));
        }
    }

    #[test]
    fn mesh_is_valid() {
        let mesh = glass_mesh(&ShapeDescriptor::flask());
        assert!(mesh.validate().is_ok());
        assert!(mesh.triangle_count() > 0);
    }
}
