// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Procedural mesh builders: surfaces of revolution and tubes along a path.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use lab_scene_port::MeshGeometry;

/// Revolves a profile of `(radius, y)` points around the Y axis.
///
/// `y_offset` is added to every vertex height so base-relative profiles can
/// be centred on the vessel pivot. Segments wrap, so the seam shares
/// vertices.
pub fn lathe(profile: &[Vec2], segments: u32, y_offset: f32) -> MeshGeometry {
    let segments = segments.max(3);
    let rows = profile.len();
    if rows < 2 {
        return MeshGeometry::default();
    }

    let mut positions = Vec::with_capacity(segments as usize * rows);
    for i in 0..segments {
        let phi = TAU * i as f32 / segments as f32;
        let (sin, cos) = phi.sin_cos();
        for p in profile {
            positions.push([p.x * cos, p.y + y_offset, p.x * sin]);
        }
    }

    let rows = rows as u32;
    let mut indices = Vec::with_capacity((segments * (rows - 1) * 6) as usize);
    for i in 0..segments {
        let next = (i + 1) % segments;
        for j in 0..rows - 1 {
            let a = i * rows + j;
            let b = next * rows + j;
            let c = next * rows + j + 1;
            let d = i * rows + j + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshGeometry { positions, indices }
}

/// Sweeps a circle of `radius` along `path`, producing an open tube.
pub fn tube(path: &[Vec3], radius: f32, radial_segments: u32) -> MeshGeometry {
    let radial = radial_segments.max(3);
    if path.len() < 2 {
        return MeshGeometry::default();
    }

    let mut positions = Vec::with_capacity(path.len() * radial as usize);
    for (k, p) in path.iter().enumerate() {
        let step = if k + 1 < path.len() {
            path[k + 1] - *p
        } else {
            *p - path[k - 1]
        };
        let tangent = step.normalize_or_zero();
        let reference = if tangent.y.abs() < 0.99 { Vec3::Y } else { Vec3::X };
        let normal = tangent.cross(reference).normalize_or_zero();
        let binormal = tangent.cross(normal);
        for s in 0..radial {
            let phi = TAU * s as f32 / radial as f32;
            let (sin, cos) = phi.sin_cos();
            let v = *p + (normal * cos + binormal * sin) * radius;
            positions.push(v.to_array());
        }
    }

    let rings = path.len() as u32;
    let mut indices = Vec::with_capacity(((rings - 1) * radial * 6) as usize);
    for k in 0..rings - 1 {
        for s in 0..radial {
            let next = (s + 1) % radial;
            let a = k * radial + s;
            let b = k * radial + next;
            let c = (k + 1) * radial + next;
            let d = (k + 1) * radial + s;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshGeometry { positions, indices }
}
