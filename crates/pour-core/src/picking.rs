// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Screen-space picking: pointer rays, projection, and ray hit tests.

use glam::{Vec2, Vec3};
use lab_scene_port::{CameraState, Viewport};

use crate::container::Container;

const PARALLEL_EPSILON: f32 = 1e-6;
/// Interaction cylinders are a little fatter than the glass.
const GRAB_RADIUS_SCALE: f32 = 1.15;
const GRAB_HEIGHT_SCALE: f32 = 1.05;

/// Half-line with a unit direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub dir: Vec3,
}

impl Ray {
    /// Point at parameter `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

fn basis(camera: &CameraState) -> (Vec3, Vec3, Vec3) {
    let pos = Vec3::from_array(camera.position);
    let forward = (Vec3::from_array(camera.target) - pos).normalize_or_zero();
    let right = forward.cross(Vec3::from_array(camera.up)).normalize_or_zero();
    let up = right.cross(forward);
    (forward, right, up)
}

/// Ray through pixel `px` (origin top-left, y down).
pub fn pointer_ray(camera: &CameraState, viewport: &Viewport, px: Vec2) -> Ray {
    let ndc = Vec2::new(
        2.0 * px.x / viewport.width.max(1) as f32 - 1.0,
        1.0 - 2.0 * px.y / viewport.height.max(1) as f32,
    );
    let (f, r, u) = basis(camera);
    let t = (camera.fov_y_radians * 0.5).tan();
    Ray {
        origin: Vec3::from_array(camera.position),
        dir: (f + r * (ndc.x * t * viewport.aspect()) + u * (ndc.y * t)).normalize(),
    }
}

/// Pixel at which `world` appears, or `None` when it is behind the camera.
pub fn project_to_screen(camera: &CameraState, viewport: &Viewport, world: Vec3) -> Option<Vec2> {
    let (f, r, u) = basis(camera);
    let v = world - Vec3::from_array(camera.position);
    let depth = v.dot(f);
    if depth <= PARALLEL_EPSILON {
        return None;
    }
    let t = (camera.fov_y_radians * 0.5).tan();
    let ndc_x = v.dot(r) / (depth * t * viewport.aspect());
    let ndc_y = v.dot(u) / (depth * t);
    Some(Vec2::new(
        (ndc_x + 1.0) * 0.5 * viewport.width as f32,
        (1.0 - ndc_y) * 0.5 * viewport.height as f32,
    ))
}

/// Intersection with the horizontal plane at height `y`.
pub fn ray_plane_y(ray: &Ray, y: f32) -> Option<Vec3> {
    if ray.dir.y.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = (y - ray.origin.y) / ray.dir.y;
    (t >= 0.0).then(|| ray.at(t))
}

/// Nearest non-negative hit on a capped cylinder around local Y, centred on
/// the origin.
fn ray_capped_cylinder(origin: Vec3, dir: Vec3, radius: f32, half_height: f32) -> Option<f32> {
    let mut best: Option<f32> = None;
    let mut consider = |t: f32| {
        if t >= 0.0 && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    };

    let a = dir.x * dir.x + dir.z * dir.z;
    if a > PARALLEL_EPSILON {
        let b = 2.0 * (origin.x * dir.x + origin.z * dir.z);
        let c = origin.x * origin.x + origin.z * origin.z - radius * radius;
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            for t in [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)] {
                let y = origin.y + dir.y * t;
                if y.abs() <= half_height {
                    consider(t);
                }
            }
        }
    }

    if dir.y.abs() > PARALLEL_EPSILON {
        for cap in [-half_height, half_height] {
            let t = (cap - origin.y) / dir.y;
            let p = origin + dir * t;
            if p.x * p.x + p.z * p.z <= radius * radius {
                consider(t);
            }
        }
    }
    best
}

/// Distance along `ray` to the vessel's invisible grab volume, if hit.
///
/// The grab volume rotates with the vessel, so the ray is taken into the
/// vessel's local frame first.
pub fn hit_container(ray: &Ray, container: &Container) -> Option<f32> {
    let inv = container.rotation().inverse();
    let origin = inv * (ray.origin - container.position);
    let dir = inv * ray.dir;
    ray_capped_cylinder(
        origin,
        dir,
        container.shape.max_radius() * GRAB_RADIUS_SCALE,
        container.shape.half_height() * GRAB_HEIGHT_SCALE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerId;
    use crate::shape::ShapeDescriptor;
    use approx::assert_abs_diff_eq;

    fn beaker_at(x: f32) -> Container {
        Container::new(
            ContainerId(0),
            "beaker",
            ShapeDescriptor::beaker(),
            250.0,
            100.0,
            [0, 0, 255, 255],
        )
        .placed(x, 0.0, 0.0)
    }

    #[test]
    fn centre_pixel_looks_at_target() {
        let cam = CameraState::default();
        let vp = Viewport::default();
        let ray = pointer_ray(&cam, &vp, Vec2::new(640.0, 360.0));
        let expected = (Vec3::from_array(cam.target) - Vec3::from_array(cam.position)).normalize();
        assert_abs_diff_eq!(ray.dir.dot(expected), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn projection_inverts_pointer_ray() {
        let cam = CameraState::default();
        let vp = Viewport::default();
        let world = Vec3::new(-1.5, 1.0, 0.3);
        let px = project_to_screen(&cam, &vp, world).unwrap();
        let ray = pointer_ray(&cam, &vp, px);
        let to_point = (world - ray.origin).normalize();
        assert_abs_diff_eq!(ray.dir.dot(to_point), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn behind_camera_does_not_project() {
        let cam = CameraState::default();
        assert!(project_to_screen(&cam, &Viewport::default(), Vec3::new(0.0, 4.0, 20.0)).is_none());
    }

    #[test]
    fn ray_hits_container_it_points_at() {
        let c = beaker_at(1.0);
        let ray = Ray {
            origin: Vec3::new(1.0, 1.0, 10.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        let t = hit_container(&ray, &c).unwrap();
        let r = c.shape.max_radius() * GRAB_RADIUS_SCALE;
        assert_abs_diff_eq!(t, 10.0 - r, epsilon = 1e-4);
    }

    #[test]
    fn ray_misses_to_the_side() {
        let c = beaker_at(1.0);
        let ray = Ray {
            origin: Vec3::new(4.0, 1.0, 10.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        assert!(hit_container(&ray, &c).is_none());
    }

    #[test]
    fn vertical_ray_hits_cap() {
        let c = beaker_at(0.0);
        let ray = Ray {
            origin: Vec3::new(0.2, 10.0, 0.0),
            dir: Vec3::new(0.0, -1.0, 0.0),
        };
        let t = hit_container(&ray, &c).unwrap();
        let top = c.position.y + c.shape.half_height() * GRAB_HEIGHT_SCALE;
        assert_abs_diff_eq!(t, 10.0 - top, epsilon = 1e-4);
    }

    #[test]
    fn plane_hit_and_parallel_miss() {
        let ray = Ray {
            origin: Vec3::new(0.0, 5.0, 0.0),
            dir: Vec3::new(0.0, -1.0, 0.0),
        };
        assert_eq!(ray_plane_y(&ray, 1.0), Some(Vec3::new(0.0, 1.0, 0.0)));
        let flat = Ray {
            origin: Vec3::ZERO,
            dir: Vec3::X,
        };
        assert!(ray_plane_y(&flat, 1.0).is_none());
    }
}
