// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Camera and viewport state shared by the lab and its renderers.

use core::f32::consts::FRAC_PI_4;

/// Camera state for rendering and picking.
///
/// The lab owns the camera; renderers mirror it. Picking uses the same values
/// so pointer rays line up with what is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Camera position in world space.
    pub position: [f32; 3],
    /// Look-at target in world space.
    pub target: [f32; 3],
    /// Up vector.
    pub up: [f32; 3],
    /// Vertical field of view in radians.
    pub fov_y_radians: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: [0.0, 4.0, 9.0],
            target: [0.0, 1.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov_y_radians: FRAC_PI_4, // 45 degrees
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Drawing surface dimensions in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Device pixel ratio.
    pub dpr: f32,
}

impl Viewport {
    /// Width over height, never below 0.1.
    pub fn aspect(&self) -> f32 {
        (self.width.max(1) as f32 / self.height.max(1) as f32).max(0.1)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            dpr: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_survives_zero_height() {
        let vp = Viewport {
            width: 800,
            height: 0,
            dpr: 1.0,
        };
        assert!(vp.aspect().is_finite());
        assert!((vp.aspect() - 800.0).abs() < f32::EPSILON);
    }
}
