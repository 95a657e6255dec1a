// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vessel shape descriptors.
//!
//! A vessel is described by data ([`ShapeDescriptor`]) tagged with a
//! [`ShapeKind`]. Everything shape-specific (wall radius, fill level, capture
//! radius) is a free function matching on the tag.
//!
//! All heights in this module are base-relative: `y = 0` is the outside of
//! the vessel floor and `y = height` is the rim.

/// Closed set of vessel families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Straight-walled beaker.
    Cylindrical,
    /// Erlenmeyer flask: conical body narrowing into a straight neck.
    Conical,
}

/// Profile-generation parameters for one vessel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeDescriptor {
    /// Family tag.
    pub kind: ShapeKind,
    /// Overall height, base to rim.
    pub height: f32,
    /// Outer radius at the base.
    pub base_radius: f32,
    /// Outer radius of the neck; equals `base_radius` for cylinders.
    pub neck_radius: f32,
    /// Height at which the conical body meets the neck; equals `height` for
    /// cylinders.
    pub body_height: f32,
    /// Glass wall thickness.
    pub wall: f32,
    /// Glass floor thickness.
    pub floor: f32,
    /// Horizontal distance from the axis within which a spout counts as
    /// "over" this vessel.
    pub capture_radius: f32,
    /// Radial segments used when revolving profiles.
    pub segments: u32,
}

/// Fraction of the cylinder height a full beaker fills to.
const CYLINDER_FILL_LINE: f32 = 0.85;
/// Exponent of the stylized cone volume→height curve.
const CONE_FILL_EXPONENT: f32 = 0.6;

impl ShapeDescriptor {
    /// The lab's 250 mL beaker.
    pub const fn beaker() -> Self {
        Self {
            kind: ShapeKind::Cylindrical,
            height: 2.0,
            base_radius: 0.9,
            neck_radius: 0.9,
            body_height: 2.0,
            wall: 0.05,
            floor: 0.06,
            capture_radius: 0.95,
            segments: 32,
        }
    }

    /// The lab's 250 mL Erlenmeyer flask.
    pub const fn flask() -> Self {
        Self {
            kind: ShapeKind::Conical,
            height: 2.4,
            base_radius: 1.1,
            neck_radius: 0.3,
            body_height: 1.6,
            wall: 0.05,
            floor: 0.06,
            capture_radius: 0.55,
            segments: 32,
        }
    }

    /// Half the overall height; vessels pivot about their mid-height.
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    /// Largest outer radius anywhere on the vessel.
    pub fn max_radius(&self) -> f32 {
        self.base_radius.max(self.neck_radius)
    }

    /// Inner radius of the rim opening.
    pub fn opening_radius(&self) -> f32 {
        match self.kind {
            ShapeKind::Cylindrical => self.base_radius - self.wall,
            ShapeKind::Conical => self.neck_radius - self.wall,
        }
    }
}

/// Outer wall radius at base-relative height `y`.
pub fn outer_radius_at(shape: &ShapeDescriptor, y: f32) -> f32 {
    match shape.kind {
        ShapeKind::Cylindrical => shape.base_radius,
        ShapeKind::Conical => {
            if y >= shape.body_height {
                shape.neck_radius
            } else {
                let t = (y / shape.body_height).clamp(0.0, 1.0);
                shape.base_radius + (shape.neck_radius - shape.base_radius) * t
            }
        }
    }
}

/// Inner wall radius at base-relative height `y`.
///
/// Together with the floor and rim this bounds the vessel's cavity: a
/// cylinder for beakers, a frustum topped by a cylinder for flasks.
pub fn inner_radius_at(shape: &ShapeDescriptor, y: f32) -> f32 {
    (outer_radius_at(shape, y) - shape.wall).max(0.0)
}

/// Base-relative height of the liquid surface for a fill fraction in `[0, 1]`.
///
/// Beakers fill linearly. Flasks use `fill^0.6` over the conical body; the
/// true cone relation is cubic, the power curve just reads better on screen.
pub fn liquid_level(shape: &ShapeDescriptor, fill: f32) -> f32 {
    let fill = fill.clamp(0.0, 1.0);
    match shape.kind {
        ShapeKind::Cylindrical => {
            let top = shape.height * CYLINDER_FILL_LINE;
            shape.floor + fill * (top - shape.floor)
        }
        ShapeKind::Conical => {
            shape.floor + fill.powf(CONE_FILL_EXPONENT) * (shape.body_height - shape.floor)
        }
    }
}

/// True when the base-relative point `(radial, y)` lies inside the cavity.
pub fn cavity_contains(shape: &ShapeDescriptor, radial: f32, y: f32) -> bool {
    y >= shape.floor && y <= shape.height && radial <= inner_radius_at(shape, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cylinder_level_is_linear() {
        let s = ShapeDescriptor::beaker();
        let empty = liquid_level(&s, 0.0);
        let half = liquid_level(&s, 0.5);
        let full = liquid_level(&s, 1.0);
        assert_abs_diff_eq!(half - empty, full - half, epsilon = 1e-6);
        assert_abs_diff_eq!(empty, s.floor, epsilon = 1e-6);
    }

    #[test]
    fn cone_level_follows_power_curve() {
        let s = ShapeDescriptor::flask();
        let span = s.body_height - s.floor;
        let half = liquid_level(&s, 0.5) - s.floor;
        assert_abs_diff_eq!(half / span, 0.5_f32.powf(0.6), epsilon = 1e-5);
        assert_abs_diff_eq!(liquid_level(&s, 1.0), s.body_height, epsilon = 1e-6);
    }

    #[test]
    fn level_clamps_fill() {
        let s = ShapeDescriptor::beaker();
        assert_abs_diff_eq!(liquid_level(&s, -3.0), liquid_level(&s, 0.0));
        assert_abs_diff_eq!(liquid_level(&s, 7.0), liquid_level(&s, 1.0));
    }

    #[test]
    fn flask_narrows_to_neck() {
        let s = ShapeDescriptor::flask();
        assert_abs_diff_eq!(outer_radius_at(&s, 0.0), s.base_radius);
        assert_abs_diff_eq!(outer_radius_at(&s, s.body_height), s.neck_radius);
        assert_abs_diff_eq!(outer_radius_at(&s, s.height), s.neck_radius);
        assert!(outer_radius_at(&s, 0.8) < s.base_radius);
        assert!(outer_radius_at(&s, 0.8) > s.neck_radius);
    }

    #[test]
    fn cavity_rejects_points_outside_wall_or_above_rim() {
        let s = ShapeDescriptor::flask();
        assert!(cavity_contains(&s, 0.1, 2.0));
        assert!(!cavity_contains(&s, 0.5, 2.0));
        assert!(cavity_contains(&s, 0.5, 0.3));
        assert!(!cavity_contains(&s, 0.0, s.height + 0.01));
        assert!(!cavity_contains(&s, 0.0, 0.0));
    }
}
