// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pointer-driven drag/tilt state machine with an eased return to upright.
//!
//! States: idle → dragging (pointer down on a vessel) → returning (pointer
//! up) → idle (animation done). A new grab on a returning vessel cancels its
//! animation on the spot.

use std::collections::BTreeMap;

use glam::Vec2;
use lab_app_core::settings::InteractionConfig;
use lab_scene_port::{CameraState, Viewport};
use tracing::debug;

use crate::container::{Container, ContainerId, Euler};
use crate::picking::{hit_container, pointer_ray, ray_plane_y};

/// Pointer input in pixels (origin top-left, y down).
///
/// Mouse buttons and single-finger touches map onto the same three events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Mouse-down or touch-start.
    Down(Vec2),
    /// Mouse-move or touch-move.
    Move(Vec2),
    /// Mouse-up or touch-end.
    Up,
}

/// Cubic ease-out: fast start, gentle stop. `t` is clamped to `[0, 1]`.
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// An in-flight return-to-upright animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReturnAnimation {
    /// Rotation at release.
    pub start_rotation: Euler,
    /// Upright rotation (yaw kept).
    pub target_rotation: Euler,
    /// Pivot height at release.
    pub start_height: f32,
    /// Resting pivot height.
    pub target_height: f32,
    /// Linear progress in `[0, 1]`.
    pub progress: f32,
    /// Seconds from release to upright.
    pub duration: f32,
}

#[derive(Clone, Copy, Debug)]
struct DragState {
    id: ContainerId,
    anchor: Vec2,
    start_tilt: f32,
    start_yaw: f32,
    grab_offset_x: f32,
    rest_height: f32,
}

/// Coarse interaction state, for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionPhase {
    /// Nothing held, nothing animating.
    Idle,
    /// A vessel is held.
    Dragging,
    /// At least one vessel is easing back upright.
    Returning,
}

/// Maps pointer input onto vessel poses.
#[derive(Debug, Clone)]
pub struct InteractionManager {
    config: InteractionConfig,
    drag: Option<DragState>,
    returns: BTreeMap<ContainerId, ReturnAnimation>,
}

impl InteractionManager {
    /// Creates an idle manager. Held vessels are raised by
    /// `config.lift_height` so their spout can clear a neighbour's rim.
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config: config.sanitized(),
            drag: None,
            returns: BTreeMap::new(),
        }
    }

    /// Vessel currently held, if any.
    pub fn dragged(&self) -> Option<ContainerId> {
        self.drag.map(|d| d.id)
    }

    /// Return animation for `id`, if one is running.
    pub fn return_animation(&self, id: ContainerId) -> Option<&ReturnAnimation> {
        self.returns.get(&id)
    }

    /// Current phase.
    pub fn phase(&self) -> InteractionPhase {
        if self.drag.is_some() {
            InteractionPhase::Dragging
        } else if self.returns.is_empty() {
            InteractionPhase::Idle
        } else {
            InteractionPhase::Returning
        }
    }

    /// Drops any grab and animation without touching vessel poses.
    pub fn cancel_all(&mut self) {
        self.drag = None;
        self.returns.clear();
    }

    /// Routes one pointer event. Returns the vessel grabbed by a `Down`.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        containers: &mut [Container],
        camera: &CameraState,
        viewport: &Viewport,
    ) -> Option<ContainerId> {
        match event {
            PointerEvent::Down(px) => self.pointer_down(px, containers, camera, viewport),
            PointerEvent::Move(px) => {
                self.pointer_move(px, containers, camera, viewport);
                None
            }
            PointerEvent::Up => {
                self.pointer_up(containers);
                None
            }
        }
    }

    fn pointer_down(
        &mut self,
        px: Vec2,
        containers: &mut [Container],
        camera: &CameraState,
        viewport: &Viewport,
    ) -> Option<ContainerId> {
        if self.drag.is_some() {
            return None;
        }
        let ray = pointer_ray(camera, viewport, px);
        let (idx, _) = containers
            .iter()
            .enumerate()
            .filter_map(|(i, c)| hit_container(&ray, c).map(|t| (i, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        let container = &mut containers[idx];

        let rest_height = match self.returns.remove(&container.id) {
            Some(anim) => anim.target_height,
            None => container.position.y,
        };
        let grab_offset_x = ray_plane_y(&ray, rest_height)
            .map_or(0.0, |hit| container.position.x - hit.x);

        self.drag = Some(DragState {
            id: container.id,
            anchor: px,
            start_tilt: (-container.orientation.z).max(0.0),
            start_yaw: container.orientation.y,
            grab_offset_x,
            rest_height,
        });
        container.position.y = rest_height + self.config.lift_height;
        debug!(id = container.id.0, label = %container.label, "drag start");
        Some(container.id)
    }

    fn pointer_move(
        &mut self,
        px: Vec2,
        containers: &mut [Container],
        camera: &CameraState,
        viewport: &Viewport,
    ) {
        let Some(drag) = self.drag else {
            return;
        };
        let Some(container) = containers.iter_mut().find(|c| c.id == drag.id) else {
            return;
        };

        // Translation follows the pointer column along the grab row, so
        // vertical motion only tilts.
        let ray = pointer_ray(camera, viewport, Vec2::new(px.x, drag.anchor.y));
        if let Some(hit) = ray_plane_y(&ray, drag.rest_height) {
            let half_w = self.config.table_half_width;
            container.position.x = (hit.x + drag.grab_offset_x).clamp(-half_w, half_w);
        }
        let half_d = self.config.table_half_depth;
        container.position.z = container.position.z.clamp(-half_d, half_d);

        let delta = px - drag.anchor;
        let max_tilt = self.config.max_tilt_deg.to_radians();
        let tilt = (drag.start_tilt - delta.y * self.config.tilt_sensitivity).clamp(0.0, max_tilt);
        let yaw = drag.start_yaw + delta.x * self.config.yaw_sensitivity;
        container.orientation = Euler::new(0.0, yaw, -tilt);
    }

    fn pointer_up(&mut self, containers: &mut [Container]) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let Some(container) = containers.iter().find(|c| c.id == drag.id) else {
            return;
        };
        debug!(id = drag.id.0, tilt = container.tilt_angle(), "drag release");
        self.begin_return(container, drag.rest_height);
    }

    /// Starts easing `container` back upright, keeping its yaw and settling
    /// its pivot at `rest_height`. Replaces any animation already running.
    pub fn begin_return(&mut self, container: &Container, rest_height: f32) {
        self.returns.insert(
            container.id,
            ReturnAnimation {
                start_rotation: container.orientation,
                target_rotation: Euler::upright(container.orientation.y),
                start_height: container.position.y,
                target_height: rest_height,
                progress: 0.0,
                duration: self.config.return_duration,
            },
        );
    }

    /// Advances return animations by `dt` seconds. Finished animations snap
    /// the vessel exactly onto the target pose and are dropped.
    pub fn update(&mut self, dt: f32, containers: &mut [Container]) {
        self.returns.retain(|id, anim| {
            let Some(container) = containers.iter_mut().find(|c| c.id == *id) else {
                return false;
            };
            anim.progress = if anim.duration > 0.0 {
                (anim.progress + dt / anim.duration).min(1.0)
            } else {
                1.0
            };
            if anim.progress >= 1.0 {
                container.orientation = anim.target_rotation;
                container.position.y = anim.target_height;
                return false;
            }
            let t = ease_out_cubic(anim.progress);
            container.orientation = anim.start_rotation.lerp(anim.target_rotation, t);
            container.position.y = anim.start_height + (anim.target_height - anim.start_height) * t;
            true
        });
    }
}
