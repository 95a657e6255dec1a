// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene port trait defining the renderer contract.

use crate::{ApplyError, CameraState, EnvironmentDef, SceneDelta, Viewport};

/// Scene rendering port trait.
///
/// Implementors receive deltas and render. No time ownership.
///
/// # Design
///
/// This trait defines a hexagonal port for rendering. The lab emits
/// [`SceneDelta`]s; adapters (headless, wgpu, a browser scene graph)
/// implement this trait to draw them.
///
/// # Epoch Semantics
///
/// If an adapter receives a delta with an epoch it has already applied, it
/// skips it and returns `Ok(())`.
pub trait ScenePort {
    /// Apply a scene delta. Idempotent per epoch.
    fn apply_scene_delta(&mut self, delta: &SceneDelta) -> Result<(), ApplyError>;

    /// Set camera state.
    fn set_camera(&mut self, camera: &CameraState);

    /// Install an environment map used for glass reflections.
    ///
    /// Optional for adapters; callers treat failure as non-fatal.
    fn set_environment(&mut self, env: &EnvironmentDef) -> Result<(), ApplyError>;

    /// Render the current scene.
    fn render(&mut self);

    /// Resize viewport.
    fn resize(&mut self, viewport: Viewport);

    /// Dispose all resources.
    fn dispose(&mut self);
}
