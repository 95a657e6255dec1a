// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene and HUD port contracts for pour-lab renderers.
//!
//! This crate defines the contract between the lab simulation and whatever
//! draws it. It owns no simulation state and no GPU resources.
//!
//! # Design Principles
//!
//! - **Renderers are dumb.** They receive deltas and render. No domain logic.
//! - **No time ownership.** Frame timing comes from the app, not the renderer.
//! - **Frame-scoped epochs.** A delta is applied at most once per epoch.

use thiserror::Error;

/// Error type for scene delta application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// An invariant was violated (e.g., too many ops, degenerate mesh).
    #[error("invariant violation: {0}")]
    Invariant(String),
    /// A backend-specific error occurred.
    #[error("backend error: {0}")]
    Backend(String),
}

mod camera;
mod hud;
mod port;
mod types;

pub use camera::{CameraState, Viewport};
pub use hud::{progress_element, volume_element, HudPort};
pub use port::ScenePort;
pub use types::{
    ColorRgba8, EnvironmentDef, MaterialDef, MeshDef, MeshGeometry, MeshKey, PointsDef, Pose,
    SceneDelta, SceneOp, MAX_OPS,
};
