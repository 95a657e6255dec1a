// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Pour lab simulation core.

This crate provides:
- Vessel shapes as data (`ShapeDescriptor`) with free functions per shape kind.
- Vessel state and tilt-derived pour physics (`Container`).
- Lathe-built glass, liquid, and stream geometry.
- Pointer picking, drag/tilt mapping, and the return-to-upright animation.
- The droplet stream and the per-frame pour transfer.
- `LabContext`, which owns all of the above and publishes through the
  scene and HUD ports.

Design notes:
- Single-threaded and frame-driven; nothing blocks.
- Numeric edge cases clamp instead of erroring.
- Randomness is seeded from config so runs replay exactly.
"]

/// Vessel state and pour physics.
pub mod container;
/// Lab context and frame driver.
pub mod context;
/// Glass geometry.
pub mod glass;
/// Pointer interaction.
pub mod interaction;
/// Surface-of-revolution and tube mesh builders.
pub mod lathe;
/// Liquid body geometry.
pub mod liquid;
/// Rays and hit tests.
pub mod picking;
/// Volume transfer.
pub mod pour;
/// Vessel shape descriptors.
pub mod shape;
/// Droplet stream.
pub mod stream;

pub use container::{Container, ContainerId, Euler};
pub use context::{FrameReport, LabContext, BEAKER, FLASK};
pub use interaction::{InteractionManager, InteractionPhase, PointerEvent};
pub use picking::{pointer_ray, project_to_screen, Ray};
pub use pour::{PourManager, PourReport};
pub use shape::{ShapeDescriptor, ShapeKind};
pub use stream::{Droplet, SplashEvent, StreamSim, Surface};
