// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless adapters for the pour-lab ports.
//!
//! [`HeadlessScene`] tracks retained scene state in maps without any GPU
//! rendering. [`HeadlessHud`] records readouts for a fixed set of element ids.
//! The CLI uses both to run scenarios; tests use them to inspect output.

mod hud;
mod scene;

pub use hud::HeadlessHud;
pub use scene::HeadlessScene;
