// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for the pour lab (config storage, tunables).
//! Keeps the simulation and its front-ends free of storage concerns.

pub mod config;
pub mod config_port;
pub mod settings;
