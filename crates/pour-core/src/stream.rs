// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pour stream: a continuous tube plus freefall droplets and splashes.
//!
//! Two states. While active the tube is rebuilt every frame and droplets are
//! spawned at the spout; while idle nothing spawns but droplets already in
//! flight keep falling until they hit something or age out. Integration is
//! explicit Euler with the frame delta and no sub-stepping.

use glam::Vec3;
use lab_app_core::settings::{PhysicsConfig, PourConfig, StreamConfig};
use lab_scene_port::MeshGeometry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::container::{Container, ContainerId};
use crate::lathe::tube;

const PATH_SEGMENTS: usize = 16;
const TUBE_RADIAL_SEGMENTS: u32 = 8;
const TUBE_MIN_RADIUS: f32 = 0.015;
const TUBE_RADIUS_RANGE: f32 = 0.03;
/// Horizontal reach of the untargeted stream before it falls to the floor.
const FREE_FALL_REACH: f32 = 0.3;
const SPOUT_JITTER: f32 = 0.02;
const VELOCITY_JITTER: f32 = 0.08;
const BASE_SPEED: f32 = 0.3;
const SPEED_RANGE: f32 = 0.5;
const INITIAL_DROP: f32 = -0.3;
const SPLASH_SPEED: f32 = 1.2;

/// A droplet in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Droplet {
    /// World position.
    pub position: Vec3,
    /// World velocity.
    pub velocity: Vec3,
    /// Seconds since spawn.
    pub age: f32,
    /// Seconds before the droplet is culled.
    pub max_age: f32,
    /// Set on impact; the droplet is removed in the same step.
    pub has_hit: bool,
    /// Vessel the stream was aimed at when this droplet left the spout.
    pub target: Option<ContainerId>,
}

/// A cosmetic splash particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplashParticle {
    /// World position.
    pub position: Vec3,
    /// World velocity.
    pub velocity: Vec3,
    /// Seconds since spawn.
    pub age: f32,
    /// Seconds the particle lives.
    pub life: f32,
}

/// What a droplet struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    /// The liquid or glass of the receiving vessel.
    Target(ContainerId),
    /// The floor plane.
    Floor,
}

/// One droplet impact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplashEvent {
    /// Where the droplet was when it hit.
    pub position: Vec3,
    /// What it hit.
    pub surface: Surface,
}

/// Source and optional target of an active stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamLink {
    /// Vessel pouring.
    pub source: ContainerId,
    /// Vessel receiving, if any.
    pub target: Option<ContainerId>,
}

/// Droplet stream simulator.
#[derive(Debug)]
pub struct StreamSim {
    physics: PhysicsConfig,
    pour: PourConfig,
    config: StreamConfig,
    rng: StdRng,
    link: Option<StreamLink>,
    droplets: Vec<Droplet>,
    splashes: Vec<SplashParticle>,
    tube: Option<MeshGeometry>,
    tube_cleared: bool,
    events: Vec<SplashEvent>,
}

impl StreamSim {
    /// Creates an idle stream seeded from `config.seed`.
    pub fn new(physics: PhysicsConfig, pour: PourConfig, config: StreamConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            physics: physics.sanitized(),
            pour: pour.sanitized(),
            config: config.sanitized(),
            rng,
            link: None,
            droplets: Vec::new(),
            splashes: Vec::new(),
            tube: None,
            tube_cleared: false,
            events: Vec::new(),
        }
    }

    /// True while a pour feeds the stream.
    pub fn is_active(&self) -> bool {
        self.link.is_some()
    }

    /// Current source/target pair, if active.
    pub fn link(&self) -> Option<StreamLink> {
        self.link
    }

    /// Starts (or retargets) the stream.
    pub fn start(&mut self, source: ContainerId, target: Option<ContainerId>) {
        let link = StreamLink { source, target };
        if self.link != Some(link) {
            debug!(source = source.0, target = ?target.map(|t| t.0), "stream start");
            self.link = Some(link);
        }
    }

    /// Stops spawning and drops the tube. Droplets in flight finish.
    pub fn stop(&mut self) {
        if self.link.take().is_some() {
            debug!(in_flight = self.droplets.len(), "stream stop");
            self.tube = None;
            self.tube_cleared = true;
        }
    }

    /// Forgets everything, including droplets in flight.
    pub fn reset(&mut self) {
        self.stop();
        self.droplets.clear();
        self.splashes.clear();
        self.events.clear();
    }

    /// Live droplets.
    pub fn droplets(&self) -> &[Droplet] {
        &self.droplets
    }

    /// Live splash particles.
    pub fn splash_particles(&self) -> &[SplashParticle] {
        &self.splashes
    }

    /// Impacts recorded during the last [`StreamSim::update`].
    pub fn events(&self) -> &[SplashEvent] {
        &self.events
    }

    /// Current tube mesh, present only while active.
    pub fn tube(&self) -> Option<&MeshGeometry> {
        self.tube.as_ref()
    }

    /// Returns and clears the "tube was removed" flag.
    pub fn take_tube_cleared(&mut self) -> bool {
        std::mem::take(&mut self.tube_cleared)
    }

    /// Advances the stream by `dt` seconds.
    pub fn update(&mut self, dt: f32, containers: &[Container]) {
        self.events.clear();

        let link = self.link;
        let source = link.and_then(|l| containers.iter().find(|c| c.id == l.source));
        let target_id = link.and_then(|l| l.target);
        let target = target_id.and_then(|id| containers.iter().find(|c| c.id == id));

        match source {
            Some(source) => {
                self.tube = Some(self.build_tube(source, target));
                self.spawn_droplets(dt, source, target.map(|t| t.id));
            }
            None => {
                if self.tube.take().is_some() {
                    self.tube_cleared = true;
                }
            }
        }

        self.step_droplets(dt, containers);
        self.step_splashes(dt);
    }

    fn build_tube(&self, source: &Container, target: Option<&Container>) -> MeshGeometry {
        let start = source.spout_world();
        let dir = source.pour_direction();
        let end = match target {
            Some(t) => t.opening_world(),
            None => (start + dir * FREE_FALL_REACH).with_y(self.physics.floor_y),
        };
        let control = start + dir * (end - start).with_y(0.0).length().max(FREE_FALL_REACH) * 0.5;
        let path: Vec<Vec3> = (0..=PATH_SEGMENTS)
            .map(|k| {
                let t = k as f32 / PATH_SEGMENTS as f32;
                let u = 1.0 - t;
                start * (u * u) + control * (2.0 * u * t) + end * (t * t)
            })
            .collect();
        let strength = self.rate_fraction(source);
        tube(
            &path,
            TUBE_MIN_RADIUS + TUBE_RADIUS_RANGE * strength,
            TUBE_RADIAL_SEGMENTS,
        )
    }

    fn rate_fraction(&self, source: &Container) -> f32 {
        if self.pour.max_rate <= 0.0 {
            return 0.0;
        }
        (source.pour_rate(&self.pour) / self.pour.max_rate).clamp(0.0, 1.0)
    }

    fn spawn_droplets(&mut self, dt: f32, source: &Container, target: Option<ContainerId>) {
        let strength = self.rate_fraction(source);
        // One to three droplets per 60 Hz frame, scaled to the actual dt.
        let expected = (1.0 + 2.0 * strength) * dt * 60.0;
        let mut count = expected.floor() as usize;
        if self.rng.gen::<f32>() < expected.fract() {
            count += 1;
        }

        let spout = source.spout_world();
        let dir = source.pour_direction();
        let speed = BASE_SPEED + SPEED_RANGE * strength;
        for _ in 0..count {
            if self.droplets.len() >= self.config.max_droplets {
                break;
            }
            let jitter = Vec3::new(
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            );
            self.droplets.push(Droplet {
                position: spout + jitter * SPOUT_JITTER,
                velocity: dir * speed + Vec3::new(0.0, INITIAL_DROP, 0.0) + jitter * VELOCITY_JITTER,
                age: 0.0,
                max_age: self.config.droplet_max_age,
                has_hit: false,
                target,
            });
        }
    }

    fn step_droplets(&mut self, dt: f32, containers: &[Container]) {
        let gravity = Vec3::new(0.0, self.physics.gravity, 0.0);
        let floor_y = self.physics.floor_y;
        let mut impacts = Vec::new();

        for d in &mut self.droplets {
            d.velocity += gravity * dt;
            d.position += d.velocity * dt;
            d.age += dt;

            // Droplets keep the target they were spawned toward.
            let target = d.target.and_then(|id| containers.iter().find(|c| c.id == id));
            let surface = match target {
                Some(t) if t.cavity_contains_world(d.position) => Some(Surface::Target(t.id)),
                _ if d.position.y <= floor_y => Some(Surface::Floor),
                _ => None,
            };
            if let Some(surface) = surface {
                d.has_hit = true;
                let position = if surface == Surface::Floor {
                    d.position.with_y(floor_y)
                } else {
                    d.position
                };
                impacts.push(SplashEvent { position, surface });
            }
        }

        self.droplets.retain(|d| !d.has_hit && d.age < d.max_age);
        for event in impacts {
            self.spawn_splash(event.position);
            self.events.push(event);
        }
    }

    fn spawn_splash(&mut self, at: Vec3) {
        for _ in 0..self.config.splash_count {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let up = self.rng.gen_range(0.5..1.0);
            let out = self.rng.gen_range(0.2..1.0);
            self.splashes.push(SplashParticle {
                position: at,
                velocity: Vec3::new(angle.cos() * out, up, angle.sin() * out) * SPLASH_SPEED,
                age: 0.0,
                life: self.config.splash_life,
            });
        }
    }

    fn step_splashes(&mut self, dt: f32) {
        let gravity = Vec3::new(0.0, self.physics.gravity, 0.0);
        for s in &mut self.splashes {
            s.velocity += gravity * dt;
            s.position += s.velocity * dt;
            s.age += dt;
        }
        self.splashes.retain(|s| s.age < s.life);
    }
}
