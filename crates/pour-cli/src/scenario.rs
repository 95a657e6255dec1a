// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scripted pointer sequences replayed against a headless lab.

use std::f32::consts::FRAC_PI_2;

use anyhow::{ensure, Context, Result};
use clap::ValueEnum;
use glam::{Vec2, Vec3};
use lab_app_core::settings::LabConfig;
use lab_scene_headless::{HeadlessHud, HeadlessScene};
use lab_scene_port::{progress_element, volume_element};
use pour_core::{
    project_to_screen, Container, ContainerId, Euler, LabContext, PointerEvent, Surface, BEAKER, FLASK,
};
use serde::Serialize;
use tracing::{debug, info};

/// Rounds of the fixed-point search that lines the spout up with a target.
const AIM_ITERATIONS: usize = 6;
/// Fraction of the run after which the held vessel is released.
const RELEASE_AT: f32 = 0.7;
/// Sideways wiggle used by the upright script, in pixels.
const WIGGLE_PX: f32 = 30.0;
/// How far ahead of the spout the stream crosses the target rim.
const STREAM_LEAD: f32 = 0.1;

/// Built-in scripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioName {
    /// Grab the beaker and slide it without tilting.
    Upright,
    /// Tip the beaker to 90° in open air.
    Spill,
    /// Carry the beaker over the flask and tip it to 90°.
    Transfer,
}

/// Per-vessel outcome.
#[derive(Debug, Serialize)]
pub struct VesselReport {
    /// Vessel name.
    pub label: String,
    /// Capacity, mL.
    pub capacity: f32,
    /// Volume before the first frame.
    pub start_volume: f32,
    /// Volume after the last frame.
    pub end_volume: f32,
    /// Volume readout on the HUD at the end of the run.
    pub hud_text: Option<String>,
    /// Fill bar percentage on the HUD at the end of the run.
    pub hud_bar: Option<f32>,
}

/// Outcome of one scenario run.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    /// Script that ran.
    pub scenario: ScenarioName,
    /// Simulated duration.
    pub seconds: f32,
    /// Frames per simulated second.
    pub fps: u32,
    /// Frames stepped.
    pub frames: usize,
    /// One entry per vessel, in lab order.
    pub vessels: Vec<VesselReport>,
    /// Volume that left any source.
    pub poured: f32,
    /// Volume that reached a target.
    pub credited: f32,
    /// Volume lost to spillage.
    pub spilled: f32,
    /// Droplet impacts inside a receiving vessel.
    pub target_splashes: usize,
    /// Droplet impacts on the floor.
    pub floor_splashes: usize,
    /// Most droplets alive in any one frame.
    pub peak_droplets: usize,
}

/// Pointer events keyed by the frame before which they fire.
type Script = Vec<(usize, PointerEvent)>;

/// Runs `name` for `seconds` at `fps` against a fresh lab built from `config`.
pub fn run(name: ScenarioName, config: LabConfig, seconds: f32, fps: u32) -> Result<ScenarioReport> {
    ensure!(fps > 0, "fps must be positive");
    let dt = 1.0 / fps as f32;
    let frames = (seconds * fps as f32).round() as usize;

    let mut lab = LabContext::new(config);
    let mut scene = HeadlessScene::new();
    let labels: Vec<String> = lab.containers().iter().map(|c| c.label.clone()).collect();
    let mut hud = HeadlessHud::with_elements(
        labels.iter().map(|l| volume_element(l)),
        labels.iter().map(|l| progress_element(l)),
    );
    lab.install_environment(&mut scene);

    let start: Vec<f32> = lab.containers().iter().map(Container::volume).collect();
    let script = build_script(name, &lab, frames)?;
    info!(scenario = ?name, frames, events = script.len(), "running scenario");

    let mut report = ScenarioReport {
        scenario: name,
        seconds,
        fps,
        frames,
        vessels: Vec::new(),
        poured: 0.0,
        credited: 0.0,
        spilled: 0.0,
        target_splashes: 0,
        floor_splashes: 0,
        peak_droplets: 0,
    };

    let mut pending = script.into_iter().peekable();
    for frame in 0..frames {
        while let Some((_, event)) = pending.next_if(|(at, _)| *at <= frame) {
            debug!(frame, ?event, "pointer");
            lab.pointer(event);
        }
        let step = lab.frame(dt);
        if let Some(pour) = step.pour {
            report.poured += pour.removed;
            report.credited += pour.credited;
        }
        for splash in &step.splashes {
            match splash.surface {
                Surface::Target(_) => report.target_splashes += 1,
                Surface::Floor => report.floor_splashes += 1,
            }
        }
        report.peak_droplets = report.peak_droplets.max(step.droplets);
        lab.publish(&mut scene, &mut hud)
            .with_context(|| format!("publish frame {frame}"))?;
    }
    report.spilled = report.poured - report.credited;

    report.vessels = lab
        .containers()
        .iter()
        .zip(start)
        .map(|(c, start_volume)| VesselReport {
            label: c.label.clone(),
            capacity: c.max_volume(),
            start_volume,
            end_volume: c.volume(),
            hud_text: hud.text(&volume_element(&c.label)).map(str::to_owned),
            hud_bar: hud.bar(&progress_element(&c.label)),
        })
        .collect();
    Ok(report)
}

fn build_script(name: ScenarioName, lab: &LabContext, frames: usize) -> Result<Script> {
    let pivot = lab.grab_point(BEAKER).context("lab has no beaker")?;
    let anchor = project_to_screen(&lab.camera, &lab.viewport, pivot)
        .context("beaker is not in front of the camera")?;
    let release = ((frames as f32 * RELEASE_AT) as usize).max(2);

    let hold = match name {
        ScenarioName::Upright => anchor + Vec2::new(WIGGLE_PX, 0.0),
        ScenarioName::Spill => anchor - Vec2::new(0.0, tilt_stroke(lab)?),
        ScenarioName::Transfer => aim_over(lab, BEAKER, FLASK, anchor)?,
    };
    Ok(vec![
        (0, PointerEvent::Down(anchor)),
        (1, PointerEvent::Move(hold)),
        (release, PointerEvent::Up),
    ])
}

/// Vertical pointer travel, in pixels, that tips a vessel to 90°.
fn tilt_stroke(lab: &LabContext) -> Result<f32> {
    let sensitivity = lab.config().interaction.tilt_sensitivity;
    ensure!(sensitivity > 0.0, "tilt_sensitivity must be positive");
    Ok(FRAC_PI_2 / sensitivity)
}

/// Pointer position that, dragged from `anchor`, leaves `source` tipped to
/// 90° with its spout over the opening of `target`.
///
/// Horizontal travel moves the vessel and also yaws it, which swings the
/// spout; a few fixed-point rounds settle both.
fn aim_over(lab: &LabContext, source: ContainerId, target: ContainerId, anchor: Vec2) -> Result<Vec2> {
    let cfg = &lab.config().interaction;
    let stroke = tilt_stroke(lab)?;
    let tilt = (stroke * cfg.tilt_sensitivity).min(cfg.max_tilt_deg.to_radians());
    let goal = lab
        .container(target)
        .context("target vessel missing")?
        .opening_world();
    let mut ghost = lab.container(source).context("source vessel missing")?.clone();
    let rest = ghost.position;
    let start_yaw = ghost.orientation.y;
    ghost.position.y += cfg.lift_height;

    let mut px = anchor;
    for _ in 0..AIM_ITERATIONS {
        let yaw = start_yaw + (px.x - anchor.x) * cfg.yaw_sensitivity;
        ghost.orientation = Euler::new(0.0, yaw, -tilt);
        let lands = ghost.spout_world() + ghost.pour_direction() * STREAM_LEAD;
        ghost.position.x += goal.x - lands.x;
        px = project_to_screen(
            &lab.camera,
            &lab.viewport,
            Vec3::new(ghost.position.x, rest.y, rest.z),
        )
        .context("aim point is behind the camera")?;
    }
    Ok(Vec2::new(px.x, anchor.y - stroke))
}
