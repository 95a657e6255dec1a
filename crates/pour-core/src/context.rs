// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The lab: every piece of simulation state plus the per-frame driver.
//!
//! A [`LabContext`] owns the vessels, the interaction and pour managers, the
//! stream, and the camera. Input arrives through [`LabContext::pointer`],
//! time through [`LabContext::frame`], and output leaves through
//! [`LabContext::publish`] as a scene delta and HUD writes.

use glam::Vec3;
use lab_app_core::settings::LabConfig;
use lab_scene_port::{
    progress_element, volume_element, ApplyError, CameraState, ColorRgba8, EnvironmentDef, HudPort,
    MaterialDef, MeshDef, MeshKey, PointsDef, Pose, SceneDelta, SceneOp, ScenePort, Viewport,
};
use tracing::{debug, warn};

use crate::container::{Container, ContainerId};
use crate::glass::glass_mesh;
use crate::interaction::{InteractionManager, PointerEvent};
use crate::liquid::liquid_mesh;
use crate::pour::{PourManager, PourReport};
use crate::shape::ShapeDescriptor;
use crate::stream::{SplashEvent, StreamSim};

/// Id of the beaker in a default lab.
pub const BEAKER: ContainerId = ContainerId(0);
/// Id of the flask in a default lab.
pub const FLASK: ContainerId = ContainerId(1);

const TABLE_Y: f32 = 0.0;
const BEAKER_REST: (f32, f32) = (-1.5, 0.0);
const FLASK_REST: (f32, f32) = (1.5, 0.0);
const BEAKER_START_VOLUME: f32 = 200.0;
const FLASK_START_VOLUME: f32 = 50.0;
const VESSEL_CAPACITY: f32 = 250.0;

const GLASS_COLOR: ColorRgba8 = [220, 235, 245, 255];
const GLASS_OPACITY: f32 = 0.25;
const LIQUID_OPACITY: f32 = 0.85;
const BEAKER_LIQUID: ColorRgba8 = [60, 140, 255, 255];
const FLASK_LIQUID: ColorRgba8 = [90, 220, 140, 255];
const STREAM_COLOR: ColorRgba8 = [60, 140, 255, 255];
const DROPLET_SIZE: f32 = 0.04;
const SPLASH_SIZE: f32 = 0.025;

const TUBE_NAME: &str = "stream/tube";
const DROPLETS_NAME: &str = "stream/droplets";
const SPLASHES_NAME: &str = "stream/splashes";

fn glass_key(label: &str) -> MeshKey {
    MeshKey::named(&format!("{label}/glass"))
}

fn liquid_key(label: &str) -> MeshKey {
    MeshKey::named(&format!("{label}/liquid"))
}

/// What happened during one [`LabContext::frame`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Delta actually simulated after clamping.
    pub dt: f32,
    /// Transfer performed this frame, if any.
    pub pour: Option<PourReport>,
    /// Droplet impacts this frame.
    pub splashes: Vec<SplashEvent>,
    /// Droplets alive after the frame.
    pub droplets: usize,
}

/// Application state for one lab.
#[derive(Debug)]
pub struct LabContext {
    config: LabConfig,
    containers: Vec<Container>,
    interaction: InteractionManager,
    pour: PourManager,
    stream: StreamSim,
    /// Camera used for picking and handed to the renderer.
    pub camera: CameraState,
    /// Surface size used for picking.
    pub viewport: Viewport,
    /// Environment map requested by [`LabContext::install_environment`].
    pub environment: EnvironmentDef,
    epoch: u64,
    needs_rebuild: bool,
}

impl LabContext {
    /// Builds a lab with the default beaker and flask. Out-of-range
    /// config values are repaired first (see [`LabConfig::sanitized`]).
    pub fn new(config: LabConfig) -> Self {
        let config = config.sanitized();
        let interaction = InteractionManager::new(config.interaction.clone());
        let pour = PourManager::new(config.pour.clone());
        let stream = StreamSim::new(
            config.physics.clone(),
            config.pour.clone(),
            config.stream.clone(),
        );
        Self {
            containers: default_vessels(),
            interaction,
            pour,
            stream,
            camera: CameraState::default(),
            viewport: Viewport::default(),
            environment: EnvironmentDef::default(),
            epoch: 0,
            needs_rebuild: true,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    /// All vessels.
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// Mutable access to the vessels, for scripted setups.
    pub fn containers_mut(&mut self) -> &mut [Container] {
        &mut self.containers
    }

    /// Vessel by id.
    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    /// Pointer state machine.
    pub fn interaction(&self) -> &InteractionManager {
        &self.interaction
    }

    /// Droplet stream.
    pub fn stream(&self) -> &StreamSim {
        &self.stream
    }

    /// Sum of all vessel volumes.
    pub fn total_volume(&self) -> f32 {
        self.containers.iter().map(Container::volume).sum()
    }

    /// Puts both vessels back at their rest positions and starting volumes,
    /// drops any grab or return animation, and silences the stream.
    pub fn reset(&mut self) {
        debug!("lab reset");
        self.interaction.cancel_all();
        self.stream.reset();
        self.containers = default_vessels();
        self.needs_rebuild = true;
    }

    /// Routes one pointer or touch event. Returns the vessel grabbed by a
    /// `Down`, if any.
    pub fn pointer(&mut self, event: PointerEvent) -> Option<ContainerId> {
        self.interaction
            .handle(event, &mut self.containers, &self.camera, &self.viewport)
    }

    /// Advances the simulation by `dt` seconds, clamped to
    /// `[0, physics.max_frame_dt]`.
    pub fn frame(&mut self, dt: f32) -> FrameReport {
        let dt = if dt.is_finite() {
            dt.min(self.config.physics.max_frame_dt).max(0.0)
        } else {
            0.0
        };
        self.interaction.update(dt, &mut self.containers);
        let pour = self.pour.step(
            dt,
            &mut self.containers,
            self.interaction.dragged(),
            &mut self.stream,
        );
        self.stream.update(dt, &self.containers);
        FrameReport {
            dt,
            pour,
            splashes: self.stream.events().to_vec(),
            droplets: self.stream.droplets().len(),
        }
    }

    /// Installs the environment map. Failure is logged and otherwise ignored.
    pub fn install_environment(&self, scene: &mut dyn ScenePort) {
        if let Err(err) = scene.set_environment(&self.environment) {
            warn!(%err, "environment map unavailable; continuing without it");
        }
    }

    /// Pushes the current state to the renderer and HUD.
    ///
    /// The first call after construction or [`LabContext::reset`] clears the
    /// scene and uploads the glass meshes; later calls send poses, rebuilt
    /// liquid bodies, the stream tube, and particle clouds.
    pub fn publish(
        &mut self,
        scene: &mut dyn ScenePort,
        hud: &mut dyn HudPort,
    ) -> Result<(), ApplyError> {
        self.epoch += 1;
        let mut delta = SceneDelta::new(self.epoch);

        let rebuild = std::mem::take(&mut self.needs_rebuild);
        if rebuild {
            delta.push(SceneOp::Clear);
        }

        for c in &mut self.containers {
            let pose = c.pose();
            if rebuild {
                delta.push(SceneOp::UpsertMesh(MeshDef {
                    key: glass_key(&c.label),
                    geometry: glass_mesh(&c.shape),
                    material: MaterialDef {
                        color: GLASS_COLOR,
                        opacity: GLASS_OPACITY,
                    },
                    pose,
                }));
            } else {
                delta.push(SceneOp::SetPose {
                    key: glass_key(&c.label),
                    pose,
                });
            }

            let dirty = c.take_liquid_dirty() || rebuild;
            if dirty {
                match liquid_mesh(c.volume(), c.max_volume(), &c.shape) {
                    Some(geometry) => delta.push(SceneOp::UpsertMesh(MeshDef {
                        key: liquid_key(&c.label),
                        geometry,
                        material: MaterialDef {
                            color: c.liquid_color,
                            opacity: LIQUID_OPACITY,
                        },
                        pose,
                    })),
                    None => delta.push(SceneOp::RemoveMesh {
                        key: liquid_key(&c.label),
                    }),
                }
            } else if c.volume() > 0.0 {
                delta.push(SceneOp::SetPose {
                    key: liquid_key(&c.label),
                    pose,
                });
            }

            hud.set_text(&volume_element(&c.label), &format!("{:.0} mL", c.volume()));
            hud.set_bar(&progress_element(&c.label), 100.0 * c.fill_fraction());
        }

        let tube_cleared = self.stream.take_tube_cleared();
        match self.stream.tube() {
            Some(tube) => delta.push(SceneOp::UpsertMesh(MeshDef {
                key: MeshKey::named(TUBE_NAME),
                geometry: tube.clone(),
                material: MaterialDef {
                    color: STREAM_COLOR,
                    opacity: LIQUID_OPACITY,
                },
                pose: Pose::IDENTITY,
            })),
            None if tube_cleared => delta.push(SceneOp::RemoveMesh {
                key: MeshKey::named(TUBE_NAME),
            }),
            None => {}
        }

        delta.push(SceneOp::UpsertPoints(PointsDef {
            key: MeshKey::named(DROPLETS_NAME),
            positions: self
                .stream
                .droplets()
                .iter()
                .map(|d| d.position.to_array())
                .collect(),
            size: DROPLET_SIZE,
            color: STREAM_COLOR,
        }));
        delta.push(SceneOp::UpsertPoints(PointsDef {
            key: MeshKey::named(SPLASHES_NAME),
            positions: self
                .stream
                .splash_particles()
                .iter()
                .map(|s| s.position.to_array())
                .collect(),
            size: SPLASH_SIZE,
            color: STREAM_COLOR,
        }));

        scene.set_camera(&self.camera);
        scene.apply_scene_delta(&delta)?;
        scene.render();
        Ok(())
    }

    /// World point at the centre of vessel `id`, for scripting pointer input.
    pub fn grab_point(&self, id: ContainerId) -> Option<Vec3> {
        self.container(id).map(|c| c.position)
    }
}

fn default_vessels() -> Vec<Container> {
    vec![
        Container::new(
            BEAKER,
            "beaker",
            ShapeDescriptor::beaker(),
            VESSEL_CAPACITY,
            BEAKER_START_VOLUME,
            BEAKER_LIQUID,
        )
        .placed(BEAKER_REST.0, TABLE_Y, BEAKER_REST.1),
        Container::new(
            FLASK,
            "flask",
            ShapeDescriptor::flask(),
            VESSEL_CAPACITY,
            FLASK_START_VOLUME,
            FLASK_LIQUID,
        )
        .placed(FLASK_REST.0, TABLE_Y, FLASK_REST.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lab_scene_headless::{HeadlessHud, HeadlessScene};

    fn hud() -> HeadlessHud {
        HeadlessHud::with_elements(
            ["beaker-volume", "flask-volume"],
            ["beaker-progress", "flask-progress"],
        )
    }

    #[test]
    fn first_publish_uploads_glass_and_liquid() {
        let mut lab = LabContext::new(LabConfig::default());
        let mut scene = HeadlessScene::new();
        let mut hud = hud();
        lab.publish(&mut scene, &mut hud).unwrap();
        assert!(scene.mesh(glass_key("beaker")).is_some());
        assert!(scene.mesh(glass_key("flask")).is_some());
        assert!(scene.mesh(liquid_key("beaker")).is_some());
        assert_eq!(hud.text("beaker-volume"), Some("200 mL"));
        assert_abs_diff_eq!(hud.bar("flask-progress").unwrap(), 20.0, epsilon = 1e-4);
        assert_eq!(scene.render_count, 1);
    }

    #[test]
    fn emptied_vessel_loses_its_liquid_mesh() {
        let mut lab = LabContext::new(LabConfig::default());
        let mut scene = HeadlessScene::new();
        let mut hud = hud();
        lab.publish(&mut scene, &mut hud).unwrap();
        lab.containers_mut()[1].set_volume(0.0);
        lab.publish(&mut scene, &mut hud).unwrap();
        assert!(scene.mesh(liquid_key("flask")).is_none());
        assert!(scene.mesh(glass_key("flask")).is_some());
        assert_eq!(hud.text("flask-volume"), Some("0 mL"));
    }

    #[test]
    fn volume_change_replaces_liquid_geometry() {
        let mut lab = LabContext::new(LabConfig::default());
        let mut scene = HeadlessScene::new();
        let mut hud = hud();
        lab.publish(&mut scene, &mut hud).unwrap();
        let before = scene.disposed_geometries;
        lab.containers_mut()[0].add_volume(-20.0);
        lab.publish(&mut scene, &mut hud).unwrap();
        assert_eq!(scene.disposed_geometries, before + 1);
    }

    #[test]
    fn frame_clamps_delta() {
        let mut lab = LabContext::new(LabConfig::default());
        assert_abs_diff_eq!(lab.frame(5.0).dt, 0.1);
        assert_abs_diff_eq!(lab.frame(-1.0).dt, 0.0);
        assert_abs_diff_eq!(lab.frame(f32::NAN).dt, 0.0);
    }

    #[test]
    fn negative_frame_cap_never_panics() {
        let mut cfg = LabConfig::default();
        cfg.physics.max_frame_dt = -0.1;
        let mut lab = LabContext::new(cfg);
        assert_abs_diff_eq!(lab.config().physics.max_frame_dt, 0.0);
        assert_abs_diff_eq!(lab.frame(0.016).dt, 0.0);
    }

    #[test]
    fn inverted_drag_limits_never_panic() {
        let mut cfg = LabConfig::default();
        cfg.interaction.max_tilt_deg = -5.0;
        cfg.interaction.table_half_width = -1.0;
        cfg.interaction.table_half_depth = f32::NAN;
        let mut lab = LabContext::new(cfg);
        let pivot = lab.grab_point(BEAKER).unwrap();
        let px = crate::picking::project_to_screen(&lab.camera, &lab.viewport, pivot).unwrap();
        assert_eq!(lab.pointer(PointerEvent::Down(px)), Some(BEAKER));
        lab.pointer(PointerEvent::Move(px + glam::Vec2::new(40.0, -200.0)));
        let beaker = lab.container(BEAKER).unwrap();
        assert_abs_diff_eq!(beaker.tilt_angle(), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(beaker.position.x, 0.0);
        lab.pointer(PointerEvent::Up);
        for _ in 0..40 {
            lab.frame(1.0 / 60.0);
        }
    }

    #[test]
    fn failed_environment_is_tolerated() {
        let lab = LabContext::new(LabConfig::default());
        let mut scene = HeadlessScene::new();
        scene.fail_environment = Some("no hdr".into());
        lab.install_environment(&mut scene);
        assert!(scene.environment.is_none());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut lab = LabContext::new(LabConfig::default());
        lab.containers_mut()[0].set_volume(3.0);
        lab.containers_mut()[1].position.x = 3.0;
        lab.reset();
        assert_abs_diff_eq!(lab.container(BEAKER).unwrap().volume(), 200.0);
        assert_abs_diff_eq!(lab.container(FLASK).unwrap().position.x, 1.5);
        assert!(lab.interaction().dragged().is_none());
    }
}
