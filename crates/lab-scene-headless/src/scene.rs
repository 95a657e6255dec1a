// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless `ScenePort` that keeps the retained scene in maps.

use std::collections::HashMap;

use lab_scene_port::{
    ApplyError, CameraState, EnvironmentDef, MeshDef, MeshKey, PointsDef, SceneDelta, SceneOp,
    ScenePort, Viewport, MAX_OPS,
};

/// Headless scene adapter.
///
/// Implements `ScenePort` by tracking state in HashMaps. Useful for verifying
/// delta sequences without GPU rendering.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    /// Current meshes in the scene.
    pub meshes: HashMap<MeshKey, MeshDef>,
    /// Current point clouds in the scene.
    pub points: HashMap<MeshKey, PointsDef>,
    /// Current camera state.
    pub camera: CameraState,
    /// Installed environment map, if any.
    pub environment: Option<EnvironmentDef>,
    /// Last epoch applied.
    last_epoch: Option<u64>,
    /// Number of mesh geometries replaced or removed (disposals).
    pub disposed_geometries: u64,
    /// Number of render calls.
    pub render_count: u32,
    /// Current viewport dimensions.
    pub viewport: Viewport,
    /// Whether dispose has been called.
    pub disposed: bool,
    /// When set, `set_environment` fails with this backend message.
    pub fail_environment: Option<String>,
}

impl HeadlessScene {
    /// Create an empty headless scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meshes in the scene.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Mesh by key.
    pub fn mesh(&self, key: MeshKey) -> Option<&MeshDef> {
        self.meshes.get(&key)
    }

    /// Point cloud by key.
    pub fn points(&self, key: MeshKey) -> Option<&PointsDef> {
        self.points.get(&key)
    }

    /// Total number of points across all clouds.
    pub fn point_count(&self) -> usize {
        self.points.values().map(|p| p.positions.len()).sum()
    }

    /// Last applied epoch.
    pub fn last_epoch(&self) -> Option<u64> {
        self.last_epoch
    }
}

impl ScenePort for HeadlessScene {
    fn apply_scene_delta(&mut self, delta: &SceneDelta) -> Result<(), ApplyError> {
        // Idempotency check: skip if epoch already processed
        if let Some(last) = self.last_epoch {
            if delta.epoch <= last {
                return Ok(());
            }
        }
        if delta.ops.len() > MAX_OPS {
            return Err(ApplyError::Invariant(format!(
                "delta carries {} ops (max {MAX_OPS})",
                delta.ops.len()
            )));
        }

        for op in &delta.ops {
            match op {
                SceneOp::UpsertMesh(mesh) => {
                    mesh.geometry.validate()?;
                    if self.meshes.insert(mesh.key, mesh.clone()).is_some() {
                        self.disposed_geometries += 1;
                    }
                }
                SceneOp::SetPose { key, pose } => {
                    if let Some(mesh) = self.meshes.get_mut(key) {
                        mesh.pose = *pose;
                    }
                }
                SceneOp::RemoveMesh { key } => {
                    if self.meshes.remove(key).is_some() {
                        self.disposed_geometries += 1;
                    }
                }
                SceneOp::UpsertPoints(cloud) => {
                    self.points.insert(cloud.key, cloud.clone());
                }
                SceneOp::RemovePoints { key } => {
                    self.points.remove(key);
                }
                SceneOp::Clear => {
                    self.disposed_geometries += self.meshes.len() as u64;
                    self.meshes.clear();
                    self.points.clear();
                }
            }
        }

        self.last_epoch = Some(delta.epoch);
        Ok(())
    }

    fn set_camera(&mut self, camera: &CameraState) {
        self.camera = *camera;
    }

    fn set_environment(&mut self, env: &EnvironmentDef) -> Result<(), ApplyError> {
        if let Some(msg) = &self.fail_environment {
            return Err(ApplyError::Backend(msg.clone()));
        }
        self.environment = Some(*env);
        Ok(())
    }

    fn render(&mut self) {
        self.render_count += 1;
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.meshes.clear();
        self.points.clear();
        self.environment = None;
        self.last_epoch = None;
    }
}
