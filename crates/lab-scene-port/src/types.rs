// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core scene types for the rendering port contract.
//!
//! These types are plain data. They carry no GPU handles and no simulation
//! behaviour.

use crate::ApplyError;

/// RGBA color with 8-bit components.
pub type ColorRgba8 = [u8; 4];

/// Content-derived key for a scene object (32-byte blake3 digest).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshKey(pub [u8; 32]);

impl MeshKey {
    /// Derives a stable key from a human-readable name such as
    /// `"beaker/liquid"`.
    pub fn named(name: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"pour-lab:scene-key:");
        hasher.update(name.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }
}

impl AsRef<[u8; 32]> for MeshKey {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Placement of an object in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Translation [x, y, z].
    pub position: [f32; 3],
    /// Unit quaternion (x, y, z, w).
    pub rotation: [f32; 4],
}

impl Pose {
    /// Pose at the origin with no rotation.
    pub const IDENTITY: Self = Self {
        position: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
    };
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshGeometry {
    /// Vertex positions in object space.
    pub positions: Vec<[f32; 3]>,
    /// Triangle indices, three per face.
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks index bounds, triangle arity, and that positions are finite.
    pub fn validate(&self) -> Result<(), ApplyError> {
        if self.indices.len() % 3 != 0 {
            return Err(ApplyError::Invariant(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        let n = self.positions.len();
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= n) {
            return Err(ApplyError::Invariant(format!(
                "index {bad} out of range for {n} vertices"
            )));
        }
        if self.positions.iter().flatten().any(|c| !c.is_finite()) {
            return Err(ApplyError::Invariant("non-finite vertex position".into()));
        }
        Ok(())
    }
}

/// Flat surface material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialDef {
    /// Base color.
    pub color: ColorRgba8,
    /// Opacity in `[0, 1]`; below 1 the mesh is drawn transparent.
    pub opacity: f32,
}

/// Mesh definition for the retained scene.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshDef {
    /// Unique key for this mesh.
    pub key: MeshKey,
    /// Triangle data.
    pub geometry: MeshGeometry,
    /// Surface material.
    pub material: MaterialDef,
    /// World placement.
    pub pose: Pose,
}

/// Point-sprite cloud (droplets, splashes).
#[derive(Clone, Debug, PartialEq)]
pub struct PointsDef {
    /// Unique key for this cloud.
    pub key: MeshKey,
    /// World-space positions.
    pub positions: Vec<[f32; 3]>,
    /// Sprite size in world units.
    pub size: f32,
    /// Sprite color.
    pub color: ColorRgba8,
}

/// Procedural environment map description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvironmentDef {
    /// Cube face resolution in pixels.
    pub resolution: u32,
    /// Sky color.
    pub sky: ColorRgba8,
    /// Ground color.
    pub ground: ColorRgba8,
}

impl Default for EnvironmentDef {
    fn default() -> Self {
        Self {
            resolution: 256,
            sky: [200, 220, 255, 255],
            ground: [90, 80, 70, 255],
        }
    }
}

/// Scene operation.
///
/// Operations are applied in order within a [`SceneDelta`].
#[derive(Clone, Debug, PartialEq)]
pub enum SceneOp {
    /// Insert or fully replace a mesh. The previous geometry under the same
    /// key is disposed by the adapter.
    UpsertMesh(MeshDef),
    /// Move an existing mesh without touching its geometry.
    SetPose {
        /// Key of the mesh to move.
        key: MeshKey,
        /// New placement.
        pose: Pose,
    },
    /// Remove a mesh by key.
    RemoveMesh {
        /// Key of the mesh to remove.
        key: MeshKey,
    },
    /// Insert or replace a point cloud.
    UpsertPoints(PointsDef),
    /// Remove a point cloud by key.
    RemovePoints {
        /// Key of the cloud to remove.
        key: MeshKey,
    },
    /// Clear the entire scene.
    Clear,
}

/// Maximum number of operations allowed in a single SceneDelta.
pub const MAX_OPS: usize = 10_000;

/// Scene delta: a batch of operations for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDelta {
    /// Frame counter (monotonically increasing).
    pub epoch: u64,
    /// Operations to apply.
    pub ops: Vec<SceneOp>,
}

impl SceneDelta {
    /// Empty delta for `epoch`.
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            ops: Vec::new(),
        }
    }

    /// Appends an operation.
    pub fn push(&mut self, op: SceneOp) {
        self.ops.push(op);
    }

    /// True when the delta carries no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_are_stable_and_distinct() {
        let a = MeshKey::named("beaker/liquid");
        let b = MeshKey::named("beaker/liquid");
        let c = MeshKey::named("flask/liquid");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(hex::encode(a.0).len(), 64);
    }

    #[test]
    fn validate_rejects_out_of_range_index() {
        let geom = MeshGeometry {
            positions: vec![[0.0; 3]; 3],
            indices: vec![0, 1, 3],
        };
        assert!(matches!(geom.validate(), Err(ApplyError::Invariant(_))));
    }

    #[test]
    fn validate_rejects_partial_triangle() {
        let geom = MeshGeometry {
            positions: vec![[0.0; 3]; 3],
            indices: vec![0, 1],
        };
        assert!(geom.validate().is_err());
    }

    #[test]
    fn validate_rejects_nan() {
        let geom = MeshGeometry {
            positions: vec![[0.0, f32::NAN, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            indices: vec![0, 1, 2],
        };
        assert!(geom.validate().is_err());
    }

    #[test]
    fn validate_accepts_triangle() {
        let geom = MeshGeometry {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            indices: vec![0, 1, 2],
        };
        assert!(geom.validate().is_ok());
        assert_eq!(geom.triangle_count(), 1);
    }
}
