//! Node storage types for the scene-graph facade.

use glam::{Mat4, Quat, Vec3};
use serde_json::Value;

/// Handle to a node in the [`SceneGraph`](super::SceneGraph) arena.
///
/// Handles are weak back-references: the core never controls node
/// lifetime through them, and every dereference goes through a
/// liveness check on the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub(crate) u32);

impl NodeHandle {
    /// Arena index of this handle.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Box from min/max corners.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Union with another box.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box covering the eight corners of this box transformed by `m`.
    #[must_use]
    pub fn transformed(&self, m: &Mat4) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for ix in 0..2 {
            for iy in 0..2 {
                for iz in 0..2 {
                    let corner = Vec3::new(
                        if ix == 0 { self.min.x } else { self.max.x },
                        if iy == 0 { self.min.y } else { self.max.y },
                        if iz == 0 { self.min.z } else { self.max.z },
                    );
                    let p = m.transform_point3(corner);
                    min = min.min(p);
                    max = max.max(p);
                }
            }
        }
        Self { min, max }
    }
}

/// Geometry summary for a mesh node.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    /// Total vertex count. Zero-vertex meshes are not renderable.
    pub vertex_count: u32,
    /// Local-space bounds, if the mesh can report them.
    pub bounds: Option<Aabb>,
    /// Whether this mesh is an instance of another mesh's geometry.
    pub instanced: bool,
}

/// What a node renders, if anything.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Pure transform/grouping node.
    Transform,
    /// Mesh node carrying geometry.
    Mesh(MeshData),
}

/// One node of the externally authored scene graph.
///
/// The core reads name/id/metadata and mutates position, visibility,
/// and the highlight material tag of specific resolved nodes; it never
/// restructures the graph beyond disposal of imported hierarchies.
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// Authoring name (not unique).
    pub name: String,
    /// Engine id; defaults to the name.
    pub id: String,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    /// Local translation.
    pub position: Vec3,
    /// Local rotation.
    pub rotation: Quat,
    /// Local scale.
    pub scale: Vec3,
    /// Render visibility.
    pub visible: bool,
    /// Authoring metadata (glTF-style `properties`/`extras` nesting).
    pub metadata: Option<Value>,
    /// Transform or mesh payload.
    pub kind: NodeKind,
    /// Highlight material tag, interpreted by the host engine.
    pub material: Option<u32>,
    pub(crate) disposed: bool,
}

impl SceneNode {
    /// A pure transform node.
    #[must_use]
    pub fn transform(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            parent: None,
            children: Vec::new(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visible: true,
            metadata: None,
            kind: NodeKind::Transform,
            material: None,
            disposed: false,
        }
    }

    /// A mesh node with the given vertex count and local bounds.
    #[must_use]
    pub fn mesh(
        name: impl Into<String>,
        vertex_count: u32,
        bounds: Option<Aabb>,
    ) -> Self {
        let mut node = Self::transform(name);
        node.kind = NodeKind::Mesh(MeshData {
            vertex_count,
            bounds,
            instanced: false,
        });
        node
    }

    /// Override the engine id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the local translation.
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the local rotation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the local scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Attach authoring metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Mark the mesh as an instance. No effect on transform nodes.
    #[must_use]
    pub fn instanced(mut self) -> Self {
        if let NodeKind::Mesh(ref mut data) = self.kind {
            data.instanced = true;
        }
        self
    }

    /// Local transform matrix.
    #[must_use]
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.position,
        )
    }

    /// Parent handle, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }
}
