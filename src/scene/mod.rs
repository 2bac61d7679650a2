//! Scene-graph facade over the external rendering engine.
//!
//! Flat node storage with u32 handles. The arena stands in for the
//! engine's scene graph: the host populates it during import and syncs
//! mutations (position, visibility, material tags) back to real engine
//! objects after each frame. Nodes are never removed from the arena;
//! disposal marks them dead and every accessor performs the liveness
//! check, so stale handles held across loads degrade to `None` instead
//! of resurrecting freed engine objects.

mod node;

use glam::Mat4;
pub use node::{Aabb, MeshData, NodeHandle, NodeKind, SceneNode};
use rustc_hash::FxHashMap;

/// Handle to an imported animation group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationGroupId(u32);

/// Handle to an imported skeleton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SkeletonId(u32);

/// Playback slot for an imported animation group.
#[derive(Clone, Debug)]
pub struct AnimationGroup {
    /// Authoring name.
    pub name: String,
    /// Whether playback is running.
    pub playing: bool,
    disposed: bool,
}

/// Slot for an imported skeleton.
#[derive(Clone, Debug)]
pub struct Skeleton {
    /// Authoring name.
    pub name: String,
    disposed: bool,
}

/// Everything one import produced, as returned by the host's content
/// import primitive. The load coordinator tears the previous import
/// down through these handles before the next one lands.
#[derive(Clone, Debug, Default)]
pub struct ImportedContent {
    /// Top-level nodes of the imported hierarchy.
    pub root_nodes: Vec<NodeHandle>,
    /// Every imported mesh node, in traversal order.
    pub meshes: Vec<NodeHandle>,
    /// Imported animation groups, already playing.
    pub animation_groups: Vec<AnimationGroupId>,
    /// Imported skeletons.
    pub skeletons: Vec<SkeletonId>,
}

/// The flat scene-graph arena.
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    /// First-registered handle per name/id, for exact lookups.
    name_index: FxHashMap<String, NodeHandle>,
    animation_groups: Vec<AnimationGroup>,
    skeletons: Vec<Skeleton>,
    /// Monotonically increasing generation; bumped on any mutation.
    generation: u64,
    /// Generation that was last consumed by the host.
    synced_generation: u64,
}

impl SceneGraph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            name_index: FxHashMap::default(),
            animation_groups: Vec::new(),
            skeletons: Vec::new(),
            generation: 0,
            synced_generation: 0,
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Whether graph state changed since the last [`mark_synced`](Self::mark_synced).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.generation != self.synced_generation
    }

    /// Mark the current generation as consumed by the host.
    pub fn mark_synced(&mut self) {
        self.synced_generation = self.generation;
    }

    // -- Node management --

    /// Add a node, optionally attaching it to a parent.
    pub fn add_node(
        &mut self,
        mut node: SceneNode,
        parent: Option<NodeHandle>,
    ) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len() as u32);
        node.parent = parent;
        let _ = self.name_index.entry(node.name.clone()).or_insert(handle);
        if node.id != node.name {
            let _ = self.name_index.entry(node.id.clone()).or_insert(handle);
        }
        self.nodes.push(node);
        if let Some(p) = parent {
            if let Some(parent_node) = self.nodes.get_mut(p.index()) {
                parent_node.children.push(handle);
            }
        }
        self.invalidate();
        handle
    }

    /// Read access; `None` once the node has been disposed.
    #[must_use]
    pub fn node(&self, handle: NodeHandle) -> Option<&SceneNode> {
        self.nodes.get(handle.index()).filter(|n| !n.disposed)
    }

    /// Write access; `None` once the node has been disposed.
    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut SceneNode> {
        self.invalidate();
        self.nodes.get_mut(handle.index()).filter(|n| !n.disposed)
    }

    /// Liveness check for a weak handle.
    #[must_use]
    pub fn is_live(&self, handle: NodeHandle) -> bool {
        self.node(handle).is_some()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn live_node_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.disposed).count()
    }

    /// Live nodes in insertion (traversal) order.
    pub fn iter_live(
        &self,
    ) -> impl Iterator<Item = (NodeHandle, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.disposed)
            .map(|(i, n)| (NodeHandle(i as u32), n))
    }

    /// Exact name/id lookup.
    #[must_use]
    pub fn by_exact_name(&self, name: &str) -> Option<NodeHandle> {
        self.name_index
            .get(name)
            .copied()
            .filter(|&h| self.is_live(h))
            .or_else(|| {
                self.iter_live()
                    .find(|(_, n)| n.name == name || n.id == name)
                    .map(|(h, _)| h)
            })
    }

    /// Parent of a live node.
    #[must_use]
    pub fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.node(handle)?.parent.filter(|&p| self.is_live(p))
    }

    /// Live direct children of a node.
    #[must_use]
    pub fn direct_children(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        self.node(handle).map_or_else(Vec::new, |n| {
            n.children
                .iter()
                .copied()
                .filter(|&c| self.is_live(c))
                .collect()
        })
    }

    /// Live descendants of a node, depth-first.
    #[must_use]
    pub fn descendants(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = self.direct_children(handle);
        stack.reverse();
        while let Some(h) = stack.pop() {
            out.push(h);
            let mut children = self.direct_children(h);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    // -- Targeted mutation (the only writes the core performs) --

    /// Set a node's vertical position. Returns false for dead handles.
    pub fn set_position_y(&mut self, handle: NodeHandle, y: f32) -> bool {
        match self.node_mut(handle) {
            Some(n) => {
                n.position.y = y;
                true
            }
            None => false,
        }
    }

    /// Current vertical position of a live node.
    #[must_use]
    pub fn position_y(&self, handle: NodeHandle) -> Option<f32> {
        self.node(handle).map(|n| n.position.y)
    }

    /// Set render visibility. Returns false for dead handles.
    pub fn set_visible(&mut self, handle: NodeHandle, visible: bool) -> bool {
        match self.node_mut(handle) {
            Some(n) => {
                n.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Tag a node with a material id. Returns false for dead handles.
    pub fn set_material(&mut self, handle: NodeHandle, material: u32) -> bool {
        match self.node_mut(handle) {
            Some(n) => {
                n.material = Some(material);
                true
            }
            None => false,
        }
    }

    // -- Spatial queries --

    /// World transform of a live node (ancestor transforms composed
    /// root-first).
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Option<Mat4> {
        let node = self.node(handle)?;
        let mut matrix = node.local_matrix();
        let mut current = node.parent;
        while let Some(p) = current {
            let parent = self.nodes.get(p.index())?;
            matrix = parent.local_matrix() * matrix;
            current = parent.parent;
        }
        Some(matrix)
    }

    /// Hierarchy-inclusive world-space bounds: the union of this
    /// node's mesh bounds and every live descendant's, each taken
    /// through its world transform. `None` when no mesh in the
    /// hierarchy reports bounds.
    #[must_use]
    pub fn hierarchy_bounds(&self, handle: NodeHandle) -> Option<Aabb> {
        let mut nodes = vec![handle];
        nodes.extend(self.descendants(handle));
        let mut union: Option<Aabb> = None;
        for h in nodes {
            let Some(node) = self.node(h) else { continue };
            let NodeKind::Mesh(ref data) = node.kind else {
                continue;
            };
            let Some(local) = data.bounds else { continue };
            let Some(world) = self.world_matrix(h) else { continue };
            let world_box = local.transformed(&world);
            union = Some(match union {
                Some(u) => u.union(&world_box),
                None => world_box,
            });
        }
        union
    }

    /// Whether a node is a renderable mesh (live, mesh kind, and
    /// carrying at least one vertex).
    #[must_use]
    pub fn is_renderable(&self, handle: NodeHandle) -> bool {
        self.node(handle).is_some_and(|n| {
            matches!(&n.kind, NodeKind::Mesh(data) if data.vertex_count > 0)
        })
    }

    // -- Disposal --

    /// Dispose a single node and detach it from its parent.
    pub fn dispose_node(&mut self, handle: NodeHandle) {
        let Some(parent) = self.node(handle).and_then(|n| n.parent) else {
            self.mark_disposed(handle);
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent.index()) {
            parent_node.children.retain(|&c| c != handle);
        }
        self.mark_disposed(handle);
    }

    fn mark_disposed(&mut self, handle: NodeHandle) {
        if let Some(n) = self.nodes.get_mut(handle.index()) {
            n.disposed = true;
            self.invalidate();
        }
    }

    /// Dispose a whole hierarchy bottom-up (children before parents).
    pub fn dispose_hierarchy(&mut self, root: NodeHandle) {
        let mut order = self.descendants(root);
        order.push(root);
        for h in order.into_iter().rev() {
            self.dispose_node(h);
        }
    }

    // -- Animation groups & skeletons --

    /// Register an imported animation group (playing).
    pub fn add_animation_group(
        &mut self,
        name: impl Into<String>,
    ) -> AnimationGroupId {
        let id = AnimationGroupId(self.animation_groups.len() as u32);
        self.animation_groups.push(AnimationGroup {
            name: name.into(),
            playing: true,
            disposed: false,
        });
        id
    }

    /// Read access; `None` once disposed.
    #[must_use]
    pub fn animation_group(
        &self,
        id: AnimationGroupId,
    ) -> Option<&AnimationGroup> {
        self.animation_groups
            .get(id.0 as usize)
            .filter(|g| !g.disposed)
    }

    /// Stop playback of an animation group.
    pub fn stop_animation_group(&mut self, id: AnimationGroupId) {
        if let Some(g) = self
            .animation_groups
            .get_mut(id.0 as usize)
            .filter(|g| !g.disposed)
        {
            g.playing = false;
        }
    }

    /// Dispose an animation group.
    pub fn dispose_animation_group(&mut self, id: AnimationGroupId) {
        if let Some(g) = self.animation_groups.get_mut(id.0 as usize) {
            g.playing = false;
            g.disposed = true;
        }
    }

    /// Register an imported skeleton.
    pub fn add_skeleton(&mut self, name: impl Into<String>) -> SkeletonId {
        let id = SkeletonId(self.skeletons.len() as u32);
        self.skeletons.push(Skeleton {
            name: name.into(),
            disposed: false,
        });
        id
    }

    /// Read access; `None` once disposed.
    #[must_use]
    pub fn skeleton(&self, id: SkeletonId) -> Option<&Skeleton> {
        self.skeletons.get(id.0 as usize).filter(|s| !s.disposed)
    }

    /// Dispose a skeleton.
    pub fn dispose_skeleton(&mut self, id: SkeletonId) {
        if let Some(s) = self.skeletons.get_mut(id.0 as usize) {
            s.disposed = true;
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
