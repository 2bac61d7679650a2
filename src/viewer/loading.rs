//! Model load sequencing for the Viewer.

use super::{ControlState, Viewer};
use crate::bounds::{compute_bounds, Bounds};
use crate::camera::standard_waypoints;
use crate::scene::NodeHandle;

impl Viewer {
    /// Tear down the current content and load the model at `index`.
    ///
    /// Guarded against re-entry. All camera/roof/level/label
    /// sub-state is reset — weak node references nulled, not merely
    /// flagged — before the old content is disposed, so nothing can
    /// observe a node from the outgoing scene. On import failure the
    /// scene stays empty, the model control flips to a retry
    /// affordance, and the rotation index does not advance.
    pub fn load_model_by_index(&mut self, index: usize) -> bool {
        if self.is_loading_model {
            return false;
        }
        let Some(model_name) = self.model_files.get(index).cloned() else {
            return false;
        };

        self.is_loading_model = true;
        self.model_control = ControlState::Busy;
        log::info!("loading model {model_name}");

        // Overlays are owned here and must be released before the
        // anchor nodes they reference are disposed.
        self.labels.teardown(self.overlays.as_mut());
        self.level.reset();
        self.choreographer.clear(&mut self.timeline);
        self.shadow_casters.clear();
        self.teardown_current_import();

        let succeeded =
            match self.source.import(&mut self.graph, &model_name) {
                Ok(content) => {
                    self.finish_load(content, index);
                    log::info!("{model_name} ready");
                    true
                }
                Err(e) => {
                    log::error!(
                        "failed to load model \"{model_name}\": {e}"
                    );
                    self.model_control = ControlState::Retry;
                    false
                }
            };

        self.is_loading_model = false;
        if succeeded {
            self.model_control = if self.model_files.len() <= 1 {
                ControlState::Unavailable
            } else {
                ControlState::Ready
            };
        }
        succeeded
    }

    /// Dispose everything the previous import produced: stop and
    /// dispose animation groups, dispose node hierarchies bottom-up,
    /// then dispose skeletons.
    fn teardown_current_import(&mut self) {
        let Some(content) = self.current_import.take() else {
            return;
        };
        for &group in &content.animation_groups {
            self.graph.stop_animation_group(group);
            self.graph.dispose_animation_group(group);
        }
        for &root in &content.root_nodes {
            self.graph.dispose_hierarchy(root);
        }
        for &skeleton in &content.skeletons {
            self.graph.dispose_skeleton(skeleton);
        }
    }

    fn finish_load(
        &mut self,
        content: crate::scene::ImportedContent,
        index: usize,
    ) {
        let renderable: Vec<NodeHandle> = content
            .meshes
            .iter()
            .copied()
            .filter(|&m| self.graph.is_renderable(m))
            .collect();
        self.shadow_casters.clone_from(&renderable);

        // Fall back to every imported mesh when nothing classified as
        // renderable; an unmeasurable set still resolves to None.
        let target_meshes = if renderable.is_empty() {
            content.meshes.clone()
        } else {
            renderable
        };
        let bounds = compute_bounds(&self.graph, &target_meshes);
        self.setup_camera_waypoints(bounds.as_ref());

        self.level
            .derive_from_graph(&self.graph, &self.options.level);
        self.apply_highlight();

        self.current_model_index = index;
        self.current_import = Some(content);
    }

    fn setup_camera_waypoints(&mut self, bounds: Option<&Bounds>) {
        match bounds {
            Some(bounds) => {
                self.choreographer.set_waypoints(
                    standard_waypoints(bounds),
                    &mut self.timeline,
                );
            }
            None => {
                self.choreographer.clear(&mut self.timeline);
                log::warn!(
                    "no mesh reported bounds; camera cycling disabled"
                );
            }
        }
    }

    /// Apply the highlight material tag to the direct child meshes of
    /// the configured node. Absence of the node is not an error; the
    /// material tag is allocated once and reused across loads.
    fn apply_highlight(&mut self) {
        let name = self.options.highlight.node_name.clone();
        if name.is_empty() {
            return;
        }
        let Some(node) = self.graph.by_exact_name(&name) else {
            log::debug!("highlight node \"{name}\" not present");
            return;
        };

        let material = *self.highlight_material.get_or_insert(1);
        let mut tagged = 0usize;
        for child in self.graph.direct_children(node) {
            let instanced = self.graph.node(child).is_some_and(|n| {
                matches!(&n.kind, crate::scene::NodeKind::Mesh(data) if data.instanced)
            });
            if instanced || !self.graph.is_renderable(child) {
                continue;
            }
            let _ = self.graph.set_material(child, material);
            tagged += 1;
        }
        log::debug!("highlight applied to {tagged} meshes under \"{name}\"");
    }
}
