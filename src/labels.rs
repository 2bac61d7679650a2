//! Camera-facing text overlays anchored to mesh bounding boxes.
//!
//! While the level view is active, every anchor mesh beneath the
//! level sub-root carries one text overlay that re-orients to face
//! the camera each rendered frame. The overlay is parented to its
//! anchor, so the per-frame transform is computed in world space and
//! converted back through the anchor's inverted world matrix — the
//! anchor itself may be moving (e.g. during the roof-lift tween).

use glam::{Mat4, Vec3};

use crate::backend::{OverlayBackend, OverlayId};
use crate::camera::OrbitCamera;
use crate::resolve::{find_layer_name, matches_alias};
use crate::scene::{NodeHandle, SceneGraph};

/// Fallback facing direction when the camera sits on top of a label.
const FALLBACK_FORWARD: Vec3 = Vec3::Z;

/// One overlay anchored to a mesh.
struct LabelEntry {
    /// Weak back-reference; liveness is checked before every use.
    anchor: NodeHandle,
    /// Owned overlay handle.
    overlay: OverlayId,
    /// Offset above the anchor's bounding box, anchor-local.
    local_offset: Vec3,
    /// Overlay scale derived from the anchor's bounding extents.
    scale: Vec3,
}

/// Maintains the set of camera-facing overlays for the level view.
pub struct BillboardLabelRenderer {
    entries: Vec<LabelEntry>,
    /// Stands in for the engine's per-frame callback registration:
    /// [`update`](Self::update) is a no-op while false.
    enabled: bool,
    margin: f32,
    scale_factor: f32,
}

impl BillboardLabelRenderer {
    /// An empty, disabled renderer.
    #[must_use]
    pub fn new(margin: f32, scale_factor: f32) -> Self {
        Self {
            entries: Vec::new(),
            enabled: false,
            margin,
            scale_factor,
        }
    }

    /// Whether the per-frame update is registered.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of live overlays.
    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.entries.len()
    }

    /// Resolve anchors beneath `level_root` and create their overlays.
    ///
    /// Idempotent and lazy: a second call with overlays already built
    /// only re-registers the per-frame update. An anchor mesh is
    /// hidden only after its overlay was created successfully, so an
    /// unavailable overlay resource degrades to a still-visible
    /// anchor rather than a hole in the model.
    pub fn ensure_setup(
        &mut self,
        graph: &mut SceneGraph,
        level_root: NodeHandle,
        anchor_aliases: &[String],
        overlays: &mut dyn OverlayBackend,
    ) {
        if !self.entries.is_empty() {
            self.enabled = true;
            return;
        }

        for anchor in graph.descendants(level_root) {
            let Some(node) = graph.node(anchor) else { continue };
            let is_anchor = anchor_aliases
                .iter()
                .any(|alias| matches_alias(&node.name, alias));
            if !is_anchor || !graph.is_renderable(anchor) {
                continue;
            }
            let text = find_layer_name(graph, anchor)
                .unwrap_or_else(|| node.name.clone());
            let Some(bounds) = graph.hierarchy_bounds(anchor) else {
                continue;
            };
            let extent = (bounds.max - bounds.min) * 0.5;
            let width =
                extent.x.max(extent.z).max(0.25) * self.scale_factor;

            match overlays.create_overlay(&text) {
                Ok(overlay) => {
                    let _ = graph.set_visible(anchor, false);
                    self.entries.push(LabelEntry {
                        anchor,
                        overlay,
                        local_offset: Vec3::new(
                            0.0,
                            extent.y + self.margin,
                            0.0,
                        ),
                        scale: Vec3::new(width, width * 0.5, 1.0),
                    });
                }
                Err(e) => {
                    log::warn!("label overlay for \"{text}\" unavailable: {e}");
                }
            }
        }

        log::debug!("billboard labels ready: {}", self.entries.len());
        self.enabled = true;
    }

    /// Per-frame update: re-orient every overlay to face the camera.
    ///
    /// Pure synchronous computation; anchors that died since setup are
    /// skipped (their overlays are reclaimed at teardown).
    pub fn update(
        &self,
        graph: &SceneGraph,
        camera: &OrbitCamera,
        overlays: &mut dyn OverlayBackend,
    ) {
        if !self.enabled {
            return;
        }
        let eye = camera.eye();
        for entry in &self.entries {
            let Some(anchor_world) = graph.world_matrix(entry.anchor)
            else {
                continue;
            };
            let world_point =
                anchor_world.transform_point3(entry.local_offset);

            let to_camera = eye - world_point;
            let forward = if to_camera.length_squared() < 1e-8 {
                FALLBACK_FORWARD
            } else {
                to_camera.normalize()
            };
            // Look rotation about the fixed up axis.
            let mut right = Vec3::Y.cross(forward);
            if right.length_squared() < 1e-8 {
                right = Vec3::X;
            } else {
                right = right.normalize();
            }
            let up = forward.cross(right);

            let world_transform = Mat4::from_cols(
                (right * entry.scale.x).extend(0.0),
                (up * entry.scale.y).extend(0.0),
                (forward * entry.scale.z).extend(0.0),
                world_point.extend(1.0),
            );
            let local_transform =
                anchor_world.inverse() * world_transform;
            overlays.set_local_transform(entry.overlay, local_transform);
        }
    }

    /// Unregister the per-frame update and dispose every overlay.
    /// Safe to call when no overlays exist.
    pub fn teardown(&mut self, overlays: &mut dyn OverlayBackend) {
        for entry in self.entries.drain(..) {
            overlays.dispose_overlay(entry.overlay);
        }
        self.enabled = false;
    }
}
