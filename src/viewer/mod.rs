//! The viewer controller: one explicit state struct owned by a single
//! instance, with every sub-controller receiving it by reference.
//!
//! The public surface mirrors the UI glue exactly: `load_next`,
//! `cycle_camera`, `toggle_level_view`, `tick` (the per-frame render
//! callback), and the busy/availability queries that enable or
//! disable user controls. Everything runs single-threaded and
//! cooperative; the boolean busy flags are the whole mutual-exclusion
//! story, and a user action that hits a busy flag is dropped, never
//! queued.

mod loading;

use crate::animation::TweenTimeline;
use crate::backend::{ModelSource, OverlayBackend};
use crate::camera::{CameraChoreographer, CameraWaypoint, OrbitCamera};
use crate::error::MaquetteError;
use crate::labels::BillboardLabelRenderer;
use crate::level::LevelToggleController;
use crate::options::ViewerOptions;
use crate::scene::{ImportedContent, NodeHandle, SceneGraph};

/// Presentation state of a user control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlState {
    /// Enabled, normal affordance.
    Ready,
    /// Disabled while an operation is in progress.
    Busy,
    /// Enabled with a retry affordance after a failed load.
    Retry,
    /// Disabled because the feature cannot apply to this scene.
    Unavailable,
}

impl ControlState {
    /// Whether the control accepts input in this state.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Ready | Self::Retry)
    }
}

/// The viewer orchestration core.
///
/// Owns the scene-graph facade, the tween timeline, the camera
/// choreographer, the level-view controller, the label renderer, and
/// the model rotation bookkeeping. Nothing here touches the GPU; the
/// host syncs graph and camera state into its engine after each
/// [`tick`](Self::tick).
pub struct Viewer {
    pub(crate) options: ViewerOptions,
    pub(crate) graph: SceneGraph,
    pub(crate) source: Box<dyn ModelSource>,
    pub(crate) overlays: Box<dyn OverlayBackend>,
    pub(crate) timeline: TweenTimeline,
    pub(crate) choreographer: CameraChoreographer,
    pub(crate) level: LevelToggleController,
    pub(crate) labels: BillboardLabelRenderer,

    pub(crate) model_files: Vec<String>,
    pub(crate) current_model_index: usize,
    pub(crate) is_loading_model: bool,
    pub(crate) model_control: ControlState,
    pub(crate) current_import: Option<ImportedContent>,
    /// Renderable meshes of the current import; the host re-registers
    /// these as shadow casters after a load.
    pub(crate) shadow_casters: Vec<NodeHandle>,
    /// Lazily allocated highlight material tag, reused across loads.
    pub(crate) highlight_material: Option<u32>,
}

impl Viewer {
    /// Build a viewer over a model rotation list.
    ///
    /// The list is sorted case-insensitively; an empty list is a
    /// construction error (there is nothing the viewer could ever
    /// show). No content is loaded yet — call
    /// [`load_initial`](Self::load_initial).
    pub fn new(
        options: ViewerOptions,
        model_files: Vec<String>,
        source: Box<dyn ModelSource>,
        overlays: Box<dyn OverlayBackend>,
    ) -> Result<Self, MaquetteError> {
        let mut model_files = model_files;
        model_files.sort_by_key(|name| name.to_lowercase());
        if model_files.is_empty() {
            return Err(MaquetteError::NoModels);
        }

        let camera = OrbitCamera::new(&options.camera);
        let choreographer =
            CameraChoreographer::new(camera, options.camera.animation_frames);
        let level = LevelToggleController::new(
            options.level.lift_amount,
            options.camera.animation_frames,
        );
        let labels = BillboardLabelRenderer::new(
            options.level.label_margin,
            options.level.label_scale,
        );

        Ok(Self {
            options,
            graph: SceneGraph::new(),
            source,
            overlays,
            timeline: TweenTimeline::new(),
            choreographer,
            level,
            labels,
            model_files,
            current_model_index: 0,
            is_loading_model: false,
            model_control: ControlState::Ready,
            current_import: None,
            shadow_casters: Vec::new(),
            highlight_material: None,
        })
    }

    /// Load the first model of the rotation.
    pub fn load_initial(&mut self) -> bool {
        self.load_model_by_index(self.current_model_index)
    }

    /// Advance to the next model in the rotation. Dropped while a
    /// load is already in progress. The rotation index only moves on
    /// success, so a failed load retries the same model.
    pub fn load_next(&mut self) -> bool {
        if self.is_loading_model {
            return false;
        }
        let next = (self.current_model_index + 1) % self.model_files.len();
        self.load_model_by_index(next)
    }

    /// Advance the camera to the next waypoint. Dropped while
    /// loading, while a transition is in flight, or with no
    /// waypoints.
    pub fn cycle_camera(&mut self) -> bool {
        if self.is_loading_model {
            return false;
        }
        self.choreographer.advance(&mut self.timeline)
    }

    /// Toggle the expanded level view. `desired` forces a direction;
    /// `None` negates the current state. Dropped while any busy flag
    /// is set.
    pub fn toggle_level_view(&mut self, desired: Option<bool>) -> bool {
        self.level.toggle(
            desired,
            &mut self.graph,
            &mut self.choreographer,
            &mut self.timeline,
            self.is_loading_model,
        )
    }

    /// Per-frame render callback.
    ///
    /// Applies residual input deltas, advances the tween timeline by
    /// one frame, routes samples/completions into the camera and
    /// level controllers, and refreshes the billboard label
    /// transforms against the new camera pose.
    pub fn tick(&mut self) {
        self.choreographer.camera_mut().step_inertia();
        let _ = self.timeline.tick();
        self.choreographer.apply_frame(&mut self.timeline);

        if let Some(transition) = self.level.apply_frame(
            &self.timeline,
            &mut self.graph,
            &self.choreographer,
        ) {
            if transition.entered {
                if let Some(root) = transition.level_root {
                    self.labels.ensure_setup(
                        &mut self.graph,
                        root,
                        &self.options.level.anchor_aliases,
                        self.overlays.as_mut(),
                    );
                }
            } else {
                self.labels.teardown(self.overlays.as_mut());
            }
        }

        self.labels.update(
            &self.graph,
            self.choreographer.camera(),
            self.overlays.as_mut(),
        );
    }

    // -- Busy / availability queries for UI control enablement --

    /// Whether a model load is in progress.
    #[must_use]
    pub fn is_loading_model(&self) -> bool {
        self.is_loading_model
    }

    /// Whether a scripted camera transition is in flight.
    #[must_use]
    pub fn is_animating_camera(&self) -> bool {
        self.choreographer.is_animating()
    }

    /// Whether the roof lift tween is running.
    #[must_use]
    pub fn is_roof_animating(&self) -> bool {
        self.level.is_roof_animating()
    }

    /// Whether a level-view transition is in flight.
    #[must_use]
    pub fn is_level_transitioning(&self) -> bool {
        self.level.is_transitioning()
    }

    /// Whether the level view is fully entered.
    #[must_use]
    pub fn is_level_view_active(&self) -> bool {
        self.level.is_active()
    }

    /// State of the camera-cycling control.
    #[must_use]
    pub fn camera_control(&self) -> ControlState {
        if self.choreographer.waypoints().is_empty() {
            ControlState::Unavailable
        } else if self.is_loading_model || self.choreographer.is_animating()
        {
            ControlState::Busy
        } else {
            ControlState::Ready
        }
    }

    /// State of the next-model control.
    #[must_use]
    pub fn model_control(&self) -> ControlState {
        self.model_control
    }

    /// State of the level-view toggle control.
    #[must_use]
    pub fn level_control(&self) -> ControlState {
        if !self.level.is_available() {
            ControlState::Unavailable
        } else if self.is_loading_model
            || self.level.is_transitioning()
            || self.choreographer.is_animating()
        {
            ControlState::Busy
        } else {
            ControlState::Ready
        }
    }

    // -- Read access for the host sync layer --

    /// The scene-graph facade.
    #[must_use]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable scene-graph access (host sync, user edits).
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// The orbit camera.
    #[must_use]
    pub fn camera(&self) -> &OrbitCamera {
        self.choreographer.camera()
    }

    /// Mutable camera access (user input forwarding).
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        self.choreographer.camera_mut()
    }

    /// Current waypoint list, in cycling order.
    #[must_use]
    pub fn waypoints(&self) -> &[CameraWaypoint] {
        self.choreographer.waypoints()
    }

    /// Index of the model currently displayed.
    #[must_use]
    pub fn current_model_index(&self) -> usize {
        self.current_model_index
    }

    /// The sorted model rotation list.
    #[must_use]
    pub fn model_files(&self) -> &[String] {
        &self.model_files
    }

    /// Handles of the current import, if any.
    #[must_use]
    pub fn current_import(&self) -> Option<&ImportedContent> {
        self.current_import.as_ref()
    }

    /// Renderable meshes the host should register as shadow casters.
    #[must_use]
    pub fn shadow_casters(&self) -> &[NodeHandle] {
        &self.shadow_casters
    }

    /// Number of live label overlays.
    #[must_use]
    pub fn label_overlay_count(&self) -> usize {
        self.labels.overlay_count()
    }

    /// The active options.
    #[must_use]
    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }
}
