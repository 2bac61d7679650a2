//! The compound level-view state machine.
//!
//! Toggling the level view is one atomic transition built from two
//! concurrent tweens: the roof node lifts vertically while the camera
//! flies to the interior waypoint. The controller completes only when
//! both finish, and its busy flags are cleared unconditionally so a
//! half-failed transition can never wedge the UI.

use crate::animation::{
    EasingFunction, TweenChannel, TweenId, TweenTimeline, TweenValue,
};
use crate::bounds::compute_bounds;
use crate::camera::{level_waypoint, CameraChoreographer, CameraWaypoint};
use crate::options::LevelOptions;
use crate::resolve::resolve_named;
use crate::scene::{NodeHandle, SceneGraph};

/// Level-view phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum LevelPhase {
    #[default]
    Inactive,
    Transitioning,
    Active,
}

/// Bookkeeping for a transition in flight. Captured at start; the
/// finalize step never consults current cycling state.
struct PendingToggle {
    entering: bool,
    roof_tween: Option<TweenId>,
    roof_done: bool,
    roof_target_y: f32,
}

/// What a completed transition asks the viewer to do with the label
/// renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelTransition {
    /// True when the level view was entered, false when left.
    pub entered: bool,
    /// The level sub-root, for label setup on entry.
    pub level_root: Option<NodeHandle>,
}

/// Coordinates the camera transition and the roof lift as one atomic
/// operation.
pub struct LevelToggleController {
    roof: Option<NodeHandle>,
    /// Roof Y at derivation time; the lift returns here on exit.
    roof_initial_y: f32,
    roof_raised: bool,
    roof_animating: bool,
    level: Option<NodeHandle>,
    level_waypoint: Option<CameraWaypoint>,
    /// Pose captured at the moment entry began; the only source of
    /// truth for "where to return to".
    return_waypoint: Option<CameraWaypoint>,
    phase: LevelPhase,
    pending: Option<PendingToggle>,
    lift_amount: f32,
    animation_frames: u32,
    easing: EasingFunction,
}

impl LevelToggleController {
    /// Controller with no resolved nodes. [`derive_from_graph`]
    /// populates it per load.
    ///
    /// [`derive_from_graph`]: Self::derive_from_graph
    #[must_use]
    pub fn new(lift_amount: f32, animation_frames: u32) -> Self {
        Self {
            roof: None,
            roof_initial_y: 0.0,
            roof_raised: false,
            roof_animating: false,
            level: None,
            level_waypoint: None,
            return_waypoint: None,
            phase: LevelPhase::Inactive,
            pending: None,
            lift_amount,
            animation_frames,
            easing: EasingFunction::DEFAULT,
        }
    }

    /// Reset to defaults. Weak node references are nulled, not just
    /// flagged, so stale-node reuse cannot occur across loads.
    pub fn reset(&mut self) {
        self.roof = None;
        self.roof_initial_y = 0.0;
        self.roof_raised = false;
        self.roof_animating = false;
        self.level = None;
        self.level_waypoint = None;
        self.return_waypoint = None;
        self.phase = LevelPhase::Inactive;
        self.pending = None;
    }

    /// Resolve the roof and level nodes in a freshly imported graph
    /// and precompute the interior camera waypoint.
    ///
    /// A missing roof or level disables the toggle (the control
    /// becomes unavailable) rather than failing the load.
    pub fn derive_from_graph(
        &mut self,
        graph: &SceneGraph,
        options: &LevelOptions,
    ) {
        self.roof = resolve_named(graph, &options.roof_aliases);
        self.roof_initial_y = self
            .roof
            .and_then(|r| graph.position_y(r))
            .unwrap_or(0.0);
        if self.roof.is_none() {
            log::debug!("no roof node resolved; level view unavailable");
        }

        self.level = resolve_named(graph, &options.level_aliases);
        self.level_waypoint = self
            .level
            .and_then(|l| compute_bounds(graph, &[l]))
            .map(|bounds| level_waypoint(&bounds));
        if self.level_waypoint.is_none() {
            log::debug!(
                "no level waypoint derived; level view unavailable"
            );
        }
    }

    /// Whether the toggle control should be offered at all.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.roof.is_some() && self.level_waypoint.is_some()
    }

    /// Whether the level view is fully entered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == LevelPhase::Active
    }

    /// Whether an enter/leave transition is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.phase == LevelPhase::Transitioning
    }

    /// Whether the roof lift tween is running.
    #[must_use]
    pub fn is_roof_animating(&self) -> bool {
        self.roof_animating
    }

    /// Whether the roof currently sits at its lifted position.
    #[must_use]
    pub fn is_roof_raised(&self) -> bool {
        self.roof_raised
    }

    /// The resolved level sub-root, if any.
    #[must_use]
    pub fn level_node(&self) -> Option<NodeHandle> {
        self.level
    }

    /// Toggle the level view.
    ///
    /// `desired` forces a direction; `None` negates the current
    /// state. Refuses (returns false, no state change) while any of
    /// the shared-state operations is in progress — conflicting user
    /// actions are dropped, never queued — and when the roof node or
    /// interior waypoint is missing. Toggling toward the current
    /// state is a no-op.
    pub fn toggle(
        &mut self,
        desired: Option<bool>,
        graph: &mut SceneGraph,
        choreographer: &mut CameraChoreographer,
        timeline: &mut TweenTimeline,
        is_loading: bool,
    ) -> bool {
        if self.roof_animating
            || self.phase == LevelPhase::Transitioning
            || choreographer.is_animating()
            || is_loading
        {
            log::debug!("level toggle dropped: viewer busy");
            return false;
        }

        let active = self.phase == LevelPhase::Active;
        let entering = desired.unwrap_or(!active);
        if entering == active {
            return false;
        }

        let (Some(roof), Some(interior)) =
            (self.roof, self.level_waypoint.clone())
        else {
            log::warn!(
                "level toggle refused: roof or level waypoint unresolved"
            );
            return false;
        };

        let destination = if entering {
            // Captured before the transition starts; cycling may move
            // the index while the view is active.
            self.return_waypoint =
                Some(choreographer.camera().capture("Return"));
            interior
        } else {
            self.return_waypoint
                .take()
                .or_else(|| choreographer.current_waypoint().cloned())
                .or_else(|| choreographer.waypoints().first().cloned())
                .unwrap_or_else(|| {
                    choreographer.camera().capture("Return")
                })
        };

        self.phase = LevelPhase::Transitioning;
        self.roof_animating = true;

        let roof_target_y = if entering {
            self.roof_initial_y + self.lift_amount
        } else {
            self.roof_initial_y
        };
        let roof_tween =
            self.start_roof_tween(graph, timeline, roof, roof_target_y);
        if roof_tween.is_none() {
            // The engine produced no tween handle; snap instead of
            // animate and let the camera transition carry on.
            log::warn!("roof tween unavailable; snapping roof height");
            let _ = graph.set_position_y(roof, roof_target_y);
        }

        if !choreographer.fly_to(destination, timeline) {
            // Roll the concurrency flags back; nothing is in flight.
            if let Some(id) = roof_tween {
                timeline.stop(id);
            }
            let _ = graph.set_position_y(roof, roof_target_y);
            self.roof_raised = entering;
            self.phase = if active {
                LevelPhase::Active
            } else {
                LevelPhase::Inactive
            };
            self.roof_animating = false;
            log::warn!("level toggle camera transition failed to start");
            return false;
        }

        self.pending = Some(PendingToggle {
            entering,
            roof_done: roof_tween.is_none(),
            roof_tween,
            roof_target_y,
        });
        true
    }

    fn start_roof_tween(
        &self,
        graph: &SceneGraph,
        timeline: &mut TweenTimeline,
        roof: NodeHandle,
        target_y: f32,
    ) -> Option<TweenId> {
        // Liveness check immediately before use; a roof disposed
        // since derivation yields no tween handle.
        let start_y = graph.position_y(roof)?;
        Some(timeline.start_scalar(
            TweenChannel::NodeHeight(roof),
            start_y,
            target_y,
            self.animation_frames,
            self.easing,
        ))
    }

    /// Consume the current tick's samples and completions.
    ///
    /// Roof height samples are written to the graph; when both the
    /// roof tween and the camera transition have finished, the
    /// transition finalizes and the label-renderer action is returned
    /// for the viewer to perform.
    pub fn apply_frame(
        &mut self,
        timeline: &TweenTimeline,
        graph: &mut SceneGraph,
        choreographer: &CameraChoreographer,
    ) -> Option<LevelTransition> {
        for &(channel, value) in timeline.samples() {
            if let (
                TweenChannel::NodeHeight(node),
                TweenValue::Scalar(y),
            ) = (channel, value)
            {
                let _ = graph.set_position_y(node, y);
            }
        }

        let pending = self.pending.as_mut()?;
        if let Some(id) = pending.roof_tween {
            if timeline.just_completed(id) {
                pending.roof_done = true;
                // Snap the exact target height, mirroring the camera
                // finalize.
                if let Some(roof) = self.roof {
                    let _ =
                        graph.set_position_y(roof, pending.roof_target_y);
                }
            }
        }

        if !pending.roof_done || choreographer.is_animating() {
            return None;
        }

        let pending = self.pending.take()?;
        self.roof_raised = pending.entering;
        self.phase = if pending.entering {
            LevelPhase::Active
        } else {
            LevelPhase::Inactive
        };
        self.roof_animating = false;
        log::info!(
            "level view {}",
            if pending.entering { "entered" } else { "left" }
        );
        Some(LevelTransition {
            entered: pending.entering,
            level_root: self.level,
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::bounds::Bounds;
    use crate::camera::{standard_waypoints, OrbitCamera};
    use crate::options::CameraTuning;
    use crate::scene::{Aabb, SceneNode};

    const FRAMES: u32 = 8;
    const LIFT: f32 = 6.0;

    struct Rig {
        graph: SceneGraph,
        choreographer: CameraChoreographer,
        timeline: TweenTimeline,
        level: LevelToggleController,
        roof: NodeHandle,
    }

    fn rig() -> Rig {
        let mut graph = SceneGraph::new();
        let roof = graph.add_node(
            SceneNode::mesh(
                "Roof",
                24,
                Some(Aabb::new(
                    Vec3::new(-5.0, 5.0, -5.0),
                    Vec3::new(5.0, 6.0, 5.0),
                )),
            )
            .with_position(Vec3::new(0.0, 5.0, 0.0)),
            None,
        );
        let level_root =
            graph.add_node(SceneNode::transform("Level1"), None);
        let _floor = graph.add_node(
            SceneNode::mesh(
                "Floor",
                32,
                Some(Aabb::new(
                    Vec3::new(-5.0, 0.0, -5.0),
                    Vec3::new(5.0, 3.0, 5.0),
                )),
            ),
            Some(level_root),
        );

        let camera = OrbitCamera::new(&CameraTuning::default());
        let mut choreographer = CameraChoreographer::new(camera, FRAMES);
        let mut timeline = TweenTimeline::new();
        let bounds = Bounds {
            center: Vec3::ZERO,
            radius: 10.0,
            height: 6.0,
        };
        choreographer
            .set_waypoints(standard_waypoints(&bounds), &mut timeline);

        let mut level = LevelToggleController::new(LIFT, FRAMES);
        level.derive_from_graph(&graph, &LevelOptions::default());
        assert!(level.is_available());

        Rig {
            graph,
            choreographer,
            timeline,
            level,
            roof,
        }
    }

    fn toggle(rig: &mut Rig, desired: Option<bool>) -> bool {
        rig.level.toggle(
            desired,
            &mut rig.graph,
            &mut rig.choreographer,
            &mut rig.timeline,
            false,
        )
    }

    fn settle(rig: &mut Rig) -> Vec<LevelTransition> {
        let mut outcomes = Vec::new();
        for _ in 0..64 {
            let _ = rig.timeline.tick();
            rig.choreographer.apply_frame(&mut rig.timeline);
            if let Some(outcome) = rig.level.apply_frame(
                &rig.timeline,
                &mut rig.graph,
                &rig.choreographer,
            ) {
                outcomes.push(outcome);
            }
            if !rig.level.is_transitioning()
                && !rig.choreographer.is_animating()
            {
                break;
            }
        }
        outcomes
    }

    #[test]
    fn enter_lifts_roof_and_flies_camera() {
        let mut rig = rig();
        assert!(toggle(&mut rig, Some(true)));
        assert!(rig.level.is_transitioning());
        assert!(rig.level.is_roof_animating());

        let outcomes = settle(&mut rig);
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].entered);
        assert!(rig.level.is_active());
        assert!(rig.level.is_roof_raised());
        assert!(!rig.level.is_roof_animating());
        assert_eq!(rig.graph.position_y(rig.roof), Some(5.0 + LIFT));
        // Camera landed on the interior waypoint.
        assert_eq!(
            rig.choreographer.camera().azimuth,
            (-45.0f32).to_radians()
        );
    }

    #[test]
    fn same_target_twice_is_a_noop() {
        let mut rig = rig();
        assert!(toggle(&mut rig, Some(true)));
        let _ = settle(&mut rig);
        assert!(rig.level.is_active());

        assert!(!toggle(&mut rig, Some(true)));
        assert!(!rig.level.is_transitioning());
        assert!(!rig.timeline.is_animating());
    }

    #[test]
    fn toggle_while_transitioning_is_dropped() {
        let mut rig = rig();
        assert!(toggle(&mut rig, Some(true)));
        assert!(!toggle(&mut rig, Some(false)));
        assert!(!toggle(&mut rig, None));
    }

    #[test]
    fn toggle_while_camera_animating_is_dropped() {
        let mut rig = rig();
        assert!(rig.choreographer.advance(&mut rig.timeline));
        assert!(!toggle(&mut rig, Some(true)));
    }

    #[test]
    fn toggle_while_loading_is_dropped() {
        let mut rig = rig();
        assert!(!rig.level.toggle(
            Some(true),
            &mut rig.graph,
            &mut rig.choreographer,
            &mut rig.timeline,
            true,
        ));
    }

    #[test]
    fn round_trip_restores_exact_entry_pose() {
        let mut rig = rig();

        // Move somewhere first so the entry pose is nontrivial.
        assert!(rig.choreographer.advance(&mut rig.timeline));
        let _ = settle(&mut rig);
        let entry = rig.choreographer.camera().capture("");

        assert!(toggle(&mut rig, Some(true)));
        let _ = settle(&mut rig);
        assert!(toggle(&mut rig, Some(false)));
        let outcomes = settle(&mut rig);
        assert!(!outcomes[0].entered);

        let cam = rig.choreographer.camera();
        assert_eq!(cam.azimuth, entry.azimuth);
        assert_eq!(cam.polar, entry.polar);
        assert_eq!(cam.radius, entry.radius);
        assert_eq!(cam.target, entry.target);
        assert_eq!(rig.graph.position_y(rig.roof), Some(5.0));
        assert!(!rig.level.is_roof_raised());
    }

    #[test]
    fn exit_falls_back_to_cycling_waypoint_after_reset_of_return() {
        let mut rig = rig();
        assert!(toggle(&mut rig, Some(true)));
        let _ = settle(&mut rig);

        // Simulate an intervening consumer clearing the return pose.
        rig.level.return_waypoint = None;
        assert!(toggle(&mut rig, Some(false)));
        let _ = settle(&mut rig);

        let expected = rig.choreographer.current_waypoint().unwrap();
        assert_eq!(rig.choreographer.camera().azimuth, expected.azimuth);
        assert_eq!(rig.choreographer.camera().radius, expected.radius);
    }

    #[test]
    fn missing_level_node_disables_toggle() {
        let mut graph = SceneGraph::new();
        let _roof = graph.add_node(SceneNode::transform("Roof"), None);
        let mut level = LevelToggleController::new(LIFT, FRAMES);
        level.derive_from_graph(&graph, &LevelOptions::default());

        assert!(!level.is_available());
        let camera = OrbitCamera::new(&CameraTuning::default());
        let mut choreographer = CameraChoreographer::new(camera, FRAMES);
        let mut timeline = TweenTimeline::new();
        assert!(!level.toggle(
            Some(true),
            &mut graph,
            &mut choreographer,
            &mut timeline,
            false,
        ));
    }

    #[test]
    fn disposed_roof_snaps_instead_of_animating() {
        let mut rig = rig();
        rig.graph.dispose_hierarchy(rig.roof);

        // Handle still present, node dead: the roof tween cannot
        // start, the camera transition runs alone, the roof snap is a
        // no-op on the dead node.
        assert!(toggle(&mut rig, Some(true)));
        let outcomes = settle(&mut rig);
        assert_eq!(outcomes.len(), 1);
        assert!(rig.level.is_active());
        assert!(rig.level.is_roof_raised());
        assert_eq!(rig.graph.position_y(rig.roof), None);
    }

    #[test]
    fn reset_nulls_weak_references() {
        let mut rig = rig();
        assert!(toggle(&mut rig, Some(true)));
        let _ = settle(&mut rig);

        rig.level.reset();
        assert!(!rig.level.is_available());
        assert!(!rig.level.is_active());
        assert!(!rig.level.is_roof_raised());
        assert!(rig.level.level_node().is_none());
    }
}
