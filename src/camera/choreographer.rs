//! Waypoint cycling and tween-driven camera transitions.

use super::core::OrbitCamera;
use super::waypoint::CameraWaypoint;
use crate::animation::{
    EasingFunction, TweenChannel, TweenId, TweenTimeline, TweenValue,
};

/// A transition in flight. Everything the finalize step needs is
/// captured here at start time; nothing resolves against the current
/// waypoint list, so a list replaced mid-flight cannot corrupt the
/// landing.
struct CameraTransition {
    channels: [TweenId; 4],
    /// The target tween finishes last among the four and keys the
    /// completion of the whole transition.
    target_tween: TweenId,
    destination: CameraWaypoint,
}

/// Owns the active camera's viewpoint state and the named waypoint
/// set, and drives interpolated transitions between waypoints with
/// cancellation-safe completion.
pub struct CameraChoreographer {
    camera: OrbitCamera,
    waypoints: Vec<CameraWaypoint>,
    index: usize,
    active: Option<CameraTransition>,
    animation_frames: u32,
    easing: EasingFunction,
}

impl CameraChoreographer {
    /// Choreographer around an owned camera.
    #[must_use]
    pub fn new(camera: OrbitCamera, animation_frames: u32) -> Self {
        Self {
            camera,
            waypoints: Vec::new(),
            index: 0,
            active: None,
            animation_frames,
            easing: EasingFunction::DEFAULT,
        }
    }

    /// Read access to the camera.
    #[must_use]
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Write access to the camera (user input forwarding).
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// The current waypoint list, in cycling order.
    #[must_use]
    pub fn waypoints(&self) -> &[CameraWaypoint] {
        &self.waypoints
    }

    /// Index of the waypoint the camera is at (or flying toward).
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// The waypoint at the current cycling index.
    #[must_use]
    pub fn current_waypoint(&self) -> Option<&CameraWaypoint> {
        self.waypoints.get(self.index)
    }

    /// Whether a transition is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Whether cycling is currently possible.
    #[must_use]
    pub fn cycling_available(&self) -> bool {
        !self.waypoints.is_empty() && self.active.is_none()
    }

    /// Replace the waypoint list.
    ///
    /// Resets the cycling index to 0 and applies the first waypoint
    /// immediately (no animation) when the list is non-empty;
    /// otherwise clears the active waypoint and disables cycling.
    /// Safe to call with a previous transition still in flight: its
    /// tweens are stopped and its completion can no longer match.
    pub fn set_waypoints(
        &mut self,
        waypoints: Vec<CameraWaypoint>,
        timeline: &mut TweenTimeline,
    ) {
        self.cancel_active(timeline);
        self.waypoints = waypoints;
        self.index = 0;
        if let Some(first) = self.waypoints.first().cloned() {
            self.camera.apply_waypoint(&first);
        }
    }

    /// Drop all waypoints and any in-flight transition.
    pub fn clear(&mut self, timeline: &mut TweenTimeline) {
        self.set_waypoints(Vec::new(), timeline);
    }

    fn cancel_active(&mut self, timeline: &mut TweenTimeline) {
        if let Some(transition) = self.active.take() {
            for id in transition.channels {
                timeline.stop(id);
            }
        }
    }

    /// Advance to the next waypoint in cycling order.
    ///
    /// A total cyclic order: N advances return the index to its
    /// starting value. Fails silently (no-op, returns false) while a
    /// transition is in flight or the list is empty — busy requests
    /// are dropped, never queued.
    pub fn advance(&mut self, timeline: &mut TweenTimeline) -> bool {
        if self.active.is_some() || self.waypoints.is_empty() {
            return false;
        }
        self.index = (self.index + 1) % self.waypoints.len();
        let destination = self.waypoints[self.index].clone();
        self.fly_to(destination, timeline)
    }

    /// Fly to an arbitrary waypoint without touching the cycling
    /// index. No-op while a transition is already in flight.
    pub fn fly_to(
        &mut self,
        destination: CameraWaypoint,
        timeline: &mut TweenTimeline,
    ) -> bool {
        if self.active.is_some() {
            return false;
        }
        let frames = self.animation_frames;
        let azimuth = timeline.start_scalar(
            TweenChannel::CameraAzimuth,
            self.camera.azimuth,
            destination.azimuth,
            frames,
            self.easing,
        );
        let polar = timeline.start_scalar(
            TweenChannel::CameraPolar,
            self.camera.polar,
            destination.polar,
            frames,
            self.easing,
        );
        let radius = timeline.start_scalar(
            TweenChannel::CameraRadius,
            self.camera.radius,
            destination.radius,
            frames,
            self.easing,
        );
        let target = timeline.start_vector(
            TweenChannel::CameraTarget,
            self.camera.target,
            destination.target,
            frames,
            self.easing,
        );
        self.active = Some(CameraTransition {
            channels: [azimuth, polar, radius, target],
            target_tween: target,
            destination,
        });
        true
    }

    /// Consume the current tick's samples and completions.
    ///
    /// Interpolated camera channels are written through; when the
    /// target tween (the last-finishing parameter) completes, all
    /// four tweens are stopped explicitly (idempotent against the
    /// timeline having auto-completed them) and the exact destination
    /// pose is snapped in, eliminating interpolation drift.
    pub fn apply_frame(&mut self, timeline: &mut TweenTimeline) {
        for &(channel, value) in timeline.samples() {
            match (channel, value) {
                (TweenChannel::CameraAzimuth, TweenValue::Scalar(v)) => {
                    self.camera.azimuth = v;
                }
                (TweenChannel::CameraPolar, TweenValue::Scalar(v)) => {
                    self.camera.polar = v;
                }
                (TweenChannel::CameraRadius, TweenValue::Scalar(v)) => {
                    self.camera.radius = v;
                }
                (TweenChannel::CameraTarget, TweenValue::Vector(v)) => {
                    self.camera.target = v;
                }
                _ => {}
            }
        }

        let finished = self
            .active
            .as_ref()
            .is_some_and(|t| timeline.just_completed(t.target_tween));
        if finished {
            if let Some(transition) = self.active.take() {
                for id in transition.channels {
                    timeline.stop(id);
                }
                self.camera.apply_waypoint(&transition.destination);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::bounds::Bounds;
    use crate::camera::waypoint::standard_waypoints;
    use crate::options::CameraTuning;

    fn rig() -> (CameraChoreographer, TweenTimeline) {
        let camera = OrbitCamera::new(&CameraTuning::default());
        let mut choreographer = CameraChoreographer::new(camera, 10);
        let mut timeline = TweenTimeline::new();
        let bounds = Bounds {
            center: Vec3::ZERO,
            radius: 10.0,
            height: 4.0,
        };
        choreographer
            .set_waypoints(standard_waypoints(&bounds), &mut timeline);
        (choreographer, timeline)
    }

    fn run_to_idle(
        choreographer: &mut CameraChoreographer,
        timeline: &mut TweenTimeline,
    ) {
        for _ in 0..64 {
            let _ = timeline.tick();
            choreographer.apply_frame(timeline);
            if !choreographer.is_animating() {
                return;
            }
        }
        panic!("transition never settled");
    }

    #[test]
    fn set_waypoints_applies_first_immediately() {
        let (choreographer, _) = rig();
        assert_eq!(choreographer.current_index(), 0);
        assert!(!choreographer.is_animating());
        let cam = choreographer.camera();
        assert_eq!(cam.azimuth, (-60.0f32).to_radians());
        assert!((cam.radius - 14.0).abs() < 1e-5);
    }

    #[test]
    fn empty_waypoints_disable_cycling() {
        let (mut choreographer, mut timeline) = rig();
        choreographer.clear(&mut timeline);
        assert!(!choreographer.cycling_available());
        assert!(!choreographer.advance(&mut timeline));
        assert!(choreographer.current_waypoint().is_none());
    }

    #[test]
    fn advance_is_a_total_cyclic_order() {
        let (mut choreographer, mut timeline) = rig();
        let start = choreographer.current_index();
        for _ in 0..4 {
            assert!(choreographer.advance(&mut timeline));
            run_to_idle(&mut choreographer, &mut timeline);
        }
        assert_eq!(choreographer.current_index(), start);
    }

    #[test]
    fn advance_while_animating_is_dropped() {
        let (mut choreographer, mut timeline) = rig();
        assert!(choreographer.advance(&mut timeline));
        let index = choreographer.current_index();
        assert!(!choreographer.advance(&mut timeline));
        assert_eq!(choreographer.current_index(), index);
    }

    #[test]
    fn transition_snaps_exact_destination() {
        let (mut choreographer, mut timeline) = rig();
        let _ = choreographer.advance(&mut timeline);
        let destination = choreographer.current_waypoint().cloned().unwrap();
        run_to_idle(&mut choreographer, &mut timeline);

        let cam = choreographer.camera();
        assert_eq!(cam.azimuth, destination.azimuth);
        assert_eq!(cam.polar, destination.polar);
        assert_eq!(cam.radius, destination.radius);
        assert_eq!(cam.target, destination.target);
        assert!(!cam.has_inertia());
        assert!(timeline.active_count() == 0);
    }

    #[test]
    fn transition_clears_user_drag_residue() {
        let (mut choreographer, mut timeline) = rig();
        let _ = choreographer.advance(&mut timeline);
        choreographer.camera_mut().orbit(glam::Vec2::new(4.0, 1.0));
        run_to_idle(&mut choreographer, &mut timeline);
        assert!(!choreographer.camera().has_inertia());
    }

    #[test]
    fn set_waypoints_mid_flight_lands_on_new_first() {
        let (mut choreographer, mut timeline) = rig();
        let _ = choreographer.advance(&mut timeline);
        let _ = timeline.tick();
        choreographer.apply_frame(&mut timeline);
        assert!(choreographer.is_animating());

        let replacement = vec![CameraWaypoint::new(
            "Only",
            0.3,
            0.9,
            21.0,
            Vec3::new(1.0, 0.0, 1.0),
        )];
        choreographer.set_waypoints(replacement, &mut timeline);
        assert!(!choreographer.is_animating());
        assert_eq!(choreographer.camera().radius, 21.0);

        // The superseded tweens were stopped; further ticks leave the
        // new pose untouched.
        for _ in 0..16 {
            let _ = timeline.tick();
            choreographer.apply_frame(&mut timeline);
        }
        assert_eq!(choreographer.camera().radius, 21.0);
        assert_eq!(choreographer.camera().azimuth, 0.3);
    }

    #[test]
    fn fly_to_leaves_cycling_index_alone() {
        let (mut choreographer, mut timeline) = rig();
        let index = choreographer.current_index();
        let wp =
            CameraWaypoint::new("Interior", 0.1, 0.7, 9.0, Vec3::ZERO);
        assert!(choreographer.fly_to(wp, &mut timeline));
        run_to_idle(&mut choreographer, &mut timeline);
        assert_eq!(choreographer.current_index(), index);
    }
}
