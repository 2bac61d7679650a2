//! Orbit camera state.

use glam::{Vec2, Vec3};

use super::waypoint::CameraWaypoint;
use crate::options::CameraTuning;

/// Offsets below this magnitude are treated as settled.
const INERTIA_EPSILON: f32 = 1e-4;
/// Keep the polar angle off the poles so the view basis stays stable.
const POLAR_MARGIN: f32 = 0.01;

/// Orbit camera defined by azimuth/polar angles, radius, and a
/// look-at target, plus the residual input deltas user interaction
/// leaves behind.
///
/// Angles are raw radians with no wraparound normalization; scripted
/// transitions interpolate between values drawn from a fixed small
/// set per load, so differences stay within one cycle.
pub struct OrbitCamera {
    /// Azimuth angle around the up axis, radians.
    pub azimuth: f32,
    /// Polar angle from the up axis, radians.
    pub polar: f32,
    /// Distance from the target.
    pub radius: f32,
    /// Look-at target position.
    pub target: Vec3,
    /// Minimum radius user zoom may reach.
    pub lower_radius_limit: f32,
    /// Maximum radius user zoom may reach.
    pub upper_radius_limit: f32,

    inertial_azimuth: f32,
    inertial_polar: f32,
    inertial_radius: f32,
    inertial_pan: Vec2,
    damping: f32,
    orbit_speed: f32,
    zoom_speed: f32,
    pan_speed: f32,
}

impl OrbitCamera {
    /// Camera at the configured initial pose.
    #[must_use]
    pub fn new(tuning: &CameraTuning) -> Self {
        Self {
            azimuth: tuning.initial_azimuth_deg.to_radians(),
            polar: tuning.initial_polar_deg.to_radians(),
            radius: tuning.initial_radius,
            target: Vec3::ZERO,
            lower_radius_limit: tuning.lower_radius_limit,
            upper_radius_limit: tuning.upper_radius_limit,
            inertial_azimuth: 0.0,
            inertial_polar: 0.0,
            inertial_radius: 0.0,
            inertial_pan: Vec2::ZERO,
            damping: tuning.inertia,
            orbit_speed: tuning.orbit_speed,
            zoom_speed: tuning.zoom_speed,
            pan_speed: tuning.pan_speed,
        }
    }

    /// World-space eye position derived from the orbit parameters.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let sp = self.polar.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sp * self.azimuth.cos(),
                    self.polar.cos(),
                    sp * self.azimuth.sin(),
                )
    }

    /// Snap to a waypoint. Zeroes residual input deltas so damping
    /// artifacts from an earlier drag cannot drift the pose after a
    /// scripted transition lands.
    pub fn apply_waypoint(&mut self, waypoint: &CameraWaypoint) {
        self.azimuth = waypoint.azimuth;
        self.polar = waypoint.polar;
        self.radius = waypoint.radius;
        self.target = waypoint.target;
        self.clear_inertia();
        if waypoint.label.is_empty() {
            log::info!("camera: (unnamed)");
        } else {
            log::info!("camera: {}", waypoint.label);
        }
    }

    /// Capture the current pose as a waypoint.
    #[must_use]
    pub fn capture(&self, label: impl Into<String>) -> CameraWaypoint {
        CameraWaypoint {
            label: label.into(),
            azimuth: self.azimuth,
            polar: self.polar,
            radius: self.radius,
            target: self.target,
        }
    }

    /// Drop all residual input deltas.
    pub fn clear_inertia(&mut self) {
        self.inertial_azimuth = 0.0;
        self.inertial_polar = 0.0;
        self.inertial_radius = 0.0;
        self.inertial_pan = Vec2::ZERO;
    }

    /// Whether any residual input delta remains.
    #[must_use]
    pub fn has_inertia(&self) -> bool {
        self.inertial_azimuth != 0.0
            || self.inertial_polar != 0.0
            || self.inertial_radius != 0.0
            || self.inertial_pan != Vec2::ZERO
    }

    /// Accumulate a drag delta into the rotation offsets.
    pub fn orbit(&mut self, delta: Vec2) {
        self.inertial_azimuth += delta.x * self.orbit_speed;
        self.inertial_polar += delta.y * self.orbit_speed;
    }

    /// Accumulate a wheel delta into the radius offset.
    pub fn zoom(&mut self, delta: f32) {
        self.inertial_radius -= delta * self.zoom_speed * self.radius;
    }

    /// Accumulate a pan delta into the target offset.
    pub fn pan(&mut self, delta: Vec2) {
        self.inertial_pan += delta * self.pan_speed;
    }

    /// Apply and decay residual input deltas for one frame.
    pub fn step_inertia(&mut self) {
        if !self.has_inertia() {
            return;
        }

        self.azimuth += self.inertial_azimuth;
        self.polar = (self.polar + self.inertial_polar)
            .clamp(POLAR_MARGIN, std::f32::consts::PI - POLAR_MARGIN);
        self.radius = (self.radius + self.inertial_radius)
            .clamp(self.lower_radius_limit, self.upper_radius_limit);

        if self.inertial_pan != Vec2::ZERO {
            let forward = (self.target - self.eye()).normalize_or_zero();
            let right = Vec3::Y.cross(forward).normalize_or_zero();
            let up = forward.cross(right);
            self.target += right * self.inertial_pan.x
                + up * self.inertial_pan.y;
        }

        self.inertial_azimuth *= self.damping;
        self.inertial_polar *= self.damping;
        self.inertial_radius *= self.damping;
        self.inertial_pan *= self.damping;
        if self.inertial_azimuth.abs() < INERTIA_EPSILON {
            self.inertial_azimuth = 0.0;
        }
        if self.inertial_polar.abs() < INERTIA_EPSILON {
            self.inertial_polar = 0.0;
        }
        if self.inertial_radius.abs() < INERTIA_EPSILON {
            self.inertial_radius = 0.0;
        }
        if self.inertial_pan.length_squared()
            < INERTIA_EPSILON * INERTIA_EPSILON
        {
            self.inertial_pan = Vec2::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(&CameraTuning::default())
    }

    #[test]
    fn eye_is_radius_away_from_target() {
        let cam = camera();
        assert!((cam.eye() - cam.target).length() - cam.radius < 1e-4);
    }

    #[test]
    fn eye_straight_up_at_zero_polar() {
        let mut cam = camera();
        cam.polar = 0.0;
        cam.radius = 10.0;
        cam.target = Vec3::ZERO;
        assert!((cam.eye() - Vec3::new(0.0, 10.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn apply_waypoint_clears_inertia() {
        let mut cam = camera();
        cam.orbit(Vec2::new(5.0, 3.0));
        cam.zoom(2.0);
        assert!(cam.has_inertia());

        let wp = CameraWaypoint::new("Front", 0.0, 1.2, 18.0, Vec3::ZERO);
        cam.apply_waypoint(&wp);
        assert!(!cam.has_inertia());
        assert_eq!(cam.azimuth, 0.0);
        assert_eq!(cam.radius, 18.0);
    }

    #[test]
    fn inertia_decays_to_zero() {
        let mut cam = camera();
        cam.orbit(Vec2::new(10.0, 0.0));
        for _ in 0..200 {
            cam.step_inertia();
        }
        assert!(!cam.has_inertia());
    }

    #[test]
    fn zoom_respects_radius_limits() {
        let mut cam = camera();
        for _ in 0..100 {
            cam.zoom(50.0);
            cam.step_inertia();
        }
        assert!(cam.radius >= cam.lower_radius_limit);
        cam.clear_inertia();
        for _ in 0..100 {
            cam.zoom(-50.0);
            cam.step_inertia();
        }
        assert!(cam.radius <= cam.upper_radius_limit);
    }

    #[test]
    fn capture_round_trips_through_apply() {
        let mut cam = camera();
        cam.azimuth = 1.0;
        cam.polar = 0.8;
        cam.radius = 42.0;
        cam.target = Vec3::new(1.0, 2.0, 3.0);
        let pose = cam.capture("saved");

        let mut other = camera();
        other.apply_waypoint(&pose);
        assert_eq!(other.azimuth, 1.0);
        assert_eq!(other.polar, 0.8);
        assert_eq!(other.radius, 42.0);
        assert_eq!(other.target, Vec3::new(1.0, 2.0, 3.0));
    }
}
