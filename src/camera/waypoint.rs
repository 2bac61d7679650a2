//! Named camera poses and per-load waypoint derivation.

use glam::Vec3;

use crate::bounds::Bounds;

/// A named camera pose. Immutable once constructed; each load derives
/// a fresh ordered sequence (insertion order = cycling order).
#[derive(Clone, Debug, PartialEq)]
pub struct CameraWaypoint {
    /// Display label, logged when the pose is applied.
    pub label: String,
    /// Azimuth angle, radians.
    pub azimuth: f32,
    /// Polar angle, radians.
    pub polar: f32,
    /// Orbit radius; always positive.
    pub radius: f32,
    /// Look-at target.
    pub target: Vec3,
}

impl CameraWaypoint {
    /// Waypoint from raw components.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        azimuth: f32,
        polar: f32,
        radius: f32,
        target: Vec3,
    ) -> Self {
        Self {
            label: label.into(),
            azimuth,
            polar,
            radius,
            target,
        }
    }
}

/// The standard exterior waypoint set for a freshly loaded model.
///
/// Angles and radius multipliers are authoring constants; the target
/// stays at the origin rather than the bounds center so all four
/// views share one pivot.
#[must_use]
pub fn standard_waypoints(bounds: &Bounds) -> Vec<CameraWaypoint> {
    let base_target = Vec3::ZERO;
    vec![
        CameraWaypoint::new(
            "Perspective",
            (-60.0f32).to_radians(),
            70.0f32.to_radians(),
            bounds.radius * 1.4,
            base_target,
        ),
        CameraWaypoint::new(
            "Front",
            0.0,
            70.0f32.to_radians(),
            bounds.radius * 1.2,
            base_target,
        ),
        CameraWaypoint::new(
            "Side",
            90.0f32.to_radians(),
            65.0f32.to_radians(),
            bounds.radius * 1.1,
            base_target,
        ),
        CameraWaypoint::new(
            "Top",
            0.0,
            0.0,
            bounds.radius * 1.4,
            base_target,
        ),
    ]
}

/// The interior waypoint for the expanded level view, framed on the
/// level sub-root's own bounds.
#[must_use]
pub fn level_waypoint(bounds: &Bounds) -> CameraWaypoint {
    CameraWaypoint::new(
        "Level",
        (-45.0f32).to_radians(),
        55.0f32.to_radians(),
        bounds.radius * 1.15,
        bounds.center,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds {
            center: Vec3::new(0.0, 3.0, 0.0),
            radius: 10.0,
            height: 6.0,
        }
    }

    #[test]
    fn standard_set_has_four_views_in_cycling_order() {
        let wps = standard_waypoints(&bounds());
        let labels: Vec<&str> =
            wps.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, ["Perspective", "Front", "Side", "Top"]);
    }

    #[test]
    fn radii_scale_from_framing_radius() {
        let wps = standard_waypoints(&bounds());
        assert!((wps[0].radius - 14.0).abs() < 1e-5);
        assert!((wps[1].radius - 12.0).abs() < 1e-5);
        assert!((wps[2].radius - 11.0).abs() < 1e-5);
        assert!((wps[3].radius - 14.0).abs() < 1e-5);
        assert!(wps.iter().all(|w| w.radius > 0.0));
    }

    #[test]
    fn top_view_looks_straight_down() {
        let wps = standard_waypoints(&bounds());
        assert_eq!(wps[3].polar, 0.0);
    }

    #[test]
    fn level_waypoint_targets_level_center() {
        let wp = level_waypoint(&bounds());
        assert_eq!(wp.target, Vec3::new(0.0, 3.0, 0.0));
        assert!((wp.radius - 11.5).abs() < 1e-5);
    }
}
