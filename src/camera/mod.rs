//! Orbit camera state, named waypoints, and the choreographer that
//! drives interpolated transitions between them.

mod choreographer;
mod core;
mod waypoint;

pub use choreographer::CameraChoreographer;
pub use core::OrbitCamera;
pub use waypoint::{level_waypoint, standard_waypoints, CameraWaypoint};
