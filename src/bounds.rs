//! Bounding-volume accumulation and camera framing derivation.

use glam::Vec3;

use crate::scene::{NodeHandle, SceneGraph};

/// Floor on the derived framing radius; avoids degenerate framing on
/// tiny meshes.
pub const MIN_FRAMING_RADIUS: f32 = 8.0;
/// Floor on the derived height.
pub const MIN_FRAMING_HEIGHT: f32 = 1.0;
/// Fraction of the bounds diagonal used as the framing radius.
const DIAGONAL_FRAMING_SCALE: f32 = 0.6;

/// Axis-aligned bounding volume with derived camera framing values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Center of the accumulated box.
    pub center: Vec3,
    /// Framing radius, `max(diagonal * 0.6, 8)`.
    pub radius: f32,
    /// Vertical extent, `max(extent.y, 1)`.
    pub height: f32,
}

/// Accumulate hierarchy-inclusive bounds over a set of meshes.
///
/// Meshes that cannot report bounds are skipped. Returns `None` when
/// no mesh reported — callers treat that as "no camera framing
/// possible" and reset their camera state.
#[must_use]
pub fn compute_bounds(
    graph: &SceneGraph,
    meshes: &[NodeHandle],
) -> Option<Bounds> {
    if meshes.is_empty() {
        return None;
    }

    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    let mut has_bounds = false;

    for &mesh in meshes {
        let Some(aabb) = graph.hierarchy_bounds(mesh) else {
            continue;
        };
        min = min.min(aabb.min);
        max = max.max(aabb.max);
        has_bounds = true;
    }

    if !has_bounds {
        return None;
    }

    let center = (min + max) * 0.5;
    let extent = max - min;
    Some(Bounds {
        center,
        radius: (extent.length() * DIAGONAL_FRAMING_SCALE)
            .max(MIN_FRAMING_RADIUS),
        height: extent.y.max(MIN_FRAMING_HEIGHT),
    })
}
