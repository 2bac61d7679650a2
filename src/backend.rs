//! Host engine integration seams.
//!
//! The orchestration core consumes exactly two capabilities it cannot
//! provide itself: importing a content bundle into the scene graph,
//! and creating/positioning camera-facing text overlays. Both are
//! narrow traits the embedding host implements against its real
//! engine; tests implement them with in-memory doubles.

use glam::Mat4;

use crate::error::MaquetteError;
use crate::scene::{ImportedContent, SceneGraph};

/// Handle to a host-owned text overlay. The viewer owns the handle
/// lifecycle (it disposes every overlay before the anchor nodes go
/// away); the host owns the underlying resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OverlayId(
    /// Host-assigned overlay number.
    pub u32,
);

/// Imports named content bundles into the scene graph.
///
/// The core calls this synchronously; a host whose import pipeline is
/// asynchronous resolves it on its own scheduler and invokes the load
/// operation once the bytes are available.
pub trait ModelSource {
    /// Import `model` into `graph`, returning handles to everything
    /// the bundle produced.
    fn import(
        &mut self,
        graph: &mut SceneGraph,
        model: &str,
    ) -> Result<ImportedContent, MaquetteError>;
}

/// Creates and positions camera-facing text overlays.
pub trait OverlayBackend {
    /// Create an overlay rendering `text`. Fails when the font or
    /// overlay resource is unavailable; the label feature then
    /// degrades silently.
    fn create_overlay(
        &mut self,
        text: &str,
    ) -> Result<OverlayId, MaquetteError>;

    /// Set an overlay's transform, expressed in its anchor's local
    /// space (the overlay is parented to the anchor).
    fn set_local_transform(&mut self, overlay: OverlayId, transform: Mat4);

    /// Release an overlay's resources. Must tolerate repeat calls.
    fn dispose_overlay(&mut self, overlay: OverlayId);
}
