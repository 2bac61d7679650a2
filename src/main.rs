//! Headless demo driver: builds procedural house bundles, then walks
//! the full viewer surface — waypoint cycling, the level view, and
//! model rotation — while logging what the UI glue would observe.

use glam::{Mat4, Vec3};
use maquette::backend::{ModelSource, OverlayBackend, OverlayId};
use maquette::error::MaquetteError;
use maquette::options::ViewerOptions;
use maquette::scene::{Aabb, ImportedContent, SceneGraph, SceneNode};
use maquette::viewer::Viewer;

/// Procedural stand-in for the host's asset import pipeline. Each
/// model name yields a small house: walls, a liftable roof, and a
/// labelled interior level.
struct ProceduralSource;

fn slab(half: Vec3) -> Aabb {
    Aabb::new(-half, half)
}

impl ModelSource for ProceduralSource {
    fn import(
        &mut self,
        graph: &mut SceneGraph,
        model: &str,
    ) -> Result<ImportedContent, MaquetteError> {
        // Vary footprint per variant so each load frames differently.
        let footprint = 4.0 + (model.len() % 4) as f32;

        let root = graph.add_node(SceneNode::transform(model), None);
        let mut meshes = Vec::new();

        let walls = graph.add_node(
            SceneNode::mesh(
                "Walls",
                512,
                Some(slab(Vec3::new(footprint, 2.5, footprint))),
            )
            .with_position(Vec3::new(0.0, 2.5, 0.0)),
            Some(root),
        );
        meshes.push(walls);

        let roof = graph.add_node(
            SceneNode::mesh(
                "Roof",
                256,
                Some(slab(Vec3::new(footprint + 0.5, 0.8, footprint + 0.5))),
            )
            .with_position(Vec3::new(0.0, 5.5, 0.0)),
            Some(root),
        );
        meshes.push(roof);

        let level = graph.add_node(SceneNode::transform("Level1"), Some(root));
        let floor = graph.add_node(
            SceneNode::mesh(
                "Floor",
                128,
                Some(slab(Vec3::new(footprint, 0.2, footprint))),
            )
            .with_position(Vec3::new(0.0, 0.2, 0.0)),
            Some(level),
        );
        meshes.push(floor);
        let anchor = graph.add_node(
            SceneNode::mesh(
                "Kitchen_Label",
                4,
                Some(slab(Vec3::new(0.8, 0.2, 0.8))),
            )
            .with_position(Vec3::new(footprint * 0.4, 1.2, 0.0))
            .with_metadata(serde_json::json!({
                "extras": { "layerName": "Kitchen" }
            })),
            Some(level),
        );
        meshes.push(anchor);

        let group = graph.add_animation_group("door-swing");
        Ok(ImportedContent {
            root_nodes: vec![root],
            meshes,
            animation_groups: vec![group],
            skeletons: Vec::new(),
        })
    }
}

/// Overlay backend that only tracks handles; a real host would build
/// text quads here.
#[derive(Default)]
struct LoggingOverlays {
    next_id: u32,
}

impl OverlayBackend for LoggingOverlays {
    fn create_overlay(
        &mut self,
        text: &str,
    ) -> Result<OverlayId, MaquetteError> {
        let id = self.next_id;
        self.next_id += 1;
        log::info!("overlay #{id} created: \"{text}\"");
        Ok(OverlayId(id))
    }

    fn set_local_transform(&mut self, _overlay: OverlayId, _t: Mat4) {}

    fn dispose_overlay(&mut self, overlay: OverlayId) {
        log::info!("overlay #{} disposed", overlay.0);
    }
}

fn run_frames(viewer: &mut Viewer, frames: u32) {
    for _ in 0..frames {
        viewer.tick();
    }
}

fn log_pose(viewer: &Viewer) {
    let cam = viewer.camera();
    log::info!(
        "pose: azimuth {:.2} polar {:.2} radius {:.2} eye {:?}",
        cam.azimuth,
        cam.polar,
        cam.radius,
        cam.eye()
    );
}

fn run() -> Result<(), MaquetteError> {
    let options = match std::env::args().nth(1) {
        Some(path) => ViewerOptions::load(std::path::Path::new(&path))?,
        None => ViewerOptions::default(),
    };
    let frames = options.camera.animation_frames;

    let models = vec![
        "Option1.glb".to_owned(),
        "Option2.glb".to_owned(),
        "Option3.glb".to_owned(),
    ];
    let mut viewer = Viewer::new(
        options,
        models,
        Box::new(ProceduralSource),
        Box::new(LoggingOverlays::default()),
    )?;

    if !viewer.load_initial() {
        return Err(MaquetteError::Import(
            "initial load failed".to_owned(),
        ));
    }
    log_pose(&viewer);

    // Cycle through every exterior waypoint.
    for _ in 0..viewer.waypoints().len() {
        if viewer.cycle_camera() {
            run_frames(&mut viewer, frames + 1);
            log_pose(&viewer);
        }
    }

    // Enter and leave the level view.
    if viewer.toggle_level_view(Some(true)) {
        run_frames(&mut viewer, frames + 1);
        log::info!(
            "level view active: {} (labels: {})",
            viewer.is_level_view_active(),
            viewer.label_overlay_count()
        );
        log_pose(&viewer);
        let _ = viewer.toggle_level_view(Some(false));
        run_frames(&mut viewer, frames + 1);
        log_pose(&viewer);
    }

    // Walk the rest of the rotation.
    while viewer.current_model_index() + 1 < viewer.model_files().len() {
        if !viewer.load_next() {
            break;
        }
        log::info!(
            "model {}/{} loaded",
            viewer.current_model_index() + 1,
            viewer.model_files().len()
        );
        run_frames(&mut viewer, 2);
    }

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
