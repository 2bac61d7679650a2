// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Viewer orchestration core for interactive architectural model
//! walkthroughs.
//!
//! Maquette drives a single-page 3D model viewer sitting on top of an
//! external rendering engine: it loads one of several scene-graph
//! bundles, cycles the camera between pre-computed viewpoints, and
//! toggles an expanded "level" view that lifts the roof and reveals
//! interior geometry with camera-facing text labels. The engine's
//! mesh/material/GPU concerns stay outside; the crate owns the
//! stateful orchestration in between.
//!
//! # Key entry points
//!
//! - [`viewer::Viewer`] - the controller owning all viewer state
//! - [`scene::SceneGraph`] - the flat scene-graph facade the host
//!   populates during import
//! - [`backend`] - the two traits a host implements (content import,
//!   text overlays)
//! - [`options::ViewerOptions`] - runtime configuration with TOML
//!   preset support
//!
//! # Architecture
//!
//! Everything is single-threaded and cooperative. The host calls
//! [`viewer::Viewer::tick`] once per rendered frame; the frame-counted
//! tween timeline advances, the camera choreographer and level-toggle
//! controller consume its samples and completions, and the billboard
//! label renderer re-orients its overlays against the new camera pose.
//! Conflicting user actions are dropped on busy flags, never queued.

pub mod animation;
pub mod backend;
pub mod bounds;
pub mod camera;
pub mod error;
pub mod labels;
pub mod level;
pub mod options;
pub mod resolve;
pub mod scene;
pub mod viewer;
