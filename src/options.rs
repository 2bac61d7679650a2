//! Centralized viewer options with TOML preset support.
//!
//! All tweakable settings (camera tuning, level-view behavior, the
//! named-node highlight) are consolidated here. Options serialize
//! to/from TOML; every sub-struct uses `#[serde(default)]` so partial
//! files (e.g. only overriding `[level]`) work correctly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MaquetteError;

/// Camera projection-independent orbit tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraTuning {
    /// Initial azimuth, degrees.
    pub initial_azimuth_deg: f32,
    /// Initial polar angle, degrees.
    pub initial_polar_deg: f32,
    /// Initial orbit radius.
    pub initial_radius: f32,
    /// Minimum user-zoom radius.
    pub lower_radius_limit: f32,
    /// Maximum user-zoom radius.
    pub upper_radius_limit: f32,
    /// Scripted transition length in frames (60 fps frame units).
    pub animation_frames: u32,
    /// Per-frame decay factor for residual input deltas.
    pub inertia: f32,
    /// Radians of azimuth/polar change per unit of drag input.
    pub orbit_speed: f32,
    /// Radius change per unit of wheel input.
    pub zoom_speed: f32,
    /// Target translation per unit of pan input.
    pub pan_speed: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            initial_azimuth_deg: 140.0,
            initial_polar_deg: 65.0,
            initial_radius: 15.0,
            lower_radius_limit: 3.0,
            upper_radius_limit: 200.0,
            animation_frames: 90,
            inertia: 0.9,
            orbit_speed: 0.01,
            zoom_speed: 0.05,
            pan_speed: 0.1,
        }
    }
}

/// Level-view (roof lift + interior labels) options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LevelOptions {
    /// Aliases tried when resolving the liftable roof node.
    pub roof_aliases: Vec<String>,
    /// Aliases tried when resolving the level sub-root.
    pub level_aliases: Vec<String>,
    /// Aliases identifying text-anchor meshes beneath the level root.
    pub anchor_aliases: Vec<String>,
    /// Vertical roof lift, world units.
    pub lift_amount: f32,
    /// Margin above an anchor's bounding box for its label.
    pub label_margin: f32,
    /// Multiplier on the anchor extent that sizes a label overlay.
    pub label_scale: f32,
}

impl Default for LevelOptions {
    fn default() -> Self {
        Self {
            roof_aliases: vec!["roof".to_owned()],
            level_aliases: vec!["level1".to_owned()],
            anchor_aliases: vec!["label".to_owned(), "text".to_owned()],
            lift_amount: 6.0,
            label_margin: 0.5,
            label_scale: 1.0,
        }
    }
}

/// Named-node highlight applied after each successful load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HighlightOptions {
    /// Exact node name whose direct child meshes get the highlight
    /// material. Empty disables the feature.
    pub node_name: String,
    /// Albedo color of the highlight material.
    pub color: [f32; 3],
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            node_name: "400_BEAM".to_owned(),
            color: [1.0, 0.0, 0.0],
        }
    }
}

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ViewerOptions {
    /// Orbit camera tuning.
    pub camera: CameraTuning,
    /// Level-view behavior.
    pub level: LevelOptions,
    /// Named-node highlight.
    pub highlight: HighlightOptions,
}

impl ViewerOptions {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, MaquetteError> {
        let content =
            std::fs::read_to_string(path).map_err(MaquetteError::Io)?;
        toml::from_str(&content)
            .map_err(|e| MaquetteError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), MaquetteError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MaquetteError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MaquetteError::Io)?;
        }
        std::fs::write(path, content).map_err(MaquetteError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = ViewerOptions::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: ViewerOptions = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_overrides_one_section() {
        let parsed: ViewerOptions =
            toml::from_str("[level]\nlift_amount = 12.5\n").unwrap();
        assert_eq!(parsed.level.lift_amount, 12.5);
        assert_eq!(parsed.camera.animation_frames, 90);
        assert_eq!(parsed.highlight.node_name, "400_BEAM");
    }

    #[test]
    fn defaults_match_authoring_constants() {
        let opts = ViewerOptions::default();
        assert_eq!(opts.camera.animation_frames, 90);
        assert_eq!(opts.camera.initial_azimuth_deg, 140.0);
        assert_eq!(opts.camera.initial_polar_deg, 65.0);
        assert_eq!(opts.camera.initial_radius, 15.0);
        assert!(opts.level.roof_aliases.contains(&"roof".to_owned()));
    }
}
