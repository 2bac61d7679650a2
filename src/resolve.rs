//! Heuristic resolution of semantically named nodes.
//!
//! Externally authored bundles never agree on naming: the roof node
//! arrives as `Roof`, `ROOF_Upper`, or `roof-main` depending on the
//! authoring tool. Resolution runs an ordered list of matcher
//! strategies and short-circuits on the first hit: exact name/id
//! lookup per alias, then a normalized affix scan over the flattened
//! node list. Layer extraction for label text walks the ancestor
//! metadata chain before falling back to the node's own name.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::scene::{NodeHandle, SceneGraph};

/// Metadata keys carrying a layer name, in priority order. Authoring
/// tools disagree on the spelling; all observed variants are listed.
const LAYER_KEYS: [&str; 9] = [
    "layerName",
    "LayerName",
    "layer",
    "Layer",
    "layerID",
    "LayerID",
    "Layer Id",
    "Layer id",
    "NX_Layer",
];

static LAYER_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    // The pattern is a literal; compilation cannot fail.
    #[allow(clippy::unwrap_used)]
    let re = Regex::new(r"(?i)layer[:\-\s_]*([A-Za-z0-9]+)$").unwrap();
    re
});

/// Lowercase a name and strip whitespace, hyphens, and underscores.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether a normalized node name matches a normalized alias: full
/// equality, or the alias at either end of the name (`roof` matches
/// both `roofupper` and `upperroof`).
fn affix_match(name: &str, alias: &str) -> bool {
    name == alias || name.starts_with(alias) || name.ends_with(alias)
}

/// Whether a raw node name matches a raw alias under normalization.
#[must_use]
pub fn matches_alias(name: &str, alias: &str) -> bool {
    let alias = normalize_name(alias);
    if alias.is_empty() {
        return false;
    }
    affix_match(&normalize_name(name), &alias)
}

/// Locate a node by any of the given aliases.
///
/// Exact name/id matches win over fuzzy ones, and among fuzzy matches
/// the first node in traversal order wins; the domain guarantees at
/// most one semantic hit per scene, so ties are not ordered further.
/// Never errors: an unresolvable alias set yields `None`.
#[must_use]
pub fn resolve_named<S: AsRef<str>>(
    graph: &SceneGraph,
    aliases: &[S],
) -> Option<NodeHandle> {
    for alias in aliases {
        if let Some(handle) = graph.by_exact_name(alias.as_ref()) {
            return Some(handle);
        }
    }
    for alias in aliases {
        let want = normalize_name(alias.as_ref());
        if want.is_empty() {
            continue;
        }
        for (handle, node) in graph.iter_live() {
            if affix_match(&normalize_name(&node.name), &want)
                || affix_match(&normalize_name(&node.id), &want)
            {
                return Some(handle);
            }
        }
    }
    None
}

/// Non-empty string or numeric metadata value, stringified.
fn value_to_layer(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract a layer name from one node's metadata blob: known keys at
/// the top level, then nested under `properties`, then `extras`, then
/// the first element of a `layers` array.
fn extract_layer_from_metadata(metadata: &Value) -> Option<String> {
    for key in LAYER_KEYS {
        if let Some(layer) = metadata.get(key).and_then(value_to_layer) {
            return Some(layer);
        }
    }
    for nested in ["properties", "extras"] {
        if let Some(section) = metadata.get(nested) {
            for key in LAYER_KEYS {
                if let Some(layer) =
                    section.get(key).and_then(value_to_layer)
                {
                    return Some(layer);
                }
            }
        }
    }
    metadata
        .get("layers")
        .and_then(Value::as_array)
        .and_then(|layers| layers.first())
        .and_then(value_to_layer)
}

/// Find the layer a node belongs to.
///
/// Walks the ancestor chain looking for layer metadata; failing that,
/// extracts a trailing `layer<name>` token from the node's own name,
/// or takes the first segment of a separator-delimited name. `None`
/// when every strategy misses.
#[must_use]
pub fn find_layer_name(
    graph: &SceneGraph,
    handle: NodeHandle,
) -> Option<String> {
    let mut current = Some(handle);
    while let Some(h) = current {
        if let Some(layer) = graph
            .node(h)
            .and_then(|n| n.metadata.as_ref())
            .and_then(extract_layer_from_metadata)
        {
            return Some(layer);
        }
        current = graph.parent(h);
    }

    let name = graph.node(handle).map(|n| n.name.clone())?;
    if let Some(captures) = LAYER_NAME_RE.captures(&name) {
        if let Some(m) = captures.get(1) {
            return Some(m.as_str().to_owned());
        }
    }
    let parts: Vec<&str> = name.split([':', '|', '_', '-']).collect();
    if parts.len() > 1 && !parts[0].is_empty() {
        return Some(parts[0].to_owned());
    }
    None
}
