//! X-mirror preprocessing.
//!
//! Every part marked `xMirrored` gets a clone part whose id is the source
//! id with its hex digits reversed. The clone carries
//! `__mirrorFromPartId` and reads its nodes from the source; the sweep
//! negates X. Each leaf component linking a mirrored part gets a sibling
//! leaf linking the clone.

use crate::snapshot::{bool_value, component_children, component_linked_part, PropertyBag, Snapshot, ROOT_COMPONENT_ID};
use std::collections::BTreeMap;
use tracing::debug;

/// Deterministic id of a mirror clone.
///
/// A UUID (braces and hyphens optional) has its 32 hex digits reversed and
/// is re-emitted in braced `8-4-4-4-12` form. Any other id is reversed
/// character-wise and suffixed with `~` so it cannot equal its source.
///
/// # Example
///
/// ```rust
/// use skeleton_mesh::generator::reverse_uuid;
///
/// assert_eq!(
///     reverse_uuid("{12345678-9abc-def0-1234-56789abcdef0}"),
///     "{0fedcba9-8765-4321-0fed-cba987654321}"
/// );
/// ```
pub fn reverse_uuid(id: &str) -> String {
    let digits: String = id.chars().filter(|c| !matches!(c, '{' | '}' | '-')).collect();
    if digits.len() != 32 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        let reversed: String = id.chars().rev().collect();
        return format!("{reversed}~");
    }
    let reversed: String = digits.chars().rev().collect();
    format!(
        "{{{}-{}-{}-{}-{}}}",
        &reversed[0..8],
        &reversed[8..12],
        &reversed[12..16],
        &reversed[16..20],
        &reversed[20..32]
    )
}

/// Adds mirror clone parts and components to `snapshot`.
///
/// Returns clone part id to source part id for every clone created.
/// Running it again on its own output adds nothing.
pub fn preprocess_mirror(snapshot: &mut Snapshot) -> BTreeMap<String, String> {
    let mut mirrors: BTreeMap<String, String> = BTreeMap::new();
    let sources: Vec<String> = snapshot
        .parts
        .iter()
        .filter(|(_, part)| bool_value(part, "xMirrored") && !part.contains_key("__mirrorFromPartId"))
        .map(|(id, _)| id.clone())
        .collect();
    for source_id in sources {
        let clone_id = reverse_uuid(&source_id);
        if snapshot.parts.contains_key(&clone_id) {
            continue;
        }
        let Some(source) = snapshot.parts.get_mut(&source_id) else {
            continue;
        };
        source.insert("__mirroredByPartId".into(), clone_id.clone());
        let mut clone = source.clone();
        clone.remove("__mirroredByPartId");
        clone.insert("id".into(), clone_id.clone());
        clone.insert("__mirrorFromPartId".into(), source_id.clone());
        snapshot.parts.insert(clone_id.clone(), clone);
        debug!(part_id = %source_id, mirror_id = %clone_id, "Mirrored part");
        mirrors.insert(clone_id, source_id);
    }
    if mirrors.is_empty() {
        return mirrors;
    }

    let mut parents: BTreeMap<String, String> = BTreeMap::new();
    for child in component_children(&snapshot.root_component) {
        parents.insert(child, ROOT_COMPONENT_ID.to_string());
    }
    for (id, component) in &snapshot.components {
        for child in component_children(component) {
            parents.insert(child, id.clone());
        }
    }

    let source_to_clone: BTreeMap<&str, &str> = mirrors
        .iter()
        .map(|(clone, source)| (source.as_str(), clone.as_str()))
        .collect();
    let mut clones: Vec<(String, PropertyBag, String)> = Vec::new();
    for (id, component) in &snapshot.components {
        let Some(clone_part_id) = component_linked_part(component).and_then(|part| source_to_clone.get(part)) else {
            continue;
        };
        let clone_id = reverse_uuid(id);
        if snapshot.components.contains_key(&clone_id) {
            continue;
        }
        let mut clone = component.clone();
        clone.insert("id".into(), clone_id.clone());
        clone.insert("linkData".into(), clone_part_id.to_string());
        let parent = parents
            .get(id)
            .cloned()
            .unwrap_or_else(|| ROOT_COMPONENT_ID.to_string());
        clones.push((clone_id, clone, parent));
    }
    for (clone_id, clone, parent) in clones {
        if let Some(parent) = snapshot.component_mut(&parent) {
            let children = parent.entry("children".into()).or_default();
            if !children.is_empty() {
                children.push(',');
            }
            children.push_str(&clone_id);
        }
        snapshot.components.insert(clone_id, clone);
    }
    mirrors
}
