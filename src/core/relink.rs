//! Re-linking a project description to a selection.
//!
//! Every table that references resources or folders is filtered so the
//! emitted description has no dangling references. The set of handled tables
//! is explicit; top-level sections outside it are either known not to carry
//! resource references ([`PASS_THROUGH_SECTIONS`]) or are reported by
//! [`unfiltered_references`].

use std::collections::HashSet;

use serde_json::Value;

use super::error::ExportError;
use super::path::{FOLDER_ROOT, FOLDER_SUFFIX};
use crate::domain::{PackageFields, ProjectDescription, ResourceIdentity, PACKAGE_TYPE_ASSET};

/// Top-level sections passed through unchanged: none of them references a resource.
pub const PASS_THROUGH_SECTIONS: &[&str] = &[
    "$GMProject",
    "%Name",
    "AudioGroups",
    "configs",
    "conversionMode",
    "defaultScriptType",
    "ForcedPrefabProjectReferences",
    "IncludedFiles",
    "isDnDProject",
    "isEcma",
    "LibraryEmitters",
    "name",
    "parent",
    "resourceType",
    "resourceVersion",
    "tags",
    "templateType",
    "TextureGroups",
    "tutorialPath",
];

/// Produce a new description restricted to the selected resources and folders.
///
/// The original is consumed. `Options` is reset since build-option overrides
/// belong to the source environment, and the metadata block is stamped with
/// the package identity.
pub fn relink(
    original: ProjectDescription,
    selected_resources: &[ResourceIdentity],
    selected_folders: &[String],
    fields: &PackageFields,
) -> Result<ProjectDescription, ExportError> {
    if selected_resources.is_empty() && !original.resources.is_empty() {
        return Err(ExportError::MissingSelection { what: "resources" });
    }
    if selected_folders.is_empty() && !original.folders.is_empty() {
        return Err(ExportError::MissingSelection { what: "folders" });
    }

    let resources: HashSet<&ResourceIdentity> = selected_resources.iter().collect();
    let folders: HashSet<&str> = selected_folders.iter().map(String::as_str).collect();

    let mut description = original;

    description.resources.retain(|entry| resources.contains(&entry.id));
    description
        .folders
        .retain(|folder| folders.contains(folder.folder_path.as_str()));
    description
        .room_order_nodes
        .retain(|node| resources.contains(&node.room_id));
    description.options.clear();

    let meta = &mut description.meta_data;
    meta.package_type = Some(PACKAGE_TYPE_ASSET.to_string());
    meta.package_name = Some(fields.display_name.clone());
    meta.package_id = Some(fields.id.clone());
    meta.package_publisher = Some(fields.publisher.clone());
    meta.package_version = Some(fields.version.clone());

    Ok(description)
}

/// Names of top-level sections that neither the re-linker nor the pass-through
/// list covers and that reference a resource missing from `resources`.
pub fn unfiltered_references(description: &ProjectDescription) -> Vec<String> {
    let present: HashSet<&ResourceIdentity> = description.resource_ids().collect();

    description
        .sections
        .iter()
        .filter(|(key, _)| !PASS_THROUGH_SECTIONS.contains(&key.as_str()))
        .filter(|(_, value)| {
            let mut found = Vec::new();
            collect_identity_refs(value, &mut found);
            found.iter().any(|id| !present.contains(id))
        })
        .map(|(key, _)| key.clone())
        .collect()
}

/// Gather `{name, path}` objects whose path looks like a resource file
fn collect_identity_refs(value: &Value, found: &mut Vec<ResourceIdentity>) {
    match value {
        Value::Object(map) => {
            if let (Some(Value::String(name)), Some(Value::String(path))) =
                (map.get("name"), map.get("path"))
            {
                let is_folder = path.starts_with(&format!("{FOLDER_ROOT}/"));
                if path.ends_with(FOLDER_SUFFIX) && !is_folder {
                    found.push(ResourceIdentity::new(name.as_str(), path.as_str()));
                }
            }
            for child in map.values() {
                collect_identity_refs(child, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_identity_refs(item, found);
            }
        }
        _ => {}
    }
}
