//! Project description document (`.yyp`).
//!
//! Only the tables that reference resources or folders are typed. Every other
//! top-level section, and every unknown field inside a typed row, is kept
//! verbatim so a re-linked description round-trips everything it does not
//! touch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::identity::ResourceIdentity;

/// Package type stamped into re-linked descriptions
pub const PACKAGE_TYPE_ASSET: &str = "Asset";

/// Tables omitted from the output when the source had none
const OPTIONAL_TABLES: &[&str] = &["Options", "RoomOrderNodes"];

/// The full project description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescription {
    /// Resource table
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,

    /// Virtual folder table
    #[serde(rename = "Folders", default)]
    pub folders: Vec<FolderDescriptor>,

    /// Room ordering table, keyed by room identity
    #[serde(rename = "RoomOrderNodes", default)]
    pub room_order_nodes: Vec<RoomOrderNode>,

    /// Build-option overrides (environment specific)
    #[serde(rename = "Options", default)]
    pub options: Vec<Value>,

    /// Descriptive metadata block
    #[serde(rename = "MetaData", default)]
    pub meta_data: MetaData,

    /// All remaining top-level sections, in source order
    #[serde(flatten)]
    pub sections: Map<String, Value>,

    /// Top-level key order of the source document
    #[serde(skip)]
    layout: Vec<String>,
}

impl ProjectDescription {
    /// Build a description from a parsed JSON document, remembering its key order.
    pub fn from_document(document: Value) -> serde_json::Result<Self> {
        let layout = match &document {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        };

        let mut description: Self = serde_json::from_value(document)?;
        description.layout = layout;
        Ok(description)
    }

    /// Serialize back to a JSON document, top-level keys in source order.
    ///
    /// Keys absent from the source come after the known ones.
    pub fn to_document(&self) -> serde_json::Result<Value> {
        let mut fields: Vec<(String, Value)> = match serde_json::to_value(self)? {
            Value::Object(map) => map.into_iter().collect(),
            other => return Ok(other),
        };

        // Tables absent from the source stay absent unless something was added to them
        fields.retain(|(key, value)| {
            let optional = OPTIONAL_TABLES.contains(&key.as_str());
            let absent = !self.layout.contains(key);
            let empty = value.as_array().is_some_and(Vec::is_empty);
            !(optional && absent && empty)
        });

        let mut ordered = Map::with_capacity(fields.len());
        for key in &self.layout {
            if let Some(pos) = fields.iter().position(|(k, _)| k == key) {
                let (key, value) = fields.remove(pos);
                ordered.insert(key, value);
            }
        }
        ordered.extend(fields);

        Ok(Value::Object(ordered))
    }

    /// Identities listed in the resource table
    pub fn resource_ids(&self) -> impl Iterator<Item = &ResourceIdentity> {
        self.resources.iter().map(|r| &r.id)
    }

    /// Project name, from the `name` section if present
    pub fn name(&self) -> Option<&str> {
        self.sections.get("name").and_then(Value::as_str)
    }
}

/// One row of the resource table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub id: ResourceIdentity,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourceEntry {
    pub fn new(id: ResourceIdentity) -> Self {
        Self {
            id,
            extra: Map::new(),
        }
    }
}

/// One row of the folder table; declares a folder node's existence and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderDescriptor {
    /// e.g. "folders/Scripts/Sub.yy"
    #[serde(rename = "folderPath")]
    pub folder_path: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FolderDescriptor {
    pub fn new(folder_path: impl Into<String>) -> Self {
        Self {
            folder_path: folder_path.into(),
            extra: Map::new(),
        }
    }
}

/// One row of the room ordering table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomOrderNode {
    #[serde(rename = "roomId")]
    pub room_id: ResourceIdentity,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoomOrderNode {
    pub fn new(room_id: ResourceIdentity) -> Self {
        Self {
            room_id,
            extra: Map::new(),
        }
    }
}

/// The `MetaData` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    /// Version of the IDE that last saved the project
    #[serde(rename = "IDEVersion", default, skip_serializing_if = "Option::is_none")]
    pub ide_version: Option<String>,

    #[serde(rename = "PackageType", default, skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,

    #[serde(rename = "PackageName", default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,

    #[serde(rename = "PackageID", default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,

    #[serde(rename = "PackagePublisher", default, skip_serializing_if = "Option::is_none")]
    pub package_publisher: Option<String>,

    #[serde(rename = "PackageVersion", default, skip_serializing_if = "Option::is_none")]
    pub package_version: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Package identity fields supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFields {
    pub display_name: String,
    pub id: String,
    pub publisher: String,
    pub version: String,
}
