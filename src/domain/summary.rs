//! Compact package summary (`metadata.json`).

use serde::{Deserialize, Serialize};

use super::project::ProjectDescription;

/// File name of the summary document inside a package
pub const SUMMARY_FILE_NAME: &str = "metadata.json";

/// Package type tag written into the summary
pub const SUMMARY_PACKAGE_TYPE: &str = "asset";

/// Small derived record describing a package.
///
/// Computed once from a finalized description; never fed back into the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub package_id: String,
    pub display_name: String,
    pub version: String,
    pub package_type: String,

    /// IDE version of the source project, omitted when unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ide_version: Option<String>,
}

impl PackageSummary {
    /// Project the summary out of a description's metadata block
    pub fn from_description(description: &ProjectDescription) -> Self {
        let meta = &description.meta_data;

        Self {
            package_id: meta.package_id.clone().unwrap_or_default(),
            display_name: meta.package_name.clone().unwrap_or_default(),
            version: meta.package_version.clone().unwrap_or_default(),
            package_type: SUMMARY_PACKAGE_TYPE.to_string(),
            ide_version: meta.ide_version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_from_metadata() {
        let description = ProjectDescription::from_document(json!({
            "MetaData": {
                "IDEVersion": "2023.11.1.129",
                "PackageID": "com.example.tools",
                "PackageName": "Tools",
                "PackageVersion": "1.2.0",
                "PackagePublisher": "Example"
            }
        }))
        .unwrap();

        let summary = PackageSummary::from_description(&description);

        assert_eq!(summary.package_id, "com.example.tools");
        assert_eq!(summary.display_name, "Tools");
        assert_eq!(summary.version, "1.2.0");
        assert_eq!(summary.package_type, "asset");
        assert_eq!(summary.ide_version.as_deref(), Some("2023.11.1.129"));
    }

    #[test]
    fn test_summary_omits_unknown_ide_version() {
        let description = ProjectDescription::from_document(json!({})).unwrap();
        let summary = PackageSummary::from_description(&description);

        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("ide_version").is_none());
        assert_eq!(value["package_type"], json!("asset"));
    }
}
