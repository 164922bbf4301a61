//! Tool catalog configuration from TOML (`[tools]` section)

use serde::{Deserialize, Serialize};

/// Configured tool set.
///
/// ```toml
/// [tools]
/// log_access = true
///
/// [[tools.search]]
/// name = "search_manuals"
/// description = "Searches maintenance manuals."
/// source_kind = "manual"
/// category_param = "manual_type"
/// categories = ["maintenance", "safety"]
/// ```
///
/// A `[[tools.search]]` array in a config file replaces the default pair of
/// search tools rather than extending it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub search: Vec<FileSearchToolConfig>,
    /// Expose the explicit `log_access` tool
    pub log_access: bool,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            search: vec![
                FileSearchToolConfig {
                    name: "search_manuals".to_string(),
                    description: "Searches operational procedures, maintenance manuals, and \
                        technical documents. Use this tool to find information about equipment \
                        maintenance, safety procedures, operational guidelines, and training \
                        materials. Returns relevant document excerpts with source manual name, \
                        location, and classification level."
                        .to_string(),
                    source_kind: "manual".to_string(),
                    category_param: Some("manual_type".to_string()),
                    categories: ["maintenance", "safety", "operations", "training"]
                        .into_iter()
                        .map(String::from)
                        .collect(),
                },
                FileSearchToolConfig {
                    name: "search_doctrine".to_string(),
                    description: "Searches doctrine and strategic documents. Use this tool to \
                        find tactical guidance, strategic principles, logistics doctrine, and \
                        personnel policies. Returns relevant doctrine excerpts with source \
                        document, location, and classification level."
                        .to_string(),
                    source_kind: "doctrine".to_string(),
                    category_param: Some("doctrine_area".to_string()),
                    categories: ["tactics", "strategy", "logistics", "personnel"]
                        .into_iter()
                        .map(String::from)
                        .collect(),
                },
            ],
            log_access: true,
        }
    }
}

/// One search tool over a single kind of source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSearchToolConfig {
    pub name: String,
    pub description: String,
    /// Forwarded to retrieval as the `source_kind` filter
    pub source_kind: String,
    /// Name of the optional category argument, if the tool takes one
    #[serde(default)]
    pub category_param: Option<String>,
    /// Accepted category values; empty accepts any string
    #[serde(default)]
    pub categories: Vec<String>,
}
