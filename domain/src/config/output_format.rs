//! Output format value object

use serde::{Deserialize, Serialize};

/// How a run result is rendered for the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Answer, citations and run summary for a terminal (default)
    #[default]
    Text,
    /// Single JSON document
    Json,
}
