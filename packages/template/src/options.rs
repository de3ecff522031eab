use serde::{Deserialize, Serialize};

/// Options for template compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Reject unexpected and mismatched closing tags instead of recovering
    pub strict_nesting: bool,

    /// Drop text runs that contain only whitespace
    pub trim_whitespace: bool,

    /// Attribute name prefix that marks an event handler
    pub event_prefix: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strict_nesting: true,
            trim_whitespace: false,
            event_prefix: "on".to_string(),
        }
    }
}

impl CompileOptions {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub(crate) fn is_event_attribute(&self, name: &str) -> bool {
        !self.event_prefix.is_empty() && name.starts_with(&self.event_prefix)
    }
}
