//! Transform options for the server-data pass

use serde::{Deserialize, Serialize};

use crate::constants::{HAS_SERVER_MARKER, SERVER_DATA_EXPORT};

/// Which bundle the module is being compiled for
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileMode {
    /// Browser bundle: default exports are stripped outright
    #[default]
    Client,
    /// Server bundle: everything stays except the `routeData` export
    Server,
}

impl CompileMode {
    /// The `keep` flag the host pipeline passes per invocation
    pub fn keeps_server_exports(self) -> bool {
        matches!(self, CompileMode::Server)
    }
}

impl From<bool> for CompileMode {
    fn from(keep_server_exports: bool) -> Self {
        if keep_server_exports {
            CompileMode::Server
        } else {
            CompileMode::Client
        }
    }
}

/// Configuration options for the server-data transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// Target bundle
    pub mode: CompileMode,

    /// Source filename, used to pick the source type and for source maps
    pub filename: String,

    /// Whether to generate source maps
    pub source_map: bool,

    /// Name of the server data export
    pub server_export_name: String,

    /// Name of the injected boolean marker export
    pub marker_name: String,

    /// Upper bound on sweep passes. `None` runs until the fixed point.
    pub max_passes: Option<usize>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self::start_defaults()
    }
}

impl TransformOptions {
    pub fn start_defaults() -> Self {
        Self {
            mode: CompileMode::Client,
            filename: "input.jsx".to_string(),
            source_map: false,
            server_export_name: SERVER_DATA_EXPORT.to_string(),
            marker_name: HAS_SERVER_MARKER.to_string(),
            max_passes: None,
        }
    }

    /// Options for the server bundle path
    pub fn server() -> Self {
        Self {
            mode: CompileMode::Server,
            ..Self::start_defaults()
        }
    }

    /// Options for the client bundle path
    pub fn client() -> Self {
        Self::start_defaults()
    }

    /// Parse options from the JSON object a JS host hands over.
    /// Missing fields fall back to [`TransformOptions::start_defaults`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    pub fn is_server_export(&self, name: &str) -> bool {
        name == self.server_export_name
    }

    pub fn is_marker(&self, name: &str) -> bool {
        name == self.marker_name
    }
}
