//! Inspector Configuration
//!
//! Defines configuration options for the MRO inspector.

use serde::{Deserialize, Serialize};

/// Configuration for the MRO inspector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Universal root adopted when a document does not name one.
    ///
    /// `None` leaves base-less classes as independent roots.
    pub default_root: Option<String>,

    /// Output configuration.
    pub output: OutputConfig,
}

/// How linearizations are printed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format.
    pub format: OutputFormat,

    /// Separator between classes in text output.
    pub separator: String,

    /// Include the queried class itself at the head of each order.
    pub include_self: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            separator: ", ".to_string(),
            include_self: true,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `A: A, B, object`, one class per line.
    Text,
    /// A JSON object mapping each class to its order.
    Json,
}
