//! Lineage MRO Inspector
//!
//! Loads class hierarchies from TOML or JSON documents and reports their
//! C3 method resolution orders.
//!
//! # Document format
//!
//! ```toml
//! root = "object"        # optional universal root
//!
//! [classes]
//! A = ["B", "C"]
//! B = ["D", "E"]
//! C = ["D", "F"]
//! D = []
//! E = []
//! F = []
//!
//! [methods]              # optional, used by `lookup`
//! D = ["greet"]
//! ```
//!
//! When a root is named, it is declared automatically and every class with
//! an empty base list inherits from it.

pub mod commands;
pub mod config;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use lineage::{Hierarchy, LinearizeError, Linearizer, MethodTable};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

pub use config::{Config, OutputConfig, OutputFormat};

/// Errors that can occur while loading a hierarchy document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// A hierarchy document as written on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Document {
    /// Universal root, adopted by every class without bases.
    pub root: Option<String>,
    /// Classes and their declared bases.
    #[serde(deserialize_with = "unique_classes")]
    pub classes: IndexMap<String, Vec<String>>,
    /// Names defined directly on each class.
    #[serde(deserialize_with = "unique_classes")]
    pub methods: IndexMap<String, Vec<String>>,
}

/// Deserializes a class-keyed table, rejecting a class listed twice.
///
/// TOML already refuses duplicate keys; JSON would otherwise keep the last.
fn unique_classes<'de, D>(deserializer: D) -> Result<IndexMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueClasses;

    impl<'de> Visitor<'de> for UniqueClasses {
        type Value = IndexMap<String, Vec<String>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a table of class names to lists of names")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut table = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((class, names)) = access.next_entry::<String, Vec<String>>()? {
                if table.contains_key(&class) {
                    return Err(de::Error::custom(format!("class `{}` is declared twice", class)));
                }
                table.insert(class, names);
            }
            Ok(table)
        }
    }

    deserializer.deserialize_map(UniqueClasses)
}

impl Document {
    /// Parses a TOML document.
    pub fn from_toml_str(source: &str) -> DocumentResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Parses a JSON document.
    pub fn from_json_str(source: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Reads a document, choosing the parser by file extension.
    ///
    /// `.json` files are parsed as JSON, everything else as TOML.
    pub fn load(path: &Path) -> DocumentResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        debug!("Loading {} as {}", path.display(), if is_json { "JSON" } else { "TOML" });
        if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_toml_str(&source)
        }
    }

    /// Builds the hierarchy described by this document.
    ///
    /// The document's own root wins over `default_root`.
    pub fn hierarchy(&self, default_root: Option<&str>) -> Hierarchy<String> {
        let mut hierarchy: Hierarchy<String> = self
            .classes
            .iter()
            .map(|(class, bases)| (class.clone(), bases.clone()))
            .collect();
        if let Some(root) = self.root.as_deref().or(default_root) {
            hierarchy.adopt_root(root.to_string());
        }
        hierarchy
    }

    /// Builds the method table described by this document.
    pub fn method_table(&self) -> MethodTable<String> {
        self.methods
            .iter()
            .map(|(class, names)| (class.clone(), names.clone()))
            .collect()
    }
}

/// Outcome of checking every class in a hierarchy.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Structural problem found by validation, if any.
    pub structural: Option<LinearizeError<String>>,
    /// Linearizations that succeeded, in declaration order.
    pub orders: IndexMap<String, Vec<String>>,
    /// Classes whose linearization failed.
    pub failures: Vec<(String, LinearizeError<String>)>,
}

impl CheckReport {
    /// True when the whole hierarchy linearizes cleanly.
    pub fn is_ok(&self) -> bool {
        self.structural.is_none() && self.failures.is_empty()
    }
}

/// Validates a hierarchy and linearizes every class, collecting all
/// failures instead of stopping at the first.
pub fn check(hierarchy: &Hierarchy<String>) -> CheckReport {
    let mut report = CheckReport {
        structural: hierarchy.validate().err(),
        ..CheckReport::default()
    };

    let mut linearizer = Linearizer::new(hierarchy);
    for class in hierarchy.classes() {
        match linearizer.linearize(class) {
            Ok(order) => {
                report.orders.insert(class.clone(), order);
            }
            Err(e) => report.failures.push((class.clone(), e)),
        }
    }
    report
}

/// Renders linearizations in the configured format.
pub fn render(orders: &IndexMap<String, Vec<String>>, output: &OutputConfig) -> DocumentResult<String> {
    let skip = usize::from(!output.include_self);
    match output.format {
        OutputFormat::Text => {
            let mut text = String::new();
            for (class, order) in orders {
                let rest: Vec<&str> = order.iter().skip(skip).map(String::as_str).collect();
                text.push_str(&format!("{}: {}\n", class, rest.join(&output.separator)));
            }
            Ok(text)
        }
        OutputFormat::Json => {
            let trimmed: IndexMap<&str, &[String]> = orders
                .iter()
                .map(|(class, order)| (class.as_str(), order.get(skip..).unwrap_or_default()))
                .collect();
            Ok(serde_json::to_string_pretty(&trimmed)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DIAMOND: &str = r#"
root = "object"

[classes]
A = ["B", "C"]
B = ["D", "E"]
C = ["D", "F"]
D = []
E = []
F = []

[methods]
D = ["greet"]
C = ["greet"]
"#;

    #[test]
    fn test_parse_toml() {
        let doc = Document::from_toml_str(DIAMOND).unwrap();
        assert_eq!(doc.root.as_deref(), Some("object"));
        assert_eq!(doc.classes["A"], vec!["B", "C"]);
        assert_eq!(doc.methods["C"], vec!["greet"]);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = Document::from_toml_str("[klasses]\nA = []\n").unwrap_err();
        assert!(matches!(err, DocumentError::Toml(_)));
    }

    #[test]
    fn test_json_repeated_class_rejected() {
        let err = Document::from_json_str(r#"{"classes": {"A": ["B"], "B": [], "A": []}}"#)
            .unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
        assert!(err.to_string().contains("class `A` is declared twice"));
    }

    #[test]
    fn test_json_repeated_method_class_rejected() {
        let err = Document::from_json_str(
            r#"{"classes": {"A": []}, "methods": {"A": ["f"], "A": ["g"]}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("class `A` is declared twice"));
    }

    #[test]
    fn test_toml_repeated_class_rejected() {
        let err = Document::from_toml_str("[classes]\nA = []\nA = [\"B\"]\n").unwrap_err();
        assert!(matches!(err, DocumentError::Toml(_)));
    }

    #[test]
    fn test_hierarchy_adopts_root() {
        let doc = Document::from_toml_str(DIAMOND).unwrap();
        let hierarchy = doc.hierarchy(None);
        assert_eq!(hierarchy.len(), 7);
        assert_eq!(
            hierarchy.bases(&"D".to_string()),
            Some(&["object".to_string()][..])
        );
    }

    #[test]
    fn test_default_root_only_when_document_has_none() {
        let doc = Document::from_json_str(r#"{"classes": {"A": ["B"], "B": []}}"#).unwrap();
        let hierarchy = doc.hierarchy(Some("Any"));
        assert!(hierarchy.contains(&"Any".to_string()));

        let doc = Document::from_toml_str(DIAMOND).unwrap();
        let hierarchy = doc.hierarchy(Some("Any"));
        assert!(!hierarchy.contains(&"Any".to_string()));
    }

    #[test]
    fn test_check_collects_every_failure() {
        let doc = Document::from_toml_str(
            r#"
[classes]
X = []
Y = []
XY = ["X", "Y"]
YX = ["Y", "X"]
Z = ["XY", "YX"]
W = ["Z"]
"#,
        )
        .unwrap();
        let report = check(&doc.hierarchy(None));
        assert!(!report.is_ok());
        assert!(report.structural.is_none());
        let failed: Vec<&str> = report.failures.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(failed, vec!["Z", "W"]);
        assert_eq!(report.orders.len(), 4);
    }

    #[test]
    fn test_render_text() {
        let doc = Document::from_toml_str(DIAMOND).unwrap();
        let hierarchy = doc.hierarchy(None);
        let report = check(&hierarchy);
        let mut orders = IndexMap::new();
        orders.insert("A".to_string(), report.orders["A"].clone());

        let text = render(&orders, &OutputConfig::default()).unwrap();
        assert_eq!(text, "A: A, B, C, D, E, F, object\n");

        let output = OutputConfig {
            separator: " -> ".to_string(),
            include_self: false,
            ..OutputConfig::default()
        };
        let text = render(&orders, &output).unwrap();
        assert_eq!(text, "A: B -> C -> D -> E -> F -> object\n");
    }

    #[test]
    fn test_render_json() {
        let mut orders = IndexMap::new();
        orders.insert("B".to_string(), vec!["B".to_string(), "object".to_string()]);
        let output = OutputConfig {
            format: OutputFormat::Json,
            ..OutputConfig::default()
        };
        let json = render(&orders, &output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, serde_json::json!({"B": ["B", "object"]}));
    }
}
