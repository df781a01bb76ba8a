//! Linearization errors.
//!
//! Every failure falls into one of two kinds:
//!
//! - **Invalid hierarchy**: the input map itself is malformed (an unknown
//!   class or base, a base declared twice, or an inheritance cycle).
//! - **Inconsistent hierarchy**: the map is a well-formed DAG but no order
//!   satisfies both local precedence and monotonicity.

use std::fmt;

use thiserror::Error;

/// The two broad categories of [`LinearizeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The hierarchy references undeclared classes, repeats a base, or
    /// contains a cycle.
    InvalidHierarchy,
    /// The hierarchy is well formed but admits no C3 linearization.
    InconsistentHierarchy,
}

/// Errors produced while validating or linearizing a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinearizeError<K> {
    #[error("unknown class `{class}`")]
    UnknownClass { class: K },

    #[error("class `{class}` declares unknown base `{base}`")]
    UnknownBase { class: K, base: K },

    #[error("class `{class}` declares base `{base}` more than once")]
    DuplicateBase { class: K, base: K },

    #[error("cyclic inheritance: {}", join(.cycle, " -> "))]
    Cycle { cycle: Vec<K> },

    #[error(
        "cannot create a consistent method resolution order for `{class}`: \
         conflicting bases {}",
        join(.candidates, ", ")
    )]
    Inconsistent { class: K, candidates: Vec<K> },
}

impl<K> LinearizeError<K> {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LinearizeError::UnknownClass { .. }
            | LinearizeError::UnknownBase { .. }
            | LinearizeError::DuplicateBase { .. }
            | LinearizeError::Cycle { .. } => ErrorKind::InvalidHierarchy,
            LinearizeError::Inconsistent { .. } => ErrorKind::InconsistentHierarchy,
        }
    }

    /// True for malformed input (unknown names, duplicate bases, cycles).
    pub fn is_invalid(&self) -> bool {
        self.kind() == ErrorKind::InvalidHierarchy
    }

    /// True when the hierarchy is well formed but has no C3 order.
    pub fn is_inconsistent(&self) -> bool {
        self.kind() == ErrorKind::InconsistentHierarchy
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidHierarchy => write!(f, "invalid hierarchy"),
            ErrorKind::InconsistentHierarchy => write!(f, "inconsistent hierarchy"),
        }
    }
}

fn join<K: fmt::Display>(items: &[K], separator: &str) -> String {
    items
        .iter()
        .map(|item| format!("`{}`", item))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Result type for hierarchy operations.
pub type LinearizeResult<T, K> = Result<T, LinearizeError<K>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let unknown: LinearizeError<&str> = LinearizeError::UnknownBase { class: "A", base: "Z" };
        assert!(unknown.is_invalid());
        assert!(!unknown.is_inconsistent());

        let conflict: LinearizeError<&str> = LinearizeError::Inconsistent {
            class: "Z",
            candidates: vec!["X", "Y"],
        };
        assert_eq!(conflict.kind(), ErrorKind::InconsistentHierarchy);
    }

    #[test]
    fn test_error_messages() {
        let cycle: LinearizeError<&str> = LinearizeError::Cycle { cycle: vec!["X", "Y", "X"] };
        assert_eq!(cycle.to_string(), "cyclic inheritance: `X` -> `Y` -> `X`");

        let conflict: LinearizeError<&str> = LinearizeError::Inconsistent {
            class: "Z",
            candidates: vec!["X", "Y"],
        };
        assert_eq!(
            conflict.to_string(),
            "cannot create a consistent method resolution order for `Z`: conflicting bases `X`, `Y`"
        );
    }
}
