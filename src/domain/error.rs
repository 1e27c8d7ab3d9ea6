//! Domain-level errors

use thiserror::Error;

/// Domain errors represent violations of the UML model's rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed input: {message}")]
    MalformedInput { message: String },

    #[error("duplicate class: {0}")]
    DuplicateClass(String),

    #[error("no root class found (isRoot=\"true\")")]
    NoRootClass,

    #[error("multiple root classes found: {}", .0.join(", "))]
    MultipleRootClasses(Vec<String>),

    #[error("cyclic aggregation: {}", .path.join(" -> "))]
    CyclicAggregation { class: String, path: Vec<String> },

    #[error("aggregation chain deeper than {limit} classes at {class}")]
    HierarchyTooDeep { class: String, limit: usize },

    #[error("malformed multiplicity: {token:?}")]
    MalformedMultiplicity { token: String },

    #[error("unresolved class reference {name:?} in aggregation {source_class} -> {target_class}")]
    UnresolvedReference {
        name: String,
        source_class: String,
        target_class: String,
    },

    #[error("cannot render {format}: {message}")]
    Render {
        format: &'static str,
        message: String,
    },
}

impl DomainError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    pub(crate) fn render(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Render {
            format,
            message: err.to_string(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
