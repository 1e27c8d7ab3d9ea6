//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod hierarchy;
pub mod loader;
pub mod metadata;
pub mod multiplicity;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use hierarchy::{ConfigNode, HierarchyBuilder, HierarchyDocument, NodeKind};
pub use metadata::{ClassDescriptor, Parameter, CLASS_PARAMETER_TYPE};
pub use multiplicity::Multiplicity;

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Uses shellexpand; the input is returned unchanged if expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
