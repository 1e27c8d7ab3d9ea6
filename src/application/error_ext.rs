//! Error conversion helpers for artifact I/O

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait turning `io::Result` into `ApplicationResult` with the path attached.
pub trait IoResultExt<T> {
    /// Wrap any I/O error as `OperationFailed`, naming the action and path.
    ///
    /// # Example
    /// ```ignore
    /// fs.write(&path, &xml).with_path_context("write hierarchy", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;

    /// Like `with_path_context`, but a missing file becomes `InputNotFound`.
    fn with_input_context(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }

    fn with_input_context(self, path: &Path) -> ApplicationResult<T> {
        match self {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ApplicationError::InputNotFound(path.to_path_buf()))
            }
            other => other.with_path_context("read model", path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_becomes_input_not_found() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result.with_input_context(Path::new("model.xml")).unwrap_err();
        assert!(matches!(err, ApplicationError::InputNotFound(p) if p == Path::new("model.xml")));
    }

    #[test]
    fn test_other_errors_keep_path_context() {
        let result: io::Result<()> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let err = result.with_input_context(Path::new("model.xml")).unwrap_err();
        assert_eq!(err.to_string(), "operation failed: read model: model.xml");
    }
}
