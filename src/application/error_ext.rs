//! Error conversion helpers carrying the path an operation touched.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.create_dir_all(&log_dir)
    ///     .with_path_context("create log directory", &log_dir)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

/// Same idea for (de)serializing the JSON audit logs.
pub trait JsonResultExt<T> {
    fn with_json_path(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> JsonResultExt<T> for serde_json::Result<T> {
    fn with_json_path(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
