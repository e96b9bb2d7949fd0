//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Infra(InfraError::TracAll { .. }) => crate::exitcode::SOFTWARE,
            CliError::Infra(InfraError::Application(e)) => match e {
                ApplicationError::Domain(
                    DomainError::PathNotFound { .. }
                    | DomainError::NotAFile { .. }
                    | DomainError::NotADirectory { .. },
                ) => crate::exitcode::NOINPUT,
                ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Json { .. } => crate::exitcode::SOFTWARE,
                ApplicationError::OperationFailed { source, .. }
                    if source.is::<std::io::Error>() =>
                {
                    crate::exitcode::IOERR
                }
                ApplicationError::OperationFailed { .. } => crate::exitcode::SOFTWARE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn given_missing_input_when_exit_code_then_noinput() {
        let err: CliError = ApplicationError::Domain(DomainError::PathNotFound {
            kind: "DWI file",
            path: PathBuf::from("/nope"),
        })
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
        assert_eq!(err.to_string(), "DWI file not found: /nope");
    }

    #[test]
    fn given_io_failure_when_exit_code_then_ioerr() {
        let err: CliError = ApplicationError::OperationFailed {
            context: "write log".into(),
            source: Box::new(std::io::Error::other("disk full")),
        }
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::IOERR);
    }

    #[test]
    fn given_failed_stage_when_exit_code_then_software() {
        let err: CliError = ApplicationError::OperationFailed {
            context: "trac-all prep".into(),
            source: Box::new(InfraError::TracAll {
                stage: "prep".into(),
                message: "ERROR: bad dmrirc".into(),
                exit_code: Some(1),
            }),
        }
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::SOFTWARE);
    }
}
