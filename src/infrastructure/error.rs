//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Infrastructure errors wrap application errors and add external-process concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("trac-all {stage} failed: {message}")]
    TracAll {
        stage: String,
        message: String,
        exit_code: Option<i32>,
    },
}
