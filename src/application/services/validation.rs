//! Input path validation
//!
//! Runs before anything is created or executed. Paths are checked in the order
//! their options appear on the command line and the first failure is reported.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::ApplicationResult;
use crate::domain::{DomainError, RunRequest, Study};
use crate::infrastructure::traits::FileSystem;

pub struct ValidationService {
    fs: Arc<dyn FileSystem>,
}

impl ValidationService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Check that every input file and directory of `study` and `request` exists.
    pub fn validate(&self, study: &Study, request: &RunRequest) -> ApplicationResult<()> {
        let sessions = study.sessions();

        for s in sessions {
            self.require_file("DWI file", &s.scan.dwi)?;
        }
        for s in sessions {
            self.require_file("bvals file", &s.scan.bvals)?;
        }
        for s in sessions {
            self.require_file("bvecs file", &s.scan.bvecs)?;
        }
        for s in sessions {
            self.require_dir("bedpostX directory", &s.bedpostx_dir)?;
        }

        if let Some(dir) = &request.subjects_dir {
            self.require_dir("subjects directory", dir)?;
        }
        if let Some(dir) = &request.temp_dir {
            self.require_dir("temporary directory", dir)?;
        }
        if let Some(file) = &request.config {
            self.require_file("dmrirc config", file)?;
        }

        debug!("validate: {} session(s) ok", sessions.len());
        Ok(())
    }

    fn require_file(&self, kind: &'static str, path: &Path) -> ApplicationResult<()> {
        if !self.fs.exists(path) {
            return Err(DomainError::PathNotFound {
                kind,
                path: path.to_path_buf(),
            }
            .into());
        }
        if !self.fs.is_file(path) {
            return Err(DomainError::NotAFile {
                kind,
                path: path.to_path_buf(),
            }
            .into());
        }
        Ok(())
    }

    fn require_dir(&self, kind: &'static str, path: &Path) -> ApplicationResult<()> {
        if !self.fs.exists(path) {
            return Err(DomainError::PathNotFound {
                kind,
                path: path.to_path_buf(),
            }
            .into());
        }
        if !self.fs.is_dir(path) {
            return Err(DomainError::NotADirectory {
                kind,
                path: path.to_path_buf(),
            }
            .into());
        }
        Ok(())
    }
}
