//! JSON audit trail
//!
//! Every output directory receives `logs/{inputs,outputs,runtime}_<suffix>.json`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::application::{
    ApplicationError, ApplicationResult, IoResultExt, JsonResultExt, RunRecord,
};
use crate::infrastructure::traits::FileSystem;

/// Subdirectory of an output directory holding the audit files.
pub const LOG_DIRNAME: &str = "logs";

/// The three records of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Inputs,
    Outputs,
    Runtime,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Inputs => "inputs",
            LogKind::Outputs => "outputs",
            LogKind::Runtime => "runtime",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct AuditService {
    fs: Arc<dyn FileSystem>,
}

impl AuditService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    pub fn log_dir(output_dir: &Path) -> PathBuf {
        output_dir.join(LOG_DIRNAME)
    }

    /// `<output_dir>/logs/<kind>_<suffix>.json`
    pub fn log_path(output_dir: &Path, kind: LogKind, suffix: &str) -> PathBuf {
        Self::log_dir(output_dir).join(format!("{}_{}.json", kind, suffix))
    }

    /// Write `record` into every output directory. Returns the files written.
    pub fn write<I, O>(
        &self,
        output_dirs: &[PathBuf],
        suffix: &str,
        record: &RunRecord<I, O>,
    ) -> ApplicationResult<Vec<PathBuf>>
    where
        I: Serialize,
        O: Serialize,
    {
        let inputs = to_json(&record.inputs, LogKind::Inputs)?;
        let outputs = to_json(&record.outputs, LogKind::Outputs)?;
        let runtime = to_json(&record.runtime, LogKind::Runtime)?;

        let mut written = Vec::with_capacity(output_dirs.len() * 3);
        for dir in output_dirs {
            let log_dir = Self::log_dir(dir);
            self.fs
                .create_dir_all(&log_dir)
                .with_path_context("create log directory", &log_dir)?;

            for (kind, content) in [
                (LogKind::Inputs, &inputs),
                (LogKind::Outputs, &outputs),
                (LogKind::Runtime, &runtime),
            ] {
                let path = Self::log_path(dir, kind, suffix);
                self.fs
                    .write(&path, content)
                    .with_path_context("write log", &path)?;
                debug!("wrote {}", path.display());
                written.push(path);
            }
            info!("Logs written to {}", log_dir.display());
        }
        Ok(written)
    }

    /// Read back one log file.
    pub fn read<T: DeserializeOwned>(&self, path: &Path) -> ApplicationResult<T> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read log", path)?;
        serde_json::from_str(&content).with_json_path(path)
    }
}

fn to_json<T: Serialize>(value: &T, kind: LogKind) -> ApplicationResult<String> {
    let mut json =
        serde_json::to_string_pretty(value).map_err(|e| ApplicationError::OperationFailed {
            context: format!("serialize {} record", kind),
            source: Box::new(e),
        })?;
    json.push('\n');
    Ok(json)
}
