//! Runtime metadata recorded with every run.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::infrastructure::traits::FileSystem;

/// Version reported when no FreeSurfer installation can be inspected.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Tool name, versions and time of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub tool: String,
    pub tool_version: String,
    /// Release number, e.g. `7.4.1`
    pub freesurfer_version: String,
    /// Raw content of `$FREESURFER_HOME/build-stamp.txt`
    pub freesurfer_build_stamp: Option<String>,
    /// RFC 3339 local time at the start of the run
    pub timestamp: String,
}

impl RuntimeInfo {
    /// Collect runtime metadata for `tool`.
    pub fn collect(tool: &str, freesurfer_home: Option<&Path>, fs: &dyn FileSystem) -> Self {
        let build_stamp = freesurfer_home.and_then(|home| read_build_stamp(home, fs));
        let freesurfer_version = build_stamp
            .as_deref()
            .and_then(release_from_stamp)
            .or_else(|| build_stamp.clone())
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());

        Self {
            tool: tool.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            freesurfer_version,
            freesurfer_build_stamp: build_stamp,
            timestamp: chrono::Local::now().to_rfc3339(),
        }
    }
}

fn read_build_stamp(home: &Path, fs: &dyn FileSystem) -> Option<String> {
    let path = home.join("build-stamp.txt");
    match fs.read_to_string(&path) {
        Ok(content) => {
            let stamp = content.trim();
            (!stamp.is_empty()).then(|| stamp.to_string())
        }
        Err(e) => {
            debug!("no build stamp at {}: {}", path.display(), e);
            None
        }
    }
}

/// Extract the release from a build stamp such as
/// `freesurfer-linux-ubuntu22_x86_64-7.4.1-20230614-7eb8460`.
pub fn release_from_stamp(stamp: &str) -> Option<String> {
    static RELEASE: OnceLock<Regex> = OnceLock::new();
    let re = RELEASE.get_or_init(|| {
        Regex::new(r"(?:^|[-_v])(\d+\.\d+(?:\.\d+)?)(?:[-_]|$)").expect("valid release regex")
    });
    re.captures(stamp).map(|c| c[1].to_string())
}
