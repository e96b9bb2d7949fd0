//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tempfile::TempDir;

use tracall::config::Settings;
use tracall::infrastructure::di::ServiceContainer;
use tracall::infrastructure::traits::{CommandRunner, RealFileSystem};

/// One recorded trac-all call.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub cmd: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    /// Content of the dmrirc passed with `-c`, read while the call happens
    pub dmrirc: String,
    pub at: DateTime<Utc>,
}

/// Mock trac-all that records its calls and can fail one stage.
pub struct MockCommandRunner {
    calls: Mutex<Vec<Invocation>>,
    fail_flag: Option<&'static str>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_flag: None,
        }
    }

    /// Fail whenever the first argument equals `flag` (e.g. `-path`).
    pub fn failing_on(flag: &'static str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_flag: Some(flag),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stage_flags(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|c| c.args.first().cloned())
            .collect()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, cmd: &str, args: &[&str], env: &[(String, String)]) -> io::Result<Output> {
        let dmrirc = args
            .iter()
            .position(|a| *a == "-c")
            .and_then(|i| args.get(i + 1))
            .and_then(|p| std::fs::read_to_string(p).ok())
            .unwrap_or_default();
        self.calls.lock().unwrap().push(Invocation {
            cmd: cmd.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            env: env.to_vec(),
            dmrirc,
            at: Utc::now(),
        });

        let failed = self.fail_flag.is_some_and(|f| args.first() == Some(&f));
        Ok(Output {
            status: exit_status(if failed { 1 } else { 0 }),
            stdout: b"trac-all mock\n".to_vec(),
            stderr: if failed {
                b"ERROR: mock failure\n".to_vec()
            } else {
                Vec::new()
            },
        })
    }
}

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

/// Inputs of one session laid out on disk.
#[derive(Debug, Clone)]
pub struct SessionFiles {
    pub id: String,
    pub dwi: PathBuf,
    pub bvals: PathBuf,
    pub bvecs: PathBuf,
    pub bedpostx: PathBuf,
}

/// Temporary study layout: `data/`, `subjects/`, `out/` (not created).
pub struct Workspace {
    pub temp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("data")).unwrap();
        std::fs::create_dir_all(temp.path().join("subjects")).unwrap();
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn outdir(&self) -> PathBuf {
        self.root().join("out")
    }

    pub fn subjects_dir(&self) -> PathBuf {
        self.root().join("subjects")
    }

    /// Create dwi/bvals/bvecs files and a bedpostX directory for `id`.
    pub fn session(&self, id: &str) -> SessionFiles {
        let dir = self.root().join("data").join(id);
        let bedpostx = dir.join("bedpostx");
        std::fs::create_dir_all(&bedpostx).unwrap();
        std::fs::write(bedpostx.join("merged_f1samples.nii.gz"), "").unwrap();

        let files = SessionFiles {
            id: id.to_string(),
            dwi: dir.join("dwi.nii.gz"),
            bvals: dir.join("bvals"),
            bvecs: dir.join("bvecs"),
            bedpostx,
        };
        std::fs::write(&files.dwi, "nifti").unwrap();
        std::fs::write(&files.bvals, "0 1000 1000\n").unwrap();
        std::fs::write(&files.bvecs, "0 1 0\n0 0 1\n0 0 0\n").unwrap();
        files
    }
}

pub fn test_settings() -> Settings {
    Settings {
        trac_all_bin: "trac-all".into(),
        freesurfer_home: None,
        subjects_dir: None,
        temp_dir: None,
    }
}

pub fn container(cmd: Arc<MockCommandRunner>) -> ServiceContainer {
    container_with(test_settings(), cmd)
}

pub fn container_with(settings: Settings, cmd: Arc<MockCommandRunner>) -> ServiceContainer {
    ServiceContainer::with_deps(settings, Arc::new(RealFileSystem), cmd)
}

pub fn s(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}
