//! trac-all pipeline driver
//!
//! Writes a dmrirc for the study into a scratch directory, runs the
//! preprocessing stage, links each session's precomputed bedpostX output into
//! place and runs path reconstruction. The bedpostX stage itself is never run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{Dmrirc, RunRequest, Study};
use crate::infrastructure::traits::{CommandRunner, FileSystem};
use crate::infrastructure::InfraError;

/// Directory name trac-all expects bedpostX results under.
pub const BEDPOSTX_DIRNAME: &str = "dmri.bedpostX";

/// File name of the generated config inside the scratch directory.
pub const DMRIRC_FILENAME: &str = "dmrirc";

/// trac-all stages driven by this service, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prep,
    Path,
}

impl Stage {
    pub fn flag(self) -> &'static str {
        match self {
            Stage::Prep => "-prep",
            Stage::Path => "-path",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flag()[1..])
    }
}

pub struct TraculaService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl TraculaService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        settings: Arc<Settings>,
    ) -> Self {
        Self { fs, cmd, settings }
    }

    /// Run trac-all for `study` and return its output directories in session order.
    ///
    /// Inputs are expected to be validated already.
    pub fn run(&self, study: &Study, request: &RunRequest) -> ApplicationResult<Vec<PathBuf>> {
        let outdir = study.outdir();
        info!("trac-all output root: {}", outdir.display());
        self.fs
            .create_dir_all(outdir)
            .with_path_context("create output directory", outdir)?;

        let base = match &request.config {
            Some(path) => Some(
                self.fs
                    .read_to_string(path)
                    .with_path_context("read dmrirc config", path)?,
            ),
            None => None,
        };
        let dmrirc = Dmrirc::new(study, request.options)
            .with_subjects_dir(request.subjects_dir.as_deref())
            .with_base(base.as_deref())
            .render();

        // removed when dropped at the end of the run
        let scratch = self.scratch_dir(request.temp_dir.as_deref())?;
        let dmrirc_path = scratch.path().join(DMRIRC_FILENAME);
        self.fs
            .write(&dmrirc_path, &dmrirc)
            .with_path_context("write dmrirc", &dmrirc_path)?;
        debug!("dmrirc {}:\n{}", dmrirc_path.display(), dmrirc);

        let env = self.environment(request);

        self.run_stage(Stage::Prep, &dmrirc_path, &env)?;
        self.link_bedpostx(study)?;
        self.run_stage(Stage::Path, &dmrirc_path, &env)?;

        Ok(study.output_dirs())
    }

    fn scratch_dir(&self, parent: Option<&Path>) -> ApplicationResult<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("tracall.");
        match parent {
            Some(dir) => builder
                .tempdir_in(dir)
                .with_path_context("create scratch directory in", dir),
            None => builder
                .tempdir()
                .with_path_context("create scratch directory in", &std::env::temp_dir()),
        }
    }

    /// Extra environment for trac-all.
    pub fn environment(&self, request: &RunRequest) -> Vec<(String, String)> {
        let mut env = Vec::new();
        if let Some(dir) = &request.subjects_dir {
            env.push(("SUBJECTS_DIR".to_string(), dir.to_string_lossy().into_owned()));
        }
        if let Some(home) = &self.settings.freesurfer_home {
            env.push((
                "FREESURFER_HOME".to_string(),
                home.to_string_lossy().into_owned(),
            ));
        }
        env
    }

    fn run_stage(
        &self,
        stage: Stage,
        dmrirc: &Path,
        env: &[(String, String)],
    ) -> ApplicationResult<()> {
        let bin = self.settings.trac_all_bin.as_str();
        let dmrirc = dmrirc.to_string_lossy();
        let args = [stage.flag(), "-c", dmrirc.as_ref()];
        info!("Running: {} {}", bin, args.join(" "));

        let output =
            self.cmd
                .run(bin, &args, env)
                .map_err(|e| ApplicationError::OperationFailed {
                    context: format!("run {} {}", bin, stage.flag()),
                    source: Box::new(e),
                })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(target: "trac-all", "{}", line);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            return Err(ApplicationError::OperationFailed {
                context: format!("trac-all {} exited with {}: {}", stage, code, stderr.trim()),
                source: Box::new(InfraError::TracAll {
                    stage: stage.to_string(),
                    message: stderr.trim().to_string(),
                    exit_code: output.status.code(),
                }),
            });
        }

        info!("trac-all {} finished", stage);
        Ok(())
    }

    /// Point `<output_dir>/dmri.bedpostX` at each session's bedpostX directory.
    ///
    /// An existing entry is left untouched.
    fn link_bedpostx(&self, study: &Study) -> ApplicationResult<()> {
        for session in study.sessions() {
            let output_dir = study.output_dir(session);
            self.fs
                .create_dir_all(&output_dir)
                .with_path_context("create session directory", &output_dir)?;

            let link = output_dir.join(BEDPOSTX_DIRNAME);
            if self.fs.exists(&link) || self.fs.is_symlink(&link) {
                warn!("{} already exists, not relinking", link.display());
                continue;
            }

            let target = self
                .fs
                .canonicalize(&session.bedpostx_dir)
                .with_path_context("resolve bedpostX directory", &session.bedpostx_dir)?;
            self.fs
                .symlink(&target, &link)
                .with_path_context("link bedpostX directory", &link)?;
            debug!("linked {} -> {}", link.display(), target.display());
        }
        Ok(())
    }
}
