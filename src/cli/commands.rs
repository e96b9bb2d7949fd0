//! Command execution for both binaries
//!
//! validate -> trac-all -> JSON logs. Nothing is created or executed unless every
//! input path exists.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::{
    CrossSectionalOutputs, LongitudinalOutputs, RunRecord, RuntimeInfo,
};
use crate::cli::args::{CrossSectionalArgs, LongitudinalArgs, PipelineArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::{RunRequest, Study};
use crate::infrastructure::di::ServiceContainer;

/// Tool name recorded for cross-sectional runs.
pub const CROSS_SECTIONAL_TOOL: &str = "run-trac-all";
/// Tool name recorded for longitudinal runs.
pub const LONGITUDINAL_TOOL: &str = "run-trac-all-longitudinal";

/// Run trac-all for one subject. Returns the output directory list.
#[instrument(skip_all, fields(subject = %args.subject_id))]
pub fn run_cross_sectional(
    args: &CrossSectionalArgs,
    container: &ServiceContainer,
) -> CliResult<Vec<PathBuf>> {
    let args = args.absolutized();
    let study = args
        .to_study()
        .map_err(|e| CliError::InvalidArgs(e.to_string()))?;

    execute(
        CROSS_SECTIONAL_TOOL,
        &study,
        &args.pipeline,
        args.inputs(),
        |dirs| CrossSectionalOutputs {
            output_dir: dirs.first().cloned().unwrap_or_default(),
        },
        container,
    )
}

/// Run trac-all for all timepoints of one subject.
#[instrument(skip_all, fields(template = %args.subject_template_id))]
pub fn run_longitudinal(
    args: &LongitudinalArgs,
    container: &ServiceContainer,
) -> CliResult<Vec<PathBuf>> {
    let args = args.absolutized();
    let study = args
        .to_study()
        .map_err(|e| CliError::InvalidArgs(e.to_string()))?;

    execute(
        LONGITUDINAL_TOOL,
        &study,
        &args.pipeline,
        args.inputs(),
        |dirs| LongitudinalOutputs {
            output_dirs: dirs.to_vec(),
        },
        container,
    )
}

/// Resolve run parameters: CLI first, then `$SUBJECTS_DIR`, then settings.
pub fn resolve_request(
    pipeline: &PipelineArgs,
    settings: &Settings,
    env_subjects_dir: Option<PathBuf>,
) -> RunRequest {
    RunRequest {
        options: pipeline.options(),
        subjects_dir: pipeline
            .subjects_dir
            .clone()
            .or(env_subjects_dir)
            .or_else(|| settings.subjects_dir.clone()),
        temp_dir: pipeline
            .temp_dir
            .clone()
            .or_else(|| settings.temp_dir.clone()),
        config: pipeline.config.clone(),
    }
}

fn subjects_dir_from_env() -> Option<PathBuf> {
    std::env::var_os("SUBJECTS_DIR")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn execute<I, O>(
    tool: &str,
    study: &Study,
    pipeline: &PipelineArgs,
    inputs: I,
    outputs: impl FnOnce(&[PathBuf]) -> O,
    container: &ServiceContainer,
) -> CliResult<Vec<PathBuf>>
where
    I: Serialize,
    O: Serialize,
{
    debug!("settings: {:?}", container.settings);
    let request = resolve_request(pipeline, &container.settings, subjects_dir_from_env());
    debug!("request: {:?}", request);

    container.validation_service().validate(study, &request)?;

    // timestamp marks the start of the run
    let runtime = RuntimeInfo::collect(
        tool,
        container.settings.freesurfer_home.as_deref(),
        container.fs.as_ref(),
    );
    let output_dirs = container.tracula_service().run(study, &request)?;

    let record = RunRecord {
        inputs,
        outputs: outputs(&output_dirs),
        runtime,
    };
    let written = container
        .audit_service()
        .write(&output_dirs, study.log_suffix(), &record)?;
    info!("{} log file(s) written", written.len());

    for dir in &output_dirs {
        output::success(&format!("trac-all finished: {}", dir.display()));
        output::detail(&format!(
            "logs: {}",
            crate::application::services::AuditService::log_dir(dir).display()
        ));
    }

    Ok(output_dirs)
}
