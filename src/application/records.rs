//! Audit records persisted as JSON next to every output directory.
//!
//! Field names mirror the long CLI option names (`--bedpostx-dir` becomes
//! `bedpostx_dir`). Unset optional paths serialize as `null`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::application::RuntimeInfo;

/// Options shared by both tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineInputs {
    pub subjects_dir: Option<PathBuf>,
    pub do_eddy: bool,
    pub dont_rotate_bvecs: bool,
    pub dont_bbregister: bool,
    pub dont_register_mni: bool,
    pub temp_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub verbose: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrossSectionalInputs {
    pub outdir: PathBuf,
    pub subject_id: String,
    pub dwi: PathBuf,
    pub bvals: PathBuf,
    pub bvecs: PathBuf,
    pub bedpostx_dir: PathBuf,
    #[serde(flatten)]
    pub pipeline: PipelineInputs,
}

/// List-valued fields keep the order given on the command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LongitudinalInputs {
    pub outdir: PathBuf,
    pub subject_template_id: String,
    pub subject_timepoint_ids: Vec<String>,
    pub dwis: Vec<PathBuf>,
    pub bvalss: Vec<PathBuf>,
    pub bvecss: Vec<PathBuf>,
    pub bedpostx_dirs: Vec<PathBuf>,
    #[serde(flatten)]
    pub pipeline: PipelineInputs,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrossSectionalOutputs {
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LongitudinalOutputs {
    pub output_dirs: Vec<PathBuf>,
}

/// Everything written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord<I, O> {
    pub inputs: I,
    pub outputs: O,
    pub runtime: RuntimeInfo,
}
