//! CLI argument definitions using clap

use std::path::{Path, PathBuf};

use clap::{Args, Parser, ValueHint};
use itertools::izip;

use crate::application::{CrossSectionalInputs, LongitudinalInputs, PipelineInputs};
use crate::domain::{DiffusionScan, DomainError, PipelineOptions, Session, Study};

/// Options shared by the cross-sectional and longitudinal tools
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PipelineArgs {
    /// FreeSurfer subjects directory (default: $SUBJECTS_DIR)
    #[arg(short = 'S', long, value_hint = ValueHint::DirPath)]
    pub subjects_dir: Option<PathBuf>,

    /// Run eddy-current correction
    #[arg(short = 'E', long)]
    pub do_eddy: bool,

    /// Do not rotate the b-vectors
    #[arg(short = 'K', long)]
    pub dont_rotate_bvecs: bool,

    /// Register with FLIRT instead of bbregister
    #[arg(short = 'G', long)]
    pub dont_bbregister: bool,

    /// Skip registration to the MNI template
    #[arg(short = 'N', long)]
    pub dont_register_mni: bool,

    /// Directory for temporary files (the generated dmrirc)
    #[arg(short = 'T', long, value_hint = ValueHint::DirPath)]
    pub temp_dir: Option<PathBuf>,

    /// dmrirc file with additional trac-all settings
    #[arg(short = 'c', long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Verbosity: 0 warnings, 1 info, 2 debug
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub verbose: u8,
}

impl PipelineArgs {
    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            do_eddy: self.do_eddy,
            rotate_bvecs: !self.dont_rotate_bvecs,
            bbregister: !self.dont_bbregister,
            register_mni: !self.dont_register_mni,
        }
    }

    pub fn inputs(&self) -> PipelineInputs {
        PipelineInputs {
            subjects_dir: self.subjects_dir.clone(),
            do_eddy: self.do_eddy,
            dont_rotate_bvecs: self.dont_rotate_bvecs,
            dont_bbregister: self.dont_bbregister,
            dont_register_mni: self.dont_register_mni,
            temp_dir: self.temp_dir.clone(),
            config: self.config.clone(),
            verbose: self.verbose,
        }
    }

    fn absolutized(&self) -> Self {
        Self {
            subjects_dir: self.subjects_dir.as_deref().map(absolute),
            temp_dir: self.temp_dir.as_deref().map(absolute),
            config: self.config.as_deref().map(absolute),
            ..self.clone()
        }
    }
}

/// Run TRACULA trac-all on one subject with precomputed bedpostX output
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "run-trac-all")]
#[command(author, version, about, long_about = None)]
pub struct CrossSectionalArgs {
    /// Output directory (trac-all dtroot)
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub outdir: PathBuf,

    /// FreeSurfer subject id
    #[arg(short, long)]
    pub subject_id: String,

    /// Preprocessed DWI volume
    #[arg(short = 'i', long, value_hint = ValueHint::FilePath)]
    pub dwi: PathBuf,

    /// b-values file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub bvals: PathBuf,

    /// b-vectors file
    #[arg(short = 'r', long, value_hint = ValueHint::FilePath)]
    pub bvecs: PathBuf,

    /// bedpostX output directory
    #[arg(short = 'd', long, value_hint = ValueHint::DirPath)]
    pub bedpostx_dir: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

impl CrossSectionalArgs {
    /// Same arguments with every path made absolute against the working directory.
    pub fn absolutized(&self) -> Self {
        Self {
            outdir: absolute(&self.outdir),
            subject_id: self.subject_id.clone(),
            dwi: absolute(&self.dwi),
            bvals: absolute(&self.bvals),
            bvecs: absolute(&self.bvecs),
            bedpostx_dir: absolute(&self.bedpostx_dir),
            pipeline: self.pipeline.absolutized(),
        }
    }

    pub fn inputs(&self) -> CrossSectionalInputs {
        CrossSectionalInputs {
            outdir: self.outdir.clone(),
            subject_id: self.subject_id.clone(),
            dwi: self.dwi.clone(),
            bvals: self.bvals.clone(),
            bvecs: self.bvecs.clone(),
            bedpostx_dir: self.bedpostx_dir.clone(),
            pipeline: self.pipeline.inputs(),
        }
    }

    pub fn to_study(&self) -> Result<Study, DomainError> {
        Study::cross_sectional(
            self.outdir.clone(),
            Session {
                id: self.subject_id.clone(),
                scan: DiffusionScan {
                    dwi: self.dwi.clone(),
                    bvals: self.bvals.clone(),
                    bvecs: self.bvecs.clone(),
                },
                bedpostx_dir: self.bedpostx_dir.clone(),
            },
        )
    }
}

/// Run TRACULA trac-all longitudinally on several timepoints of one subject
///
/// List options are paired by position: the n-th DWI, bvals, bvecs and bedpostX
/// directory belong to the n-th timepoint.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "run-trac-all-longitudinal")]
#[command(author, version, about, long_about = None)]
pub struct LongitudinalArgs {
    /// Output directory (trac-all dtroot)
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub outdir: PathBuf,

    /// FreeSurfer id of the subject template (longitudinal base)
    #[arg(short = 'p', long)]
    pub subject_template_id: String,

    /// FreeSurfer ids of the timepoints
    #[arg(short = 't', long, num_args = 1.., required = true)]
    pub subject_timepoint_ids: Vec<String>,

    /// Preprocessed DWI volumes, one per timepoint
    #[arg(short = 'i', long, num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
    pub dwis: Vec<PathBuf>,

    /// b-values files, one per timepoint
    #[arg(short = 'b', long, num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
    pub bvalss: Vec<PathBuf>,

    /// b-vectors files, one per timepoint
    #[arg(short = 'r', long, num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
    pub bvecss: Vec<PathBuf>,

    /// bedpostX output directories, one per timepoint
    #[arg(short = 'd', long, num_args = 1.., required = true, value_hint = ValueHint::DirPath)]
    pub bedpostx_dirs: Vec<PathBuf>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

impl LongitudinalArgs {
    /// Same arguments with every path made absolute against the working directory.
    pub fn absolutized(&self) -> Self {
        let all = |paths: &[PathBuf]| -> Vec<PathBuf> { paths.iter().map(|p| absolute(p)).collect() };
        Self {
            outdir: absolute(&self.outdir),
            subject_template_id: self.subject_template_id.clone(),
            subject_timepoint_ids: self.subject_timepoint_ids.clone(),
            dwis: all(&self.dwis),
            bvalss: all(&self.bvalss),
            bvecss: all(&self.bvecss),
            bedpostx_dirs: all(&self.bedpostx_dirs),
            pipeline: self.pipeline.absolutized(),
        }
    }

    pub fn inputs(&self) -> LongitudinalInputs {
        LongitudinalInputs {
            outdir: self.outdir.clone(),
            subject_template_id: self.subject_template_id.clone(),
            subject_timepoint_ids: self.subject_timepoint_ids.clone(),
            dwis: self.dwis.clone(),
            bvalss: self.bvalss.clone(),
            bvecss: self.bvecss.clone(),
            bedpostx_dirs: self.bedpostx_dirs.clone(),
            pipeline: self.pipeline.inputs(),
        }
    }

    /// Pair the list options into timepoints, in the order given.
    pub fn to_study(&self) -> Result<Study, DomainError> {
        let expected = self.subject_timepoint_ids.len();
        for (option, actual) in [
            ("dwis", self.dwis.len()),
            ("bvalss", self.bvalss.len()),
            ("bvecss", self.bvecss.len()),
            ("bedpostx-dirs", self.bedpostx_dirs.len()),
        ] {
            if actual != expected {
                return Err(DomainError::LengthMismatch {
                    option,
                    expected,
                    actual,
                });
            }
        }

        let timepoints = izip!(
            &self.subject_timepoint_ids,
            &self.dwis,
            &self.bvalss,
            &self.bvecss,
            &self.bedpostx_dirs
        )
        .map(|(id, dwi, bvals, bvecs, bedpostx_dir)| Session {
            id: id.clone(),
            scan: DiffusionScan {
                dwi: dwi.clone(),
                bvals: bvals.clone(),
                bvecs: bvecs.clone(),
            },
            bedpostx_dir: bedpostx_dir.clone(),
        })
        .collect();

        Study::longitudinal(
            self.outdir.clone(),
            self.subject_template_id.clone(),
            timepoints,
        )
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
