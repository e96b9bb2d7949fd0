//! Domain entities: core data structures

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;

/// Log-file suffix of a cross-sectional run.
pub const CROSS_SECTIONAL_SUFFIX: &str = "trac-all";
/// Log-file suffix of a longitudinal run.
pub const LONGITUDINAL_SUFFIX: &str = "trac-all_longitudinal";

/// The three input files of one diffusion acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffusionScan {
    /// Preprocessed DWI volume
    pub dwi: PathBuf,
    /// b-values text file
    pub bvals: PathBuf,
    /// Gradient directions text file
    pub bvecs: PathBuf,
}

/// One subject (cross-sectional) or one timepoint (longitudinal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// FreeSurfer subject id of the subject or timepoint
    pub id: String,
    pub scan: DiffusionScan,
    /// Precomputed bedpostX directory for this session
    pub bedpostx_dir: PathBuf,
}

/// Switches forwarded to trac-all through the dmrirc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub do_eddy: bool,
    pub rotate_bvecs: bool,
    pub bbregister: bool,
    pub register_mni: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            do_eddy: false,
            rotate_bvecs: true,
            bbregister: true,
            register_mni: true,
        }
    }
}

/// Resolved run parameters beyond the study itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRequest {
    pub options: PipelineOptions,
    /// FreeSurfer subjects directory exported to trac-all
    pub subjects_dir: Option<PathBuf>,
    /// Parent directory for the scratch dmrirc
    pub temp_dir: Option<PathBuf>,
    /// User dmrirc whose settings the generated ones override
    pub config: Option<PathBuf>,
}

/// What a single run processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Study {
    CrossSectional {
        outdir: PathBuf,
        session: Session,
    },
    Longitudinal {
        outdir: PathBuf,
        template_id: String,
        timepoints: Vec<Session>,
    },
}

impl Study {
    /// Build a cross-sectional study after checking the subject id.
    pub fn cross_sectional(outdir: PathBuf, session: Session) -> Result<Self, DomainError> {
        validate_id(&session.id)?;
        Ok(Study::CrossSectional { outdir, session })
    }

    /// Build a longitudinal study. Timepoint order is kept as given.
    pub fn longitudinal(
        outdir: PathBuf,
        template_id: String,
        timepoints: Vec<Session>,
    ) -> Result<Self, DomainError> {
        validate_id(&template_id)?;
        if timepoints.is_empty() {
            return Err(DomainError::NoTimepoints);
        }
        let mut seen = HashSet::new();
        for tp in &timepoints {
            validate_id(&tp.id)?;
            if !seen.insert(tp.id.as_str()) {
                return Err(DomainError::DuplicateTimepoint(tp.id.clone()));
            }
        }
        Ok(Study::Longitudinal {
            outdir,
            template_id,
            timepoints,
        })
    }

    /// TRACULA output root (`dtroot`).
    pub fn outdir(&self) -> &Path {
        match self {
            Study::CrossSectional { outdir, .. } | Study::Longitudinal { outdir, .. } => outdir,
        }
    }

    pub fn sessions(&self) -> &[Session] {
        match self {
            Study::CrossSectional { session, .. } => std::slice::from_ref(session),
            Study::Longitudinal { timepoints, .. } => timepoints,
        }
    }

    pub fn template_id(&self) -> Option<&str> {
        match self {
            Study::CrossSectional { .. } => None,
            Study::Longitudinal { template_id, .. } => Some(template_id),
        }
    }

    pub fn is_longitudinal(&self) -> bool {
        matches!(self, Study::Longitudinal { .. })
    }

    /// Directory trac-all writes for one session.
    ///
    /// Cross-sectional: `<outdir>/<subject>`.
    /// Longitudinal: `<outdir>/<timepoint>.long.<template>`.
    pub fn output_dir(&self, session: &Session) -> PathBuf {
        match self {
            Study::CrossSectional { outdir, .. } => outdir.join(&session.id),
            Study::Longitudinal {
                outdir,
                template_id,
                ..
            } => outdir.join(format!("{}.long.{}", session.id, template_id)),
        }
    }

    /// All output directories, in session order.
    pub fn output_dirs(&self) -> Vec<PathBuf> {
        self.sessions()
            .iter()
            .map(|s| self.output_dir(s))
            .collect()
    }

    /// Suffix of the `{inputs,outputs,runtime}_<suffix>.json` log files.
    pub fn log_suffix(&self) -> &'static str {
        if self.is_longitudinal() {
            LONGITUDINAL_SUFFIX
        } else {
            CROSS_SECTIONAL_SUFFIX
        }
    }
}

/// Subject ids end up in directory names and in csh lists.
fn validate_id(id: &str) -> Result<(), DomainError> {
    let reason = if id.is_empty() {
        Some("empty")
    } else if id.contains('/') {
        Some("contains '/'")
    } else if id.chars().any(char::is_whitespace) {
        Some("contains whitespace")
    } else if id == "." || id == ".." {
        Some("reserved name")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(DomainError::InvalidId {
            id: id.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Expand environment variables in a path string.
///
/// Supports `$VAR`, `${VAR}` and `~`.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
