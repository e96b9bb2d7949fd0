//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/tracall/tracall.toml`
//! 3. Environment variables: `TRACALL_*` prefix
//! 4. Command-line options (`--subjects-dir`, `--temp-dir`), applied by the CLI

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub trac_all_bin: Option<String>,
    pub freesurfer_home: Option<PathBuf>,
    pub subjects_dir: Option<PathBuf>,
    pub temp_dir: Option<PathBuf>,
}

/// Unified configuration for tracall.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// trac-all executable (name on PATH or absolute path)
    pub trac_all_bin: String,
    /// FreeSurfer installation (default: $FREESURFER_HOME)
    pub freesurfer_home: Option<PathBuf>,
    /// Subjects directory used when neither --subjects-dir nor $SUBJECTS_DIR is set
    pub subjects_dir: Option<PathBuf>,
    /// Parent of the scratch directory holding the generated dmrirc
    pub temp_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trac_all_bin: "trac-all".into(),
            freesurfer_home: std::env::var_os("FREESURFER_HOME").map(PathBuf::from),
            subjects_dir: None,
            temp_dir: None,
        }
    }
}

/// Get the XDG config directory for tracall.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tracall").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tracall.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        fn expand(p: &Path) -> PathBuf {
            PathBuf::from(expand_env_vars(p.to_string_lossy().as_ref()))
        }

        self.trac_all_bin = expand_env_vars(&self.trac_all_bin);
        self.freesurfer_home = self.freesurfer_home.as_deref().map(expand);
        self.subjects_dir = self.subjects_dir.as_deref().map(expand);
        self.temp_dir = self.temp_dir.as_deref().map(expand);
    }

    /// Overlay a parsed config file: specified values win.
    fn apply(&self, raw: &RawSettings) -> Self {
        Self {
            trac_all_bin: raw
                .trac_all_bin
                .clone()
                .unwrap_or_else(|| self.trac_all_bin.clone()),
            freesurfer_home: raw
                .freesurfer_home
                .clone()
                .or_else(|| self.freesurfer_home.clone()),
            subjects_dir: raw
                .subjects_dir
                .clone()
                .or_else(|| self.subjects_dir.clone()),
            temp_dir: raw.temp_dir.clone().or_else(|| self.temp_dir.clone()),
        }
    }

    /// Load settings from defaults, the global config file and `TRACALL_*` variables.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Like [`Settings::load`] with an explicit config file instead of the XDG one.
    ///
    /// A missing file is skipped; an unreadable or malformed one is an error.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_file {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.apply(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply TRACALL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("TRACALL").prefix_separator("_"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("trac_all_bin") {
            settings.trac_all_bin = val;
        }
        if let Ok(val) = config.get_string("freesurfer_home") {
            settings.freesurfer_home = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("subjects_dir") {
            settings.subjects_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("temp_dir") {
            settings.temp_dir = Some(PathBuf::from(val));
        }

        Ok(settings)
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_then_uses_trac_all_on_path() {
        let settings = Settings::default();
        assert_eq!(settings.trac_all_bin, "trac-all");
        assert!(settings.subjects_dir.is_none());
        assert!(settings.temp_dir.is_none());
    }

    #[test]
    fn given_tilde_in_paths_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            trac_all_bin: "~/fs/bin/trac-all".into(),
            freesurfer_home: Some(PathBuf::from("~/freesurfer")),
            subjects_dir: Some(PathBuf::from("$HOME/subjects")),
            temp_dir: None,
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.trac_all_bin.starts_with(&home));
        assert!(settings
            .freesurfer_home
            .unwrap()
            .to_string_lossy()
            .starts_with(&home));
        assert!(settings
            .subjects_dir
            .unwrap()
            .to_string_lossy()
            .starts_with(&home));
    }

    #[test]
    fn given_raw_settings_when_apply_then_specified_values_win() {
        let base = Settings {
            trac_all_bin: "trac-all".into(),
            freesurfer_home: Some(PathBuf::from("/opt/fs")),
            subjects_dir: None,
            temp_dir: Some(PathBuf::from("/tmp")),
        };
        let raw = RawSettings {
            trac_all_bin: Some("/opt/fs/bin/trac-all".into()),
            freesurfer_home: None,
            subjects_dir: Some(PathBuf::from("/subjects")),
            temp_dir: None,
        };

        let result = base.apply(&raw);

        assert_eq!(result.trac_all_bin, "/opt/fs/bin/trac-all");
        assert_eq!(result.freesurfer_home, Some(PathBuf::from("/opt/fs")));
        assert_eq!(result.subjects_dir, Some(PathBuf::from("/subjects")));
        assert_eq!(result.temp_dir, Some(PathBuf::from("/tmp")));
    }
}
