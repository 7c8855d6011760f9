//! Configuration for command defaults and report verbosity.
//!
//! Layers, lowest precedence first: embedded defaults, the user's global
//! config file, environment overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::model::ParameterSnapshot;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));

/// Layered configuration loaded from defaults, user config, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub report: Report,
}

/// Starting values for a fresh command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "Defaults::default_separator")]
    pub separator: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default = "Defaults::default_overwrite_existing")]
    pub overwrite_existing: bool,
    #[serde(default = "Defaults::default_include_component_name")]
    pub include_component_name: bool,
    /// Output folder override; unset falls back to the Downloads folder.
    #[serde(default)]
    pub output_folder: Option<String>,
}

impl Defaults {
    fn default_separator() -> String {
        "_".into()
    }

    fn default_overwrite_existing() -> bool {
        true
    }

    fn default_include_component_name() -> bool {
        true
    }

    /// Folder used when neither config nor stored attributes provide one.
    pub fn resolved_output_folder(&self) -> PathBuf {
        self.output_folder
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(download_folder)
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            separator: Self::default_separator(),
            prefix: String::new(),
            suffix: String::new(),
            overwrite_existing: Self::default_overwrite_existing(),
            include_component_name: Self::default_include_component_name(),
            output_folder: None,
        }
    }
}

/// How per-task outcomes are surfaced to the user after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    notify_failures: Option<bool>,
    #[serde(default)]
    notify_skips: Option<bool>,
}

impl Report {
    fn default_notify_failures() -> bool {
        true
    }

    fn default_notify_skips() -> bool {
        false
    }

    pub fn notify_failures(&self) -> bool {
        self.notify_failures
            .unwrap_or_else(Self::default_notify_failures)
    }

    pub fn notify_skips(&self) -> bool {
        self.notify_skips.unwrap_or_else(Self::default_notify_skips)
    }
}

impl Default for Report {
    fn default() -> Self {
        Self {
            notify_failures: Some(Self::default_notify_failures()),
            notify_skips: Some(Self::default_notify_skips()),
        }
    }
}

/// Environment overrides for settings users change most often.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    output_folder: Option<String>,
    separator: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            output_folder: env::var("STLCMD_OUTPUT_FOLDER").ok(),
            separator: env::var("STLCMD_SEPARATOR").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(output_folder: &str, separator: &str) -> Self {
        Self {
            output_folder: Some(output_folder.to_owned()),
            separator: Some(separator.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the global config file, and env.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        Self::load_with_layers(global_config_path(), env)
    }

    fn load_with_layers(global: Option<PathBuf>, env_overrides: EnvOverrides) -> Result<Self> {
        let mut config = Self::from_str(&DEFAULT_CONFIG)?;

        if let Some(global_path) = global.filter(|path| path.exists()) {
            config = config.merge(Self::from_file(&global_path)?);
        }

        Ok(apply_env_overrides(config, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            report: merge_report(self.report, other.report),
        }
    }

    /// Starting snapshot for a fresh command invocation.
    pub fn initial_snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            output_folder: self.defaults.resolved_output_folder(),
            file_name_prefix: self.defaults.prefix.clone(),
            file_name_suffix: self.defaults.suffix.clone(),
            file_name_separator: self.defaults.separator.clone(),
            include_component_name: self.defaults.include_component_name,
            overwrite_existing: self.defaults.overwrite_existing,
            selected_bodies: Vec::new(),
        }
    }
}

fn merge_defaults(base: Defaults, overlay: Defaults) -> Defaults {
    Defaults {
        separator: if overlay.separator != Defaults::default_separator() {
            overlay.separator
        } else {
            base.separator
        },
        prefix: if overlay.prefix.is_empty() {
            base.prefix
        } else {
            overlay.prefix
        },
        suffix: if overlay.suffix.is_empty() {
            base.suffix
        } else {
            overlay.suffix
        },
        overwrite_existing: if overlay.overwrite_existing
            != Defaults::default_overwrite_existing()
        {
            overlay.overwrite_existing
        } else {
            base.overwrite_existing
        },
        include_component_name: if overlay.include_component_name
            != Defaults::default_include_component_name()
        {
            overlay.include_component_name
        } else {
            base.include_component_name
        },
        output_folder: overlay.output_folder.or(base.output_folder),
    }
}

fn merge_report(mut base: Report, overlay: Report) -> Report {
    if let Some(value) = overlay.notify_failures {
        base.notify_failures = Some(value);
    }
    if let Some(value) = overlay.notify_skips {
        base.notify_skips = Some(value);
    }
    base
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(folder) = env.output_folder {
        config.defaults.output_folder = Some(folder);
    }
    if let Some(separator) = env.separator {
        config.defaults.separator = separator;
    }
    config
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("stlcmd/config.toml"))
}

/// The user's Downloads folder, degrading to the home directory and
/// finally the current directory when the platform offers neither.
pub fn download_folder() -> PathBuf {
    dirs_next::download_dir()
        .or_else(|| dirs_next::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}
