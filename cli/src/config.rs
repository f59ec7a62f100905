use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::output::OutputFormat;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "latency-trace.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings from the TOML config file. Every key is optional; command-line
/// flags take precedence over anything set here.
///
/// ```toml
/// [graph]
/// path = "graph.txt"
///
/// [query]
/// step_limit = 10000000
///
/// [output]
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub graph: GraphSettings,
    pub query: QuerySettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphSettings {
    /// Edge-list file to load.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySettings {
    /// Maximum walk frames per counting query. Unset = unlimited.
    pub step_limit: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

impl Settings {
    /// Load settings: the explicit file if given (it must exist), else
    /// [`DEFAULT_CONFIG_FILE`] in the working directory if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), ?settings, "loaded config");
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Overlay command-line values; `None` keeps the file's setting.
    pub fn override_with(
        mut self,
        graph: Option<PathBuf>,
        step_limit: Option<u64>,
        format: Option<OutputFormat>,
    ) -> Self {
        if graph.is_some() {
            self.graph.path = graph;
        }
        if step_limit.is_some() {
            self.query.step_limit = step_limit;
        }
        if let Some(format) = format {
            self.output.format = format;
        }
        self
    }
}
