//! Command-line interface configuration
//!
//! Report defaults can be set in an `rpi-otp.toml` file, looked up in the
//! current directory and then in the user's configuration directory. A file
//! passed explicitly with `--config` must exist.

use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{report::ReportOptions, Error};

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "rpi-otp.toml";

/// Tool configuration
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Report configuration
    #[serde(default)]
    pub report: ReportConfig,
}

/// Contents of the printed report
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Print raw binary next to decoded values
    #[serde(default = "default_true")]
    pub show_binary: bool,
    /// Print the undocumented parts of regions 16 and 27
    #[serde(default = "default_true")]
    pub show_unknown_regions: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_binary: true,
            show_unknown_regions: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl From<&ReportConfig> for ReportOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            show_binary: config.show_binary,
            show_unknown_regions: config.show_unknown_regions,
        }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// With an explicit `path` only that file is read. Otherwise the first
    /// file found in the search path is used, or the defaults if there is
    /// none.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        match Self::search_path().into_iter().find(|path| path.is_file()) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Read and parse the configuration file at `path`
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let data = read_to_string(path).map_err(|source| Error::InvalidConfig {
            path: path.to_path_buf(),
            source: source.into(),
        })?;

        let config = Self::parse(&data).map_err(|source| Error::InvalidConfig {
            path: path.to_path_buf(),
            source: source.into(),
        })?;
        debug!("Config from {}: {config:#?}", path.display());

        Ok(config)
    }

    fn parse(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(data)
    }

    fn search_path() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];

        if let Some(dirs) = ProjectDirs::from("rs", "rpi-otp", "rpi-otp") {
            paths.push(dirs.config_dir().join(CONFIG_FILE_NAME));
        }

        paths
    }
}
