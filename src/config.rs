use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::iter::FromIterator;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::provider::{Error, ErrorKind, Result};

const CONFIG_PATH_ENV_VAR: &str = "GHCAL_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> io::Result<Vec<PathBuf>> {
    let config_env: Option<PathBuf> = env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from);

    let home = dirs::home_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::Other, "Unable to find home directory")
    })?;

    let home_config = PathBuf::from_iter([&home, &PathBuf::from(".ghcal.toml")].iter());

    let config_xdg = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from_iter([PathBuf::from(dir), PathBuf::from("ghcal/config.toml")].iter())
    } else {
        PathBuf::from_iter(
            [
                dirs::config_dir().unwrap_or_else(|| home.join(".config")),
                PathBuf::from("ghcal"),
                PathBuf::from("config.toml"),
            ]
            .iter(),
        )
    };

    let mut locations = vec![config_xdg, home_config];

    if let Some(path) = config_env {
        locations.insert(0, path);
    }

    Ok(locations)
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeSpec {
    /// Hex colours for levels 0 to 4.
    pub levels: [String; 5],
    pub glyph: char,
}

impl Default for ThemeSpec {
    fn default() -> Self {
        ThemeSpec {
            levels: [
                "#161b22".to_owned(),
                "#0e4429".to_owned(),
                "#006d32".to_owned(),
                "#26a641".to_owned(),
                "#39d353".to_owned(),
            ],
            glyph: '■',
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub user: Option<String>,
    pub contributions_api: String,
    pub github_api: String,
    pub timeout_secs: u64,
    pub tick_rate_ms: u64,
    pub counter_duration_ms: u64,
    pub fetch_stats: bool,
    pub theme: ThemeSpec,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            user: None,
            contributions_api: "https://github-contributions-api.jogruber.de/v4".to_owned(),
            github_api: "https://api.github.com".to_owned(),
            timeout_secs: 10,
            tick_rate_ms: 50,
            counter_duration_ms: 1500,
            fetch_stats: true,
            theme: ThemeSpec::default(),
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::new(
                ErrorKind::Config,
                &format!("Could not read {}: {}", path.display(), e),
            )
        })?;

        Ok(toml::from_str(&content)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    pub fn counter_duration(&self) -> Duration {
        Duration::from_millis(self.counter_duration_ms)
    }

    /// User from the command line wins over the configured one.
    pub fn resolve_user<'a>(&'a self, cli_user: Option<&'a str>) -> Result<&'a str> {
        cli_user
            .or_else(|| self.user.as_deref())
            .filter(|user| !user.trim().is_empty())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::Config,
                    "no GitHub user given, pass --user or set `user` in the config file",
                )
            })
    }
}

/// Loads `path` if given, otherwise the first existing default location,
/// otherwise the built-in defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_path(path);
    }

    let locations = match find_configfile_locations() {
        Ok(locations) => locations,
        Err(e) => {
            log::warn!("{}", e);
            Vec::new()
        }
    };

    if let Some(location) = locations.iter().find(|p| p.is_file()) {
        log::info!("Using config file {}", location.display());
        return Config::from_path(location);
    }

    log::debug!("No config file found, using defaults");
    Ok(Config::default())
}
