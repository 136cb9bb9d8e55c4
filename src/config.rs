use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

// ------------------------- Config -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub helper: Helper,
    #[serde(default)]
    pub presentation: Presentation,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Deserialize)]
pub struct Helper {
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}
fn default_command() -> String {
    "/opt/homebrew/bin/media-control".into()
}
fn default_args() -> Vec<String> {
    vec!["get".into()]
}
impl Default for Helper {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: default_args(),
        }
    }
}
impl Helper {
    /// Command with `$HOME`/`$XDG_CONFIG_HOME` substituted.
    pub fn program(&self) -> String {
        expand(&self.command)
    }

    /// Human-readable command line, used in failure descriptions.
    pub fn command_line(&self) -> String {
        let mut s = self.program();
        for a in &self.args {
            s.push(' ');
            s.push_str(a);
        }
        s
    }
}

#[derive(Debug, Deserialize)]
pub struct Presentation {
    #[serde(default = "d64usize")]
    pub truncate_title: usize,
    #[serde(default = "d64usize")]
    pub truncate_artist: usize,
}
fn d64usize() -> usize {
    64
}
impl Default for Presentation {
    fn default() -> Self {
        Self {
            truncate_title: d64usize(),
            truncate_artist: d64usize(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Logging {
    #[serde(default = "default_level")]
    pub level: String,
}
fn default_level() -> String {
    "warn".into()
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

// ------------------------- Utils -------------------------

fn expand(path: &str) -> String {
    let mut s = path.to_string();
    if let Some(home) = dirs::home_dir() {
        s = s.replace("$HOME", home.to_string_lossy().as_ref());
    }
    if let Some(cfg) = dirs::config_dir() {
        s = s.replace("$XDG_CONFIG_HOME", cfg.to_string_lossy().as_ref());
    }
    s
}

// ------------------------- Config I/O -------------------------

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("now-playing").join("config.toml"))
}

/// Loads the config. An explicit path must exist; a missing default file
/// yields the built-in defaults. Returns the file actually read, if any.
pub fn read_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.is_file() => p,
            _ => return Ok((Config::default(), None)),
        },
    };
    let text = fs::read_to_string(&path).with_context(|| format!("reading config {}", path.display()))?;
    let cfg = parse_config(&text).with_context(|| format!("parsing toml {}", path.display()))?;
    Ok((cfg, Some(path)))
}

fn parse_config(text: &str) -> Result<Config> {
    Ok(toml::from_str(text)?)
}
