//! now-playing: one-shot "now playing" line for xbar/SwiftBar-style status bars.
//! - Runs the media-status helper once (default: `media-control get`) and reads its JSON.
//! - Playing tracks get their position projected forward from the helper's snapshot time.
//! - Prints exactly one line on stdout; logs go to stderr only.
//!
//! Notes:
//! - A helper failure is printed as the status line itself and exits 1.
//! - Malformed helper JSON and config errors are fatal (stderr, exit 1, empty stdout).

#![deny(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery, clippy::perf)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

mod config;
mod helper;
mod status;

use anyhow::{Context, Result};
use flexi_logger::{detailed_format, Logger, LoggerHandle};
use log::{debug, error};
use std::{env, path::PathBuf, process::ExitCode};

use config::Logging;

// ------------------------- CLI -------------------------

#[derive(Debug, PartialEq, Eq)]
enum Cli {
    Run { config: Option<PathBuf> },
    Help,
    Usage,
}

fn usage() {
    eprintln!(
        "{}",
        r#"Usage:
  now-playing [--config <path>]

Prints one status line for the current media session:
  ▶  1:23⁘3:45  Title – Artist     playing
  ⏸  Title – Artist                paused
  ◼ No media                       nothing loaded

--config <path>   TOML config (default: $XDG_CONFIG_HOME/now-playing/config.toml)
"#
    );
}

fn parse_args(mut args: Vec<String>) -> Cli {
    let mut config: Option<PathBuf> = None;
    while !args.is_empty() {
        match args[0].as_str() {
            "--config" if args.len() > 1 => {
                config = Some(PathBuf::from(args.remove(1)));
                args.remove(0);
            }
            "-h" | "--help" => return Cli::Help,
            _ => return Cli::Usage,
        }
    }
    Cli::Run { config }
}

// ------------------------- Logging -------------------------

fn init_logging(cfg: &Logging) -> Result<LoggerHandle> {
    Logger::try_with_env_or_str(&cfg.level)
        .with_context(|| format!("invalid log level {:?}", cfg.level))?
        .log_to_stderr()
        .format(detailed_format)
        .start()
        .context("starting logger")
}

// ------------------------- Main -------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let config_path = match parse_args(env::args().skip(1).collect()) {
        Cli::Run { config } => config,
        Cli::Help => {
            usage();
            return Ok(ExitCode::SUCCESS);
        }
        Cli::Usage => {
            usage();
            return Ok(ExitCode::from(2));
        }
    };

    let (cfg, source) = config::read_config(config_path.as_deref())?;
    let _logger = init_logging(&cfg.logging)?;
    match &source {
        Some(p) => debug!("config loaded from {}", p.display()),
        None => debug!("no config file, using defaults"),
    }

    let raw = match helper::query(&cfg.helper).await {
        Ok(raw) => raw,
        Err(e) => {
            error!("{e:#}");
            println!("{e:#}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let state = status::parse_state(&raw)?;
    println!(
        "{}",
        status::status_line(state.as_ref(), status::now_micros(), &cfg.presentation)
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn no_args_runs_with_default_config() {
        assert_eq!(parse_args(vec![]), Cli::Run { config: None });
    }

    #[test]
    fn config_flag_takes_a_path() {
        assert_eq!(
            parse_args(args(&["--config", "/tmp/np.toml"])),
            Cli::Run {
                config: Some(PathBuf::from("/tmp/np.toml"))
            }
        );
    }

    #[test]
    fn help_and_bad_args() {
        assert_eq!(parse_args(args(&["--help"])), Cli::Help);
        assert_eq!(parse_args(args(&["-h"])), Cli::Help);
        assert_eq!(parse_args(args(&["--config"])), Cli::Usage);
        assert_eq!(parse_args(args(&["get"])), Cli::Usage);
    }
}
