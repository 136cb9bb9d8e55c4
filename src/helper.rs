use anyhow::{bail, Context, Result};
use log::{debug, warn};
use std::process::Stdio;
use tokio::process::Command;

use crate::config::Helper;

// ------------------------- Status query -------------------------

/// Runs the media-status helper to completion and returns its stdout.
///
/// Any error from here is an invocation failure: the caller prints the
/// description as the status line and exits non-zero.
pub async fn query(helper: &Helper) -> Result<String> {
    let cmdline = helper.command_line();
    debug!("running helper `{cmdline}`");

    let out = Command::new(helper.program())
        .args(&helper.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .with_context(|| format!("failed to run helper `{cmdline}`"))?;

    let stderr = String::from_utf8_lossy(&out.stderr);
    let first_err = stderr.lines().map(str::trim).find(|l| !l.is_empty());

    if !out.status.success() {
        match first_err {
            Some(line) => bail!("helper `{cmdline}` failed with {}: {line}", out.status),
            None => bail!("helper `{cmdline}` failed with {}", out.status),
        }
    }
    if let Some(line) = first_err {
        warn!("helper stderr: {line}");
    }

    debug!("helper printed {} bytes", out.stdout.len());
    String::from_utf8(out.stdout).with_context(|| format!("helper `{cmdline}` printed non-UTF-8 output"))
}
