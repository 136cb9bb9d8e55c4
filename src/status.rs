use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Presentation;

pub const NO_MEDIA: &str = "◼ No media";

// ------------------------- Model -------------------------

/// Snapshot reported by the helper. `null` on the wire means no media.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub title: String,
    pub artist: String,
    pub playing: bool,
    pub elapsed_time_micros: u64,
    pub duration_micros: u64,
    pub timestamp_epoch_micros: u64,
}

pub fn parse_state(raw: &str) -> Result<Option<PlaybackState>> {
    serde_json::from_str(raw).context("decoding helper output")
}

// ------------------------- Time -------------------------

pub fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
}

fn signed(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// Elapsed position as of `now`. Only a playing track is moved forward;
/// a projection that lands before zero is clamped.
pub fn project_elapsed(st: &PlaybackState, now: u64) -> u64 {
    if !st.playing {
        return st.elapsed_time_micros;
    }
    let diff = signed(now).saturating_sub(signed(st.timestamp_epoch_micros));
    let total = signed(st.elapsed_time_micros).saturating_add(diff);
    debug!(
        "projecting elapsed={} snapshot={} now={now} diff={diff}",
        st.elapsed_time_micros, st.timestamp_epoch_micros
    );
    u64::try_from(total).unwrap_or_else(|_| {
        warn!("snapshot is {}us ahead of the clock, clamping elapsed to 0", -diff);
        0
    })
}

// ------------------------- Formatting -------------------------

/// `M:SS` from microseconds; minutes are unbounded.
pub fn fmt_time(micros: u64) -> String {
    let m = micros / 60_000_000;
    let s = (micros / 1_000_000) % 60;
    format!("{m}:{s:02}")
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = s.chars().take(max).collect::<String>().trim_end().to_string();
    out.push('…');
    out
}

pub fn render(st: &PlaybackState, now: u64, pres: &Presentation) -> String {
    let title = truncate(&st.title, pres.truncate_title);
    let artist = truncate(&st.artist, pres.truncate_artist);
    let head = if st.playing {
        format!(
            "▶  {}⁘{}",
            fmt_time(project_elapsed(st, now)),
            fmt_time(st.duration_micros)
        )
    } else {
        "⏸".to_string()
    };
    format!("{head}  {} – {}", title.trim(), artist.trim())
}

pub fn status_line(state: Option<&PlaybackState>, now: u64, pres: &Presentation) -> String {
    state.map_or_else(|| NO_MEDIA.to_string(), |st| render(st, now, pres))
}
