//! Human readable durations

use std::time::Duration;

/// Format an elapsed duration the way wait messages report it
///
/// Sub-second durations round up to one second so a finished wait never
/// reports zero.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs().max(1);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours} hr"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} min"));
    }
    if seconds > 0 {
        parts.push(format!("{seconds} sec"));
    }
    parts.join(" ")
}
