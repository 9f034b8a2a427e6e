// src/audio/time.rs
//! Clock-face formatting for playback positions.
//!
//! Positions are rendered as `MM:SS`. Fractional seconds are truncated and the
//! minute field wraps at 60, so there is no hour field.

/// Whole seconds contained in `t`. Negative and non-finite positions read as zero.
fn whole_seconds(t: f64) -> u64 {
    if t.is_finite() && t > 0.0 {
        t.trunc() as u64
    } else {
        0
    }
}

/// Minutes-of-hour for `t`, zero-padded to two digits.
pub fn minutes(t: f64) -> String {
    format!("{:02}", (whole_seconds(t) / 60) % 60)
}

/// Seconds-of-minute for `t`, zero-padded to two digits.
pub fn seconds(t: f64) -> String {
    format!("{:02}", whole_seconds(t) % 60)
}

/// `MM:SS` for a single position.
pub fn clock(t: f64) -> String {
    format!("{}:{}", minutes(t), seconds(t))
}

/// `MM:SS / MM:SS` label shown next to the seek gauge.
pub fn clock_pair(current: f64, duration: f64) -> String {
    format!("{} / {}", clock(current), clock(duration))
}
