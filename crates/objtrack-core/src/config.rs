//! Runtime mode configuration.
//!
//! The tracker mode is set via the `OBJTRACK_MODE` environment variable:
//! - `enabled` (default): every intercepted call is validated and tracked.
//! - `off`: no validation or tracking. Pure passthrough for baseline
//!   measurement only.

use std::sync::atomic::{AtomicU8, Ordering};

/// Operating mode for the tracker.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TrackerMode {
    /// Validate and track every intercepted call.
    #[default]
    Enabled,
    /// No validation or tracking; passthrough for baseline measurement.
    Off,
}

impl TrackerMode {
    /// Returns true if registry operations are active.
    #[must_use]
    pub const fn tracking_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

// Atomic cache: 0=unresolved, 1=Enabled, 2=Off.
static CACHED_MODE: AtomicU8 = AtomicU8::new(0);

const MODE_UNRESOLVED: u8 = 0;
const MODE_ENABLED: u8 = 1;
const MODE_OFF: u8 = 2;

fn parse_mode_env(raw: &str) -> TrackerMode {
    match raw.to_ascii_lowercase().as_str() {
        "off" | "none" | "disabled" => TrackerMode::Off,
        _ => TrackerMode::Enabled,
    }
}

/// Get the configured tracker mode (reads the env var on first call, caches
/// thereafter).
#[must_use]
pub fn tracker_mode() -> TrackerMode {
    match CACHED_MODE.load(Ordering::Relaxed) {
        MODE_ENABLED => TrackerMode::Enabled,
        MODE_OFF => TrackerMode::Off,
        _ => {
            let mode = std::env::var("OBJTRACK_MODE")
                .map(|raw| parse_mode_env(&raw))
                .unwrap_or_default();
            let cached = match mode {
                TrackerMode::Enabled => MODE_ENABLED,
                TrackerMode::Off => MODE_OFF,
            };
            // First resolution wins; a concurrent resolver computed the
            // same value from the same environment.
            let _ = CACHED_MODE.compare_exchange(
                MODE_UNRESOLVED,
                cached,
                Ordering::Relaxed,
                Ordering::Relaxed,
            );
            mode
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_disable_spellings() {
        assert_eq!(parse_mode_env("off"), TrackerMode::Off);
        assert_eq!(parse_mode_env("NONE"), TrackerMode::Off);
        assert_eq!(parse_mode_env("disabled"), TrackerMode::Off);
    }

    #[test]
    fn parse_defaults_to_enabled() {
        assert_eq!(parse_mode_env("enabled"), TrackerMode::Enabled);
        assert_eq!(parse_mode_env("garbage"), TrackerMode::Enabled);
    }
}
