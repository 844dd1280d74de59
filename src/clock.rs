use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;

/// Catch-up passes are skipped until at least this much time has passed.
pub static MIN_ELAPSED: Lazy<Duration> = Lazy::new(|| Duration::hours(1));

const MILLISECONDS_PER_DAY: f64 = 86_400_000.0;

/// Days between two instants as a real number. Negative if `now` is earlier.
pub fn elapsed_days(last_maintenance: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - last_maintenance).num_milliseconds() as f64 / MILLISECONDS_PER_DAY
}

/// Whether enough time has passed for a catch-up pass.
pub fn is_stale(last_maintenance: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - last_maintenance >= *MIN_ELAPSED
}
