//! Julian day conversions and the TT/UTC offset.

use chrono::{DateTime, Utc};

/// Julian day of the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian day of J2000.0.
pub const J2000_JD: f64 = 2_451_545.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert a UTC instant to a (UTC-based) julian day.
pub fn datetime_to_jd(at: DateTime<Utc>) -> f64 {
    let secs = at.timestamp() as f64 + f64::from(at.timestamp_subsec_nanos()) / 1e9;
    UNIX_EPOCH_JD + secs / SECONDS_PER_DAY
}

/// Convert a (UTC-based) julian day back to an instant.
///
/// Returns `None` for non-finite input or days outside chrono's range.
pub fn jd_to_datetime(jd: f64) -> Option<DateTime<Utc>> {
    let secs = (jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY;
    if !secs.is_finite() || secs.abs() > 1e16 {
        return None;
    }
    let whole = secs.floor();
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Decimal year for a julian day, good enough for ΔT lookups.
pub fn decimal_year(jd: f64) -> f64 {
    2000.0 + (jd - J2000_JD) / 365.25
}

/// ΔT = TT − UT in seconds (Espenak & Meeus polynomial fits).
///
/// Outside 1986-2150 the long-term parabola is used; its error grows with
/// distance from the present, which the callers accept.
pub fn delta_t_seconds(year: f64) -> f64 {
    if (1986.0..2005.0).contains(&year) {
        let t = year - 2000.0;
        63.86 + 0.3345 * t - 0.060374 * t.powi(2)
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    } else if (2005.0..2050.0).contains(&year) {
        let t = year - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t.powi(2)
    } else if (2050.0..2150.0).contains(&year) {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u.powi(2) - 0.5628 * (2150.0 - year)
    } else {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u.powi(2)
    }
}

/// Convert a julian ephemeris day (TT) to a UTC-based julian day.
pub fn tt_to_utc_jd(jde: f64) -> f64 {
    jde - delta_t_seconds(decimal_year(jde)) / SECONDS_PER_DAY
}
