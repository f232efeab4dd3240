//! Moon phase calculation.
//!
//! The phase is the fraction of the current lunation that has elapsed at a
//! given instant: `(at - previous_new_moon) / (next_new_moon - previous_new_moon)`.
//! New moon instants come from the "true phases" series of Meeus,
//! *Astronomical Algorithms* (2nd ed.), chapter 49: the mean lunation plus the
//! periodic terms in the Sun's and Moon's anomalies and the fourteen planetary
//! arguments. Over the present era the series agrees with the published new
//! moon times to within a minute or two.
//!
//! The fraction is then classified into eight buckets of equal width, each
//! closed at its lower bound and open at its upper bound:
//!
//! | fraction        | label           |
//! |-----------------|-----------------|
//! | [0.000, 0.125)  | New Moon        |
//! | [0.125, 0.250)  | Waxing Crescent |
//! | [0.250, 0.375)  | First Quarter   |
//! | [0.375, 0.500)  | Waxing Gibbous  |
//! | [0.500, 0.625)  | Full Moon       |
//! | [0.625, 0.750)  | Waning Gibbous  |
//! | [0.750, 0.875)  | Last Quarter    |
//! | [0.875, 1.000)  | Waning Crescent |

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::error::PhaseComputationError;
use super::julian::{datetime_to_jd, decimal_year, delta_t_seconds, jd_to_datetime, tt_to_utc_jd};
use super::position::GeoPosition;
use crate::constants::{PHASE_BUCKET_WIDTH, SYNODIC_MONTH_DAYS};

/// JDE of the mean new moon of lunation 0 (2000-01-06).
const NEW_MOON_EPOCH_JDE: f64 = 2_451_550.097_66;

/// Largest representable fraction below 1.0.
const MAX_FRACTION: f64 = 1.0 - f64::EPSILON;

/// Upper bound on lunation steps while bracketing an instant.
/// The initial estimate is never off by more than one lunation.
const MAX_SEARCH_STEPS: usize = 8;

/// One of the eight named phases of the Moon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MoonPhaseLabel {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhaseLabel {
    /// All labels in cycle order, starting at New Moon.
    pub const ALL: [MoonPhaseLabel; 8] = [
        MoonPhaseLabel::NewMoon,
        MoonPhaseLabel::WaxingCrescent,
        MoonPhaseLabel::FirstQuarter,
        MoonPhaseLabel::WaxingGibbous,
        MoonPhaseLabel::FullMoon,
        MoonPhaseLabel::WaningGibbous,
        MoonPhaseLabel::LastQuarter,
        MoonPhaseLabel::WaningCrescent,
    ];

    /// Classify a lunation fraction.
    ///
    /// Values outside [0, 1) are wrapped into the cycle first.
    pub fn from_fraction(fraction: f64) -> Self {
        let wrapped = fraction.rem_euclid(1.0);
        let bucket = (wrapped / PHASE_BUCKET_WIDTH).floor() as usize;
        Self::ALL[bucket.min(Self::ALL.len() - 1)]
    }

    /// Human-readable name, e.g. "Waxing Gibbous".
    pub fn name(&self) -> &'static str {
        match self {
            MoonPhaseLabel::NewMoon => "New Moon",
            MoonPhaseLabel::WaxingCrescent => "Waxing Crescent",
            MoonPhaseLabel::FirstQuarter => "First Quarter",
            MoonPhaseLabel::WaxingGibbous => "Waxing Gibbous",
            MoonPhaseLabel::FullMoon => "Full Moon",
            MoonPhaseLabel::WaningGibbous => "Waning Gibbous",
            MoonPhaseLabel::LastQuarter => "Last Quarter",
            MoonPhaseLabel::WaningCrescent => "Waning Crescent",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MoonPhaseLabel::NewMoon => "🌑",
            MoonPhaseLabel::WaxingCrescent => "🌒",
            MoonPhaseLabel::FirstQuarter => "🌓",
            MoonPhaseLabel::WaxingGibbous => "🌔",
            MoonPhaseLabel::FullMoon => "🌕",
            MoonPhaseLabel::WaningGibbous => "🌖",
            MoonPhaseLabel::LastQuarter => "🌗",
            MoonPhaseLabel::WaningCrescent => "🌘",
        }
    }
}

impl fmt::Display for MoonPhaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a phase computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonPhase {
    /// Elapsed fraction of the lunation, in [0, 1).
    pub fraction: f64,
    pub label: MoonPhaseLabel,
    /// Most recent new moon at or before the queried instant.
    pub previous_new_moon: DateTime<Utc>,
    /// First new moon strictly after the queried instant.
    pub next_new_moon: DateTime<Utc>,
    /// Lunation number counted from the new moon of 2000-01-06.
    pub lunation: i64,
}

impl MoonPhase {
    /// Approximate illuminated fraction of the disk, from the phase angle.
    pub fn illumination(&self) -> f64 {
        (1.0 - (std::f64::consts::TAU * self.fraction).cos()) / 2.0
    }

    /// Days elapsed since the previous new moon at `at`.
    pub fn age_days(&self, at: DateTime<Utc>) -> f64 {
        (at - self.previous_new_moon).num_seconds() as f64 / 86_400.0
    }
}

/// Compute the moon phase at `at`.
///
/// The phase is geocentric, so `position` does not change the result; it is
/// validated so that a bad location fails here the same way it fails for the
/// sun calculator.
pub fn phase(
    position: &GeoPosition,
    at: DateTime<Utc>,
) -> Result<MoonPhase, PhaseComputationError> {
    position.validate()?;

    let jd = datetime_to_jd(at);
    let (lunation, previous_jd, next_jd) = bracketing_new_moons(jd)?;

    let fraction = ((jd - previous_jd) / (next_jd - previous_jd)).clamp(0.0, MAX_FRACTION);
    if !fraction.is_finite() {
        return Err(PhaseComputationError::NumericFailure { lunation });
    }

    Ok(MoonPhase {
        fraction,
        label: MoonPhaseLabel::from_fraction(fraction),
        previous_new_moon: jd_to_datetime(previous_jd).ok_or(PhaseComputationError::OutOfRange)?,
        next_new_moon: jd_to_datetime(next_jd).ok_or(PhaseComputationError::OutOfRange)?,
        lunation,
    })
}

/// Find lunation `k` such that `new_moon(k) <= jd < new_moon(k + 1)`.
///
/// The first guess is taken in TT. Each step jumps by the whole number of
/// synodic months between `jd` and the current candidate.
fn bracketing_new_moons(jd: f64) -> Result<(i64, f64, f64), PhaseComputationError> {
    let jde = jd + delta_t_seconds(decimal_year(jd)) / 86_400.0;
    let estimate = ((jde - NEW_MOON_EPOCH_JDE) / SYNODIC_MONTH_DAYS).floor();
    if !estimate.is_finite() || estimate.abs() > 1e9 {
        return Err(PhaseComputationError::SearchFailed { jd });
    }

    let mut k = estimate as i64;
    for _ in 0..MAX_SEARCH_STEPS {
        let previous = new_moon_jd(k)?;
        let months = ((jd - previous) / SYNODIC_MONTH_DAYS).floor() as i64;
        if previous > jd {
            k += months.min(-1);
            continue;
        }
        let next = new_moon_jd(k + 1)?;
        if next <= jd {
            k += months.max(1);
            continue;
        }
        return Ok((k, previous, next));
    }

    Err(PhaseComputationError::SearchFailed { jd })
}

/// UTC julian day of the true new moon of lunation `k`.
fn new_moon_jd(k: i64) -> Result<f64, PhaseComputationError> {
    let jd = tt_to_utc_jd(true_new_moon_jde(k as f64));
    if jd.is_finite() {
        Ok(jd)
    } else {
        Err(PhaseComputationError::NumericFailure { lunation: k })
    }
}

/// Julian ephemeris day (TT) of the true new moon of lunation `k`.
fn true_new_moon_jde(k: f64) -> f64 {
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let mean = NEW_MOON_EPOCH_JDE + SYNODIC_MONTH_DAYS * k + 0.000_154_37 * t2
        - 0.000_000_150 * t3
        + 0.000_000_000_73 * t4;

    // Eccentricity of the Earth's orbit
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;

    // Sun's mean anomaly, Moon's mean anomaly, Moon's argument of latitude,
    // longitude of the ascending node
    let m = (2.5534 + 29.105_356_70 * k - 0.000_001_4 * t2 - 0.000_000_11 * t3).to_radians();
    let mp = (201.5643 + 385.816_935_28 * k + 0.010_758_2 * t2 + 0.000_012_38 * t3
        - 0.000_000_058 * t4)
        .to_radians();
    let f = (160.7108 + 390.670_502_84 * k - 0.001_611_8 * t2 - 0.000_002_27 * t3
        + 0.000_000_011 * t4)
        .to_radians();
    let omega = (124.7746 - 1.563_755_88 * k + 0.002_067_2 * t2 + 0.000_002_15 * t3).to_radians();

    let periodic = -0.407_20 * mp.sin()
        + 0.172_41 * e * m.sin()
        + 0.016_08 * (2.0 * mp).sin()
        + 0.010_39 * (2.0 * f).sin()
        + 0.007_39 * e * (mp - m).sin()
        - 0.005_14 * e * (mp + m).sin()
        + 0.002_08 * e * e * (2.0 * m).sin()
        - 0.001_11 * (mp - 2.0 * f).sin()
        - 0.000_57 * (mp + 2.0 * f).sin()
        + 0.000_56 * e * (2.0 * mp + m).sin()
        - 0.000_42 * (3.0 * mp).sin()
        + 0.000_42 * e * (m + 2.0 * f).sin()
        + 0.000_38 * e * (m - 2.0 * f).sin()
        - 0.000_24 * e * (2.0 * mp - m).sin()
        - 0.000_17 * omega.sin()
        - 0.000_07 * (mp + 2.0 * m).sin()
        + 0.000_04 * (2.0 * mp - 2.0 * f).sin()
        + 0.000_04 * (3.0 * m).sin()
        + 0.000_03 * (mp + m - 2.0 * f).sin()
        + 0.000_03 * (2.0 * mp + 2.0 * f).sin()
        - 0.000_03 * (mp + m + 2.0 * f).sin()
        + 0.000_03 * (mp - m + 2.0 * f).sin()
        - 0.000_02 * (mp - m - 2.0 * f).sin()
        - 0.000_02 * (3.0 * mp + m).sin()
        + 0.000_02 * (4.0 * mp).sin();

    mean + periodic + planetary_correction(k, t2)
}

/// Additional corrections from the planetary arguments A1..A14, in days.
fn planetary_correction(k: f64, t2: f64) -> f64 {
    const TERMS: [(f64, f64, f64); 13] = [
        (0.000_165, 251.88, 0.016_321),
        (0.000_164, 251.83, 26.651_886),
        (0.000_126, 349.42, 36.412_478),
        (0.000_110, 84.66, 18.206_239),
        (0.000_062, 141.74, 53.303_771),
        (0.000_060, 207.14, 2.453_732),
        (0.000_056, 154.84, 7.306_860),
        (0.000_047, 34.52, 27.261_239),
        (0.000_042, 207.19, 0.121_824),
        (0.000_040, 291.34, 1.844_379),
        (0.000_037, 161.72, 24.198_154),
        (0.000_035, 239.56, 25.513_099),
        (0.000_023, 331.55, 3.592_518),
    ];

    // A1 is the only argument with a secular T² term
    let a1 = (299.77 + 0.107_408 * k - 0.009_173 * t2).to_radians();
    TERMS
        .iter()
        .fold(0.000_325 * a1.sin(), |acc, &(coefficient, base, rate)| {
            acc + coefficient * (base + rate * k).to_radians().sin()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn herceg_novi() -> GeoPosition {
        GeoPosition::new(42.4531, 18.5375)
    }

    #[test]
    fn test_bucket_boundaries_are_closed_lower_open_upper() {
        assert_eq!(MoonPhaseLabel::from_fraction(0.0), MoonPhaseLabel::NewMoon);
        assert_eq!(
            MoonPhaseLabel::from_fraction(0.124_999),
            MoonPhaseLabel::NewMoon
        );
        assert_eq!(
            MoonPhaseLabel::from_fraction(0.125),
            MoonPhaseLabel::WaxingCrescent
        );
        assert_eq!(
            MoonPhaseLabel::from_fraction(0.25),
            MoonPhaseLabel::FirstQuarter
        );
        assert_eq!(
            MoonPhaseLabel::from_fraction(0.375),
            MoonPhaseLabel::WaxingGibbous
        );
        assert_eq!(MoonPhaseLabel::from_fraction(0.5), MoonPhaseLabel::FullMoon);
        assert_eq!(
            MoonPhaseLabel::from_fraction(0.625),
            MoonPhaseLabel::WaningGibbous
        );
        assert_eq!(
            MoonPhaseLabel::from_fraction(0.75),
            MoonPhaseLabel::LastQuarter
        );
        assert_eq!(
            MoonPhaseLabel::from_fraction(0.875),
            MoonPhaseLabel::WaningCrescent
        );
        assert_eq!(
            MoonPhaseLabel::from_fraction(MAX_FRACTION),
            MoonPhaseLabel::WaningCrescent
        );
    }

    #[test]
    fn test_out_of_range_fractions_wrap() {
        assert_eq!(MoonPhaseLabel::from_fraction(1.0), MoonPhaseLabel::NewMoon);
        assert_eq!(
            MoonPhaseLabel::from_fraction(-0.1),
            MoonPhaseLabel::WaningCrescent
        );
    }

    #[test]
    fn test_reference_new_moon_january_2024() {
        // Published new moon: 2024-01-11 11:57 UTC
        let reference = Utc.with_ymd_and_hms(2024, 1, 11, 11, 57, 0).unwrap();
        let result = phase(&herceg_novi(), reference + Duration::hours(1)).unwrap();

        assert_eq!(result.label, MoonPhaseLabel::NewMoon);
        assert!(result.fraction < 0.01, "fraction = {}", result.fraction);
        let error = (result.previous_new_moon - reference).num_minutes().abs();
        assert!(error <= 10, "new moon off by {error} minutes");
    }

    #[test]
    fn test_reference_new_moon_january_2000() {
        // Published new moon: 2000-01-06 18:14 UTC
        let reference = Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0).unwrap();
        let result = phase(&herceg_novi(), reference + Duration::hours(2)).unwrap();

        assert_eq!(result.lunation, 0);
        let error = (result.previous_new_moon - reference).num_minutes().abs();
        assert!(error <= 10, "new moon off by {error} minutes");
    }

    #[test]
    fn test_instant_just_after_new_moon_has_zero_fraction() {
        let probe = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let new_moon = phase(&herceg_novi(), probe).unwrap().previous_new_moon;

        let at_new_moon = phase(&herceg_novi(), new_moon + Duration::seconds(1)).unwrap();
        assert_eq!(at_new_moon.previous_new_moon, new_moon);
        assert!(at_new_moon.fraction < 1e-6);
        assert_eq!(at_new_moon.label, MoonPhaseLabel::NewMoon);
    }

    #[test]
    fn test_after_full_moon() {
        // Published full moon: 2024-01-25 17:54 UTC
        let full = Utc.with_ymd_and_hms(2024, 1, 25, 17, 54, 0).unwrap();
        let result = phase(&herceg_novi(), full + Duration::hours(36)).unwrap();
        assert_eq!(result.label, MoonPhaseLabel::FullMoon);
        assert!(result.illumination() > 0.9);
    }

    #[test]
    fn test_bracket_contains_instant() {
        let at = Utc.with_ymd_and_hms(2031, 7, 4, 9, 30, 0).unwrap();
        let result = phase(&herceg_novi(), at).unwrap();
        assert!(result.previous_new_moon <= at);
        assert!(result.next_new_moon > at);

        let length = (result.next_new_moon - result.previous_new_moon).num_hours();
        // Lunations range from roughly 29.27 to 29.83 days
        assert!((700..=717).contains(&length), "lunation of {length} hours");
        assert!((0.0..1.0).contains(&result.fraction));
    }

    #[test]
    fn test_invalid_position_is_an_error() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let result = phase(&GeoPosition::new(91.0, 0.0), at);
        assert!(matches!(
            result,
            Err(PhaseComputationError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_names_and_emoji_are_distinct() {
        let names: std::collections::HashSet<_> =
            MoonPhaseLabel::ALL.iter().map(|l| l.name()).collect();
        let emoji: std::collections::HashSet<_> =
            MoonPhaseLabel::ALL.iter().map(|l| l.emoji()).collect();
        assert_eq!(names.len(), 8);
        assert_eq!(emoji.len(), 8);
        assert_eq!(MoonPhaseLabel::FirstQuarter.to_string(), "First Quarter");
    }
}
