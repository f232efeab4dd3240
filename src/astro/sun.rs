//! Sunrise and sunset calculation.
//!
//! Rise and set are defined by the upper limb of the sun touching a horizon
//! depressed by 0°34′, with no pressure-based refraction correction on top.
//! With a solar semi-diameter of 16′ this puts the center of the disk at
//! −0°50′ (−0.833°), which is exactly the altitude the `sunrise` crate uses
//! for `SolarEvent::Sunrise` and `SolarEvent::Sunset`. Observer elevation
//! lowers the horizon further through [`SolarDay::with_altitude`].
//!
//! The crate does not report polar day or polar night, so each day is first
//! checked with the sunrise equation's hour angle: when
//! `|cos H₀| > 1` the sun never crosses the horizon on that day and the
//! result is [`SunEventResult::Circumpolar`].

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sunrise::{Coordinates, SolarDay, SolarEvent};

use super::error::{PositionError, SunEventError};
use super::julian::{J2000_JD, datetime_to_jd};
use super::position::GeoPosition;
use crate::constants::{HORIZON_DEPRESSION_ARCMIN, SOLAR_SEMIDIAMETER_ARCMIN};

/// Obliquity of the ecliptic used by the sunrise equation, in degrees.
const OBLIQUITY_DEG: f64 = 23.4397;

/// Why the sun does not rise or set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CircumpolarKind {
    /// The sun stays above the horizon all day.
    PolarDay,
    /// The sun stays below the horizon all day.
    PolarNight,
}

/// Outcome of a sun event computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SunEventResult {
    Events {
        sunrise: DateTime<Utc>,
        sunset: DateTime<Utc>,
    },
    /// No rise or set exists for the searched day at this latitude.
    Circumpolar(CircumpolarKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Rise,
    Set,
}

impl Event {
    fn name(self) -> &'static str {
        match self {
            Event::Rise => "sunrise",
            Event::Set => "sunset",
        }
    }

    fn solar_event(self) -> SolarEvent {
        match self {
            Event::Rise => SolarEvent::Sunrise,
            Event::Set => SolarEvent::Sunset,
        }
    }
}

enum Crossing {
    At(DateTime<Utc>),
    Circumpolar(CircumpolarKind),
}

/// Compute the next sunrise and the next sunset strictly after `at`.
///
/// The two events are searched independently, so during daytime the returned
/// sunset comes before the returned sunrise. If the day on which either event
/// is due has no horizon crossing, the result is `Circumpolar`.
pub fn sun_events(
    position: &GeoPosition,
    at: DateTime<Utc>,
) -> Result<SunEventResult, SunEventError> {
    position.validate_with_elevation()?;

    let sunrise = match next_crossing(position, at, Event::Rise)? {
        Crossing::At(time) => time,
        Crossing::Circumpolar(kind) => return Ok(SunEventResult::Circumpolar(kind)),
    };
    let sunset = match next_crossing(position, at, Event::Set)? {
        Crossing::At(time) => time,
        Crossing::Circumpolar(kind) => return Ok(SunEventResult::Circumpolar(kind)),
    };

    Ok(SunEventResult::Events { sunrise, sunset })
}

/// Compute sunrise and sunset belonging to one solar day.
///
/// `date` is the UTC calendar date of the day's solar noon at the position's
/// longitude; the returned sunrise always precedes the returned sunset.
pub fn sun_events_on(
    position: &GeoPosition,
    date: NaiveDate,
) -> Result<SunEventResult, SunEventError> {
    position.validate_with_elevation()?;

    let sunrise = match crossing_on(position, date, Event::Rise)? {
        Crossing::At(time) => time,
        Crossing::Circumpolar(kind) => return Ok(SunEventResult::Circumpolar(kind)),
    };
    let sunset = match crossing_on(position, date, Event::Set)? {
        Crossing::At(time) => time,
        Crossing::Circumpolar(kind) => return Ok(SunEventResult::Circumpolar(kind)),
    };

    Ok(SunEventResult::Events { sunrise, sunset })
}

/// Scan consecutive solar days for the first `event` after `at`.
///
/// The scan starts one day early because at far western longitudes the
/// previous UTC date's sunset can still lie ahead of `at`.
fn next_crossing(
    position: &GeoPosition,
    at: DateTime<Utc>,
    event: Event,
) -> Result<Crossing, SunEventError> {
    let today = at.date_naive();
    let start = today
        .checked_sub_days(Days::new(1))
        .ok_or(SunEventError::OutOfRange(today))?;

    for offset in 0..4 {
        let date = start
            .checked_add_days(Days::new(offset))
            .ok_or(SunEventError::OutOfRange(start))?;

        // Every event of a solar day lies within 12 hours of its transit
        let day_end = approximate_transit(position, date)?
            .checked_add_signed(Duration::hours(12))
            .ok_or(SunEventError::OutOfRange(date))?;
        if day_end <= at {
            continue;
        }

        match crossing_on(position, date, event)? {
            Crossing::At(time) if time <= at => continue,
            crossing => return Ok(crossing),
        }
    }

    Err(SunEventError::NotFound {
        event: event.name(),
        start,
    })
}

/// The `event` of the solar day `date`, or the circumpolar condition.
fn crossing_on(
    position: &GeoPosition,
    date: NaiveDate,
    event: Event,
) -> Result<Crossing, SunEventError> {
    // SolarDay panics when an event falls outside chrono's range
    if date <= NaiveDate::MIN + Days::new(1) || date >= NaiveDate::MAX - Days::new(1) {
        return Err(SunEventError::OutOfRange(date));
    }

    let cos_hour_angle = horizon_hour_angle_cosine(position, date)?;
    if let Some(kind) = circumpolar_kind(cos_hour_angle) {
        return Ok(Crossing::Circumpolar(kind));
    }

    let coordinates = Coordinates::new(position.latitude, position.longitude)
        .ok_or(PositionError::Latitude(position.latitude))?;
    let time = SolarDay::new(coordinates, date)
        .with_altitude(position.elevation)
        .event_time(event.solar_event());

    // Right at the polar-day boundary the crate can disagree with the check
    // above and return a time nowhere near the requested day.
    let transit = approximate_transit(position, date)?;
    if (time - transit).num_hours().abs() > 24 {
        let kind = if cos_hour_angle > 0.0 {
            CircumpolarKind::PolarNight
        } else {
            CircumpolarKind::PolarDay
        };
        return Ok(Crossing::Circumpolar(kind));
    }

    Ok(Crossing::At(time))
}

fn circumpolar_kind(cos_hour_angle: f64) -> Option<CircumpolarKind> {
    if cos_hour_angle < -1.0 {
        Some(CircumpolarKind::PolarDay)
    } else if cos_hour_angle > 1.0 {
        Some(CircumpolarKind::PolarNight)
    } else {
        None
    }
}

/// Approximate solar transit: 12:00 UTC shifted by the longitude.
fn approximate_transit(
    position: &GeoPosition,
    date: NaiveDate,
) -> Result<DateTime<Utc>, SunEventError> {
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
    let shift = Duration::seconds((position.longitude / 15.0 * 3600.0).round() as i64);
    noon.and_utc()
        .checked_sub_signed(shift)
        .ok_or(SunEventError::OutOfRange(date))
}

/// Altitude of the sun's center at rise/set for this observer, in degrees.
pub fn horizon_altitude_deg(elevation: f64) -> f64 {
    let standard = -(HORIZON_DEPRESSION_ARCMIN + SOLAR_SEMIDIAMETER_ARCMIN) / 60.0;
    let dip = 2.076 * elevation.max(0.0).sqrt() / 60.0;
    standard - dip
}

/// `cos H₀` of the sunrise equation for `date` at `position`.
fn horizon_hour_angle_cosine(
    position: &GeoPosition,
    date: NaiveDate,
) -> Result<f64, SunEventError> {
    let days = datetime_to_jd(approximate_transit(position, date)?) - J2000_JD;

    let mean_anomaly = (357.5291 + 0.985_600_28 * days).rem_euclid(360.0);
    let m = mean_anomaly.to_radians();
    let center = 1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin();
    let ecliptic_longitude = (mean_anomaly + center + 180.0 + 102.9372)
        .rem_euclid(360.0)
        .to_radians();
    let declination = (ecliptic_longitude.sin() * OBLIQUITY_DEG.to_radians().sin()).asin();

    let latitude = position.latitude.to_radians();
    let altitude = horizon_altitude_deg(position.elevation).to_radians();

    Ok((altitude.sin() - latitude.sin() * declination.sin())
        / (latitude.cos() * declination.cos()))
}
