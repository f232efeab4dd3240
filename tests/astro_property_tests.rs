use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use skybot::astro::{
    GeoPosition, MoonPhaseLabel, SunEventResult, determine_timezone_from_coordinates, phase,
    sun_events,
};

/// Generate valid latitude values
fn latitude_strategy() -> impl Strategy<Value = f64> {
    -90.0..=90.0
}

/// Generate valid longitude values
fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

/// Instants between 1950 and 2100
fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (-631_152_000i64..4_102_444_800i64)
        .prop_map(|secs| Utc.timestamp_opt(secs, 0).single().unwrap())
}

/// Property tests for the eight-bucket phase classification
#[cfg(test)]
mod phase_label_tests {
    use super::*;

    proptest! {
        /// Every fraction in [0, 1) maps to exactly the bucket floor(f * 8)
        #[test]
        fn test_every_fraction_has_exactly_one_label(f in 0.0f64..1.0) {
            let label = MoonPhaseLabel::from_fraction(f);
            let index = ((f / 0.125).floor() as usize).min(7);
            prop_assert_eq!(label, MoonPhaseLabel::ALL[index]);

            let matching = MoonPhaseLabel::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| {
                    let lower = *i as f64 * 0.125;
                    f >= lower && f < lower + 0.125
                })
                .count();
            prop_assert_eq!(matching, 1);
        }

        /// Bucket lower bounds are closed
        #[test]
        fn test_bucket_boundaries_are_closed_lower(index in 0usize..8) {
            let lower = index as f64 * 0.125;
            prop_assert_eq!(MoonPhaseLabel::from_fraction(lower), MoonPhaseLabel::ALL[index]);
        }
    }
}

/// Property tests for the moon phase calculator
#[cfg(test)]
mod moon_phase_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        /// The fraction is always in [0, 1) and consistent with the label
        #[test]
        fn test_fraction_in_range(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            at in instant_strategy()
        ) {
            let result = phase(&GeoPosition::new(lat, lon), at).unwrap();
            prop_assert!((0.0..1.0).contains(&result.fraction),
                "fraction {} out of range at {at}", result.fraction);
            prop_assert_eq!(result.label, MoonPhaseLabel::from_fraction(result.fraction));
            let slack = Duration::seconds(1);
            prop_assert!(result.previous_new_moon - slack <= at);
            prop_assert!(at < result.next_new_moon + slack);
        }

        /// The observer's position does not change the phase
        #[test]
        fn test_phase_independent_of_position(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            at in instant_strategy()
        ) {
            let here = phase(&GeoPosition::new(lat, lon), at).unwrap();
            let origin = phase(&GeoPosition::new(0.0, 0.0), at).unwrap();
            prop_assert_eq!(here.fraction, origin.fraction);
        }

        /// Out-of-range coordinates are always rejected
        #[test]
        fn test_invalid_latitude_rejected(
            excess in 0.001f64..1000.0,
            sign in prop::bool::ANY,
            at in instant_strategy()
        ) {
            let lat = if sign { 90.0 + excess } else { -90.0 - excess };
            let position = GeoPosition::new(lat, 0.0);
            prop_assert!(phase(&position, at).is_err());
            prop_assert!(sun_events(&position, at).is_err());
        }

        #[test]
        fn test_invalid_longitude_rejected(
            excess in 0.001f64..1000.0,
            sign in prop::bool::ANY
        ) {
            let lon = if sign { 180.0 + excess } else { -180.0 - excess };
            prop_assert!(GeoPosition::new(0.0, lon).validate().is_err());
        }
    }
}

/// Property tests for the sun event calculator
#[cfg(test)]
mod sun_event_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        /// Away from the poles both events exist, follow `at`, and come
        /// within two days
        #[test]
        fn test_events_follow_instant(
            lat in -60.0f64..60.0,
            lon in longitude_strategy(),
            at in instant_strategy()
        ) {
            match sun_events(&GeoPosition::new(lat, lon), at).unwrap() {
                SunEventResult::Events { sunrise, sunset } => {
                    prop_assert!(sunrise > at && sunset > at);
                    prop_assert!(sunrise - at < Duration::hours(48));
                    prop_assert!(sunset - at < Duration::hours(48));
                    prop_assert!((sunrise - sunset).num_hours().abs() < 24);
                }
                other => prop_assert!(false, "unexpected {other:?} at ({lat}, {lon})"),
            }
        }

        /// Anywhere on Earth the calculator answers without an error
        #[test]
        fn test_no_errors_for_valid_positions(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            elevation in 0.0f64..5000.0,
            at in instant_strategy()
        ) {
            let position = GeoPosition::new(lat, lon).with_elevation(elevation);
            prop_assert!(sun_events(&position, at).is_ok());
        }
    }
}

/// Property tests for timezone detection functionality
#[cfg(test)]
mod timezone_detection_tests {
    use super::*;
    use chrono::Offset;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Should not panic anywhere, and any zone found has a sane offset
        #[test]
        fn test_valid_coordinates_return_sane_zone(
            lat in latitude_strategy(),
            lon in longitude_strategy()
        ) {
            if let Some(tz) = determine_timezone_from_coordinates(lat, lon) {
                let offset = tz.offset_from_utc_datetime(&Utc::now().naive_utc());
                let hours = offset.fix().local_minus_utc() as f64 / 3600.0;
                prop_assert!((-12.0..=14.0).contains(&hours),
                    "Unreasonable offset {hours} for ({lat}, {lon})");
            }
        }

        /// Known cities resolve to their zones
        #[test]
        fn test_major_cities_timezones(city_index in 0..6usize) {
            let cities = [
                (42.4531, 18.5375, "Europe/Podgorica"),
                (51.5074, -0.1278, "Europe/London"),
                (35.6762, 139.6503, "Asia/Tokyo"),
                (-33.8688, 151.2093, "Australia/Sydney"),
                (69.6492, 18.9553, "Europe/Oslo"),
                (-23.5505, -46.6333, "America/Sao_Paulo"),
            ];

            let (lat, lon, expected) = cities[city_index];
            let result = determine_timezone_from_coordinates(lat, lon);
            prop_assert_eq!(result, Some(expected.parse().unwrap()));
        }
    }
}
