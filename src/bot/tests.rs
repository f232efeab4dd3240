// Command parsing, reply rendering and the polling loop against mocked
// weather and chat APIs.

#[cfg(test)]
mod command_tests {
    use crate::bot::{Command, title_case};

    #[test]
    fn test_command_parsing_table() {
        let cases = [
            ("/start", Command::Start),
            ("/hi", Command::Hi),
            ("/HI", Command::Hi),
            ("/help", Command::Help),
            ("/hi@skybot_bot", Command::Hi),
            ("/london", Command::Forecast("london".into())),
            ("/london@skybot_bot extra words", Command::Forecast("london".into())),
            ("  /tokyo  ", Command::Forecast("tokyo".into())),
            ("/", Command::Forecast(String::new())),
            ("/ london", Command::Forecast("london".into())),
            ("hello there", Command::Ignored),
            ("", Command::Ignored),
        ];

        for (text, expected) in cases {
            assert_eq!(Command::parse(text), expected, "parsing {text:?}");
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("london"), "London");
        assert_eq!(title_case("LONDON"), "London");
        assert_eq!(title_case("new_york"), "New_York");
        assert_eq!(title_case("rio-de-janeiro"), "Rio-De-Janeiro");
        assert_eq!(title_case("münchen"), "München");
        assert_eq!(title_case(""), "");
    }
}

#[cfg(test)]
mod reply_tests {
    use crate::bot::{Command, Responder};
    use crate::config::Config;
    use crate::constants::*;
    use crate::time_source::FixedTimeSource;
    use crate::weather::{DailyForecast, MockWeatherProvider, WeatherError, WeatherQuery};
    use chrono::{TimeZone, Utc};

    // Sunday, between the June 2024 full moon and last quarter
    fn clock() -> FixedTimeSource {
        FixedTimeSource(Utc.with_ymd_and_hms(2024, 6, 23, 10, 0, 0).unwrap())
    }

    fn herceg_novi_forecast() -> DailyForecast {
        DailyForecast {
            min_temp: Some(19.4),
            max_temp: Some(28.0),
            pressure: Some(1015.0),
            description: Some("Few clouds".into()),
            latitude: Some(42.45),
            longitude: Some(18.54),
            timezone: Some("Europe/Podgorica".into()),
            city_name: Some("Herceg Novi".into()),
        }
    }

    fn london_forecast() -> DailyForecast {
        DailyForecast {
            min_temp: Some(13.5),
            max_temp: Some(22.0),
            pressure: Some(1017.0),
            description: Some("Scattered clouds".into()),
            latitude: Some(51.50853),
            longitude: Some(-0.12574),
            timezone: Some("Europe/London".into()),
            city_name: Some("London".into()),
        }
    }

    #[test]
    fn test_hi_reply_layout() {
        let config = Config::default();
        let clock = clock();
        let mut weather = MockWeatherProvider::new();
        weather
            .expect_daily_forecast()
            .withf(|query| matches!(query, WeatherQuery::Coordinates(_)))
            .times(1)
            .returning(|_| Ok(herceg_novi_forecast()));

        let responder = Responder::new(&config, &weather, &clock);
        let reply = responder.reply(&Command::Hi).unwrap();
        let lines: Vec<&str> = reply.lines().collect();

        assert_eq!(lines.len(), 8, "unexpected reply:\n{reply}");
        assert_eq!(lines[0], "🌍 Herceg Novi, Sunday 23/06:");
        assert!(lines[1].starts_with("🌅 Sunrise: 05:"), "{}", lines[1]);
        assert_eq!(lines[2], "🌡 Weather: Few clouds");
        assert_eq!(lines[3], "❄️ Min Temp: 19.4°C");
        assert_eq!(lines[4], "☀️ Max Temp: 28.0°C");
        assert_eq!(lines[5], "🌬 Pressure: 1015 hPa");
        assert!(lines[6].starts_with("🌇 Sunset: 20:"), "{}", lines[6]);
        assert_eq!(lines[7], "🌕 Moon Phase: Full Moon");
    }

    #[test]
    fn test_hi_reply_without_weather() {
        let config = Config::default();
        let clock = clock();
        let mut weather = MockWeatherProvider::new();
        weather
            .expect_daily_forecast()
            .returning(|_| Err(WeatherError::RateLimited));

        let responder = Responder::new(&config, &weather, &clock);
        let reply = responder.hi();

        assert!(reply.contains(&format!("\n{WEATHER_UNAVAILABLE}\n")));
        assert!(reply.contains("Sunrise: "));
        assert!(reply.contains("Moon Phase: "));
    }

    #[test]
    fn test_hi_reply_with_incomplete_weather() {
        let config = Config::default();
        let clock = clock();
        let mut weather = MockWeatherProvider::new();
        weather.expect_daily_forecast().returning(|_| {
            Ok(DailyForecast {
                pressure: None,
                ..herceg_novi_forecast()
            })
        });

        let responder = Responder::new(&config, &weather, &clock);
        assert!(responder.hi().contains(WEATHER_UNAVAILABLE));
    }

    #[test]
    fn test_hi_reply_with_invalid_configured_position() {
        // Bypasses validation to exercise the calculator placeholders
        let config = Config {
            latitude: Some(91.0),
            ..Default::default()
        };
        let clock = clock();
        let mut weather = MockWeatherProvider::new();
        weather
            .expect_daily_forecast()
            .returning(|_| Ok(herceg_novi_forecast()));

        let responder = Responder::new(&config, &weather, &clock);
        let reply = responder.hi();

        assert!(reply.contains(&format!("🌅 Sunrise: {SUN_EVENT_UNKNOWN}")));
        assert!(reply.contains(&format!("🌇 Sunset: {SUN_EVENT_UNKNOWN}")));
        assert!(reply.contains(&format!("Moon Phase: {MOON_PHASE_UNAVAILABLE}")));
    }

    #[test]
    fn test_hi_reply_in_polar_day() {
        let config = Config {
            location_name: Some("Tromsø".into()),
            latitude: Some(69.6492),
            longitude: Some(18.9553),
            timezone: Some("Europe/Oslo".into()),
            ..Default::default()
        };
        let clock = clock();
        let mut weather = MockWeatherProvider::new();
        weather
            .expect_daily_forecast()
            .returning(|_| Err(WeatherError::MissingData));

        let responder = Responder::new(&config, &weather, &clock);
        let reply = responder.hi();

        assert!(reply.starts_with("🌍 Tromsø, Sunday 23/06:"));
        assert!(reply.contains(&format!("🌅 Sunrise: {NO_SUNRISE}")));
        assert!(reply.contains(&format!("🌇 Sunset: {NO_SUNSET}")));
    }

    #[test]
    fn test_city_forecast_reply() {
        let config = Config::default();
        let clock = clock();
        let mut weather = MockWeatherProvider::new();
        weather
            .expect_daily_forecast()
            .withf(|query| *query == WeatherQuery::City("london".into()))
            .times(1)
            .returning(|_| Ok(london_forecast()));

        let responder = Responder::new(&config, &weather, &clock);
        let reply = responder
            .reply(&Command::Forecast("london".into()))
            .unwrap();
        let lines: Vec<&str> = reply.lines().collect();

        assert_eq!(lines[0], "Forecast for London:");
        assert_eq!(lines[1], "🌡 Weather: Scattered clouds");
        assert_eq!(lines[2], "❄️ Min Temp: 13.5°C");
        assert_eq!(lines[3], "☀️ Max Temp: 22.0°C");
        assert_eq!(lines[4], "🌬 Pressure: 1017 hPa");
        // Local London time (BST), not the configured Podgorica zone
        assert!(lines[5].starts_with("🌅 Sunrise: 04:"), "{}", lines[5]);
        assert!(lines[6].starts_with("🌇 Sunset: 21:"), "{}", lines[6]);
    }

    #[test]
    fn test_city_forecast_without_provider_timezone_uses_coordinates() {
        let config = Config::default();
        let clock = clock();
        let mut weather = MockWeatherProvider::new();
        weather.expect_daily_forecast().returning(|_| {
            Ok(DailyForecast {
                timezone: None,
                ..london_forecast()
            })
        });

        let responder = Responder::new(&config, &weather, &clock);
        let reply = responder.forecast("london");
        assert!(reply.contains("🌅 Sunrise: 04:"), "{reply}");
    }

    #[test]
    fn test_city_forecast_without_coordinates_omits_sun_lines() {
        let config = Config::default();
        let clock = clock();
        let mut weather = MockWeatherProvider::new();
        weather.expect_daily_forecast().returning(|_| {
            Ok(DailyForecast {
                latitude: None,
                longitude: None,
                ..london_forecast()
            })
        });

        let responder = Responder::new(&config, &weather, &clock);
        let reply = responder.forecast("london");
        assert!(reply.ends_with("🌬 Pressure: 1017 hPa"));
        assert!(!reply.contains("Sunrise"));
    }

    #[test]
    fn test_city_forecast_unavailable() {
        let config = Config::default();
        let clock = clock();
        let mut weather = MockWeatherProvider::new();
        weather
            .expect_daily_forecast()
            .returning(|_| Err(WeatherError::Status(500)));

        let responder = Responder::new(&config, &weather, &clock);
        assert_eq!(
            responder.forecast("new_york"),
            "Weather data for New_York is currently unavailable."
        );
    }

    #[test]
    fn test_empty_city_is_rejected_without_lookup() {
        let config = Config::default();
        let clock = clock();
        let weather = MockWeatherProvider::new();

        let responder = Responder::new(&config, &weather, &clock);
        assert_eq!(
            responder.reply(&Command::Forecast(String::new())).unwrap(),
            "Please provide a valid city name."
        );
    }

    #[test]
    fn test_static_replies() {
        let config = Config::default();
        let clock = clock();
        let weather = MockWeatherProvider::new();
        let responder = Responder::new(&config, &weather, &clock);

        let welcome = responder.reply(&Command::Start).unwrap();
        assert!(welcome.starts_with("Hello! 👋"));
        assert!(welcome.contains("Herceg Novi using /hi"));

        let help = responder.reply(&Command::Help).unwrap();
        assert!(help.contains("/hi"));
        assert!(help.contains("/<city>"));

        assert!(responder.reply(&Command::Ignored).is_none());
    }
}

#[cfg(test)]
mod polling_tests {
    use crate::bot::Responder;
    use crate::bot::telegram::*;
    use crate::config::Config;
    use crate::constants::GENERIC_FAILURE_REPLY;
    use crate::time_source::FixedTimeSource;
    use crate::weather::MockWeatherProvider;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn text_update(update_id: i64, chat_id: i64, text: &str) -> Update {
        Update {
            update_id,
            message: Some(Message {
                message_id: update_id * 10,
                chat: Chat { id: chat_id },
                text: Some(text.to_string()),
            }),
        }
    }

    fn api_error() -> TelegramError {
        TelegramError::Api {
            code: Some(400),
            description: "Bad Request".into(),
        }
    }

    #[test]
    fn test_poll_once_answers_commands_and_advances_offset() {
        let config = Config::default();
        let clock = FixedTimeSource(Utc.with_ymd_and_hms(2024, 6, 23, 10, 0, 0).unwrap());
        let weather = MockWeatherProvider::new();
        let responder = Responder::new(&config, &weather, &clock);

        let mut api = MockChatApi::new();
        api.expect_get_updates()
            .withf(|offset, timeout| *offset == Some(5) && *timeout == 30)
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    text_update(5, 7, "/start"),
                    text_update(6, 7, "just chatting"),
                    Update {
                        update_id: 7,
                        message: None,
                    },
                ])
            });
        api.expect_send_message()
            .withf(|chat_id, text| *chat_id == 7 && text.starts_with("Hello! 👋"))
            .times(1)
            .returning(|_, _| Ok(()));

        let next = poll_once(&api, &responder, Some(5), 30).unwrap();
        assert_eq!(next, Some(8));
    }

    #[test]
    fn test_poll_once_keeps_offset_when_nothing_arrives() {
        let config = Config::default();
        let clock = FixedTimeSource(Utc::now());
        let weather = MockWeatherProvider::new();
        let responder = Responder::new(&config, &weather, &clock);

        let mut api = MockChatApi::new();
        api.expect_get_updates().returning(|_, _| Ok(Vec::new()));
        api.expect_send_message().never();

        assert_eq!(poll_once(&api, &responder, None, 30).unwrap(), None);
    }

    #[test]
    fn test_failed_reply_falls_back_to_generic_notice() {
        let config = Config::default();
        let clock = FixedTimeSource(Utc::now());
        let weather = MockWeatherProvider::new();
        let responder = Responder::new(&config, &weather, &clock);

        let mut api = MockChatApi::new();
        api.expect_get_updates()
            .returning(|_, _| Ok(vec![text_update(1, 42, "/help")]));
        api.expect_send_message()
            .withf(|_, text| text != GENERIC_FAILURE_REPLY)
            .times(1)
            .returning(|_, _| Err(api_error()));
        api.expect_send_message()
            .withf(|chat_id, text| *chat_id == 42 && text == GENERIC_FAILURE_REPLY)
            .times(1)
            .returning(|_, _| Ok(()));

        assert_eq!(poll_once(&api, &responder, None, 30).unwrap(), Some(2));
    }

    #[test]
    fn test_poll_error_is_returned() {
        let config = Config::default();
        let clock = FixedTimeSource(Utc::now());
        let weather = MockWeatherProvider::new();
        let responder = Responder::new(&config, &weather, &clock);

        let mut api = MockChatApi::new();
        api.expect_get_updates().returning(|_, _| Err(api_error()));

        assert!(poll_once(&api, &responder, Some(3), 30).is_err());
    }

    #[test]
    fn test_run_polling_stops_when_flag_clears() {
        let config = Config::default();
        let clock = FixedTimeSource(Utc::now());
        let weather = MockWeatherProvider::new();
        let responder = Responder::new(&config, &weather, &clock);

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let mut api = MockChatApi::new();
        api.expect_get_updates().times(1).returning(move |_, _| {
            flag.store(false, Ordering::SeqCst);
            Err(api_error())
        });

        run_polling(&api, &responder, 1, &running);
        assert!(!running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_client_requires_token() {
        assert!(matches!(
            TelegramClient::new("https://api.telegram.org", "", 30),
            Err(TelegramError::MissingToken)
        ));
        assert!(matches!(
            TelegramClient::from_config(&Config::default()),
            Err(TelegramError::MissingToken)
        ));
    }

    #[test]
    fn test_update_deserialization() {
        let body = r#"{
            "ok": true,
            "result": [{
                "update_id": 900,
                "message": {
                    "message_id": 12,
                    "date": 1719136800,
                    "chat": {"id": -1001, "type": "group", "title": "Sky"},
                    "text": "/hi@skybot_bot"
                }
            }, {
                "update_id": 901,
                "edited_message": {"message_id": 12}
            }]
        }"#;
        let updates: Vec<Update> = parse_api_response(body).unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0], text_update_with(900, 12, -1001, "/hi@skybot_bot"));
        assert!(updates[1].message.is_none());

        let error = parse_api_response::<Vec<Update>>(
            r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("Unauthorized"));
    }

    fn text_update_with(update_id: i64, message_id: i64, chat_id: i64, text: &str) -> Update {
        Update {
            update_id,
            message: Some(Message {
                message_id,
                chat: Chat { id: chat_id },
                text: Some(text.to_string()),
            }),
        }
    }
}
