//! # Fixture Forecast
//!
//! A fixed 48-hour forecast for offline development and deterministic tests.
//! It is a real provider response for west London captured over the last
//! weekend of July 2022, trimmed to the fields the dashboard draws:
//!
//! - **Daily summary**: starts 2022-07-31T05:00Z (06:00 BST), full-day code 1001
//! - **Hourly**: 48 consecutive hours from 2022-07-30T15:00Z
//! - **Apparent temperature** equals air temperature throughout
//!
//! Served when the binary runs with `--fixture`, and used by the layout and
//! renderer tests.

use crate::forecast_data::{ForecastError, ForecastSource, Location};
use crate::{Forecast, ForecastInterval};
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

/// Hourly rows: (precipitation mm/hr, precipitation %, temperature °C, weather code, wind m/s)
const HOURLY: [(f64, f64, f64, i32, f64); 48] = [
    (0.0, 0.0, 24.38, 1001, 3.69), // 07-30 15:00Z
    (0.0, 0.0, 24.34, 1001, 3.32),
    (0.0, 0.0, 24.61, 1001, 3.58),
    (0.0, 0.0, 24.18, 1001, 3.68),
    (0.0, 0.0, 23.06, 1001, 3.19),
    (0.0, 0.0, 22.29, 1001, 3.03),
    (0.0, 0.0, 21.5, 1001, 2.89),
    (0.0215, 5.0, 20.71, 1001, 2.49),
    (0.0605, 10.0, 20.0, 1001, 2.66),
    (0.0547, 25.0, 19.35, 1001, 2.43), // 07-31 00:00Z
    (0.0615, 30.0, 18.75, 1001, 2.49),
    (0.0, 0.0, 18.61, 1001, 2.25),
    (0.0, 0.0, 18.67, 1001, 2.68),
    (0.0117, 25.0, 18.46, 1001, 3.51),
    (0.0, 0.0, 18.29, 1001, 3.65), // 07-31 05:00Z, day start
    (0.0, 0.0, 18.39, 1001, 3.94),
    (0.0, 0.0, 18.99, 1001, 4.92),
    (0.0, 0.0, 19.9, 1001, 4.24),
    (0.0, 0.0, 20.66, 1001, 4.56),
    (0.0, 0.0, 21.77, 1001, 5.0),
    (0.1641, 5.0, 21.93, 1001, 4.62),
    (0.1035, 10.0, 21.91, 1001, 4.42),
    (0.1025, 10.0, 22.66, 1001, 4.27),
    (0.1094, 10.0, 23.06, 1001, 4.14),
    (0.0986, 5.0, 23.18, 1001, 3.83),
    (0.1406, 5.0, 22.71, 1001, 3.41),
    (0.1211, 5.0, 22.59, 1001, 2.92),
    (0.1045, 5.0, 22.1, 1001, 2.43),
    (0.0947, 5.0, 21.51, 1001, 1.71),
    (0.0, 0.0, 21.02, 1001, 1.25),
    (0.0, 0.0, 20.27, 1001, 0.88),
    (0.0, 0.0, 19.76, 1001, 0.77),
    (0.0, 0.0, 19.3, 1001, 0.83),
    (0.0215, 5.0, 18.85, 1001, 1.14), // 08-01 00:00Z
    (0.0, 0.0, 18.48, 1102, 1.11),
    (0.0, 0.0, 17.93, 1001, 1.01),
    (0.0127, 5.0, 17.64, 1001, 0.8),
    (0.0293, 5.0, 17.29, 1001, 1.2),
    (0.0, 0.0, 17.24, 1001, 1.1), // 08-01 05:00Z, day end
    (0.0186, 5.0, 17.56, 1001, 1.29),
    (0.0, 0.0, 18.1, 1001, 1.3),
    (0.0, 0.0, 18.84, 1001, 1.33),
    (0.0, 0.0, 19.95, 1001, 1.03),
    (0.0, 0.0, 21.45, 1001, 0.49),
    (0.0, 0.0, 22.82, 1001, 0.28),
    (0.0, 0.0, 24.1, 1102, 0.33),
    (0.0, 0.0, 25.0, 1001, 1.71),
    (0.0, 0.0, 25.7, 1001, 2.15),
];

fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .map(|t| t.fixed_offset())
        .unwrap_or_default()
}

/// The fixture forecast.
pub fn forecast() -> Forecast {
    let today = ForecastInterval {
        start_time: utc(2022, 7, 31, 5),
        precipitation_intensity: 0.1641,
        precipitation_probability: 10.0,
        temperature: 23.18,
        temperature_apparent: 23.18,
        weather_code: 1001,
        weather_code_full_day: Some(1001),
        wind_speed: 5.0,
    };

    let first_hour = utc(2022, 7, 30, 15);
    let hourly = HOURLY
        .iter()
        .zip(0i64..)
        .map(
            |(&(precip, precip_pct, temp, code, wind), i)| ForecastInterval {
                start_time: first_hour + Duration::hours(i),
                precipitation_intensity: precip,
                precipitation_probability: precip_pct,
                temperature: temp,
                temperature_apparent: temp,
                weather_code: code,
                weather_code_full_day: None,
                wind_speed: wind,
            },
        )
        .collect();

    Forecast { today, hourly }
}

/// Forecast source that always returns [`forecast()`], whatever the location.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixtureSource;

#[async_trait]
impl ForecastSource for FixtureSource {
    async fn fetch(&self, _location: &Location) -> Result<Forecast, ForecastError> {
        Ok(forecast())
    }
}
