//! # Weather Dashboard Core Library
//!
//! This library provides the data model and rendering pipeline for a single-page
//! weather dashboard sized for a 4.2" monochrome e-paper panel (400×300, 1 bit per pixel).
//!
//! ## Design Philosophy
//!
//! ### One request, one render
//! - **Linear pipeline**: fetch forecast → compute layout → rasterize → encode BMP
//! - **Immutable values**: a [`Forecast`] is built once per request and dropped after
//!   the response is written
//! - **Shared read-only assets**: icons and fonts are loaded at start-up and shared
//!   between requests without locking
//!
//! ### The 06:00 day boundary
//! The dashboard's "day" runs from 06:00 to 06:00 the next morning in the configured
//! timezone, not midnight to midnight. Hours before 06:00 are drawn with night icons.
//!
//! ### Data Flow
//! 1. **Source**: [`forecast_data::TomorrowIoSource`] or [`fixture::FixtureSource`]
//! 2. **Layout**: [`layout::Layout`] maps time and values to pixel coordinates
//! 3. **Render**: [`renderer::DashboardRenderer`] draws onto a [`canvas::Canvas`]
//! 4. **Encode**: [`bmp::encode`] produces the 1-bpp bitmap served by [`server`]
//!
//! ## Core Types
//! - [`ForecastInterval`]: one time-sampled observation
//! - [`Forecast`]: today's daily summary plus the hourly breakdown

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone};
use chrono_tz::Tz;

// Module declarations
pub mod assets;
pub mod bmp;
pub mod canvas;
pub mod conditions;
pub mod config;
pub mod fixture;
pub mod forecast_data;
pub mod layout;
pub mod renderer;
pub mod server;

#[cfg(test)]
mod tests;

/// Hour of the local day at which the dashboard's day begins.
pub const DAY_START_HOUR: u32 = 6;

/// One forecast interval, either an hour or a whole day.
///
/// `weather_code_full_day` is only populated on the daily interval; the provider
/// omits it on hourly entries.
///
/// # Example
/// ```
/// use chrono::DateTime;
/// use weather_dash_lib::ForecastInterval;
///
/// let hour = ForecastInterval {
///     start_time: DateTime::parse_from_rfc3339("2022-07-31T05:00:00Z").unwrap(),
///     precipitation_intensity: 0.0,
///     precipitation_probability: 0.0,
///     temperature: 18.29,
///     temperature_apparent: 18.29,
///     weather_code: 1001,
///     weather_code_full_day: None,
///     wind_speed: 3.65,
/// };
/// assert!(hour.weather_code_full_day.is_none());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastInterval {
    /// Start of the interval
    pub start_time: DateTime<FixedOffset>,
    /// Precipitation in mm/hr
    pub precipitation_intensity: f64,
    /// Chance of precipitation, 0-100
    pub precipitation_probability: f64,
    /// Air temperature in °C
    pub temperature: f64,
    /// "Feels like" temperature in °C
    pub temperature_apparent: f64,
    /// Condition code for the interval
    pub weather_code: i32,
    /// Compound condition code for the whole day (daily interval only)
    pub weather_code_full_day: Option<i32>,
    /// Wind speed in m/s
    pub wind_speed: f64,
}

/// A 48-hour forecast: one daily summary and the hourly breakdown.
///
/// `hourly` is kept in provider order, which is chronological. Rendering iterates
/// over it as-is and never resamples.
#[derive(Clone, Debug, PartialEq)]
pub struct Forecast {
    /// Daily summary for the dashboard's day
    pub today: ForecastInterval,
    /// Hourly intervals, chronological
    pub hourly: Vec<ForecastInterval>,
}

impl Forecast {
    /// 06:00 on the calendar date of `today.start_time`, as seen in `tz`.
    pub fn day_start(&self, tz: Tz) -> DateTime<Tz> {
        let date = self.today.start_time.with_timezone(&tz).date_naive();
        let local = date
            .and_hms_opt(DAY_START_HOUR, 0, 0)
            .unwrap_or_else(|| date.and_time(NaiveTime::default()));

        // 06:00 never falls in a DST gap for real zones; read it as UTC if it ever does
        tz.from_local_datetime(&local)
            .earliest()
            .unwrap_or_else(|| local.and_utc().with_timezone(&tz))
    }

    /// Hourly intervals inside `[day_start, day_start + 24h]`, both ends inclusive.
    pub fn today_hours(&self, tz: Tz) -> Vec<&ForecastInterval> {
        let start = self.day_start(tz);
        let end = start + Duration::hours(24);

        self.hourly
            .iter()
            .filter(|h| start <= h.start_time && h.start_time <= end)
            .collect()
    }
}
