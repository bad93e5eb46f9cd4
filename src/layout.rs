//! # Dashboard Layout
//!
//! Pure coordinate transforms for the 400×300 dashboard. Nothing here touches a
//! canvas; the renderer asks a [`Layout`] where things go and draws them.
//!
//! ## Graph geometry
//! ```text
//!  y=90  ┌──────────────────────────────┐  top of graph (temp ceiling / 10 mm/hr)
//!        │                              │
//!  y=190 └──────────────────────────────┘  axis (0 °C / 0 mm/hr)
//!       x=20                          x=380
//!      06:00                    06:00 (+24h)
//! ```
//!
//! All transforms are linear and deliberately unclamped: values outside the
//! domain land outside the graph box.

use crate::{Forecast, ForecastInterval};
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use thiserror::Error;

/// Left edge of the time axis
pub const PLOT_LEFT: f64 = 20.0;
/// Width of the time axis in pixels
pub const PLOT_WIDTH: f64 = 360.0;
/// Top of the graph box
pub const GRAPH_TOP: f64 = 90.0;
/// Axis baseline
pub const AXIS_Y: f64 = 190.0;
/// The temperature scale never tops out below this
pub const MIN_TEMP_CEILING: f64 = 20.0;
/// Rainfall that reaches the top of the graph box
pub const RAINFALL_CEILING: f64 = 10.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Errors raised while laying out a forecast
#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    /// No hourly interval falls inside the dashboard's day
    #[error("forecast has no hourly data between {day_start} and the following 06:00")]
    EmptyForecast { day_start: String },
}

/// A tick on the time axis
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub x: f64,
    pub label: String,
}

/// Layout of one forecast on the dashboard.
#[derive(Clone, Debug)]
pub struct Layout<'a> {
    tz: Tz,
    day_start: DateTime<Tz>,
    hours: Vec<&'a ForecastInterval>,
    temp_high: f64,
    temp_low: f64,
}

impl<'a> Layout<'a> {
    /// Compute the layout for `forecast` with day boundaries taken in `tz`.
    ///
    /// Fails when no hourly interval falls within the day; an empty graph
    /// would otherwise render as a silently blank dashboard.
    pub fn new(forecast: &'a Forecast, tz: Tz) -> Result<Self, RenderError> {
        let day_start = forecast.day_start(tz);
        let hours = forecast.today_hours(tz);

        if hours.is_empty() {
            return Err(RenderError::EmptyForecast {
                day_start: day_start.to_rfc3339(),
            });
        }

        let (temp_low, temp_high) = hours
            .iter()
            .map(|h| h.temperature)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), t| {
                (min.min(t), max.max(t))
            });

        Ok(Self {
            tz,
            day_start,
            hours,
            temp_high,
            temp_low,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn day_start(&self) -> DateTime<Tz> {
        self.day_start
    }

    /// Hourly intervals inside the day, chronological
    pub fn hours(&self) -> &[&'a ForecastInterval] {
        &self.hours
    }

    pub fn temp_high(&self) -> f64 {
        self.temp_high
    }

    pub fn temp_low(&self) -> f64 {
        self.temp_low
    }

    /// Top of the temperature scale: the day's high, but never below 20 °C.
    pub fn temp_ceiling(&self) -> f64 {
        self.temp_high.max(MIN_TEMP_CEILING)
    }

    /// `day_start` → 20, `day_start + 24h` → 380.
    pub fn x_for_time<Z: chrono::TimeZone>(&self, t: &DateTime<Z>) -> f64 {
        let elapsed = t.timestamp() - self.day_start.timestamp();
        elapsed as f64 / SECONDS_PER_DAY * PLOT_WIDTH + PLOT_LEFT
    }

    /// 0 °C → 190, ceiling → 90.
    pub fn y_for_temp(&self, temp: f64) -> f64 {
        (temp / self.temp_ceiling()) * (GRAPH_TOP - AXIS_Y) + AXIS_Y
    }

    /// 0 mm/hr → 190, 10 mm/hr → 90.
    pub fn y_for_rainfall(&self, intensity: f64) -> f64 {
        (intensity / RAINFALL_CEILING) * (GRAPH_TOP - AXIS_Y) + AXIS_Y
    }

    /// Index of the first hour at the day's high temperature.
    pub fn high_index(&self) -> usize {
        let temps: Vec<f64> = self.hours.iter().map(|h| h.temperature).collect();
        first_max_index(&temps).unwrap_or(0)
    }

    /// Index of the first hour at the day's low temperature.
    pub fn low_index(&self) -> usize {
        let temps: Vec<f64> = self.hours.iter().map(|h| h.temperature).collect();
        first_min_index(&temps).unwrap_or(0)
    }

    /// Every 6th hour, starting from the first: where icons and wind go.
    pub fn six_hourly(&self) -> impl Iterator<Item = &'a ForecastInterval> + '_ {
        self.hours.iter().step_by(6).copied()
    }

    /// Ticks at 0, 6, 12, 18 and 24 hours after `day_start`.
    ///
    /// The first tick is written in short form ("6:00"); the rest use `HH:MM`.
    pub fn time_axis_ticks(&self) -> Vec<Tick> {
        (0..5)
            .map(|i| {
                let t = self.day_start + Duration::hours(i * 6);
                let format = if i == 0 { "%-H:%M" } else { "%H:%M" };
                Tick {
                    x: self.x_for_time(&t),
                    label: t.format(format).to_string(),
                }
            })
            .collect()
    }
}

/// First index holding the maximum value. Ties go to the earliest.
pub fn first_max_index(values: &[f64]) -> Option<usize> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values.iter().position(|&v| v == max)
}

/// First index holding the minimum value. Ties go to the earliest.
pub fn first_min_index(values: &[f64]) -> Option<usize> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    values.iter().position(|&v| v == min)
}
