//! # Forecast Fetching
//!
//! This module fetches the 48-hour forecast from the tomorrow.io Timelines API
//! and converts it into a [`Forecast`].
//!
//! ## Data Source
//!
//! ### tomorrow.io Timelines
//! - **Endpoint**: `GET {base_url}/v4/timelines`
//! - **Timesteps**: `1h` (hourly) and `1d` (daily), requested together
//! - **Window**: `now` to `nowPlus48h`, metric units
//! - **Format**: JSON, `data.timelines[]`, each `{timestep, intervals: [{startTime, values}]}`
//!
//! ### Daily bucket selection
//! The daily timeline's first bucket covers "now until midnight" and is partial.
//! The second bucket is the first full calendar day, and that is the one shown as
//! today. This matches how this provider buckets days; other providers may not
//! share the quirk.
//!
//! ## Error Handling
//!
//! - **Network failures and non-2xx statuses**: [`ForecastError::Upstream`]
//! - **Missing timelines, fields or daily buckets**: [`ForecastError::Schema`]
//!
//! Nothing is retried. The HTTP client's timeout bounds a stuck request.

use crate::{Forecast, ForecastInterval};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while fetching a forecast.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Provider unreachable, timed out, or the body could not be read
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(StatusCode),

    /// Response did not have the expected shape
    #[error("unexpected forecast schema: {0}")]
    Schema(String),
}

impl ForecastError {
    /// True for failures of the provider itself rather than of its payload
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::UpstreamStatus(_))
    }
}

/// Point the forecast is requested for
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// `lat,lon` as the provider expects it
    pub fn query_value(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Anything that can produce a forecast for a location.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch(&self, location: &Location) -> Result<Forecast, ForecastError>;
}

/// Fields requested for every interval
const FIELDS: [&str; 7] = [
    "precipitationIntensity",
    "weatherCode",
    "windSpeed",
    "temperature",
    "temperatureApparent",
    "precipitationProbability",
    "weatherCodeFullDay",
];

const HOURLY_TIMESTEP: &str = "1h";
const DAILY_TIMESTEP: &str = "1d";

/// Index of "today" in the daily timeline
const TODAY_BUCKET: usize = 1;

/// Request timeout for the provider call
const TIMEOUT: Duration = Duration::from_secs(10);

/// tomorrow.io Timelines client.
#[derive(Clone, Debug)]
pub struct TomorrowIoSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TomorrowIoSource {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ForecastError> {
        let client = Client::builder().timeout(TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    fn query(&self, location: &Location) -> Vec<(&'static str, String)> {
        let mut query = vec![("location", location.query_value())];
        query.extend(FIELDS.iter().map(|f| ("fields", f.to_string())));
        query.push(("startTime", "now".to_string()));
        query.push(("endTime", "nowPlus48h".to_string()));
        query.push(("units", "metric".to_string()));
        query.push(("timesteps", HOURLY_TIMESTEP.to_string()));
        query.push(("timesteps", DAILY_TIMESTEP.to_string()));
        query.push(("apikey", self.api_key.clone()));
        query
    }
}

#[async_trait]
impl ForecastSource for TomorrowIoSource {
    async fn fetch(&self, location: &Location) -> Result<Forecast, ForecastError> {
        let url = format!("{}/v4/timelines", self.base_url.trim_end_matches('/'));
        info!(%url, location = %location.query_value(), "Fetching forecast");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&self.query(location))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::UpstreamStatus(status));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Forecast payload received");
        parse_timelines(&body)
    }
}

// -- Wire format --

#[derive(Debug, Deserialize)]
struct TimelinesResponse {
    data: TimelinesData,
}

#[derive(Debug, Deserialize)]
struct TimelinesData {
    timelines: Vec<Timeline>,
}

#[derive(Debug, Deserialize)]
struct Timeline {
    timestep: String,
    intervals: Vec<RawInterval>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInterval {
    start_time: DateTime<FixedOffset>,
    values: RawValues,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawValues {
    precipitation_intensity: f64,
    precipitation_probability: f64,
    temperature: f64,
    temperature_apparent: f64,
    weather_code: i32,
    #[serde(default)]
    weather_code_full_day: Option<i32>,
    wind_speed: f64,
}

impl From<RawInterval> for ForecastInterval {
    fn from(raw: RawInterval) -> Self {
        let v = raw.values;
        ForecastInterval {
            start_time: raw.start_time,
            precipitation_intensity: v.precipitation_intensity,
            precipitation_probability: v.precipitation_probability,
            temperature: v.temperature,
            temperature_apparent: v.temperature_apparent,
            weather_code: v.weather_code,
            weather_code_full_day: v.weather_code_full_day,
            wind_speed: v.wind_speed,
        }
    }
}

/// Parse a Timelines response body into a [`Forecast`].
pub fn parse_timelines(body: &str) -> Result<Forecast, ForecastError> {
    let response: TimelinesResponse =
        serde_json::from_str(body).map_err(|e| ForecastError::Schema(e.to_string()))?;
    let mut timelines = response.data.timelines;

    let mut take = |timestep: &str| -> Result<Vec<RawInterval>, ForecastError> {
        let index = timelines
            .iter()
            .position(|t| t.timestep == timestep)
            .ok_or_else(|| ForecastError::Schema(format!("no '{}' timeline", timestep)))?;
        Ok(timelines.swap_remove(index).intervals)
    };

    let hourly_raw = take(HOURLY_TIMESTEP)?;
    let daily_raw = take(DAILY_TIMESTEP)?;

    let daily_count = daily_raw.len();
    let today: ForecastInterval = daily_raw
        .into_iter()
        .nth(TODAY_BUCKET)
        .ok_or_else(|| {
            ForecastError::Schema(format!(
                "daily timeline has {} interval(s), need at least {}",
                daily_count,
                TODAY_BUCKET + 1
            ))
        })?
        .into();

    let hourly: Vec<ForecastInterval> = hourly_raw.into_iter().map(Into::into).collect();
    debug!(hours = hourly.len(), "Parsed forecast timelines");

    Ok(Forecast { today, hourly })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn interval(start: &str, temp: f64, full_day: Option<i32>) -> serde_json::Value {
        let mut values = json!({
            "precipitationIntensity": 0.0,
            "precipitationProbability": 0,
            "temperature": temp,
            "temperatureApparent": temp,
            "weatherCode": 1001,
            "windSpeed": 3.2,
        });
        if let Some(code) = full_day {
            values["weatherCodeFullDay"] = json!(code);
        }
        json!({ "startTime": start, "values": values })
    }

    fn payload() -> serde_json::Value {
        json!({
            "data": {
                "timelines": [
                    {
                        "timestep": "1h",
                        "intervals": [
                            interval("2022-07-31T05:00:00Z", 18.0, None),
                            interval("2022-07-31T06:00:00Z", 19.0, None),
                        ]
                    },
                    {
                        "timestep": "1d",
                        "intervals": [
                            interval("2022-07-30T15:00:00Z", 24.0, Some(1100)),
                            interval("2022-07-31T05:00:00Z", 23.0, Some(4001)),
                        ]
                    }
                ]
            }
        })
    }

    #[test]
    fn test_second_daily_bucket_is_today() {
        let forecast = parse_timelines(&payload().to_string()).unwrap();
        assert_eq!(forecast.today.temperature, 23.0);
        assert_eq!(forecast.today.weather_code_full_day, Some(4001));
        assert_eq!(forecast.hourly.len(), 2);
        assert_eq!(forecast.hourly[1].temperature, 19.0);
    }

    #[test]
    fn test_missing_timeline_is_schema_error() {
        let mut body = payload();
        body["data"]["timelines"].as_array_mut().unwrap().remove(0);
        let err = parse_timelines(&body.to_string()).unwrap_err();
        assert!(matches!(err, ForecastError::Schema(ref m) if m.contains("1h")));
        assert!(!err.is_upstream());
    }

    #[test]
    fn test_single_daily_bucket_is_schema_error() {
        let mut body = payload();
        body["data"]["timelines"][1]["intervals"]
            .as_array_mut()
            .unwrap()
            .pop();
        let err = parse_timelines(&body.to_string()).unwrap_err();
        assert!(matches!(err, ForecastError::Schema(_)));
    }

    #[test]
    fn test_missing_field_is_schema_error() {
        let mut body = payload();
        body["data"]["timelines"][0]["intervals"][0]["values"]
            .as_object_mut()
            .unwrap()
            .remove("windSpeed");
        let err = parse_timelines(&body.to_string()).unwrap_err();
        assert!(matches!(err, ForecastError::Schema(_)));
    }

    #[test]
    fn test_query_repeats_fields_and_timesteps() {
        let source = TomorrowIoSource::new("http://localhost", "key").unwrap();
        let query = source.query(&Location {
            latitude: 51.5,
            longitude: -0.25,
        });
        assert_eq!(query[0], ("location", "51.5,-0.25".to_string()));
        assert_eq!(query.iter().filter(|(k, _)| *k == "fields").count(), 7);
        assert_eq!(query.iter().filter(|(k, _)| *k == "timesteps").count(), 2);
        assert!(query.contains(&("apikey", "key".to_string())));
    }
}
