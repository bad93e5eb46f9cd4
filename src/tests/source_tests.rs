//! tomorrow.io client against a mock server.

use crate::forecast_data::{ForecastError, ForecastSource, Location, TomorrowIoSource};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LONDON: Location = Location {
    latitude: 51.5,
    longitude: -0.25,
};

fn values(temp: f64, full_day: Option<i32>) -> Value {
    let mut values = json!({
        "precipitationIntensity": 0.12,
        "precipitationProbability": 10,
        "temperature": temp,
        "temperatureApparent": temp - 1.0,
        "weatherCode": 4000,
        "windSpeed": 4.2,
    });
    if let Some(code) = full_day {
        values["weatherCodeFullDay"] = json!(code);
    }
    values
}

fn timelines() -> Value {
    json!({
        "data": {
            "timelines": [
                {
                    "timestep": "1d",
                    "startTime": "2022-07-30T15:00:00Z",
                    "intervals": [
                        { "startTime": "2022-07-30T15:00:00Z", "values": values(25.0, Some(1001)) },
                        { "startTime": "2022-07-31T05:00:00Z", "values": values(23.2, Some(4000)) },
                        { "startTime": "2022-08-01T05:00:00Z", "values": values(26.0, Some(1000)) }
                    ]
                },
                {
                    "timestep": "1h",
                    "startTime": "2022-07-30T15:00:00Z",
                    "intervals": [
                        { "startTime": "2022-07-30T15:00:00Z", "values": values(24.4, None) },
                        { "startTime": "2022-07-30T16:00:00Z", "values": values(24.3, None) },
                        { "startTime": "2022-07-30T17:00:00Z", "values": values(24.6, None) }
                    ]
                }
            ]
        }
    })
}

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v4/timelines"))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Test that a successful fetch sends the expected query and picks the second daily bucket.
///
/// The first daily interval is a partial window starting now, so "today" is index 1.
#[tokio::test]
async fn fetch_picks_second_daily_bucket() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/timelines"))
        .and(query_param("location", "51.5,-0.25"))
        .and(query_param("timesteps", "1h"))
        .and(query_param("timesteps", "1d"))
        .and(query_param("fields", "weatherCodeFullDay"))
        .and(query_param("units", "metric"))
        .and(query_param("apikey", "test-key"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timelines()))
        .expect(1)
        .mount(&server)
        .await;

    let source = TomorrowIoSource::new(server.uri(), "test-key").unwrap();
    let forecast = source.fetch(&LONDON).await.unwrap();

    assert_eq!(forecast.today.temperature, 23.2);
    assert_eq!(forecast.today.weather_code_full_day, Some(4000));
    assert_eq!(forecast.today.start_time.to_rfc3339(), "2022-07-31T05:00:00+00:00");
    assert_eq!(forecast.hourly.len(), 3);
    assert_eq!(forecast.hourly[2].temperature, 24.6);
    assert!((forecast.hourly[0].temperature_apparent - 23.4).abs() < 1e-9);
    assert_eq!(forecast.hourly[0].weather_code_full_day, None);
}

/// Test that a 5xx response surfaces as an upstream status error.
#[tokio::test]
async fn server_error_is_upstream() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(500).set_body_string("boom")).await;

    let source = TomorrowIoSource::new(server.uri(), "k").unwrap();
    let err = source.fetch(&LONDON).await.unwrap_err();
    assert!(matches!(err, ForecastError::UpstreamStatus(s) if s.as_u16() == 500));
    assert!(err.is_upstream());
}

/// Test that a 429 from the provider is treated as an upstream failure.
#[tokio::test]
async fn rate_limit_is_upstream() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(429)).await;

    let source = TomorrowIoSource::new(server.uri(), "k").unwrap();
    let err = source.fetch(&LONDON).await.unwrap_err();
    assert!(err.is_upstream());
}

/// Test that a connection failure is reported as a transport error.
#[tokio::test]
async fn unreachable_provider_is_upstream() {
    // Nothing listens on port 9 of localhost
    let source = TomorrowIoSource::new("http://127.0.0.1:9", "k").unwrap();
    let err = source.fetch(&LONDON).await.unwrap_err();
    assert!(matches!(err, ForecastError::Upstream(_)));
}

/// Test that a body without the hourly timeline is a schema error, not an upstream one.
#[tokio::test]
async fn missing_hourly_timeline_is_schema_error() {
    let mut body = timelines();
    body["data"]["timelines"].as_array_mut().unwrap().pop();

    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(body)).await;

    let source = TomorrowIoSource::new(server.uri(), "k").unwrap();
    let err = source.fetch(&LONDON).await.unwrap_err();
    assert!(matches!(err, ForecastError::Schema(_)));
    assert!(!err.is_upstream());
}

/// Test that a 200 with a non-JSON body fails schema validation.
#[tokio::test]
async fn non_json_body_is_schema_error() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_string("<html>maintenance</html>")).await;

    let source = TomorrowIoSource::new(server.uri(), "k").unwrap();
    let err = source.fetch(&LONDON).await.unwrap_err();
    assert!(matches!(err, ForecastError::Schema(_)));
}
