//! # HTTP Endpoint
//!
//! Serves the dashboard as a BMP at `GET /`. Each request fetches a fresh
//! forecast, renders it and encodes the result; nothing is cached between
//! requests.
//!
//! | Outcome | Status |
//! |---|---|
//! | rendered | 200, `image/bmp` |
//! | provider unreachable or non-2xx | 502 |
//! | provider payload malformed | 502 |
//! | forecast has no hours for the day | 500 |

use crate::bmp;
use crate::config::Config;
use crate::forecast_data::{ForecastError, ForecastSource};
use crate::layout::RenderError;
use crate::renderer::DashboardRenderer;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

/// Shared, read-only state for all requests
pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn ForecastSource>,
    pub renderer: DashboardRenderer,
}

/// Request failures, each mapped to one status code
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Forecast(_) => StatusCode::BAD_GATEWAY,
            ServerError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!(error = %self, "Dashboard request failed");
        (self.status(), self.to_string()).into_response()
    }
}

/// Fetch, render and encode one dashboard.
pub async fn render_dashboard(state: &AppState) -> Result<Vec<u8>, ServerError> {
    let forecast = state.source.fetch(&state.config.location()).await?;
    let updated_at = Utc::now().with_timezone(&state.renderer.timezone());
    let canvas = state.renderer.render(&forecast, updated_at)?;
    Ok(bmp::encode(&canvas))
}

/// GET / - the dashboard image
#[instrument(skip(state))]
pub async fn dashboard_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let image = render_dashboard(&state).await?;
    info!(bytes = image.len(), "Dashboard rendered");
    Ok(([(header::CONTENT_TYPE, bmp::CONTENT_TYPE)], image).into_response())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// Listen on all interfaces until the process is stopped.
pub async fn serve(state: Arc<AppState>, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Serving dashboard");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
