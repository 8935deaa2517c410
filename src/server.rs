//! HTTP surface: the field app posts a finished job and receives the PDF as
//! an attachment.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::assets::Branding;
use crate::error::GenerationError;
use crate::output::PDF_CONTENT_TYPE;
use crate::report::ReportData;
use crate::{generate_with_branding, GeneratedReport};

pub const HEADER_PAGES: &str = "x-report-pages";
pub const HEADER_DIAGNOSTICS: &str = "x-report-diagnostics";

#[derive(Clone)]
pub struct AppState {
    pub branding: Arc<Branding>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum AppError {
    Generation(GenerationError),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Generation(GenerationError::InvalidReport(reason)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, format!("Invalid report: {}", reason))
            }
            AppError::Generation(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        if status.is_server_error() {
            error!(%status, error = %message, "report request failed");
        }
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::Generation(err)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("generation task failed: {}", err))
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            header::CONTENT_DISPOSITION,
            HeaderName::from_static(HEADER_PAGES),
            HeaderName::from_static(HEADER_DIAGNOSTICS),
        ]);

    Router::new()
        .route("/health", get(health))
        .route("/reports/pdf", post(render_report))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "sweep-report",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 name.
fn content_disposition(filename: &str) -> String {
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        filename.replace('"', ""),
        urlencoding::encode(filename)
    )
}

async fn render_report(
    State(state): State<AppState>,
    Json(report): Json<ReportData>,
) -> Result<Response, AppError> {
    let branding = state.branding.clone();
    // Layout and encoding are CPU-bound and synchronous.
    let generated: GeneratedReport =
        tokio::task::spawn_blocking(move || generate_with_branding(&report, &branding)).await??;

    info!(
        filename = %generated.blob.filename,
        pages = generated.page_count,
        diagnostics = generated.diagnostics.len(),
        "report rendered"
    );

    let headers = [
        (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(&generated.blob.filename),
        ),
        (
            HeaderName::from_static(HEADER_PAGES),
            generated.page_count.to_string(),
        ),
        (
            HeaderName::from_static(HEADER_DIAGNOSTICS),
            generated.diagnostics.len().to_string(),
        ),
    ];

    Ok((StatusCode::OK, headers, generated.blob.bytes).into_response())
}
