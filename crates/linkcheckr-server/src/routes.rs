use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use linkcheckr_core::{AppError, CheckRequest};

use crate::dto::{CheckLinksRequest, CheckLinksResponse, HealthResponse};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Request bodies are a URL and a number; anything larger is refused.
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/check-links", post(check_links))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(api).with_state(state)
}

/// CORS restricted to the configured browser origins. `*` allows any origin.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, AppError> {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o)
                    .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin '{o}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]))
}

// ---------------------------------------------------------------------------
// Check links
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/check-links",
    request_body = CheckLinksRequest,
    responses(
        (status = 200, description = "Link report", body = CheckLinksResponse),
        (status = 400, description = "Missing or invalid URL", body = crate::dto::ErrorResponse),
        (status = 502, description = "Page could not be rendered", body = crate::dto::ErrorResponse),
        (status = 504, description = "Rendering timed out", body = crate::dto::ErrorResponse),
    ),
    tag = "links"
)]
pub async fn check_links(
    State(state): State<Arc<AppState>>,
    payload: Result<axum::Json<CheckLinksRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let axum::Json(body) = payload.map_err(|e| {
        AppError::InvalidInput(format!("Invalid request body: {}", e.body_text()))
    })?;

    let request = CheckRequest::from_parts(body.url.as_deref(), body.wait_time)?;
    let report = state.service.check(&request).await?;

    Ok(axum::Json(CheckLinksResponse::from(report)))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    axum::Json(HealthResponse {
        status: "healthy",
        renderer: state.renderer.as_str(),
    })
}
