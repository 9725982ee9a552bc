//! Axum router configuration with middleware.
//!
//! Routes follow the form contract (`/forms`, `/form/{uuid}`) at the root.
//! Middleware: CORS, tracing. Both wrap the frontend fallback as well.
//!
//! A built web frontend is served from `www/` (configurable via
//! `INTAKE_WEB_DIR`). API routes take priority; unknown paths fall through to
//! the frontend's `index.html`. If the directory does not exist, only the API
//! is served.

use std::path::Path;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let web_dir = std::env::var("INTAKE_WEB_DIR").unwrap_or_else(|_| "www".to_string());
    router_with_frontend(state, Path::new(&web_dir))
}

/// Build the router, serving `web_dir` as the frontend when it exists.
fn router_with_frontend(state: AppState, web_dir: &Path) -> Router {
    let cors = cors_layer(state.config.server.allowed_origin.as_deref());

    let mut router = Router::new()
        .route("/forms", get(handlers::form::list_forms))
        .route("/form", axum::routing::post(handlers::form::save_form))
        .route(
            "/form/{uuid}",
            get(handlers::form::get_form).delete(handlers::form::delete_form),
        )
        .route("/health", get(health_check))
        .with_state(state);

    if web_dir.is_dir() {
        let serve_dir = ServeDir::new(web_dir).fallback(ServeFile::new(web_dir.join("index.html")));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir.display(), "static frontend serving enabled");
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// CORS for the browser frontend: GET/POST/DELETE with a JSON body.
///
/// `None` allows any origin. An origin that is not a valid header value is
/// logged and no cross-origin access is granted.
fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    match allowed_origin {
        None => layer.allow_origin(Any),
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => layer.allow_origin(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "invalid allowed_origin, cross-origin requests disabled");
                layer
            }
        },
    }
}

/// GET /health
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
