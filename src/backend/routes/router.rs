/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * the route table with the cross-cutting layers.
 *
 * # Layers
 *
 * Applied outermost first:
 * 1. CORS from the configured allow-list (no credentials)
 * 2. Request tracing (`tower-http` `TraceLayer`)
 *
 * Unknown routes fall back to a JSON 404 in the same `{"error": ...}` shape
 * the handlers use.
 */

use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::Router;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;
use crate::shared::CorsOrigins;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Store and elevated session shared by the handlers
/// * `cors` - Allowed browser origins
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState, cors: &CorsOrigins) -> Router<()> {
    let router = configure_api_routes(Router::new())
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "not_found" })),
            )
                .into_response()
        })
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors));

    router.with_state(app_state)
}

/// CORS policy for the configured origins
pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origins {
        CorsOrigins::Any => layer.allow_origin(Any),
        CorsOrigins::List(_) => {
            let origins = origins.clone();
            layer.allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _parts: &Parts| {
                    origin.to_str().is_ok_and(|origin| origins.allows(origin))
                },
            ))
        }
    }
}
