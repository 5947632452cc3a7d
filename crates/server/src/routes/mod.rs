use axum::{
    Router,
    http::{HeaderValue, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{IntoMakeService, get},
};
use deployment::Deployment;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{DeploymentImpl, middleware as app_middleware};

pub mod auth;
pub mod health;
pub mod modules;

/// Handler for the /metrics endpoint that exposes Prometheus metrics
async fn metrics_handler() -> impl IntoResponse {
    match crate::metrics::export_metrics() {
        Ok(metrics) => (StatusCode::OK, metrics),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to export metrics: {}", e),
        ),
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn api_router(deployment: DeploymentImpl) -> Router {
    let cors = cors_layer(&deployment.config().cors_origins);

    let base_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics_handler))
        .merge(auth::router(&deployment))
        .merge(modules::router(&deployment))
        .with_state(deployment);

    Router::new()
        .nest("/api", base_routes)
        .layer(cors)
        .layer(middleware::from_fn(app_middleware::request_id_middleware))
}

pub fn router(deployment: DeploymentImpl) -> IntoMakeService<Router> {
    api_router(deployment).into_make_service()
}
