use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use deployment::Deployment;
use services::services::license::LICENSE_HEADER;

use crate::{DeploymentImpl, error::ApiError, metrics, middleware::AccessContext};

/// Middleware to require a configured license key. Runs after
/// [`super::require_auth`].
pub async fn require_license(
    State(deployment): State<DeploymentImpl>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = req
        .headers()
        .get(LICENSE_HEADER)
        .and_then(|h| h.to_str().ok());

    if let Err(e) = deployment.license().validate(key) {
        let user = req
            .extensions()
            .get::<AccessContext>()
            .map(|ctx| ctx.username.as_str())
            .unwrap_or("anonymous");
        tracing::warn!("License check failed for '{}': {}", user, e);
        metrics::record_auth_event("license_rejected");
        return Err(e.into());
    }

    Ok(next.run(req).await)
}
