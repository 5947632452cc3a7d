use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use deployment::Deployment;
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError, metrics};

/// Identity of the caller, inserted into request extensions by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct AccessContext {
    pub user_id: Uuid,
    pub username: String,
}

fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware to require a valid bearer JWT
pub async fn require_auth(
    State(deployment): State<DeploymentImpl>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = bearer_token(header) else {
        metrics::record_auth_event("token_missing");
        return Err(ApiError::Unauthorized(
            "Missing or invalid authentication".to_string(),
        ));
    };

    let claims = deployment.auth().verify_token(token).inspect_err(|e| {
        metrics::record_auth_event("token_rejected");
        tracing::debug!("Rejected bearer token: {:?}", e);
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Missing or invalid authentication".to_string()))?;

    req.extensions_mut().insert(AccessContext {
        user_id,
        username: claims.username.clone(),
    });
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(Some("Bearer   ")), None);
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(None), None);
    }
}
