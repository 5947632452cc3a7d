use axum::{
    Extension, Router,
    extract::{State, rejection::JsonRejection},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, post},
};
use deployment::Deployment;
use services::services::{
    auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    users::UserProfile,
};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError, metrics, middleware::require_auth};

pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    let protected = Router::new()
        .route("/auth/me", get(me))
        .layer(from_fn_with_state(deployment.clone(), require_auth));

    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .merge(protected)
}

async fn register(
    State(deployment): State<DeploymentImpl>,
    payload: Result<ResponseJson<RegisterRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<UserProfile>>, ApiError> {
    let ResponseJson(req) = payload?;
    match deployment.auth().register(req).await {
        Ok(profile) => {
            metrics::record_auth_event("register");
            Ok(ResponseJson(ApiResponse::success(profile)))
        }
        Err(e) => {
            metrics::record_auth_event("register_failed");
            Err(e.into())
        }
    }
}

async fn login(
    State(deployment): State<DeploymentImpl>,
    payload: Result<ResponseJson<LoginRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<LoginResponse>>, ApiError> {
    let ResponseJson(req) = payload?;
    match deployment.auth().login(req).await {
        Ok(response) => {
            metrics::record_auth_event("login");
            Ok(ResponseJson(ApiResponse::success(response)))
        }
        Err(e) => {
            metrics::record_auth_event("login_failed");
            Err(e.into())
        }
    }
}

async fn me(
    State(deployment): State<DeploymentImpl>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<ApiResponse<UserProfile>>, ApiError> {
    let profile = deployment.auth().current_user(&claims).await?;
    Ok(ResponseJson(ApiResponse::success(profile)))
}
