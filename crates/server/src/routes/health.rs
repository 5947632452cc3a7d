use axum::{extract::State, response::Json as ResponseJson};
use deployment::Deployment;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::DeploymentImpl;

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct HealthStatus {
    pub status: String,
    pub modules: usize,
}

pub async fn health_check(
    State(deployment): State<DeploymentImpl>,
) -> ResponseJson<ApiResponse<HealthStatus>> {
    ResponseJson(ApiResponse::success(HealthStatus {
        status: "ok".to_string(),
        modules: deployment.dispatcher().module_count().await,
    }))
}
