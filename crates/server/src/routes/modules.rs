use std::time::Instant;

use axum::{
    Extension, Router,
    extract::{Query, State, rejection::JsonRejection},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, post},
};
use deployment::Deployment;
use executors::{DispatchError, ExecutionRecord, HistoryFilter, ModuleInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{
    DeploymentImpl,
    error::ApiError,
    metrics,
    middleware::{AccessContext, require_auth, require_license},
};

/// Module endpoints. Every route needs a bearer token and a license key;
/// authentication is checked first.
pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new()
        .route("/modules", get(list_modules))
        .route("/modules/execute", post(execute_module))
        .route("/modules/history", get(get_history).delete(clear_history))
        .layer(from_fn_with_state(deployment.clone(), require_license))
        .layer(from_fn_with_state(deployment.clone(), require_auth))
}

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub module: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub expected_output: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub success: bool,
    pub result: Option<Value>,
    pub module: String,
    pub execution_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_matched: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ExecutionRecord> for ExecuteResponse {
    fn from(record: ExecutionRecord) -> Self {
        Self {
            success: record.success,
            result: record.result,
            module: record.module,
            execution_time_ms: record.execution_time_ms,
            output_matched: record.output_matched,
            error: record.error,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ClearHistoryResponse {
    pub cleared: usize,
}

async fn list_modules(
    State(deployment): State<DeploymentImpl>,
) -> ResponseJson<ApiResponse<Vec<ModuleInfo>>> {
    ResponseJson(ApiResponse::success(
        deployment.dispatcher().describe_modules().await,
    ))
}

async fn execute_module(
    State(deployment): State<DeploymentImpl>,
    Extension(ctx): Extension<AccessContext>,
    payload: Result<ResponseJson<ExecuteRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<ExecuteResponse>>, ApiError> {
    let ResponseJson(req) = payload?;
    tracing::debug!("[MODULES] '{}' requested by {}", req.module, ctx.username);

    let started = Instant::now();
    let outcome = deployment
        .dispatcher()
        .execute(&req.module, req.input, req.expected_output)
        .await;
    let elapsed = started.elapsed().as_secs_f64();

    match outcome {
        Ok(record) => {
            let status = if record.success { "success" } else { "mismatch" };
            metrics::record_execution(&record.module, status, elapsed);
            Ok(ResponseJson(ApiResponse::success(record.into())))
        }
        Err(e) => {
            // Unknown names are caller-controlled; keep them out of the labels
            if !matches!(e, DispatchError::UnitNotFound(_)) {
                metrics::record_execution(&req.module, "error", elapsed);
            }
            Err(e.into())
        }
    }
}

async fn get_history(
    State(deployment): State<DeploymentImpl>,
    Query(filter): Query<HistoryFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<ExecutionRecord>>>, ApiError> {
    let records = deployment.dispatcher().query_history(&filter).await?;
    Ok(ResponseJson(ApiResponse::success(records)))
}

async fn clear_history(
    State(deployment): State<DeploymentImpl>,
    Extension(ctx): Extension<AccessContext>,
) -> Result<ResponseJson<ApiResponse<ClearHistoryResponse>>, ApiError> {
    let cleared = deployment.dispatcher().clear_history().await?;
    tracing::info!("[MODULES] {} cleared {} history records", ctx.username, cleared);
    Ok(ResponseJson(ApiResponse::success(ClearHistoryResponse {
        cleared,
    })))
}
