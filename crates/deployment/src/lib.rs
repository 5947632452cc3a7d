use std::sync::Arc;

use async_trait::async_trait;
use executors::{DispatchError, ModuleDispatcher};
use services::services::{
    auth::{AuthError, AuthService},
    config::{AppConfig, ConfigError},
    license::LicenseService,
};
use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Sqlx(#[from] SqlxError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Everything a request handler can reach. Implementations are cheap to
/// clone and shared across the router as state.
#[async_trait]
pub trait Deployment: Clone + Send + Sync + 'static {
    async fn new() -> Result<Self, DeploymentError>;

    fn config(&self) -> &Arc<AppConfig>;

    fn dispatcher(&self) -> &Arc<ModuleDispatcher>;

    fn auth(&self) -> &AuthService;

    fn license(&self) -> &LicenseService;
}
