use std::sync::Arc;

use async_trait::async_trait;
use db::{DBService, SqliteHistoryStore};
use deployment::{Deployment, DeploymentError};
use executors::{HistoryStore, InMemoryHistory, ModuleDispatcher};
use services::services::{auth::AuthService, config::AppConfig, license::LicenseService};

#[derive(Clone)]
pub struct LocalDeployment {
    config: Arc<AppConfig>,
    dispatcher: Arc<ModuleDispatcher>,
    auth: AuthService,
    license: LicenseService,
}

impl LocalDeployment {
    pub async fn from_config(config: AppConfig) -> Result<Self, DeploymentError> {
        let history: Arc<dyn HistoryStore> = match config.history_database_url.as_deref() {
            Some(url) => {
                let db = DBService::new(url).await?;
                tracing::info!("[HISTORY] Persisting execution history to {}", url);
                Arc::new(SqliteHistoryStore::new(db.pool))
            }
            None => {
                tracing::info!("[HISTORY] Keeping execution history in memory");
                Arc::new(InMemoryHistory::new())
            }
        };

        let dispatcher = ModuleDispatcher::with_builtins(history).await?;
        tracing::info!(
            "[MODULES] Registered modules: {:?}",
            dispatcher.available_modules().await
        );

        let license = LicenseService::new(&config.license_keys);
        if license.key_count() == 0 {
            tracing::warn!("LICENSE_KEYS is empty; every module request will be rejected");
        }

        Ok(Self {
            auth: AuthService::from_config(&config)?,
            license,
            dispatcher: Arc::new(dispatcher),
            config: Arc::new(config),
        })
    }
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new() -> Result<Self, DeploymentError> {
        let config = AppConfig::from_env()?;
        Self::from_config(config).await
    }

    fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    fn dispatcher(&self) -> &Arc<ModuleDispatcher> {
        &self.dispatcher
    }

    fn auth(&self) -> &AuthService {
        &self.auth
    }

    fn license(&self) -> &LicenseService {
        &self.license
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use services::services::auth::AuthError;

    use super::*;

    #[tokio::test]
    async fn test_in_memory_deployment_has_builtins() {
        let deployment = LocalDeployment::from_config(AppConfig {
            license_keys: vec!["key-1".to_string()],
            ..AppConfig::default()
        })
        .await
        .unwrap();

        assert_eq!(
            deployment.dispatcher().available_modules().await,
            vec!["echo", "sentiment"]
        );
        assert!(deployment.license().validate(Some("key-1")).is_ok());
    }

    #[tokio::test]
    async fn test_sqlite_history_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("history.sqlite").display());
        let config = AppConfig {
            history_database_url: Some(url),
            ..AppConfig::default()
        };

        let first = LocalDeployment::from_config(config.clone()).await.unwrap();
        first
            .dispatcher()
            .execute("echo", json!({"a": 1}), None)
            .await
            .unwrap();
        drop(first);

        let second = LocalDeployment::from_config(config).await.unwrap();
        let history = second.dispatcher().history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].module, "echo");
    }

    #[tokio::test]
    async fn test_unusable_token_lifetime_fails_startup() {
        let result = LocalDeployment::from_config(AppConfig {
            jwt_ttl_hours: i64::MAX,
            ..AppConfig::default()
        })
        .await;

        assert!(matches!(
            result,
            Err(DeploymentError::Auth(AuthError::TokenLifetime))
        ));
    }
}
