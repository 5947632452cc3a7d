//! Module registry and dispatcher.
//!
//! Owns the name → unit table, runs units against caller input, times each
//! run, validates the output against an optional expectation and appends
//! exactly one [`ExecutionRecord`] per attempt to the history store.

use std::{any::Any, collections::BTreeMap, panic::AssertUnwindSafe, sync::Arc, time::Instant};

use chrono::Utc;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use ts_rs::TS;

use crate::{
    executors::{BuiltinModule, ExecutionUnit, UnitError},
    history::{HistoryError, HistoryFilter, HistoryStore, InMemoryHistory},
    record::ExecutionRecord,
};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Module name must not be empty")]
    EmptyUnitName,
    #[error("Module '{0}' is already registered")]
    DuplicateUnit(String),
    #[error("Module '{0}' not found")]
    UnitNotFound(String),
    #[error(transparent)]
    Unit(#[from] UnitError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct ModuleInfo {
    pub name: String,
    pub description: String,
}

pub struct ModuleDispatcher {
    units: RwLock<BTreeMap<String, Arc<dyn ExecutionUnit>>>,
    history: Arc<dyn HistoryStore>,
}

impl Default for ModuleDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDispatcher {
    /// Dispatcher with an in-memory history log.
    pub fn new() -> Self {
        Self::with_history(Arc::new(InMemoryHistory::new()))
    }

    pub fn with_history(history: Arc<dyn HistoryStore>) -> Self {
        Self {
            units: RwLock::new(BTreeMap::new()),
            history,
        }
    }

    /// Dispatcher preloaded with every [`BuiltinModule`].
    pub async fn with_builtins(history: Arc<dyn HistoryStore>) -> Result<Self, DispatchError> {
        let dispatcher = Self::with_history(history);
        for module in BuiltinModule::all() {
            dispatcher.register_shared(module.name(), module.unit()).await?;
        }
        Ok(dispatcher)
    }

    pub async fn register<U>(&self, name: impl Into<String>, unit: U) -> Result<(), DispatchError>
    where
        U: ExecutionUnit + 'static,
    {
        self.register_shared(name, Arc::new(unit)).await
    }

    /// Registers `unit` under `name`. An existing registration is never
    /// replaced.
    pub async fn register_shared(
        &self,
        name: impl Into<String>,
        unit: Arc<dyn ExecutionUnit>,
    ) -> Result<(), DispatchError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DispatchError::EmptyUnitName);
        }

        let mut units = self.units.write().await;
        if units.contains_key(&name) {
            return Err(DispatchError::DuplicateUnit(name));
        }
        tracing::debug!("Registered module '{}'", name);
        units.insert(name, unit);
        Ok(())
    }

    /// Runs the unit registered under `name`.
    ///
    /// Returns the appended record when the unit completed, including when
    /// its output did not match `expected_output`. A unit failure is
    /// recorded first and then returned as [`DispatchError::Unit`].
    pub async fn execute(
        &self,
        name: &str,
        input: Value,
        expected_output: Option<Value>,
    ) -> Result<ExecutionRecord, DispatchError> {
        let unit = self
            .units
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| DispatchError::UnitNotFound(name.to_string()))?;

        let timestamp = Utc::now();
        let started = Instant::now();
        let outcome = AssertUnwindSafe(unit.execute(input.clone()))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(UnitError::Failed(panic_message(name, &*payload)))
            });
        let elapsed = started.elapsed();

        match outcome {
            Ok(result) => {
                let record = ExecutionRecord::completed(
                    name,
                    timestamp,
                    input,
                    result,
                    elapsed,
                    expected_output,
                );
                if record.is_mismatch() {
                    tracing::warn!(
                        "[MODULES] '{}' completed in {}ms but output did not match expectation",
                        name,
                        record.execution_time_ms
                    );
                } else {
                    tracing::info!(
                        "[MODULES] '{}' completed in {}ms",
                        name,
                        record.execution_time_ms
                    );
                }
                self.history.append(record.clone()).await?;
                Ok(record)
            }
            Err(err) => {
                let record = ExecutionRecord::failed(
                    name,
                    timestamp,
                    input,
                    &err,
                    elapsed,
                    expected_output,
                );
                tracing::error!(
                    "[MODULES] '{}' failed after {}ms: {}",
                    name,
                    record.execution_time_ms,
                    err
                );
                if let Err(history_err) = self.history.append(record).await {
                    tracing::error!(
                        "[MODULES] Failed to record failed execution of '{}': {}",
                        name,
                        history_err
                    );
                }
                Err(DispatchError::Unit(err))
            }
        }
    }

    /// Full history, oldest first.
    pub async fn history(&self) -> Result<Vec<ExecutionRecord>, DispatchError> {
        self.query_history(&HistoryFilter::default()).await
    }

    pub async fn query_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<ExecutionRecord>, DispatchError> {
        Ok(self.history.query(filter).await?)
    }

    /// Empties the history log and returns how many records were dropped.
    /// Registered modules are unaffected.
    pub async fn clear_history(&self) -> Result<usize, DispatchError> {
        let cleared = self.history.clear().await?;
        tracing::info!("[MODULES] Cleared {} history records", cleared);
        Ok(cleared)
    }

    /// Names of all registered modules, sorted.
    pub async fn available_modules(&self) -> Vec<String> {
        self.units.read().await.keys().cloned().collect()
    }

    pub async fn describe_modules(&self) -> Vec<ModuleInfo> {
        self.units
            .read()
            .await
            .iter()
            .map(|(name, unit)| ModuleInfo {
                name: name.clone(),
                description: unit.description().to_string(),
            })
            .collect()
    }

    pub async fn module_count(&self) -> usize {
        self.units.read().await.len()
    }
}

fn panic_message(name: &str, payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("Module '{name}' panicked: {detail}")
}
