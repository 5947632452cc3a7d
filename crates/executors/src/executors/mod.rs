//! Execution units: the named capabilities the dispatcher invokes.

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

pub mod afinn;
pub mod echo;
pub mod sentiment;

pub use echo::Echo;
pub use sentiment::Sentiment;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UnitError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Failed(String),
}

/// A single-operation capability: one input value in, one output value out.
#[async_trait]
pub trait ExecutionUnit: Send + Sync {
    /// Short human readable summary shown in module listings.
    fn description(&self) -> &str {
        ""
    }

    async fn execute(&self, input: Value) -> Result<Value, UnitError>;
}

/// Adapts an async closure into an [`ExecutionUnit`].
pub struct FnUnit<F> {
    func: F,
    description: String,
}

impl<F> FnUnit<F> {
    pub fn new(description: impl Into<String>, func: F) -> Self {
        Self {
            func,
            description: description.into(),
        }
    }
}

#[async_trait]
impl<F, Fut> ExecutionUnit for FnUnit<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, UnitError>> + Send + 'static,
{
    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, input: Value) -> Result<Value, UnitError> {
        (self.func)(input).await
    }
}

/// Units shipped with the service, registered at startup under their
/// snake_case names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum BuiltinModule {
    Sentiment,
    Echo,
}

impl BuiltinModule {
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinModule::Sentiment => "sentiment",
            BuiltinModule::Echo => "echo",
        }
    }

    pub fn unit(&self) -> Arc<dyn ExecutionUnit> {
        match self {
            BuiltinModule::Sentiment => Arc::new(Sentiment::new()),
            BuiltinModule::Echo => Arc::new(Echo),
        }
    }

    pub fn all() -> Vec<BuiltinModule> {
        BuiltinModule::iter().collect()
    }
}
