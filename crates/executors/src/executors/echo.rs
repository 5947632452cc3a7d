use async_trait::async_trait;
use serde_json::Value;

use super::{ExecutionUnit, UnitError};

/// Returns its input unchanged. Useful for checking output validation end to end.
#[derive(Debug, Clone, Copy, Default)]
pub struct Echo;

#[async_trait]
impl ExecutionUnit for Echo {
    fn description(&self) -> &str {
        "Returns the input unchanged"
    }

    async fn execute(&self, input: Value) -> Result<Value, UnitError> {
        Ok(input)
    }
}
