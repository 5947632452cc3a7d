pub mod compare;
pub mod dispatch;
pub mod executors;
pub mod history;
pub mod record;

pub use dispatch::{DispatchError, ModuleDispatcher, ModuleInfo};
pub use executors::{ExecutionUnit, UnitError};
pub use history::{HistoryError, HistoryFilter, HistoryStore, InMemoryHistory};
pub use record::{ExecutionRecord, ValidationMismatch};
