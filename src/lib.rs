pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod parser;

pub use error::{ErrorCode, TasksyncError};
pub use models::{TaskRecord, TaskStatus};
