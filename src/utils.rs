//! Common utilities
//!
//! - Logging configuration
//! - Panic handling
//! - Path management
//! - Retries and error boundaries
//! - Background task tracking

pub mod errors;
pub mod logging;
pub mod panic;
pub mod paths;
pub mod tasks;

pub use errors::{error_boundary, retry, safe_execute, RetryConfig};
pub use logging::initialize_logging;
pub use panic::initialize_panic_handler;
pub use paths::{get_config_dir, get_data_dir, version};
pub use tasks::{get_task_manager, TaskManager};
