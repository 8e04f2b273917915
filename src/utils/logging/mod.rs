//! Logging utilities for run reporting and progress tracking

pub mod log;
pub mod progress;

pub use self::log::{log_operation_complete, log_operation_start, log_topic_fault, log_warning};
pub use progress::{create_hidden_progress_bar, create_main_progress_bar, finish_progress_bar};
