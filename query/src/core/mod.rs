//! Core infrastructure: configuration, constants and logging

pub mod config;
pub mod constants;
pub mod logging;

pub use config::{FirstDayOfWeek, QueryConfig};
pub use logging::init_logging;
