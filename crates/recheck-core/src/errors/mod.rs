//! Error handling for recheck.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//!
//! The selection engine itself is error-free at its boundary: timeouts
//! and unresolved references are policy branches, not errors.

pub mod config_error;
pub mod report_error;

pub use config_error::ConfigError;
pub use report_error::ReportError;
