//! # User Interface
//!
//! Colored terminal output and verbosity control.

pub mod log;

pub use log::{debug, error, field, header, info, success, warn, Log};
