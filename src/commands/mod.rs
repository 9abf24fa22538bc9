//! # Command Implementations
//!
//! Each submodule handles one CLI command.

pub mod compare;
pub mod info;
pub mod pool;
pub mod rank;
