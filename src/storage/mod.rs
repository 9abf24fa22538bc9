//! # Storage
//!
//! Loading vectors and activation tensors from disk.

pub mod vectors;

pub use vectors::{TensorFile, VectorFile};
