//! Error types for aggregation and similarity

use thiserror::Error;

/// Invalid-input and resource failures surfaced by the numeric core.
///
/// Degenerate numeric cases are not errors: an empty comparison yields
/// [`Similarity::Null`](crate::similarity::Similarity::Null) and a
/// zero-magnitude operand yields a similarity of `0.0`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
	/// Operand byte length is not a whole number of `f32` elements.
	#[error("Operand length {len} bytes is not a multiple of {element} bytes")]
	Alignment { len: usize, element: usize },

	/// Activation buffer does not hold exactly `tokens * dim` values.
	#[error("Invalid activation shape: expected {expected} values, got {actual}")]
	Shape { expected: usize, actual: usize },

	/// Tensor shape is not one of the accepted model output layouts.
	#[error("Unsupported tensor shape {shape:?} for embedding dimension {dim}")]
	UnsupportedShape { shape: Vec<usize>, dim: usize },

	#[error("Embedding dimension must be greater than zero")]
	ZeroDimension,

	/// Scratch accumulator could not be reserved.
	#[error("Failed to allocate {bytes} bytes for pooling accumulator")]
	Allocation { bytes: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
