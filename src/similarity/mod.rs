//! # Similarity Engine
//!
//! Cosine similarity between flat `f32` vectors with runtime SIMD dispatch.
//!
//! Conventions:
//! - operands of different length are compared over their common prefix
//! - no common elements yields [`Similarity::Null`], never `0.0`
//! - a zero-magnitude operand yields `0.0`
//! - byte blobs must be a whole number of `f32` elements

pub mod dispatch;
pub mod engine;
pub mod kernels;
pub mod rank;

use std::fmt;

use serde::Serialize;

use crate::error::Result;

pub use dispatch::Tier;
pub use engine::{decode, encode, Engine};
pub use rank::{rank, rank_with, Ranked};

/// Result of one comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Similarity {
	/// Cosine of the angle, in `[-1, 1]`.
	Value(f64),
	/// Nothing to compare after length reconciliation.
	Null,
}

impl Similarity {
	pub fn value(self) -> Option<f64> {
		match self {
			Similarity::Value(v) => Some(v),
			Similarity::Null => None,
		}
	}

	pub fn is_null(self) -> bool {
		matches!(self, Similarity::Null)
	}
}

impl fmt::Display for Similarity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Similarity::Value(v) => write!(f, "{:.6}", v),
			Similarity::Null => f.write_str("NULL"),
		}
	}
}

/// Tri-state outcome for host boundaries that report through
/// `is_null` / `error` flags instead of a typed result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityOutcome {
	pub value: f64,
	pub is_null: bool,
	pub is_error: bool,
}

impl From<Similarity> for SimilarityOutcome {
	fn from(similarity: Similarity) -> Self {
		match similarity {
			Similarity::Value(value) => Self { value, is_null: false, is_error: false },
			Similarity::Null => Self { value: 0.0, is_null: true, is_error: false },
		}
	}
}

impl From<Result<Similarity>> for SimilarityOutcome {
	fn from(result: Result<Similarity>) -> Self {
		match result {
			Ok(similarity) => similarity.into(),
			Err(_) => Self { value: 0.0, is_null: false, is_error: true },
		}
	}
}

/// Cosine similarity using the process-wide engine.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Similarity {
	Engine::global().cosine(a, b)
}

/// Cosine similarity of two little-endian `f32` blobs.
pub fn cosine_similarity_bytes(a: &[u8], b: &[u8]) -> Result<Similarity> {
	Engine::global().cosine_bytes(a, b)
}
