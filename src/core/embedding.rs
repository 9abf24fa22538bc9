//! Normalized embedding vectors

use serde::{Deserialize, Serialize};

/// Pooled, L2-normalized sentence embedding.
///
/// Empty only when produced from an empty token sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
	/// Wraps already-normalized components
	pub fn raw(data: Vec<f32>) -> Self {
		Self(data)
	}

	/// Result for an empty token sequence.
	pub fn empty() -> Self {
		Self(Vec::new())
	}

	pub fn as_slice(&self) -> &[f32] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn into_vec(self) -> Vec<f32> {
		self.0
	}

	/// Euclidean norm, computed in f64
	pub fn norm(&self) -> f64 {
		self.0.iter().map(|&x| f64::from(x) * f64::from(x)).sum::<f64>().sqrt()
	}
}

impl AsRef<[f32]> for Embedding {
	fn as_ref(&self) -> &[f32] {
		&self.0
	}
}

impl From<Embedding> for Vec<f32> {
	fn from(embedding: Embedding) -> Self {
		embedding.0
	}
}
