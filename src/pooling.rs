//! # Embedding Aggregator
//!
//! Mean pooling over token activations followed by L2 normalization.
//! Accumulation runs in f64 so long sequences do not lose precision; the
//! result is emitted as f32 to feed directly into the similarity engine.

use crate::config::{EMBEDDING_DIM, NORM_EPSILON};
use crate::core::{ActivationMatrix, Embedding};
use crate::error::{Error, Result};

/// Pools `[tokens, dim]` activations into one unit-length embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregator {
	dim: usize,
}

impl Default for Aggregator {
	fn default() -> Self {
		Self { dim: EMBEDDING_DIM }
	}
}

impl Aggregator {
	pub fn new(dim: usize) -> Result<Self> {
		if dim == 0 {
			return Err(Error::ZeroDimension);
		}
		Ok(Self { dim })
	}

	pub fn dim(&self) -> usize {
		self.dim
	}

	/// Pools a flat row-major buffer of exactly `tokens * dim` values.
	///
	/// An empty sequence (`tokens == 0`) yields an empty embedding.
	pub fn aggregate(&self, activations: &[f32], tokens: usize) -> Result<Embedding> {
		let matrix = ActivationMatrix::from_flat(activations, tokens, self.dim)?;
		self.aggregate_matrix(&matrix)
	}

	pub fn aggregate_matrix(&self, matrix: &ActivationMatrix<'_>) -> Result<Embedding> {
		if matrix.dim() != self.dim {
			return Err(Error::Shape {
				expected: matrix.tokens().saturating_mul(self.dim),
				actual: matrix.tokens().saturating_mul(matrix.dim()),
			});
		}
		if matrix.is_empty() {
			return Ok(Embedding::empty());
		}

		let mut pooled = mean_pool(matrix)?;
		normalize(&mut pooled);
		Ok(Embedding::raw(pooled.into_iter().map(|v| v as f32).collect()))
	}

	/// Pools a raw model output tensor.
	///
	/// Accepts `[tokens, dim]` and `[1, tokens, dim]` (token activations) as
	/// well as `[dim]` (already pooled, normalized only). A pooled `[1, dim]`
	/// output is a single token and pools to itself.
	pub fn aggregate_tensor(&self, data: &[f32], shape: &[usize]) -> Result<Embedding> {
		match *shape {
			[tokens, dim] | [1, tokens, dim] if dim == self.dim => self.aggregate(data, tokens),
			[dim] if dim == self.dim => {
				if data.len() != dim {
					return Err(Error::Shape { expected: dim, actual: data.len() });
				}
				let mut pooled = scratch(dim)?;
				pooled.extend(data.iter().map(|&v| f64::from(v)));
				normalize(&mut pooled);
				Ok(Embedding::raw(pooled.into_iter().map(|v| v as f32).collect()))
			}
			_ => Err(Error::UnsupportedShape { shape: shape.to_vec(), dim: self.dim }),
		}
	}
}

/// Aggregates with an explicit dimension.
pub fn aggregate_embedding(activations: &[f32], tokens: usize, dim: usize) -> Result<Embedding> {
	Aggregator::new(dim)?.aggregate(activations, tokens)
}

fn scratch(dim: usize) -> Result<Vec<f64>> {
	let mut buf = Vec::new();
	buf.try_reserve_exact(dim).map_err(|_| Error::Allocation {
		bytes: dim.saturating_mul(std::mem::size_of::<f64>()),
	})?;
	Ok(buf)
}

/// Per-feature mean over all tokens, accumulated in f64.
fn mean_pool(matrix: &ActivationMatrix<'_>) -> Result<Vec<f64>> {
	let mut sums = scratch(matrix.dim())?;
	sums.resize(matrix.dim(), 0.0);

	for row in matrix.view().rows() {
		for (acc, &value) in sums.iter_mut().zip(row.iter()) {
			*acc += f64::from(value);
		}
	}

	let tokens = matrix.tokens() as f64;
	sums.iter_mut().for_each(|v| *v /= tokens);
	Ok(sums)
}

/// Scales to unit length, dividing by at least NORM_EPSILON.
fn normalize(v: &mut [f64]) {
	let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
	let divisor = if norm < NORM_EPSILON { NORM_EPSILON } else { norm };
	v.iter_mut().for_each(|x| *x /= divisor);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalize_floors_tiny_norms() {
		let mut v = vec![1e-12, 0.0];
		normalize(&mut v);
		assert!((v[0] - 1e-3).abs() < 1e-12);
		assert!(v.iter().all(|x| x.is_finite()));
	}

	#[test]
	fn mean_pool_accumulates_in_double_precision() {
		// 1e8 + 1 + ... is lossy in f32 but exact in f64
		let tokens = 3;
		let data = vec![1e8_f32, 1.0, 1.0, 0.0, 1.0, 0.0];
		let matrix = ActivationMatrix::from_flat(&data, tokens, 2).unwrap();
		let pooled = mean_pool(&matrix).unwrap();
		assert!((pooled[0] - (1e8 + 2.0) / 3.0).abs() < 1e-6);
		assert!((pooled[1] - 1.0 / 3.0).abs() < 1e-12);
	}
}
