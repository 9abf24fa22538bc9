//! Borrowed view over per-token model activations

use ndarray::ArrayView2;

use crate::error::{Error, Result};

/// Row-major `[tokens, dim]` view over caller-owned activations.
#[derive(Debug, Clone, Copy)]
pub struct ActivationMatrix<'a> {
	view: ArrayView2<'a, f32>,
}

impl<'a> ActivationMatrix<'a> {
	/// Wraps a flat buffer, which must hold exactly `tokens * dim` values.
	pub fn from_flat(data: &'a [f32], tokens: usize, dim: usize) -> Result<Self> {
		let expected = tokens.checked_mul(dim).ok_or(Error::Shape {
			expected: usize::MAX,
			actual: data.len(),
		})?;
		if data.len() != expected {
			return Err(Error::Shape { expected, actual: data.len() });
		}

		let view = ArrayView2::from_shape((tokens, dim), data).map_err(|_| Error::Shape {
			expected,
			actual: data.len(),
		})?;
		Ok(Self { view })
	}

	pub fn tokens(&self) -> usize {
		self.view.nrows()
	}

	pub fn dim(&self) -> usize {
		self.view.ncols()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens() == 0
	}

	pub fn view(&self) -> ArrayView2<'a, f32> {
		self.view
	}
}
