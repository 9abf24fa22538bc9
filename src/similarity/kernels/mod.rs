//! Fused dot/magnitude kernels, one per SIMD tier.
//!
//! Every kernel makes a single pass over the common prefix of two slices and
//! returns the three running sums needed for cosine similarity. Lane-wise
//! partial sums live in f32 registers for at most `BLOCK` elements before
//! they are reduced horizontally into f64 totals, so rounding error does not
//! grow with the length of the input.

use std::ops::AddAssign;

#[cfg(target_arch = "aarch64")]
pub mod neon;
#[cfg(target_arch = "x86_64")]
pub mod x86;

/// Elements accumulated in f32 lanes before flushing into f64 sums.
/// A multiple of every lane width.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
const BLOCK: usize = 1024;

/// Accumulated sums of one fused pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sums {
	pub dot: f64,
	pub mag_a: f64,
	pub mag_b: f64,
}

impl Sums {
	pub fn is_finite(&self) -> bool {
		self.dot.is_finite() && self.mag_a.is_finite() && self.mag_b.is_finite()
	}
}

impl AddAssign for Sums {
	fn add_assign(&mut self, rhs: Sums) {
		self.dot += rhs.dot;
		self.mag_a += rhs.mag_a;
		self.mag_b += rhs.mag_b;
	}
}

/// A vectorized (or scalar) implementation of the fused pass.
///
/// Callers pass slices of equal length; the engine trims to the common prefix.
pub trait Kernel: Send + Sync {
	fn name(&self) -> &'static str;

	/// Lanes processed per step.
	fn width(&self) -> usize;

	fn fused(&self, a: &[f32], b: &[f32]) -> Sums;

	fn squared_norm(&self, v: &[f32]) -> f64 {
		self.fused(v, v).mag_a
	}
}

/// Portable fallback, accumulating in f64.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

impl Kernel for Scalar {
	fn name(&self) -> &'static str {
		"scalar"
	}

	fn width(&self) -> usize {
		1
	}

	fn fused(&self, a: &[f32], b: &[f32]) -> Sums {
		a.iter().zip(b).fold(Sums::default(), |mut acc, (&x, &y)| {
			let (x, y) = (f64::from(x), f64::from(y));
			acc.dot += x * y;
			acc.mag_a += x * x;
			acc.mag_b += y * y;
			acc
		})
	}

	fn squared_norm(&self, v: &[f32]) -> f64 {
		v.iter().map(|&x| f64::from(x) * f64::from(x)).sum()
	}
}

/// Adds the scalar tail `a[start..]`, `b[start..]` onto reduced lane sums.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
fn tail(mut sums: Sums, a: &[f32], b: &[f32], start: usize) -> Sums {
	sums += Scalar.fused(&a[start..], &b[start..]);
	sums
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scalar_sums_match_definition() {
		let a = [1.0, 2.0, 3.0];
		let b = [4.0, -5.0, 6.0];
		let sums = Scalar.fused(&a, &b);
		assert_eq!(sums.dot, 12.0);
		assert_eq!(sums.mag_a, 14.0);
		assert_eq!(sums.mag_b, 77.0);
	}

	#[test]
	fn scalar_handles_empty_input() {
		assert_eq!(Scalar.fused(&[], &[]), Sums::default());
		assert_eq!(Scalar.squared_norm(&[]), 0.0);
	}
}
