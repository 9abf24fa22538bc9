//! x86_64 kernels: AVX2 with FMA (8 lanes) and SSE2 (4 lanes)

use std::arch::x86_64::*;

use super::{tail, Kernel, Sums, BLOCK};

/// 8-lane fused multiply-add tier.
///
/// Only constructible through [`Avx2Fma::detect`], which guarantees the CPU
/// supports both AVX2 and FMA.
#[derive(Debug, Clone, Copy)]
pub struct Avx2Fma {
	_detected: (),
}

impl Avx2Fma {
	pub fn detect() -> Option<Self> {
		if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
			Some(Self { _detected: () })
		} else {
			None
		}
	}
}

impl Kernel for Avx2Fma {
	fn name(&self) -> &'static str {
		"avx2+fma"
	}

	fn width(&self) -> usize {
		8
	}

	fn fused(&self, a: &[f32], b: &[f32]) -> Sums {
		// SAFETY: `self` exists only after AVX2 and FMA were detected.
		unsafe { fused_avx2(a, b) }
	}
}

/// 4-lane tier without FMA.
#[derive(Debug, Clone, Copy)]
pub struct Sse2 {
	_detected: (),
}

impl Sse2 {
	pub fn detect() -> Option<Self> {
		if is_x86_feature_detected!("sse2") {
			Some(Self { _detected: () })
		} else {
			None
		}
	}
}

impl Kernel for Sse2 {
	fn name(&self) -> &'static str {
		"sse2"
	}

	fn width(&self) -> usize {
		4
	}

	fn fused(&self, a: &[f32], b: &[f32]) -> Sums {
		// SAFETY: `self` exists only after SSE2 was detected.
		unsafe { fused_sse2(a, b) }
	}
}

#[target_feature(enable = "avx2")]
#[target_feature(enable = "fma")]
unsafe fn fused_avx2(a: &[f32], b: &[f32]) -> Sums {
	let len = a.len().min(b.len());
	let chunks = len / 8;
	let per_block = BLOCK / 8;

	let mut sums = Sums::default();
	for first in (0..chunks).step_by(per_block) {
		let mut dot = _mm256_setzero_ps();
		let mut na = _mm256_setzero_ps();
		let mut nb = _mm256_setzero_ps();
		for i in first..(first + per_block).min(chunks) {
			let off = i * 8;
			let va = _mm256_loadu_ps(a.as_ptr().add(off));
			let vb = _mm256_loadu_ps(b.as_ptr().add(off));
			dot = _mm256_fmadd_ps(va, vb, dot);
			na = _mm256_fmadd_ps(va, va, na);
			nb = _mm256_fmadd_ps(vb, vb, nb);
		}

		let mut lanes = [[0.0f32; 8]; 3];
		_mm256_storeu_ps(lanes[0].as_mut_ptr(), dot);
		_mm256_storeu_ps(lanes[1].as_mut_ptr(), na);
		_mm256_storeu_ps(lanes[2].as_mut_ptr(), nb);
		sums += reduce(&lanes);
	}
	tail(sums, &a[..len], &b[..len], chunks * 8)
}

#[target_feature(enable = "sse2")]
unsafe fn fused_sse2(a: &[f32], b: &[f32]) -> Sums {
	let len = a.len().min(b.len());
	let chunks = len / 4;
	let per_block = BLOCK / 4;

	let mut sums = Sums::default();
	for first in (0..chunks).step_by(per_block) {
		let mut dot = _mm_setzero_ps();
		let mut na = _mm_setzero_ps();
		let mut nb = _mm_setzero_ps();
		for i in first..(first + per_block).min(chunks) {
			let off = i * 4;
			let va = _mm_loadu_ps(a.as_ptr().add(off));
			let vb = _mm_loadu_ps(b.as_ptr().add(off));
			dot = _mm_add_ps(dot, _mm_mul_ps(va, vb));
			na = _mm_add_ps(na, _mm_mul_ps(va, va));
			nb = _mm_add_ps(nb, _mm_mul_ps(vb, vb));
		}

		let mut lanes = [[0.0f32; 4]; 3];
		_mm_storeu_ps(lanes[0].as_mut_ptr(), dot);
		_mm_storeu_ps(lanes[1].as_mut_ptr(), na);
		_mm_storeu_ps(lanes[2].as_mut_ptr(), nb);
		sums += reduce(&lanes);
	}
	tail(sums, &a[..len], &b[..len], chunks * 4)
}

/// Horizontal reduction of one block's lane partials.
#[inline]
fn reduce<const N: usize>(lanes: &[[f32; N]; 3]) -> Sums {
	Sums {
		dot: hsum(&lanes[0]),
		mag_a: hsum(&lanes[1]),
		mag_b: hsum(&lanes[2]),
	}
}

#[inline]
fn hsum(lanes: &[f32]) -> f64 {
	lanes.iter().map(|&x| f64::from(x)).sum()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::similarity::kernels::Scalar;

	fn assert_close(got: Sums, want: Sums) {
		let tol = |x: f64| 1e-4 * x.abs().max(1.0);
		assert!((got.dot - want.dot).abs() <= tol(want.dot), "{:?} vs {:?}", got, want);
		assert!((got.mag_a - want.mag_a).abs() <= tol(want.mag_a), "{:?} vs {:?}", got, want);
		assert!((got.mag_b - want.mag_b).abs() <= tol(want.mag_b), "{:?} vs {:?}", got, want);
	}

	#[test]
	fn avx2_matches_scalar_with_remainder() {
		let Some(kernel) = Avx2Fma::detect() else {
			eprintln!("Skipping: AVX2/FMA not available");
			return;
		};
		let a: Vec<f32> = (0..515).map(|i| (i as f32 * 0.37).sin()).collect();
		let b: Vec<f32> = (0..515).map(|i| (i as f32 * 0.11).cos()).collect();
		assert_close(kernel.fused(&a, &b), Scalar.fused(&a, &b));
	}

	#[test]
	fn sse2_matches_scalar_with_remainder() {
		let kernel = Sse2::detect().expect("sse2 is baseline on x86_64");
		let a: Vec<f32> = (0..387).map(|i| (i as f32 * 0.23).sin()).collect();
		let b: Vec<f32> = (0..387).map(|i| (i as f32 * 0.71).cos()).collect();
		assert_close(kernel.fused(&a, &b), Scalar.fused(&a, &b));
	}

	#[test]
	fn long_inputs_do_not_drift() {
		// a single f32 lane summing 0.01 a million times loses whole percents
		let a = vec![0.1f32; 1 << 20];
		let want = Scalar.fused(&a, &a);
		let kernels: Vec<Box<dyn Kernel>> = [
			Avx2Fma::detect().map(|k| Box::new(k) as Box<dyn Kernel>),
			Sse2::detect().map(|k| Box::new(k) as Box<dyn Kernel>),
		]
		.into_iter()
		.flatten()
		.collect();
		for kernel in kernels {
			let got = kernel.fused(&a, &a);
			assert!((got.mag_a - want.mag_a).abs() <= 1e-4 * want.mag_a, "{}: {:?} vs {:?}", kernel.name(), got, want);
			assert!((got.dot - want.dot).abs() <= 1e-4 * want.dot, "{}: {:?} vs {:?}", kernel.name(), got, want);
		}
	}

	#[test]
	fn short_inputs_use_tail_only() {
		let kernel = Sse2::detect().expect("sse2 is baseline on x86_64");
		let sums = kernel.fused(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0]);
		assert_eq!(sums, Sums { dot: 6.0, mag_a: 14.0, mag_b: 3.0 });
	}
}
