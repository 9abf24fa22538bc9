//! aarch64 NEON kernel (4 lanes, fused multiply-add)

use std::arch::aarch64::*;

use super::{tail, Kernel, Sums, BLOCK};

#[derive(Debug, Clone, Copy)]
pub struct Neon {
	_detected: (),
}

impl Neon {
	pub fn detect() -> Option<Self> {
		if std::arch::is_aarch64_feature_detected!("neon") {
			Some(Self { _detected: () })
		} else {
			None
		}
	}
}

impl Kernel for Neon {
	fn name(&self) -> &'static str {
		"neon"
	}

	fn width(&self) -> usize {
		4
	}

	fn fused(&self, a: &[f32], b: &[f32]) -> Sums {
		// SAFETY: `self` exists only after NEON was detected.
		unsafe { fused_neon(a, b) }
	}
}

#[target_feature(enable = "neon")]
unsafe fn fused_neon(a: &[f32], b: &[f32]) -> Sums {
	let len = a.len().min(b.len());
	let chunks = len / 4;
	let per_block = BLOCK / 4;

	let mut sums = Sums::default();
	for first in (0..chunks).step_by(per_block) {
		let mut dot = vdupq_n_f32(0.0);
		let mut na = vdupq_n_f32(0.0);
		let mut nb = vdupq_n_f32(0.0);
		for i in first..(first + per_block).min(chunks) {
			let off = i * 4;
			let va = vld1q_f32(a.as_ptr().add(off));
			let vb = vld1q_f32(b.as_ptr().add(off));
			dot = vfmaq_f32(dot, va, vb);
			na = vfmaq_f32(na, va, va);
			nb = vfmaq_f32(nb, vb, vb);
		}

		sums += Sums {
			dot: f64::from(vaddvq_f32(dot)),
			mag_a: f64::from(vaddvq_f32(na)),
			mag_b: f64::from(vaddvq_f32(nb)),
		};
	}
	tail(sums, &a[..len], &b[..len], chunks * 4)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::similarity::kernels::Scalar;

	#[test]
	fn neon_matches_scalar_with_remainder() {
		let Some(kernel) = Neon::detect() else {
			eprintln!("Skipping: NEON not available");
			return;
		};
		let a: Vec<f32> = (0..389).map(|i| (i as f32 * 0.29).sin()).collect();
		let b: Vec<f32> = (0..389).map(|i| (i as f32 * 0.53).cos()).collect();
		let got = kernel.fused(&a, &b);
		let want = Scalar.fused(&a, &b);
		assert!((got.dot - want.dot).abs() < 1e-3);
		assert!((got.mag_a - want.mag_a).abs() < 1e-3);
		assert!((got.mag_b - want.mag_b).abs() < 1e-3);
	}

	#[test]
	fn long_inputs_do_not_drift() {
		let Some(kernel) = Neon::detect() else {
			eprintln!("Skipping: NEON not available");
			return;
		};
		let a = vec![0.1f32; 1 << 20];
		let got = kernel.fused(&a, &a);
		let want = Scalar.fused(&a, &a);
		assert!((got.mag_a - want.mag_a).abs() <= 1e-4 * want.mag_a, "{:?} vs {:?}", got, want);
	}
}
