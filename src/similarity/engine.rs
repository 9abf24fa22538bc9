//! Cosine similarity over a selected kernel

use std::fmt;
use std::sync::OnceLock;

use super::dispatch::Tier;
use super::kernels::{Kernel, Scalar, Sums};
use super::Similarity;
use crate::config::{self, ELEMENT_SIZE, LANE_UNDERFLOW, MAGNITUDE_FLOOR};
use crate::error::{Error, Result};
use crate::ui;

static ENGINE: OnceLock<Engine> = OnceLock::new();

/// Similarity engine bound to one SIMD tier.
pub struct Engine {
	tier: Tier,
	kernel: Box<dyn Kernel>,
}

impl fmt::Debug for Engine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Engine")
			.field("tier", &self.tier)
			.field("kernel", &self.kernel.name())
			.finish()
	}
}

impl Engine {
	/// Process-wide engine, selected once on first use.
	pub fn global() -> &'static Engine {
		ENGINE.get_or_init(Engine::detect)
	}

	/// Engine for `tier`, or `None` if the CPU lacks it.
	pub fn with_tier(tier: Tier) -> Option<Self> {
		tier.kernel().map(|kernel| Self { tier, kernel })
	}

	pub fn scalar() -> Self {
		Self { tier: Tier::Scalar, kernel: Box::new(Scalar) }
	}

	/// Best available engine, honouring a forced tier when it is supported.
	pub fn detect() -> Self {
		if let Some(tier) = config::tier_override() {
			if let Some(engine) = Self::with_tier(tier) {
				ui::debug(&format!("SIMD tier forced to {}", engine.kernel.name()));
				return engine;
			}
			ui::warn(&format!("SIMD tier {} unavailable on this CPU, falling back to detection", tier));
		}

		let engine = Self::with_tier(Tier::detect()).unwrap_or_else(Self::scalar);
		ui::debug(&format!(
			"SIMD tier selected: {} ({} lanes)",
			engine.kernel.name(),
			engine.kernel.width()
		));
		engine
	}

	pub fn tier(&self) -> Tier {
		self.tier
	}

	pub fn kernel(&self) -> &dyn Kernel {
		self.kernel.as_ref()
	}

	/// Cosine similarity over the common prefix of `a` and `b`.
	pub fn cosine(&self, a: &[f32], b: &[f32]) -> Similarity {
		let n = a.len().min(b.len());
		if n == 0 {
			return Similarity::Null;
		}
		let (a, b) = (&a[..n], &b[..n]);

		if std::ptr::eq(a, b) {
			let mut mag = self.kernel.squared_norm(a);
			if mag < LANE_UNDERFLOW {
				mag = Scalar.squared_norm(a);
			}
			if mag.is_finite() {
				return Similarity::Value(if mag <= MAGNITUDE_FLOOR { 0.0 } else { 1.0 });
			}
		}

		let mut sums = self.kernel.fused(a, b);
		if !sums.is_finite() || sums.mag_a.min(sums.mag_b) < LANE_UNDERFLOW {
			// f32 lanes overflow, or go subnormal, long before f64 does
			sums = Scalar.fused(a, b);
		}
		Similarity::Value(score(sums))
	}

	/// Cosine similarity of two little-endian `f32` blobs.
	///
	/// Each blob must be a whole number of elements; only the common prefix
	/// is decoded.
	pub fn cosine_bytes(&self, a: &[u8], b: &[u8]) -> Result<Similarity> {
		check_alignment(a)?;
		check_alignment(b)?;

		let n = a.len().min(b.len());
		if std::ptr::eq(a, b) {
			let v = decode(&a[..n])?;
			return Ok(self.cosine(&v, &v));
		}
		let va = decode(&a[..n])?;
		let vb = decode(&b[..n])?;
		Ok(self.cosine(&va, &vb))
	}
}

fn score(sums: Sums) -> f64 {
	if sums.mag_a <= MAGNITUDE_FLOOR || sums.mag_b <= MAGNITUDE_FLOOR {
		return 0.0;
	}
	(sums.dot / (sums.mag_a.sqrt() * sums.mag_b.sqrt())).clamp(-1.0, 1.0)
}

fn check_alignment(bytes: &[u8]) -> Result<()> {
	if bytes.len() % ELEMENT_SIZE != 0 {
		return Err(Error::Alignment { len: bytes.len(), element: ELEMENT_SIZE });
	}
	Ok(())
}

/// Decodes a little-endian `f32` blob without assuming pointer alignment.
pub fn decode(bytes: &[u8]) -> Result<Vec<f32>> {
	check_alignment(bytes)?;
	Ok(bytes
		.chunks_exact(ELEMENT_SIZE)
		.map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
		.collect())
}

/// Little-endian blob of `values`, the layout [`decode`] reads.
pub fn encode(values: &[f32]) -> Vec<u8> {
	values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
