//! Numeric constants and process-wide settings

use std::sync::OnceLock;

use crate::similarity::Tier;

static TIER_OVERRIDE: OnceLock<Tier> = OnceLock::new();

// === Model Parameters ===
/// Hidden size of MiniLM-L12, the default deployed model.
pub const EMBEDDING_DIM: usize = 384;

// === Numerics ===
/// Divisor floor for L2 normalization of pooled vectors.
pub const NORM_EPSILON: f64 = 1e-9;
/// Squared magnitudes at or below this are treated as zero vectors.
pub const MAGNITUDE_FLOOR: f64 = f32::MIN_POSITIVE as f64;
/// Squared magnitudes below this are recomputed in f64: f32 lane products
/// of such vectors are subnormal and carry only a few significant bits.
pub const LANE_UNDERFLOW: f64 = 1e-30;
/// Size of one operand element in bytes.
pub const ELEMENT_SIZE: usize = std::mem::size_of::<f32>();
/// Maximum absolute disagreement between SIMD tiers on a similarity value.
pub const TIER_TOLERANCE: f64 = 1e-5;

// === Ranking Defaults ===
pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_MIN_SCORE: f64 = -1.0;

pub const TIER_ENV: &str = "EMBEDSIM_TIER";

/// Forces a SIMD tier for the engine selected at first use.
/// Only the first call has any effect.
pub fn set_tier_override(tier: Tier) {
	let _ = TIER_OVERRIDE.set(tier);
}

/// Returns the forced tier, if any (explicit override first, then EMBEDSIM_TIER)
pub fn tier_override() -> Option<Tier> {
	if let Some(tier) = TIER_OVERRIDE.get() {
		crate::ui::debug(&format!("Using forced SIMD tier: {}", tier));
		return Some(*tier);
	}

	if let Ok(value) = std::env::var(TIER_ENV) {
		match value.parse::<Tier>() {
			Ok(tier) => {
				crate::ui::debug(&format!("Using {}: {}", TIER_ENV, tier));
				return Some(tier);
			}
			Err(e) => crate::ui::warn(&format!("Ignoring {}: {}", TIER_ENV, e)),
		}
	}

	None
}
