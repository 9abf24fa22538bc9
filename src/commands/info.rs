//! Info command - SIMD tiers and cross-tier agreement check

use anyhow::{bail, Result};
use rand::Rng;

use crate::config::TIER_TOLERANCE;
use crate::similarity::{Engine, Tier};
use crate::ui;

/// Magnitudes exercised by the self-check, down to subnormal products.
const SCALES: [f32; 4] = [1.0, 1e-6, 1e-20, 1e15];

pub fn run(dim: usize, trials: usize) -> Result<()> {
	if dim == 0 {
		bail!("Dimension must be greater than zero");
	}

	let engine = Engine::global();
	let available = Tier::available();

	ui::header("SIMD");
	ui::field("Architecture", std::env::consts::ARCH);
	ui::field("Detected", Tier::detect().as_str());
	ui::field("Active", &format!("{} ({} lanes)", engine.kernel().name(), engine.kernel().width()));
	ui::field(
		"Available",
		&available.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", "),
	);

	ui::header("Self-check");
	let deviation = max_deviation(&available, dim, trials);
	ui::field("Max deviation", &format!("{:.2e}", deviation));

	if deviation <= TIER_TOLERANCE {
		ui::success(&format!("All tiers agree within {:.0e}", TIER_TOLERANCE));
		Ok(())
	} else {
		ui::error(&format!("Tiers disagree by {:.2e} (tolerance {:.0e})", deviation, TIER_TOLERANCE));
		bail!("SIMD self-check failed")
	}
}

/// Largest absolute difference between any tier and the scalar kernel.
fn max_deviation(tiers: &[Tier], dim: usize, trials: usize) -> f64 {
	let scalar = Engine::scalar();
	let engines: Vec<Engine> = tiers
		.iter()
		.filter(|&&t| t != Tier::Scalar)
		.filter_map(|&t| Engine::with_tier(t))
		.collect();

	let mut rng = rand::rng();
	let mut worst = 0.0f64;
	for scale in SCALES {
		for _ in 0..trials {
			let a: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0) * scale).collect();
			let b: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0) * scale).collect();
			let Some(expected) = scalar.cosine(&a, &b).value() else {
				continue;
			};

			for engine in &engines {
				if let Some(got) = engine.cosine(&a, &b).value() {
					worst = worst.max((got - expected).abs());
				}
			}
		}
		ui::debug(&format!("Scale {:e}: max deviation so far {:.2e}", scale, worst));
	}
	worst
}
