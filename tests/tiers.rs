// Every supported SIMD tier must agree with the scalar kernel

use embedsim::config::TIER_TOLERANCE;
use embedsim::{Engine, Similarity, Tier};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn engines() -> Vec<Engine> {
	Tier::available()
		.into_iter()
		.map(|tier| Engine::with_tier(tier).expect("available tier must construct"))
		.collect()
}

fn check_agreement(a: &[f32], b: &[f32]) {
	let reference = Engine::scalar().cosine(a, b);
	for engine in engines() {
		let got = engine.cosine(a, b);
		match (got, reference) {
			(Similarity::Value(g), Similarity::Value(r)) => {
				assert!((g - r).abs() <= TIER_TOLERANCE, "{}: {} vs scalar {}", engine.tier(), g, r);
				assert!((-1.0..=1.0).contains(&g), "{}: out of range {}", engine.tier(), g);
			}
			(g, r) => assert_eq!(g, r, "{}", engine.tier()),
		}
	}
}

#[test]
fn tiers_agree_on_random_vectors() {
	let mut rng = StdRng::seed_from_u64(0x5eed);
	for len in [1, 2, 3, 4, 5, 7, 8, 9, 15, 16, 17, 31, 33, 384, 768, 1025] {
		for _ in 0..10 {
			let a: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0f32..1.0)).collect();
			let b: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0f32..1.0)).collect();
			check_agreement(&a, &b);
		}
	}
}

#[test]
fn tiers_agree_on_extreme_magnitudes() {
	let mut rng = StdRng::seed_from_u64(99);
	for scale in [1e-20f32, 1e-6, 1e-3, 1e6, 1e15, 1e20, 1e30] {
		let a: Vec<f32> = (0..384).map(|_| rng.random_range(-1.0f32..1.0) * scale).collect();
		let b: Vec<f32> = (0..384).map(|_| rng.random_range(-1.0f32..1.0) * scale).collect();
		check_agreement(&a, &b);
	}
}

#[test]
fn tiers_agree_on_subnormal_products() {
	let mut rng = StdRng::seed_from_u64(21);
	let a: Vec<f32> = (0..4096).map(|_| rng.random_range(-1.0f32..1.0) * 3e-21).collect();
	let b: Vec<f32> = (0..4096).map(|_| rng.random_range(-1.0f32..1.0) * 3e-21).collect();
	let reference = Engine::scalar().cosine(&a, &b);
	assert_ne!(reference, Similarity::Value(0.0));
	for engine in engines() {
		assert_eq!(engine.cosine(&a, &b), reference, "{}", engine.tier());
	}
}

#[test]
fn tiers_agree_on_long_vectors() {
	let mut rng = StdRng::seed_from_u64(0x10_0000);
	for len in [100_000, 1_000_000] {
		let a: Vec<f32> = (0..len).map(|_| rng.random_range(0.0f32..1.0)).collect();
		let b: Vec<f32> = (0..len).map(|_| rng.random_range(0.0f32..1.0)).collect();
		check_agreement(&a, &b);
	}
}

#[test]
fn tiers_agree_on_mixed_magnitudes() {
	let a: Vec<f32> = (0..257).map(|i| if i % 2 == 0 { 1e12 } else { 1e-12 }).collect();
	let b: Vec<f32> = (0..257).map(|i| if i % 3 == 0 { -1e12 } else { 1e12 }).collect();
	check_agreement(&a, &b);
}

#[test]
fn tiers_share_degenerate_conventions() {
	for engine in engines() {
		let zero = vec![0.0f32; 40];
		let ones = vec![1.0f32; 40];
		assert_eq!(engine.cosine(&zero, &ones), Similarity::Value(0.0), "{}", engine.tier());
		assert_eq!(engine.cosine(&zero, &zero), Similarity::Value(0.0), "{}", engine.tier());
		assert_eq!(engine.cosine(&ones, &[]), Similarity::Null, "{}", engine.tier());
		assert_eq!(engine.cosine(&ones, &ones), Similarity::Value(1.0), "{}", engine.tier());

		let tiny = vec![1e-30f32; 40];
		assert_eq!(engine.cosine(&tiny, &ones), Similarity::Value(0.0), "{}", engine.tier());
	}
}

#[test]
fn global_engine_uses_a_supported_tier() {
	let tier = Engine::global().tier();
	assert!(tier.is_supported());
	assert!(Tier::available().contains(&tier));
}

#[test]
fn unsupported_tier_cannot_be_constructed() {
	for tier in Tier::ORDER {
		assert_eq!(Engine::with_tier(tier).is_some(), tier.is_supported());
	}
}
