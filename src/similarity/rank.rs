//! Parallel one-vs-many ranking

use rayon::prelude::*;
use serde::Serialize;

use super::Engine;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranked {
	/// Position in the candidate list
	pub index: usize,
	pub score: f64,
}

/// Scores every candidate against `query` and returns the best `limit`,
/// highest first. Candidates with no common elements or a non-finite score
/// are skipped.
pub fn rank<V>(query: &[f32], candidates: &[V], limit: usize) -> Vec<Ranked>
where
	V: AsRef<[f32]> + Sync,
{
	rank_with(Engine::global(), query, candidates, limit)
}

pub fn rank_with<V>(engine: &Engine, query: &[f32], candidates: &[V], limit: usize) -> Vec<Ranked>
where
	V: AsRef<[f32]> + Sync,
{
	let mut ranked: Vec<Ranked> = candidates
		.par_iter()
		.enumerate()
		.filter_map(|(index, candidate)| {
			let score = engine.cosine(query, candidate.as_ref()).value()?;
			score.is_finite().then_some(Ranked { index, score })
		})
		.collect();

	ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
	ranked.truncate(limit);
	ranked
}
