//! Rank command - order candidates by similarity to a query

use anyhow::Result;
use colored::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::similarity;
use crate::storage::VectorFile;
use crate::ui;

pub fn run(query: &Path, candidates: &[PathBuf], limit: usize, min_score: f64) -> Result<()> {
	let start = Instant::now();
	let query = load_floats(query)?;

	let loaded: Vec<(&PathBuf, Vec<f32>)> = candidates
		.par_iter()
		.filter_map(|path| match load_floats(path) {
			Ok(v) => Some((path, v)),
			Err(e) => {
				ui::warn(&format!("Skipping {}: {:#}", path.display(), e));
				None
			}
		})
		.collect();

	let vectors: Vec<&[f32]> = loaded.iter().map(|(_, v)| v.as_slice()).collect();
	ui::info(&format!(
		"Ranking {} candidates with {} kernel",
		vectors.len(),
		similarity::Engine::global().kernel().name()
	));
	let ranked = similarity::rank(&query, &vectors, limit);
	let matches: Vec<_> = ranked.into_iter().filter(|r| r.score >= min_score).collect();

	if matches.is_empty() {
		ui::warn("No matches found");
		return Ok(());
	}

	ui::header(&format!("Top {} of {}", matches.len(), loaded.len()));
	for (i, m) in matches.iter().enumerate() {
		let score = format!("{:.4}", m.score);
		let colored_score = if m.score >= 0.8 {
			score.bright_green()
		} else if m.score >= 0.5 {
			score.yellow()
		} else {
			score.dimmed()
		};
		println!("  {:>2}. {} {}", i + 1, colored_score, loaded[m.index].0.display());
	}

	ui::debug(&format!("Ranked in {}ms", start.elapsed().as_millis()));
	Ok(())
}

fn load_floats(path: &Path) -> Result<Vec<f32>> {
	Ok(VectorFile::load(path)?.into_floats()?)
}
