//! Compare command - cosine similarity of two vector files

use anyhow::{Context, Result};
use std::path::Path;

use crate::similarity::{Engine, SimilarityOutcome};
use crate::storage::VectorFile;
use crate::ui;

pub fn run(a: &Path, b: &Path, json: bool) -> Result<()> {
	let va = VectorFile::load(a)?;
	let vb = VectorFile::load(b)?;

	let engine = Engine::global();
	ui::debug(&format!("Comparing with {} kernel", engine.kernel().name()));
	let result = va.compare(&vb, engine);

	if json {
		if let Err(e) = &result {
			ui::debug(&format!("Invalid operand: {}", e));
		}
		let outcome = SimilarityOutcome::from(result);
		println!("{}", serde_json::to_string(&outcome)?);
		return Ok(());
	}

	let similarity =
		result.with_context(|| format!("Cannot compare {} and {}", a.display(), b.display()))?;
	println!("{}", similarity);
	Ok(())
}
