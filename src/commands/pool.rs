//! Pool command - aggregate activations into one embedding

use anyhow::{Context, Result};
use std::path::Path;

use crate::pooling::Aggregator;
use crate::storage::TensorFile;
use crate::ui;

pub fn run(file: &Path, dim: usize) -> Result<()> {
	let aggregator = Aggregator::new(dim)?;
	let tensor = TensorFile::load(file, dim)?;
	ui::debug(&format!("Loaded tensor {:?} from {}", tensor.shape, file.display()));

	let embedding = aggregator
		.aggregate_tensor(&tensor.data, &tensor.shape)
		.with_context(|| format!("Failed to pool {}", file.display()))?;

	if embedding.is_empty() {
		ui::debug("Empty token sequence, emitting empty embedding");
	} else {
		ui::debug(&format!("Pooled {} dims, norm {:.6}", embedding.len(), embedding.norm()));
	}

	println!("{}", serde_json::to_string(&embedding)?);
	Ok(())
}
