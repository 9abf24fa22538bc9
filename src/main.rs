//! embedsim - pooled embeddings and SIMD cosine similarity
//!
//! Command-line front end over the aggregation and similarity core.

use anyhow::Result;
use clap::Parser;

use embedsim::cli::{Cli, Command};
use embedsim::{commands, config, ui};

fn main() -> Result<()> {
	let cli = Cli::parse();

	ui::Log::set_verbose(cli.verbose);
	if let Some(tier) = cli.simd.tier() {
		config::set_tier_override(tier);
	}

	match cli.command {
		Command::Pool { file, dim } => commands::pool::run(&file, dim),
		Command::Compare { a, b, json } => commands::compare::run(&a, &b, json),
		Command::Rank { query, candidates, limit, min_score } => {
			commands::rank::run(&query, &candidates, limit, min_score)
		}
		Command::Info { dim, trials } => commands::info::run(dim, trials),
	}
}
