use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{DEFAULT_LIMIT, DEFAULT_MIN_SCORE, EMBEDDING_DIM};
use crate::similarity::Tier;

/// SIMD tier for the similarity engine
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Simd {
	/// Auto-detect best available (AVX2+FMA → SSE2 → NEON → scalar)
	#[default]
	Auto,
	/// x86_64 AVX2 with fused multiply-add
	Avx2,
	/// x86_64 SSE2
	Sse2,
	/// aarch64 NEON
	Neon,
	/// Portable f64 loop
	Scalar,
}

impl Simd {
	pub fn tier(self) -> Option<Tier> {
		match self {
			Simd::Auto => None,
			Simd::Avx2 => Some(Tier::Avx2Fma),
			Simd::Sse2 => Some(Tier::Sse2),
			Simd::Neon => Some(Tier::Neon),
			Simd::Scalar => Some(Tier::Scalar),
		}
	}
}

fn parse_score(s: &str) -> Result<f64, String> {
	let val: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if !(-1.0..=1.0).contains(&val) {
		Err(format!("score must be between -1.0 and 1.0, got {}", val))
	} else {
		Ok(val)
	}
}

fn color(c: AnsiColor) -> Option<Color> {
	Some(Color::Ansi(c))
}

fn styles() -> Styles {
	Styles::styled()
		.header(Style::new().bold().fg_color(color(AnsiColor::Blue)))
		.usage(Style::new().bold().fg_color(color(AnsiColor::Blue)))
		.literal(Style::new().fg_color(color(AnsiColor::Blue)))
		.placeholder(Style::new().fg_color(color(AnsiColor::Yellow)))
		.valid(Style::new().fg_color(color(AnsiColor::Blue)))
		.invalid(Style::new().fg_color(color(AnsiColor::Red)))
}

#[derive(Parser, Debug)]
#[command(
	name = "embedsim",
	author,
	version,
	about = "Mean-pooled embeddings and SIMD cosine similarity",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {bin} {pool}     {pool_args}        {pool_desc}
  {bin} {compare}  {compare_args}      {compare_desc}
  {bin} {rank}     {rank_args}   {rank_desc}
  {bin} {info}                          {info_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "embedsim".bright_blue(),
		pool = "pool".yellow(),
		pool_args = "hidden.json -d 384",
		pool_desc = "Pool token activations".dimmed(),
		compare = "compare".yellow(),
		compare_args = "a.bin b.bin --json",
		compare_desc = "Cosine similarity of two vectors".dimmed(),
		rank = "rank".yellow(),
		rank_args = "query.json docs/*.bin",
		rank_desc = "Rank candidates against a query".dimmed(),
		info = "info".yellow(),
		info_desc = "Show SIMD tiers and self-check".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// SIMD tier: auto, avx2, sse2, neon, scalar
	#[arg(long = "simd", global = true, default_value = "auto")]
	pub simd: Simd,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Mean-pool and L2-normalize a [tokens, dim] activation tensor
	Pool {
		/// Tensor file (.json/.msgpack with shape and data, or raw .bin)
		#[arg(value_name = "FILE")]
		file: PathBuf,

		/// Embedding dimension
		#[arg(short = 'd', long = "dim", default_value_t = EMBEDDING_DIM)]
		dim: usize,
	},

	/// Cosine similarity between two vectors
	Compare {
		#[arg(value_name = "A")]
		a: PathBuf,

		#[arg(value_name = "B")]
		b: PathBuf,

		/// Print {value, is_null, is_error} instead of failing on invalid input
		#[arg(long = "json")]
		json: bool,
	},

	/// Rank candidate vectors by similarity to a query
	Rank {
		#[arg(value_name = "QUERY")]
		query: PathBuf,

		#[arg(value_name = "CANDIDATES", required = true)]
		candidates: Vec<PathBuf>,

		/// Number of results
		#[arg(short = 'n', long = "limit", default_value_t = DEFAULT_LIMIT)]
		limit: usize,

		/// Minimum similarity score (-1.0 to 1.0)
		#[arg(short = 's', long = "score", default_value_t = DEFAULT_MIN_SCORE, value_parser = parse_score, allow_negative_numbers = true)]
		min_score: f64,
	},

	/// Show detected SIMD tiers and check that they agree
	Info {
		/// Vector length used for the self-check
		#[arg(short = 'd', long = "dim", default_value_t = EMBEDDING_DIM)]
		dim: usize,

		/// Random vector pairs per magnitude
		#[arg(short = 't', long = "trials", default_value_t = 64)]
		trials: usize,
	},
}
