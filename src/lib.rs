//! # embedsim
//!
//! Turns per-token model activations into one normalized sentence embedding
//! (mean pooling + L2 normalization) and compares embeddings with cosine
//! similarity on the widest SIMD tier the CPU offers.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod pooling;
pub mod similarity;
pub mod storage;
pub mod ui;

pub use crate::core::{ActivationMatrix, Embedding};
pub use error::{Error, Result};
pub use pooling::{aggregate_embedding, Aggregator};
pub use similarity::{cosine_similarity, cosine_similarity_bytes, Engine, Similarity, SimilarityOutcome, Tier};
