//! Core domain types

pub mod embedding;
pub mod matrix;

pub use embedding::Embedding;
pub use matrix::ActivationMatrix;
