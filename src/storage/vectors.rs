//! Vector and tensor files
//!
//! `.json` / `.msgpack` hold serde-encoded floats; `.bin` / `.f32` hold raw
//! little-endian blobs, the layout vectors are stored in as database BLOBs.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::similarity::{self, Engine, Similarity};

/// Flat tensor as written by an inference step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorFile {
	pub shape: Vec<usize>,
	pub data: Vec<f32>,
}

/// Vector loaded from disk, kept in its stored form until compared.
#[derive(Debug, Clone)]
pub enum VectorFile {
	Floats(Vec<f32>),
	Blob(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
	Json,
	MessagePack,
	Raw,
}

fn format_of(path: &Path) -> Result<Format> {
	let ext = path
		.extension()
		.and_then(|e| e.to_str())
		.map(|e| e.to_ascii_lowercase())
		.unwrap_or_default();

	match ext.as_str() {
		"json" => Ok(Format::Json),
		"msgpack" | "mp" => Ok(Format::MessagePack),
		"bin" | "f32" | "blob" => Ok(Format::Raw),
		_ => bail!("Unsupported vector file: {} (expected .json, .msgpack or .bin)", path.display()),
	}
}

impl VectorFile {
	pub fn load(path: &Path) -> Result<Self> {
		let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

		match format_of(path)? {
			Format::Json => serde_json::from_slice(&bytes)
				.map(VectorFile::Floats)
				.with_context(|| format!("Invalid JSON vector: {}", path.display())),
			Format::MessagePack => rmp_serde::from_slice(&bytes)
				.map(VectorFile::Floats)
				.with_context(|| format!("Invalid msgpack vector: {}", path.display())),
			Format::Raw => Ok(VectorFile::Blob(bytes)),
		}
	}

	pub fn blob(&self) -> Cow<'_, [u8]> {
		match self {
			VectorFile::Floats(v) => Cow::Owned(similarity::encode(v)),
			VectorFile::Blob(b) => Cow::Borrowed(b),
		}
	}

	pub fn into_floats(self) -> crate::Result<Vec<f32>> {
		match self {
			VectorFile::Floats(v) => Ok(v),
			VectorFile::Blob(b) => similarity::decode(&b),
		}
	}

	/// Compares in float space when both sides are floats, otherwise as blobs
	/// so misaligned byte lengths surface as errors.
	pub fn compare(&self, other: &Self, engine: &Engine) -> crate::Result<Similarity> {
		match (self, other) {
			(VectorFile::Floats(a), VectorFile::Floats(b)) => Ok(engine.cosine(a, b)),
			_ => engine.cosine_bytes(&self.blob(), &other.blob()),
		}
	}
}

impl TensorFile {
	/// Loads a tensor; raw blobs are read as `[len / dim, dim]`.
	pub fn load(path: &Path, dim: usize) -> Result<Self> {
		let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

		match format_of(path)? {
			Format::Json => {
				serde_json::from_slice(&bytes).with_context(|| format!("Invalid JSON tensor: {}", path.display()))
			}
			Format::MessagePack => {
				rmp_serde::from_slice(&bytes).with_context(|| format!("Invalid msgpack tensor: {}", path.display()))
			}
			Format::Raw => {
				let data = similarity::decode(&bytes)?;
				let tokens = if dim == 0 { 0 } else { data.len() / dim };
				Ok(TensorFile { shape: vec![tokens, dim], data })
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_unknown_extension() {
		assert!(format_of(Path::new("vector.txt")).is_err());
		assert_eq!(format_of(Path::new("v.MSGPACK")).unwrap(), Format::MessagePack);
	}

	#[test]
	fn blob_round_trips_floats() {
		let file = VectorFile::Floats(vec![0.25, -1.0]);
		let blob = VectorFile::Blob(file.blob().into_owned());
		assert_eq!(blob.into_floats().unwrap(), vec![0.25, -1.0]);
	}
}
