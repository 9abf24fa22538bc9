//! SIMD tier selection
//!
//! Tiers are listed from widest to narrowest. Detection runs at runtime so a
//! single binary picks the best kernel on whatever CPU it lands on.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::kernels::{Kernel, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
	/// AVX2 + FMA, 8 lanes (x86_64)
	Avx2Fma,
	/// SSE2, 4 lanes (x86_64 baseline)
	Sse2,
	/// NEON, 4 lanes (aarch64)
	Neon,
	/// f64 scalar loop, always available
	Scalar,
}

impl Tier {
	/// Preference order, best first.
	pub const ORDER: [Tier; 4] = [Tier::Avx2Fma, Tier::Sse2, Tier::Neon, Tier::Scalar];

	/// Instantiates this tier's kernel if the running CPU supports it.
	pub fn kernel(self) -> Option<Box<dyn Kernel>> {
		match self {
			#[cfg(target_arch = "x86_64")]
			Tier::Avx2Fma => super::kernels::x86::Avx2Fma::detect().map(|k| Box::new(k) as Box<dyn Kernel>),
			#[cfg(target_arch = "x86_64")]
			Tier::Sse2 => super::kernels::x86::Sse2::detect().map(|k| Box::new(k) as Box<dyn Kernel>),
			#[cfg(target_arch = "aarch64")]
			Tier::Neon => super::kernels::neon::Neon::detect().map(|k| Box::new(k) as Box<dyn Kernel>),
			Tier::Scalar => Some(Box::new(Scalar) as Box<dyn Kernel>),
			_ => None,
		}
	}

	pub fn is_supported(self) -> bool {
		self.kernel().is_some()
	}

	/// Best supported tier.
	pub fn detect() -> Tier {
		Self::ORDER
			.into_iter()
			.find(|tier| tier.is_supported())
			.unwrap_or(Tier::Scalar)
	}

	/// All supported tiers, best first. Always ends with `Scalar`.
	pub fn available() -> Vec<Tier> {
		Self::ORDER.into_iter().filter(|tier| tier.is_supported()).collect()
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Tier::Avx2Fma => "avx2",
			Tier::Sse2 => "sse2",
			Tier::Neon => "neon",
			Tier::Scalar => "scalar",
		}
	}
}

impl fmt::Display for Tier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Tier {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"avx2" | "avx2fma" | "avx2+fma" => Ok(Tier::Avx2Fma),
			"sse2" | "sse" => Ok(Tier::Sse2),
			"neon" => Ok(Tier::Neon),
			"scalar" => Ok(Tier::Scalar),
			other => Err(format!("unknown SIMD tier '{}'", other)),
		}
	}
}
