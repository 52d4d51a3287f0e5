//! Serde helpers for Lens API payloads.

use serde::{Deserialize, Deserializer, Serializer};

/// Numeric fields in typed data may arrive either as JSON numbers or as
/// decimal/hex strings. Serializes back as a plain number.
pub mod number_or_string {
	use super::*;

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum NumberOrString {
		Number(u64),
		String(String),
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
	where
		D: Deserializer<'de>,
	{
		match NumberOrString::deserialize(deserializer)? {
			NumberOrString::Number(n) => Ok(n),
			NumberOrString::String(s) => parse_u64(&s).map_err(serde::de::Error::custom),
		}
	}

	pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_u64(*value)
	}
}

fn parse_u64(s: &str) -> Result<u64, String> {
	let trimmed = s.trim();
	let parsed = match trimmed.strip_prefix("0x") {
		Some(hex) => u64::from_str_radix(hex, 16),
		None => trimmed.parse::<u64>(),
	};
	parsed.map_err(|e| format!("Invalid numeric value '{}': {}", s, e))
}
