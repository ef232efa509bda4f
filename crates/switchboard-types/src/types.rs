//! Core value types

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ClResult, Error};

/// Unix timestamp in seconds, rendered as ISO-8601 UTC on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Self {
		Self(Utc::now().timestamp())
	}

	/// Parse an RFC 3339 date-time (`2026-08-05T12:00:00Z`)
	pub fn from_rfc3339(s: &str) -> ClResult<Self> {
		let dt = DateTime::parse_from_rfc3339(s)
			.map_err(|_| Error::ValidationError(format!("invalid date: {}", s).into()))?;
		Ok(Self(dt.timestamp()))
	}

	pub fn to_iso(self) -> String {
		match DateTime::<Utc>::from_timestamp(self.0, 0) {
			Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
			None => String::new(),
		}
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}", self.to_iso())
	}
}

impl Serialize for Timestamp {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_iso())
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		Timestamp::from_rfc3339(&s).map_err(|_| de::Error::custom(format!("invalid date: {}", s)))
	}
}


// vim: ts=4
