//! Canonical group digest
//!
//! The digest is the tamper-evidence mechanism of the registry: same group
//! contents, same fingerprint, regardless of how or where the rows were
//! fetched.

use sha2::{Digest, Sha256};

use switchboard_types::toggle_adapter::Toggle;
use switchboard_types::types::Timestamp;

/// SHA-256 fingerprint over a group's toggles, rendered as lowercase hex.
///
/// One text line per member: key, value, `active_at` as ISO-8601 or empty,
/// `disabled_at` as ISO-8601 or empty, and the tags joined by commas or
/// empty, all space-separated. Member lines are ordered by key ascending and
/// joined by a single space. The sort happens here, so the result is
/// independent of the order rows were inserted or retrieved in.
pub fn collection_digest(members: &[Toggle]) -> Box<str> {
	let mut ordered: Vec<&Toggle> = members.iter().collect();
	ordered.sort_by(|a, b| a.key.cmp(&b.key));

	let canonical = ordered.iter().map(|t| member_line(t)).collect::<Vec<_>>().join(" ");

	let mut hasher = Sha256::new();
	hasher.update(canonical.as_bytes());
	hex::encode(hasher.finalize()).into()
}

fn member_line(toggle: &Toggle) -> String {
	let active_at = toggle.active_at.map(Timestamp::to_iso).unwrap_or_default();
	let disabled_at = toggle.disabled_at.map(Timestamp::to_iso).unwrap_or_default();
	let tags = toggle.tags.as_deref().map(|t| t.join(",")).unwrap_or_default();
	format!("{} {} {} {} {}", toggle.key, toggle.value, active_at, disabled_at, tags)
}


// vim: ts=4
