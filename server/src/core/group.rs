//! Group identity: the prefix predicate and collision-checked id allocation

use uuid::Uuid;

use crate::prelude::*;
use switchboard_types::toggle_adapter::ToggleAdapter;

/// The group id of a key: the text before the first `|` (or the whole key
/// when there is none), if it parses as a UUID. A bare UUID names the
/// implicit empty-named toggle of its own group.
pub fn group_id_of(key: &str) -> Option<Uuid> {
	let prefix = key.split('|').next().unwrap_or(key);
	Uuid::parse_str(prefix).ok()
}

pub fn has_group_prefix(key: &str) -> bool {
	group_id_of(key).is_some()
}

/// Mint a group id no existing toggle uses. Re-rolls on collision without
/// bound; a store failure during the existence check propagates rather than
/// letting the caller assume uniqueness.
pub async fn allocate(adapter: &dyn ToggleAdapter) -> ClResult<Uuid> {
	loop {
		let group_id = Uuid::new_v4();
		if adapter.list_group(&group_id.to_string()).await?.is_empty() {
			return Ok(group_id);
		}
		debug!("Group id {} already taken, re-rolling", group_id);
	}
}


// vim: ts=4
