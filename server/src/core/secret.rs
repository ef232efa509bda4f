//! Shared-secret authority: generation, URL-safety, verification, rotation
//!
//! Every mutation of a group is gated by its shared secret. The group has no
//! row of its own, so "the group's secret" means the secret of its canonical
//! representative: the member with the lexicographically smallest key.

use uuid::Uuid;

use crate::core::group;
use crate::prelude::*;
use switchboard_types::toggle_adapter::ToggleAdapter;

/// Three v4 UUIDs back to back: 108 characters from the URL-safe UUID
/// alphabet, well over 128 bits of entropy.
pub fn generate() -> Box<str> {
	format!("{}{}{}", Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()).into()
}

/// A secret must be usable as a URL path segment without escaping:
/// `https://example.com/<secret>` has to parse as a request URI. The empty
/// string qualifies.
pub fn is_url_safe(secret: &str) -> bool {
	format!("https://example.com/{}", secret).parse::<axum::http::Uri>().is_ok()
}

/// The group's current shared secret, or `None` when the group has no
/// members. A representative with a NULL secret counts as the empty string.
pub async fn group_secret(
	adapter: &dyn ToggleAdapter,
	group_id: Uuid,
) -> ClResult<Option<Box<str>>> {
	let members = adapter.list_group(&group_id.to_string()).await?;
	Ok(members.into_iter().next().map(|t| t.secret.unwrap_or_default()))
}

/// True iff the group named by `key`'s prefix exists and `presented` equals
/// its shared secret. An empty or unknown group is `false`, never an error;
/// only store transport failures propagate.
pub async fn verify(adapter: &dyn ToggleAdapter, key: &str, presented: &str) -> ClResult<bool> {
	let Some(group_id) = group::group_id_of(key) else {
		return Ok(false);
	};
	match group_secret(adapter, group_id).await? {
		Some(secret) => Ok(secret.as_ref() == presented),
		None => Ok(false),
	}
}

/// Gate for group mutations: returns the shared secret on success so callers
/// can stamp it onto new rows. An empty group is NotFound; a mismatch is
/// PermissionDenied. Decided before any mutation is attempted.
pub async fn authorize_group(
	adapter: &dyn ToggleAdapter,
	group_id: Uuid,
	presented: &str,
) -> ClResult<Box<str>> {
	match group_secret(adapter, group_id).await? {
		None => Err(Error::NotFound),
		Some(secret) if secret.as_ref() == presented => Ok(secret),
		Some(_) => {
			warn!("Invalid secret presented for group {}", group_id);
			Err(Error::PermissionDenied)
		}
	}
}

/// Like [`authorize_group`], keyed by a toggle identity
pub async fn authorize(adapter: &dyn ToggleAdapter, key: &str, presented: &str) -> ClResult<()> {
	let group_id = group::group_id_of(key).ok_or(Error::NotFound)?;
	authorize_group(adapter, group_id, presented).await?;
	Ok(())
}

/// Rotate a group's shared secret: verify the old one, check the new one for
/// URL-safety, then rewrite every member in one atomic batch. Concurrent
/// readers never observe a mixed-secret group.
pub async fn rotate(
	adapter: &dyn ToggleAdapter,
	group_id: Uuid,
	old_secret: &str,
	new_secret: &str,
) -> ClResult<()> {
	authorize_group(adapter, group_id, old_secret).await?;

	if !is_url_safe(new_secret) {
		return Err(Error::NotAcceptable(
			"New secret is not URL parseable, aborting operation".into(),
		));
	}

	let updated = adapter.update_group_secret(&group_id.to_string(), new_secret).await?;
	if updated == 0 {
		return Err(Error::NotFound);
	}
	info!("Rotated secret of group {} ({} toggles)", group_id, updated);
	Ok(())
}


// vim: ts=4
