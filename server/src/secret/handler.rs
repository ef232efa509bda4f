//! Shared-secret rotation endpoint

use axum::{
	extract::{Path, State},
	Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::core::secret::rotate;
use crate::prelude::*;

/// PUT /secret/update/{uuid}/{oldsecret}/{newsecret} - Rotate a group's
/// shared secret. The old secret authorizes; the new one must be URL-safe.
pub async fn update_secret(
	State(app): State<App>,
	Path((uuid, old_secret, new_secret)): Path<(String, String, String)>,
) -> ClResult<Json<serde_json::Value>> {
	let group_id = Uuid::parse_str(&uuid).map_err(|_| Error::NotFound)?;

	rotate(app.toggle_adapter.as_ref(), group_id, &old_secret, &new_secret).await?;

	Ok(Json(json!({ "key": uuid })))
}

// vim: ts=4
