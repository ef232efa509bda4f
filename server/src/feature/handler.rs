//! Feature toggle HTTP handlers

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::core::{digest, extract::AppJson, group, secret};
use crate::prelude::*;
use switchboard_types::toggle_adapter::{CreateToggle, ToggleView};

/// Create request body. Field names follow the original wire format; the
/// lowercase spellings are accepted as aliases.
#[derive(Debug, Deserialize)]
pub struct CreateFeatureRequest {
	#[serde(rename = "Key", alias = "key")]
	pub key: String,
	#[serde(rename = "Value", alias = "value")]
	pub value: String,
	#[serde(rename = "Secret", alias = "secret", default)]
	pub secret: Option<String>,
	#[serde(rename = "ActiveAt", alias = "activeAt", default)]
	pub active_at: Option<Timestamp>,
	#[serde(rename = "DisabledAt", alias = "disabledAt", default)]
	pub disabled_at: Option<Timestamp>,
	#[serde(rename = "Tags", alias = "tags", default)]
	pub tags: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct CreateFeatureResponse {
	#[serde(flatten)]
	pub toggle: ToggleView,
	/// Present exactly once: when the group and its secret were freshly
	/// generated by this call
	#[serde(skip_serializing_if = "Option::is_none")]
	pub secret: Option<Box<str>>,
}

/// POST /features - Create a toggle, minting a group when the key carries no
/// group prefix
pub async fn create_feature(
	State(app): State<App>,
	AppJson(req): AppJson<CreateFeatureRequest>,
) -> ClResult<(StatusCode, Json<CreateFeatureResponse>)> {
	if req.value != "true" && req.value != "false" {
		return Err(Error::ValidationError("Value must be \"true\" or \"false\"".into()));
	}

	let adapter = app.toggle_adapter.as_ref();

	let (key, stored_secret, fresh_secret) = match group::group_id_of(&req.key) {
		Some(group_id) => {
			// Joining an existing group: gated by the shared secret, which is
			// also what the new row carries
			let shared =
				secret::authorize_group(adapter, group_id, req.secret.as_deref().unwrap_or(""))
					.await?;
			(req.key, shared, None)
		}
		None => {
			let group_id = group::allocate(adapter).await?;
			let fresh = secret::generate();
			(format!("{}|{}", group_id, req.key), fresh.clone(), Some(fresh))
		}
	};

	let toggle = adapter
		.create_toggle(&CreateToggle {
			key: key.into(),
			value: req.value.into(),
			active_at: req.active_at,
			disabled_at: req.disabled_at,
			secret: Some(stored_secret),
			tags: req.tags.map(|tags| tags.into_iter().map(Into::into).collect()),
		})
		.await?;

	info!("Created feature toggle {}", toggle.key);

	Ok((
		StatusCode::CREATED,
		Json(CreateFeatureResponse { toggle: toggle.into(), secret: fresh_secret }),
	))
}

#[derive(Debug, Deserialize)]
pub struct ListFeaturesQuery {
	/// Comma-separated tags; listed members must carry every one of them
	pub tags: Option<String>,
}

/// GET /features/{key} - Read one toggle, or list a whole group when the key
/// is a bare group id
pub async fn get_feature(
	State(app): State<App>,
	Path(key): Path<String>,
	Query(query): Query<ListFeaturesQuery>,
) -> ClResult<Response> {
	let adapter = app.toggle_adapter.as_ref();

	match adapter.read_toggle(&key).await {
		Ok(toggle) => return Ok(Json(ToggleView::from(toggle)).into_response()),
		Err(Error::NotFound) => (),
		Err(err) => return Err(err),
	}

	// No exact match: a bare group id names the whole group
	let group_id = match (key.contains('|'), group::group_id_of(&key)) {
		(false, Some(group_id)) => group_id,
		_ => return Err(Error::NotFound),
	};

	let mut toggles = adapter.list_group(&group_id.to_string()).await?;
	if let Some(ref tag_filter) = query.tags {
		let required: Vec<&str> =
			tag_filter.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();
		toggles.retain(|toggle| {
			let tags = toggle.tags.as_deref().unwrap_or(&[]);
			required.iter().all(|r| tags.iter().any(|t| t.as_ref() == *r))
		});
	}
	if toggles.is_empty() {
		return Err(Error::NotFound);
	}

	debug!("Listing {} toggles of group {}", toggles.len(), group_id);
	let toggles: Vec<ToggleView> = toggles.into_iter().map(Into::into).collect();
	Ok(Json(json!({ "toggles": toggles })).into_response())
}

/// PUT /features/activate/{key}/{secret}
pub async fn activate_feature(
	State(app): State<App>,
	Path((key, presented)): Path<(String, String)>,
) -> ClResult<Json<ToggleView>> {
	set_value(&app, &key, &presented, "true").await
}

/// PUT /features/deactivate/{key}/{secret}
pub async fn deactivate_feature(
	State(app): State<App>,
	Path((key, presented)): Path<(String, String)>,
) -> ClResult<Json<ToggleView>> {
	set_value(&app, &key, &presented, "false").await
}

async fn set_value(app: &App, key: &str, presented: &str, value: &str) -> ClResult<Json<ToggleView>> {
	let adapter = app.toggle_adapter.as_ref();
	secret::authorize(adapter, key, presented).await?;

	let toggle = adapter.update_value(key, value).await?;
	info!("Set feature toggle {} to {}", key, value);
	Ok(Json(toggle.into()))
}

/// PUT /features/activateAt/{key}/{date}/{secret}
pub async fn activate_feature_at(
	State(app): State<App>,
	Path((key, date, presented)): Path<(String, String, String)>,
) -> ClResult<Json<ToggleView>> {
	set_schedule(&app, &key, &date, &presented, ScheduleField::ActiveAt).await
}

/// PUT /features/deactivateAt/{key}/{date}/{secret}
pub async fn deactivate_feature_at(
	State(app): State<App>,
	Path((key, date, presented)): Path<(String, String, String)>,
) -> ClResult<Json<ToggleView>> {
	set_schedule(&app, &key, &date, &presented, ScheduleField::DisabledAt).await
}

enum ScheduleField {
	ActiveAt,
	DisabledAt,
}

/// Only the schedule column changes here; the scheduler pass flips `value`
/// later when the date arrives.
async fn set_schedule(
	app: &App,
	key: &str,
	date: &str,
	presented: &str,
	field: ScheduleField,
) -> ClResult<Json<ToggleView>> {
	let adapter = app.toggle_adapter.as_ref();
	secret::authorize(adapter, key, presented).await?;

	let at = Timestamp::from_rfc3339(date)?;
	let toggle = match field {
		ScheduleField::ActiveAt => adapter.update_active_at(key, at).await?,
		ScheduleField::DisabledAt => adapter.update_disabled_at(key, at).await?,
	};
	info!("Scheduled feature toggle {} for {}", key, at);
	Ok(Json(toggle.into()))
}

/// DELETE /features/{key}/{secret} - Remove one toggle; the rest of the
/// group stays
pub async fn delete_feature(
	State(app): State<App>,
	Path((key, presented)): Path<(String, String)>,
) -> ClResult<Json<serde_json::Value>> {
	let adapter = app.toggle_adapter.as_ref();
	secret::authorize(adapter, &key, &presented).await?;

	adapter.delete_toggle(&key).await?;
	info!("Deleted feature toggle {}", key);
	Ok(Json(json!({ "message": "Feature toggle deleted" })))
}

/// GET /collectionHash/{uuid} - Canonical digest over a group's toggles
pub async fn get_collection_hash(
	State(app): State<App>,
	Path(uuid): Path<String>,
) -> ClResult<Json<serde_json::Value>> {
	let group_id = Uuid::parse_str(&uuid).map_err(|_| Error::NotFound)?;

	let members = app.toggle_adapter.list_group(&group_id.to_string()).await?;
	if members.is_empty() {
		return Err(Error::NotFound);
	}

	let hash = digest::collection_digest(&members);
	Ok(Json(json!({ "collectionHash": hash })))
}

// vim: ts=4
