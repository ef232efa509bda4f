//! HTTP scenario tests against the real router, backed by a temporary
//! SQLite store

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use switchboard::{routes, AppBuilder};
use switchboard_toggle_adapter_sqlite::ToggleAdapterSqlite;

async fn test_app() -> (Router, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");

	let adapter = ToggleAdapterSqlite::new(temp_dir.path().join("toggles.db"))
		.await
		.expect("Failed to create adapter");
	let app = AppBuilder::new()
		.toggle_adapter(Arc::new(adapter))
		.build()
		.expect("Failed to build app state");

	(routes::init(app), temp_dir)
}

/// Toggle keys carry a `|`, which must be percent-encoded in a request URI
fn encode(segment: &str) -> String {
	segment.replace('|', "%7C")
}

async fn request(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
	let builder = Request::builder().method(method).uri(uri);
	let request = match body {
		Some(value) => builder
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(value.to_string()))
			.expect("request"),
		None => builder.body(Body::empty()).expect("request"),
	};

	let response = router.clone().oneshot(request).await.expect("response");
	let status = response.status();
	let bytes = response.into_body().collect().await.expect("body").to_bytes();
	let body = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).expect("json body")
	};
	(status, body)
}

/// Create a fresh group with one toggle; returns (key, group_id, secret)
async fn create_group(router: &Router, name: &str, value: &str) -> (String, String, String) {
	let (status, body) = request(
		router,
		Method::POST,
		"/features",
		Some(json!({ "Key": name, "Value": value })),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED);

	let key = body["key"].as_str().expect("key").to_string();
	let group_id = key.split('|').next().expect("group id").to_string();
	let secret = body["secret"].as_str().expect("secret").to_string();
	(key, group_id, secret)
}

#[tokio::test]
async fn test_create_mints_group_and_secret() {
	let (router, _temp) = test_app().await;

	let (status, body) = request(
		&router,
		Method::POST,
		"/features",
		Some(json!({ "Key": "myKey", "Value": "true" })),
	)
	.await;

	assert_eq!(status, StatusCode::CREATED);

	// key matches ^[0-9a-f-]{36}\|myKey$
	let key = body["key"].as_str().expect("key");
	let (prefix, name) = key.split_once('|').expect("group prefix");
	assert_eq!(prefix.len(), 36);
	assert!(prefix.chars().all(|c| c.is_ascii_hexdigit() || c == '-'));
	assert!(!prefix.chars().any(|c| c.is_ascii_uppercase()));
	assert_eq!(name, "myKey");

	assert_eq!(body["value"], "true");
	assert!(body["secret"].as_str().expect("secret").len() >= 32);
}

#[tokio::test]
async fn test_member_create_does_not_echo_secret() {
	let (router, _temp) = test_app().await;
	let (_, group_id, secret) = create_group(&router, "myKey", "true").await;

	let (status, body) = request(
		&router,
		Method::POST,
		"/features",
		Some(json!({ "Key": format!("{}|other", group_id), "Value": "false", "Secret": secret })),
	)
	.await;

	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["key"], format!("{}|other", group_id));
	assert!(body.get("secret").is_none(), "secret must only be echoed when freshly generated");
}

#[tokio::test]
async fn test_member_create_with_wrong_secret_is_unauthorized() {
	let (router, _temp) = test_app().await;
	let (_, group_id, _) = create_group(&router, "myKey", "true").await;

	let (status, body) = request(
		&router,
		Method::POST,
		"/features",
		Some(json!({ "Key": format!("{}|other", group_id), "Value": "false", "Secret": "wrong" })),
	)
	.await;

	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body, json!({ "error": "Invalid secret" }));
}

#[tokio::test]
async fn test_member_create_into_unknown_group_is_not_found() {
	let (router, _temp) = test_app().await;

	let (status, _) = request(
		&router,
		Method::POST,
		"/features",
		Some(json!({
			"Key": "3f8dd02e-91b0-4b5e-8c55-18b52bc195f3|orphan",
			"Value": "true",
			"Secret": "anything"
		})),
	)
	.await;

	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_rejects_non_binary_value() {
	let (router, _temp) = test_app().await;

	let (status, body) = request(
		&router,
		Method::POST,
		"/features",
		Some(json!({ "Key": "myKey", "Value": "maybe" })),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_duplicate_create_is_a_conflict() {
	let (router, _temp) = test_app().await;
	let (key, group_id, secret) = create_group(&router, "dup", "true").await;
	assert_eq!(key, format!("{}|dup", group_id));

	let (status, _) = request(
		&router,
		Method::POST,
		"/features",
		Some(json!({ "Key": key, "Value": "false", "Secret": secret })),
	)
	.await;

	assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_missing_feature_is_not_found() {
	let (router, _temp) = test_app().await;

	let (status, body) = request(&router, Method::GET, "/features/definitely-missing", None).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body, json!({ "error": "Feature not found" }));
}

#[tokio::test]
async fn test_get_single_toggle_strips_secret() {
	let (router, _temp) = test_app().await;
	let (key, _, _) = create_group(&router, "visible", "true").await;

	let (status, body) =
		request(&router, Method::GET, &format!("/features/{}", encode(&key)), None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["key"], key);
	assert_eq!(body["value"], "true");
	assert!(body.get("secret").is_none());
}

#[tokio::test]
async fn test_get_bare_group_id_lists_members() {
	let (router, _temp) = test_app().await;
	let (_, group_id, secret) = create_group(&router, "one", "true").await;
	request(
		&router,
		Method::POST,
		"/features",
		Some(json!({ "Key": format!("{}|two", group_id), "Value": "false", "Secret": secret })),
	)
	.await;

	let (status, body) =
		request(&router, Method::GET, &format!("/features/{}", group_id), None).await;

	assert_eq!(status, StatusCode::OK);
	let toggles = body["toggles"].as_array().expect("toggles array");
	assert_eq!(toggles.len(), 2);
	for toggle in toggles {
		assert!(toggle.get("secret").is_none());
	}
}

#[tokio::test]
async fn test_group_listing_filters_by_tag_intersection() {
	let (router, _temp) = test_app().await;
	let (_, group_id, secret) = create_group(&router, "plain", "true").await;
	request(
		&router,
		Method::POST,
		"/features",
		Some(json!({
			"Key": format!("{}|tagged", group_id),
			"Value": "true",
			"Secret": secret,
			"Tags": ["web", "beta"]
		})),
	)
	.await;

	let (status, body) =
		request(&router, Method::GET, &format!("/features/{}?tags=web,beta", group_id), None).await;
	assert_eq!(status, StatusCode::OK);
	let toggles = body["toggles"].as_array().expect("toggles array");
	assert_eq!(toggles.len(), 1);
	assert_eq!(toggles[0]["key"], format!("{}|tagged", group_id));

	// A tag nothing carries empties the listing, which is a not-found
	let (status, _) =
		request(&router, Method::GET, &format!("/features/{}?tags=mobile", group_id), None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_activate_and_deactivate() {
	let (router, _temp) = test_app().await;
	let (key, _, secret) = create_group(&router, "switch", "false").await;

	let (status, body) = request(
		&router,
		Method::PUT,
		&format!("/features/activate/{}/{}", encode(&key), secret),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["value"], "true");

	let (status, body) = request(
		&router,
		Method::PUT,
		&format!("/features/deactivate/{}/{}", encode(&key), secret),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["value"], "false");
}

#[tokio::test]
async fn test_activate_with_wrong_secret_is_unauthorized() {
	let (router, _temp) = test_app().await;
	let (key, _, _) = create_group(&router, "locked", "false").await;

	let (status, body) = request(
		&router,
		Method::PUT,
		&format!("/features/activate/{}/wrong", encode(&key)),
		None,
	)
	.await;

	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body, json!({ "error": "Invalid secret" }));
}

#[tokio::test]
async fn test_activate_at_sets_schedule_without_flipping_value() {
	let (router, _temp) = test_app().await;
	let (key, _, secret) = create_group(&router, "later", "false").await;

	let (status, body) = request(
		&router,
		Method::PUT,
		&format!("/features/activateAt/{}/2030-01-01T00:00:00Z/{}", encode(&key), secret),
		None,
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["value"], "false");
	assert_eq!(body["activeAt"], "2030-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_activate_at_rejects_bad_date() {
	let (router, _temp) = test_app().await;
	let (key, _, secret) = create_group(&router, "later", "false").await;

	let (status, body) = request(
		&router,
		Method::PUT,
		&format!("/features/activateAt/{}/not-a-date/{}", encode(&key), secret),
		None,
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_delete_feature() {
	let (router, _temp) = test_app().await;
	let (key, _, secret) = create_group(&router, "doomed", "true").await;

	let (status, body) = request(
		&router,
		Method::DELETE,
		&format!("/features/{}/{}", encode(&key), secret),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({ "message": "Feature toggle deleted" }));

	let (status, _) =
		request(&router, Method::GET, &format!("/features/{}", encode(&key)), None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_collection_hash_is_deterministic_hex() {
	let (router, _temp) = test_app().await;
	let (_, group_id, secret) = create_group(&router, "one", "true").await;
	request(
		&router,
		Method::POST,
		"/features",
		Some(json!({ "Key": format!("{}|two", group_id), "Value": "false", "Secret": secret })),
	)
	.await;

	let (status, first) =
		request(&router, Method::GET, &format!("/collectionHash/{}", group_id), None).await;
	assert_eq!(status, StatusCode::OK);

	let hash = first["collectionHash"].as_str().expect("hash");
	assert_eq!(hash.len(), 64);
	assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

	let (_, second) =
		request(&router, Method::GET, &format!("/collectionHash/{}", group_id), None).await;
	assert_eq!(first, second);
}

#[tokio::test]
async fn test_collection_hash_of_unknown_group_is_not_found() {
	let (router, _temp) = test_app().await;

	let (status, _) = request(
		&router,
		Method::GET,
		"/collectionHash/3f8dd02e-91b0-4b5e-8c55-18b52bc195f3",
		None,
	)
	.await;

	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_secret_rotation_invalidates_old_secret() {
	let (router, _temp) = test_app().await;
	let (key, group_id, old_secret) = create_group(&router, "guarded", "false").await;

	let (status, body) = request(
		&router,
		Method::PUT,
		&format!("/secret/update/{}/{}/newsecret123", group_id, old_secret),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({ "key": group_id }));

	// Old secret is dead for every member
	let (status, _) = request(
		&router,
		Method::PUT,
		&format!("/features/activate/{}/{}", encode(&key), old_secret),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);

	// New secret works
	let (status, body) = request(
		&router,
		Method::PUT,
		&format!("/features/activate/{}/newsecret123", encode(&key)),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["value"], "true");
}

#[tokio::test]
async fn test_secret_rotation_with_wrong_old_secret_is_unauthorized() {
	let (router, _temp) = test_app().await;
	let (_, group_id, _) = create_group(&router, "guarded", "false").await;

	let (status, body) = request(
		&router,
		Method::PUT,
		&format!("/secret/update/{}/wrong/newsecret123", group_id),
		None,
	)
	.await;

	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body, json!({ "error": "Invalid secret" }));
}

#[tokio::test]
async fn test_secret_rotation_rejects_non_url_safe_secret() {
	let (router, _temp) = test_app().await;
	let (_, group_id, old_secret) = create_group(&router, "guarded", "false").await;

	let (status, _) = request(
		&router,
		Method::PUT,
		&format!("/secret/update/{}/{}/bad%20secret", group_id, old_secret),
		None,
	)
	.await;

	assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
}

// vim: ts=4
