//! Secret authority behavior against a real store: verification and rotation

use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use switchboard::core::{group, secret};
use switchboard::toggle_adapter::{CreateToggle, ToggleAdapter};
use switchboard_toggle_adapter_sqlite::ToggleAdapterSqlite;

const GROUP: &str = "0b879071-1b7c-4b3c-b5f6-ef5e7267d259";

async fn seeded_adapter(secret: &str) -> (Arc<ToggleAdapterSqlite>, Vec<String>, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = Arc::new(
		ToggleAdapterSqlite::new(temp_dir.path().join("toggles.db"))
			.await
			.expect("Failed to create adapter"),
	);

	let keys = vec![format!("{}|one", GROUP), format!("{}|two", GROUP), GROUP.to_string()];
	for key in &keys {
		adapter
			.create_toggle(&CreateToggle {
				key: key.as_str().into(),
				value: "true".into(),
				active_at: None,
				disabled_at: None,
				secret: Some(secret.into()),
				tags: None,
			})
			.await
			.expect("seed toggle");
	}

	(adapter, keys, temp_dir)
}

#[tokio::test]
async fn test_verify_matches_only_the_shared_secret() {
	let (adapter, keys, _temp) = seeded_adapter("original").await;

	for key in &keys {
		assert!(secret::verify(adapter.as_ref(), key, "original").await.unwrap());
		assert!(!secret::verify(adapter.as_ref(), key, "wrong").await.unwrap());
		assert!(!secret::verify(adapter.as_ref(), key, "").await.unwrap());
	}
}

#[tokio::test]
async fn test_verify_is_false_for_empty_or_invalid_groups() {
	let (adapter, _, _temp) = seeded_adapter("original").await;

	// Unknown group, valid prefix
	assert!(!secret::verify(
		adapter.as_ref(),
		"3f8dd02e-91b0-4b5e-8c55-18b52bc195f3|nothing",
		"original"
	)
	.await
	.unwrap());

	// No group prefix at all
	assert!(!secret::verify(adapter.as_ref(), "plainname", "original").await.unwrap());
}

#[tokio::test]
async fn test_rotation_switches_every_member() {
	let (adapter, keys, _temp) = seeded_adapter("original").await;
	let group_id = Uuid::parse_str(GROUP).unwrap();

	secret::rotate(adapter.as_ref(), group_id, "original", "fresh").await.unwrap();

	for key in &keys {
		assert!(!secret::verify(adapter.as_ref(), key, "original").await.unwrap());
		assert!(secret::verify(adapter.as_ref(), key, "fresh").await.unwrap());
	}
}

#[tokio::test]
async fn test_rotation_requires_the_old_secret() {
	let (adapter, keys, _temp) = seeded_adapter("original").await;
	let group_id = Uuid::parse_str(GROUP).unwrap();

	let err = secret::rotate(adapter.as_ref(), group_id, "wrong", "fresh").await.unwrap_err();
	assert!(matches!(err, switchboard::error::Error::PermissionDenied));

	// Nothing changed
	for key in &keys {
		assert!(secret::verify(adapter.as_ref(), key, "original").await.unwrap());
	}
}

#[tokio::test]
async fn test_rotation_rejects_unsafe_secret_before_writing() {
	let (adapter, keys, _temp) = seeded_adapter("original").await;
	let group_id = Uuid::parse_str(GROUP).unwrap();

	let err = secret::rotate(adapter.as_ref(), group_id, "original", "not url safe")
		.await
		.unwrap_err();
	assert!(matches!(err, switchboard::error::Error::NotAcceptable(_)));

	for key in &keys {
		assert!(secret::verify(adapter.as_ref(), key, "original").await.unwrap());
	}
}

#[tokio::test]
async fn test_rotation_of_empty_group_is_not_found() {
	let (adapter, _, _temp) = seeded_adapter("original").await;
	let unknown = Uuid::parse_str("3f8dd02e-91b0-4b5e-8c55-18b52bc195f3").unwrap();

	let err = secret::rotate(adapter.as_ref(), unknown, "original", "fresh").await.unwrap_err();
	assert!(matches!(err, switchboard::error::Error::NotFound));
}

#[tokio::test]
async fn test_allocate_returns_unused_group_id() {
	let (adapter, _, _temp) = seeded_adapter("original").await;

	let group_id = group::allocate(adapter.as_ref()).await.unwrap();
	assert!(adapter.list_group(&group_id.to_string()).await.unwrap().is_empty());
}

// vim: ts=4
