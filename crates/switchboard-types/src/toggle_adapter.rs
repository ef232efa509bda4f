use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

/// A stored feature toggle.
///
/// `key` is `<group-id>|<name>` where `group-id` is a canonical v4 UUID and
/// `name` is any non-pipe string (the empty string included). A bare UUID
/// names the implicit empty-named toggle of that group. The `secret` is owned
/// by the row but semantically shared across the whole group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
	pub key: Box<str>,
	/// Literal `"true"` or `"false"`, treated as opaque text
	pub value: Box<str>,
	pub active_at: Option<Timestamp>,
	pub disabled_at: Option<Timestamp>,
	pub secret: Option<Box<str>>,
	pub tags: Option<Box<[Box<str>]>>,
}

/// Secret-stripped view returned by every read and mutation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleView {
	pub key: Box<str>,
	pub value: Box<str>,
	#[serde(rename = "activeAt")]
	pub active_at: Option<Timestamp>,
	#[serde(rename = "disabledAt")]
	pub disabled_at: Option<Timestamp>,
	pub tags: Option<Box<[Box<str>]>>,
}

impl From<Toggle> for ToggleView {
	fn from(toggle: Toggle) -> Self {
		Self {
			key: toggle.key,
			value: toggle.value,
			active_at: toggle.active_at,
			disabled_at: toggle.disabled_at,
			tags: toggle.tags,
		}
	}
}

/// Data for a single row insert. The key must already carry its group prefix.
#[derive(Debug, Clone)]
pub struct CreateToggle {
	pub key: Box<str>,
	pub value: Box<str>,
	pub active_at: Option<Timestamp>,
	pub disabled_at: Option<Timestamp>,
	pub secret: Option<Box<str>>,
	pub tags: Option<Box<[Box<str>]>>,
}

/// Durable keyed storage for toggles.
///
/// Group-level operations take the group id as its canonical lowercase
/// textual form and cover every row whose key equals it or starts with it
/// followed by `|`. `list_group` orders by key ascending; that order is the
/// canonical one used for secret verification and the collection digest.
#[async_trait]
pub trait ToggleAdapter: Debug + Send + Sync {
	/// Insert exactly one row. A duplicate key fails with [`Error::Conflict`]
	/// and writes nothing.
	async fn create_toggle(&self, toggle: &CreateToggle) -> ClResult<Toggle>;

	/// Exact-key lookup
	async fn read_toggle(&self, key: &str) -> ClResult<Toggle>;

	/// All members of a group, ordered by key ascending. An empty vec means
	/// the group does not exist.
	async fn list_group(&self, group_id: &str) -> ClResult<Vec<Toggle>>;

	async fn update_value(&self, key: &str, value: &str) -> ClResult<Toggle>;
	async fn update_active_at(&self, key: &str, active_at: Timestamp) -> ClResult<Toggle>;
	async fn update_disabled_at(&self, key: &str, disabled_at: Timestamp) -> ClResult<Toggle>;

	/// Rewrite the secret of every group member in a single atomic batch.
	/// Returns the number of rows updated; partial application is never
	/// observable to concurrent readers.
	async fn update_group_secret(&self, group_id: &str, new_secret: &str) -> ClResult<u64>;

	/// Remove exactly the one matching row; never cascades to the group
	async fn delete_toggle(&self, key: &str) -> ClResult<()>;

	/// Scheduler rule: force `value = "true"` on every row whose `active_at`
	/// calendar date (UTC) is on or before `now`'s. Idempotent; never clears
	/// `active_at`. Returns the number of rows touched.
	async fn run_activation_pass(&self, now: Timestamp) -> ClResult<u64>;

	/// Scheduler rule: force `value = "false"` on every row whose
	/// `disabled_at` calendar date (UTC) is on or before `now`'s. Same
	/// granularity and idempotence as the activation rule.
	async fn run_deactivation_pass(&self, now: Timestamp) -> ClResult<u64>;
}

// vim: ts=4
