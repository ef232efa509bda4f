//! SQLite-backed implementation of the Switchboard toggle store.
//!
//! One table, keyed by the toggle identity. Group operations are prefix
//! scans over the key column; secret rotation runs as a single transaction
//! so readers never observe a mixed-secret group.

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use switchboard::prelude::*;
use switchboard::toggle_adapter::{self, CreateToggle, Toggle};

mod schema;
mod toggle;
mod utils;

use schema::init_db;

#[derive(Debug)]
pub struct ToggleAdapterSqlite {
	db: SqlitePool,
}

impl ToggleAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DB connect: {:#?}", err))
			.or(Err(Error::DbError))?;

		init_db(&db)
			.await
			.inspect_err(|err| error!("DB init: {:#?}", err))
			.or(Err(Error::DbError))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl toggle_adapter::ToggleAdapter for ToggleAdapterSqlite {
	async fn create_toggle(&self, toggle: &CreateToggle) -> ClResult<Toggle> {
		toggle::create(&self.db, toggle).await
	}

	async fn read_toggle(&self, key: &str) -> ClResult<Toggle> {
		toggle::read(&self.db, key).await
	}

	async fn list_group(&self, group_id: &str) -> ClResult<Vec<Toggle>> {
		toggle::list_group(&self.db, group_id).await
	}

	async fn update_value(&self, key: &str, value: &str) -> ClResult<Toggle> {
		toggle::update_value(&self.db, key, value).await
	}

	async fn update_active_at(&self, key: &str, active_at: Timestamp) -> ClResult<Toggle> {
		toggle::update_schedule(&self.db, key, "active_at", active_at).await
	}

	async fn update_disabled_at(&self, key: &str, disabled_at: Timestamp) -> ClResult<Toggle> {
		toggle::update_schedule(&self.db, key, "disabled_at", disabled_at).await
	}

	async fn update_group_secret(&self, group_id: &str, new_secret: &str) -> ClResult<u64> {
		toggle::update_group_secret(&self.db, group_id, new_secret).await
	}

	async fn delete_toggle(&self, key: &str) -> ClResult<()> {
		toggle::delete(&self.db, key).await
	}

	async fn run_activation_pass(&self, now: Timestamp) -> ClResult<u64> {
		toggle::schedule_pass(&self.db, "active_at", "true", now).await
	}

	async fn run_deactivation_pass(&self, now: Timestamp) -> ClResult<u64> {
		toggle::schedule_pass(&self.db, "disabled_at", "false", now).await
	}
}

// vim: ts=4
