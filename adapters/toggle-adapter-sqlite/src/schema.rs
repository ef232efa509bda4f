//! Database schema initialization

use sqlx::SqlitePool;

/// Create the toggle table and its unique key index if missing
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS feature_toggles (
		f_id integer NOT NULL,
		key text NOT NULL,
		value text NOT NULL,
		active_at datetime,
		disabled_at datetime,
		secret text,
		tags json,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(f_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_feature_toggles_key ON feature_toggles(key)")
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;
	Ok(())
}

// vim: ts=4
