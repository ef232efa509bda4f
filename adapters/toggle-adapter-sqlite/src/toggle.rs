//! Toggle row management
//!
//! All group-scoped statements match `key = <group-id>` as well as
//! `key LIKE <group-id> || '|%'`, so the implicit empty-named toggle (a bare
//! group id) is always a member of its group. Group ids are canonical UUID
//! text, so the LIKE pattern never contains wildcard characters.

use sqlx::SqlitePool;

use switchboard::prelude::*;
use switchboard::toggle_adapter::{CreateToggle, Toggle};

use crate::utils::{collect_res, inspect, map_res, tags_to_json, toggle_from_row};

pub(crate) async fn create(db: &SqlitePool, toggle: &CreateToggle) -> ClResult<Toggle> {
	let res = sqlx::query(
		"INSERT INTO feature_toggles (key, value, active_at, disabled_at, secret, tags)
		VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
	)
	.bind(toggle.key.as_ref())
	.bind(toggle.value.as_ref())
	.bind(toggle.active_at.map(|ts| ts.0))
	.bind(toggle.disabled_at.map(|ts| ts.0))
	.bind(toggle.secret.as_deref())
	.bind(tags_to_json(toggle.tags.as_deref()))
	.execute(db)
	.await;

	match res {
		Ok(_) => read(db, &toggle.key).await,
		Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Err(Error::Conflict),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

pub(crate) async fn read(db: &SqlitePool, key: &str) -> ClResult<Toggle> {
	let row = sqlx::query(
		"SELECT key, value, active_at, disabled_at, secret, tags
		FROM feature_toggles WHERE key = ?1",
	)
	.bind(key)
	.fetch_one(db)
	.await;

	map_res(row, |row| toggle_from_row(&row))
}

/// Every member of a group, ordered by key ascending. The first row of this
/// order is the group's canonical representative.
pub(crate) async fn list_group(db: &SqlitePool, group_id: &str) -> ClResult<Vec<Toggle>> {
	let rows = sqlx::query(
		"SELECT key, value, active_at, disabled_at, secret, tags
		FROM feature_toggles WHERE key = ?1 OR key LIKE ?1 || '|%' ORDER BY key",
	)
	.bind(group_id)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	collect_res(rows.iter().map(toggle_from_row))
}

pub(crate) async fn update_value(db: &SqlitePool, key: &str, value: &str) -> ClResult<Toggle> {
	let res = sqlx::query("UPDATE feature_toggles SET value = ?2 WHERE key = ?1")
		.bind(key)
		.bind(value)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	read(db, key).await
}

/// Set one of the schedule columns without touching `value`; only the
/// scheduler pass flips values.
pub(crate) async fn update_schedule(
	db: &SqlitePool,
	key: &str,
	column: &str,
	at: Timestamp,
) -> ClResult<Toggle> {
	// `column` is a compile-time constant of the adapter, never caller input
	let sql = format!("UPDATE feature_toggles SET {} = ?2 WHERE key = ?1", column);
	let res = sqlx::query(&sql)
		.bind(key)
		.bind(at.0)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	read(db, key).await
}

/// Rewrite every member's secret inside one transaction. Readers either see
/// the old secret on all rows or the new one on all rows, never a mix.
pub(crate) async fn update_group_secret(
	db: &SqlitePool,
	group_id: &str,
	new_secret: &str,
) -> ClResult<u64> {
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	let res = sqlx::query(
		"UPDATE feature_toggles SET secret = ?2 WHERE key = ?1 OR key LIKE ?1 || '|%'",
	)
	.bind(group_id)
	.bind(new_secret)
	.execute(&mut *tx)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	Ok(res.rows_affected())
}

pub(crate) async fn delete(db: &SqlitePool, key: &str) -> ClResult<()> {
	let res = sqlx::query("DELETE FROM feature_toggles WHERE key = ?1")
		.bind(key)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

/// One scheduler rule as a bulk update. Calendar-date granularity: a schedule
/// timestamp is due once its UTC date is on or before the date of `now`. The
/// schedule column is never cleared, so repeated passes re-apply the same
/// value.
pub(crate) async fn schedule_pass(
	db: &SqlitePool,
	column: &str,
	value: &str,
	now: Timestamp,
) -> ClResult<u64> {
	let sql = format!(
		"UPDATE feature_toggles SET value = ?2
		WHERE {col} IS NOT NULL AND date({col}, 'unixepoch') <= date(?1, 'unixepoch')",
		col = column
	);
	let res = sqlx::query(&sql)
		.bind(now.0)
		.bind(value)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(res.rows_affected())
}

// vim: ts=4
