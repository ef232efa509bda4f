//! Shared helpers: error mapping and row decoding

use sqlx::{sqlite::SqliteRow, Row};

use switchboard::prelude::*;
use switchboard::toggle_adapter::Toggle;

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map a single-row query result, translating SQL errors to ClResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Collect row-mapping results, translating SQL errors to ClResult
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>>,
) -> ClResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

/// Decode one `feature_toggles` row. Tags are stored as a JSON array text
/// column; an unreadable value decodes as no tags rather than failing the row.
pub(crate) fn toggle_from_row(row: &SqliteRow) -> Result<Toggle, sqlx::Error> {
	let tags: Option<Box<str>> = row.try_get("tags")?;
	let tags = tags.and_then(|t| serde_json::from_str::<Box<[Box<str>]>>(&t).ok());
	Ok(Toggle {
		key: row.try_get("key")?,
		value: row.try_get("value")?,
		active_at: row.try_get::<Option<i64>, _>("active_at")?.map(Timestamp),
		disabled_at: row.try_get::<Option<i64>, _>("disabled_at")?.map(Timestamp),
		secret: row.try_get("secret")?,
		tags,
	})
}

/// Encode tags for the JSON text column
pub(crate) fn tags_to_json(tags: Option<&[Box<str>]>) -> Option<String> {
	tags.map(|t| serde_json::to_string(t).unwrap_or_else(|_| "[]".to_string()))
}

// vim: ts=4
