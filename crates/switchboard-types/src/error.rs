use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// No matching row, or an empty group where one was required
	NotFound,
	/// The group exists but the presented secret does not match
	PermissionDenied,
	/// Malformed body, unparseable date, or an invalid field value
	ValidationError(Box<str>),
	/// A new secret that fails the URL-safety check on rotation
	NotAcceptable(Box<str>),
	/// Unique-key violation on create
	Conflict,
	/// Storage transport or SQL failure
	DbError,
	Internal(Box<str>),

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "invalid secret"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::NotAcceptable(msg) => write!(f, "not acceptable: {}", msg),
			Error::Conflict => write!(f, "conflict"),
			Error::DbError => write!(f, "database error"),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

/// Every user-visible failure is a JSON object with a single `error` string.
/// Internal detail (SQL errors, io errors) never leaves the process.
impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let (status, message) = match self {
			Error::NotFound => (StatusCode::NOT_FOUND, "Feature not found".to_string()),
			Error::PermissionDenied => (StatusCode::UNAUTHORIZED, "Invalid secret".to_string()),
			Error::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.into_string()),
			Error::NotAcceptable(msg) => (StatusCode::NOT_ACCEPTABLE, msg.into_string()),
			Error::Conflict => (StatusCode::CONFLICT, "Feature toggle already exists".to_string()),
			Error::DbError => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()),
			Error::Internal(_) | Error::Io(_) => {
				(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
			}
		};
		(status, Json(json!({ "error": message }))).into_response()
	}
}


// vim: ts=4
