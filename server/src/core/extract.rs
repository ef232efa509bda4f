//! Request extractors

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::prelude::*;

/// JSON body extractor whose rejection uses the API's `{"error": ...}` shape
/// instead of axum's plain-text default
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
	T: DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		match Json::<T>::from_request(req, state).await {
			Ok(Json(value)) => Ok(AppJson(value)),
			Err(rejection) => Err(Error::ValidationError(rejection.body_text().into())),
		}
	}
}

// vim: ts=4
