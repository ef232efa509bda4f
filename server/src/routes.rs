use axum::{
	routing::{delete, get, post, put},
	Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::app::App;
use crate::feature;
use crate::secret;

pub fn init(state: App) -> Router {
	Router::new()
		.route("/features", post(feature::handler::create_feature))
		.route("/features/{key}", get(feature::handler::get_feature))
		.route("/features/{key}/{secret}", delete(feature::handler::delete_feature))
		.route("/features/activate/{key}/{secret}", put(feature::handler::activate_feature))
		.route("/features/deactivate/{key}/{secret}", put(feature::handler::deactivate_feature))
		.route(
			"/features/activateAt/{key}/{date}/{secret}",
			put(feature::handler::activate_feature_at),
		)
		.route(
			"/features/deactivateAt/{key}/{date}/{secret}",
			put(feature::handler::deactivate_feature_at),
		)
		.route("/collectionHash/{uuid}", get(feature::handler::get_collection_hash))
		.route("/secret/update/{uuid}/{oldsecret}/{newsecret}", put(secret::handler::update_secret))
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(state)
}

// vim: ts=4
