use std::{env, path::PathBuf, sync::Arc, time::Duration};

use switchboard::AppBuilder;
use switchboard_toggle_adapter_sqlite::ToggleAdapterSqlite;

pub struct Config {
	pub db_dir: PathBuf,
	pub listen: String,
	pub schedule: String,
}

#[tokio::main]
async fn main() {
	let config = Config {
		db_dir: PathBuf::from(env::var("DB_DIR").unwrap_or("./data".to_string())),
		listen: env::var("LISTEN").unwrap_or("127.0.0.1:8080".to_string()),
		schedule: env::var("SCHEDULE").unwrap_or("* * * * *".to_string()),
	};

	std::fs::create_dir_all(&config.db_dir).expect("FATAL: Cannot create db dir");

	// Wait for the store to become available before serving
	let mut adapter = None;
	for _ in 0..10 {
		match ToggleAdapterSqlite::new(config.db_dir.join("toggles.db")).await {
			Ok(a) => {
				adapter = Some(a);
				break;
			}
			Err(err) => {
				eprintln!("Failed to open toggle store: {}, retrying", err);
				tokio::time::sleep(Duration::from_secs(5)).await;
			}
		}
	}
	let adapter = adapter.expect("FATAL: Toggle store unavailable after multiple attempts");

	AppBuilder::new()
		.listen(config.listen)
		.schedule(config.schedule)
		.toggle_adapter(Arc::new(adapter))
		.run()
		.await
		.expect("FATAL: Server failed");
}

// vim: ts=4
