//! App state type and builder

use std::sync::Arc;

use crate::core::scheduler::{CronSchedule, Scheduler};
use crate::prelude::*;
use crate::routes;
use switchboard_types::toggle_adapter::ToggleAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub toggle_adapter: Arc<dyn ToggleAdapter>,
	pub scheduler: Arc<Scheduler>,
	pub opts: AppBuilderOpts,
}

pub type App = Arc<AppState>;

#[derive(Debug)]
pub struct AppBuilderOpts {
	listen: Box<str>,
	schedule: Box<str>,
}

pub struct AppBuilder {
	opts: AppBuilderOpts,
	toggle_adapter: Option<Arc<dyn ToggleAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder {
			opts: AppBuilderOpts {
				listen: "127.0.0.1:8080".into(),
				schedule: "* * * * *".into(),
			},
			toggle_adapter: None,
		}
	}

	// Opts
	pub fn listen(mut self, listen: impl Into<Box<str>>) -> Self {
		self.opts.listen = listen.into();
		self
	}

	/// Cron expression driving the scheduler pass (default: every minute)
	pub fn schedule(mut self, schedule: impl Into<Box<str>>) -> Self {
		self.opts.schedule = schedule.into();
		self
	}

	// Adapters
	pub fn toggle_adapter(mut self, toggle_adapter: Arc<dyn ToggleAdapter>) -> Self {
		self.toggle_adapter = Some(toggle_adapter);
		self
	}

	/// Assemble the application state without serving. The scheduler is
	/// created but not started; `run` starts it.
	pub fn build(self) -> ClResult<App> {
		let toggle_adapter = self
			.toggle_adapter
			.ok_or(Error::Internal("no toggle adapter configured".into()))?;
		let schedule = CronSchedule::parse(&self.opts.schedule)?;
		let scheduler = Scheduler::new(toggle_adapter.clone(), schedule);

		Ok(Arc::new(AppState { toggle_adapter, scheduler, opts: self.opts }))
	}

	pub async fn run(self) -> ClResult<()> {
		tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.init();
		info!("Switchboard V{}", VERSION);

		let app = self.build()?;
		let router = routes::init(app.clone());

		app.scheduler.start();

		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await?;
		info!("Listening on {}", app.opts.listen);
		axum::serve(listener, router).await?;

		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
