//! Scheduler subsystem. Promotes toggles whose scheduled date has arrived.
//!
//! Runs outside the request path as a recurring tokio task driven by a cron
//! expression (default: once per minute). Each pass applies the activation
//! rule and then the deactivation rule, both at calendar-date granularity and
//! both idempotent, so a toggle due for both ends up disabled. A pass that is
//! still running causes the next tick to be skipped; two passes never execute
//! concurrently.

use chrono::{DateTime, Utc};
use croner::Cron;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::prelude::*;
use switchboard_types::toggle_adapter::ToggleAdapter;

/// Cron schedule wrapper using the croner crate.
/// Stores the expression string for diagnostics.
#[derive(Debug, Clone)]
pub struct CronSchedule {
	expr: Box<str>,
	cron: Cron,
}

impl CronSchedule {
	/// Parse a cron expression (5 fields: minute hour day month weekday)
	pub fn parse(expr: &str) -> ClResult<Self> {
		let cron = Cron::from_str(expr)
			.map_err(|e| Error::ValidationError(format!("invalid cron expression: {}", e).into()))?;
		Ok(Self { expr: expr.into(), cron })
	}

	/// Calculate the next execution time after the given timestamp
	pub fn next_execution(&self, after: Timestamp) -> ClResult<Timestamp> {
		let dt = DateTime::<Utc>::from_timestamp(after.0, 0).unwrap_or_else(Utc::now);

		self.cron
			.find_next_occurrence(&dt, false)
			.map(|next| Timestamp(next.timestamp()))
			.map_err(|e| {
				error!("Failed to find next cron occurrence for '{}': {}", self.expr, e);
				Error::Internal(format!("cron next_execution failed: {}", e).into())
			})
	}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SchedulerPassStats {
	pub activated: u64,
	pub deactivated: u64,
}

pub struct Scheduler {
	adapter: Arc<dyn ToggleAdapter>,
	schedule: CronSchedule,
	gate: Mutex<()>,
}

impl Scheduler {
	pub fn new(adapter: Arc<dyn ToggleAdapter>, schedule: CronSchedule) -> Arc<Self> {
		Arc::new(Self { adapter, schedule, gate: Mutex::new(()) })
	}

	/// One scheduler pass: activation rule first, deactivation rule second.
	/// Returns `None` when a pass was already running and this one was
	/// skipped.
	pub async fn run_pass(&self) -> ClResult<Option<SchedulerPassStats>> {
		let Ok(_guard) = self.gate.try_lock() else {
			warn!("Scheduler pass still running, skipping this tick");
			return Ok(None);
		};

		let now = Timestamp::now();
		let activated = self.adapter.run_activation_pass(now).await?;
		let deactivated = self.adapter.run_deactivation_pass(now).await?;

		if activated > 0 || deactivated > 0 {
			info!("Scheduler pass touched {} + {} toggles", activated, deactivated);
		} else {
			debug!("Scheduler pass: nothing due");
		}
		Ok(Some(SchedulerPassStats { activated, deactivated }))
	}

	/// Spawn the recurring pass loop. Store failures are logged and the loop
	/// keeps going; the next tick retries naturally.
	pub fn start(self: &Arc<Self>) {
		let scheduler = self.clone();
		tokio::spawn(async move {
			loop {
				let next = match scheduler.schedule.next_execution(Timestamp::now()) {
					Ok(next) => next,
					Err(e) => {
						error!("Scheduler stopped: {}", e);
						break;
					}
				};
				let wait = u64::try_from(next.0 - Timestamp::now().0).unwrap_or_default();
				tokio::time::sleep(std::time::Duration::from_secs(wait)).await;

				if let Err(e) = scheduler.run_pass().await {
					error!("Scheduler pass failed: {}", e);
				}
			}
		});
	}
}


// vim: ts=4
