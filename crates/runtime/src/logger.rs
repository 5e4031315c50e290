//! Logger service.
//!
//! Every component reports non-fatal failures through the registered
//! [`Logger`]. The default implementation forwards to `tracing`; callers can
//! register their own sink (for example to surface errors in a UI).

use tracing::Level;

use crate::capability::Service;

/// Sink for non-fatal failures and diagnostics.
///
/// Must be safe to call from concurrently running notification tasks.
pub trait Logger: Service {
	fn log(&self, level: Level, message: &str);

	fn error(&self, message: &str) {
		self.log(Level::ERROR, message);
	}

	fn warn(&self, message: &str) {
		self.log(Level::WARN, message);
	}

	fn info(&self, message: &str) {
		self.log(Level::INFO, message);
	}

	fn debug(&self, message: &str) {
		self.log(Level::DEBUG, message);
	}
}

/// Logger that emits `tracing` events at or above a minimum level.
#[derive(Debug, Clone)]
pub struct TracingLogger {
	min_level: Level,
}

impl TracingLogger {
	pub fn new(min_level: Level) -> Self {
		Self { min_level }
	}

	pub fn min_level(&self) -> Level {
		self.min_level
	}

	/// Returns whether `level` passes this logger's threshold.
	pub fn enabled(&self, level: Level) -> bool {
		// tracing orders levels by verbosity: ERROR < WARN < ... < TRACE.
		level <= self.min_level
	}
}

impl Default for TracingLogger {
	fn default() -> Self {
		Self::new(Level::INFO)
	}
}

impl Service for TracingLogger {}

impl Logger for TracingLogger {
	fn log(&self, level: Level, message: &str) {
		if !self.enabled(level) {
			return;
		}
		match level {
			Level::ERROR => tracing::error!(target = "wx.client", "{message}"),
			Level::WARN => tracing::warn!(target = "wx.client", "{message}"),
			Level::INFO => tracing::info!(target = "wx.client", "{message}"),
			Level::DEBUG => tracing::debug!(target = "wx.client", "{message}"),
			_ => tracing::trace!(target = "wx.client", "{message}"),
		}
	}
}
