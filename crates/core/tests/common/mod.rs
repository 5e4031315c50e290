//! Shared fixtures for client integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::Level;
use wx::services::FakeHttpService;
use wx::{Client, ClientBuilder, Logger, Service};

/// Logger that keeps every line for later assertions.
#[derive(Default)]
pub struct RecordingLogger {
	lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
	pub fn errors(&self) -> Vec<String> {
		self.lines
			.lock()
			.iter()
			.filter(|(level, _)| *level == Level::ERROR)
			.map(|(_, line)| line.clone())
			.collect()
	}

	pub fn lines(&self) -> Vec<(Level, String)> {
		self.lines.lock().clone()
	}
}

impl Service for RecordingLogger {}

impl Logger for RecordingLogger {
	fn log(&self, level: Level, message: &str) {
		self.lines.lock().push((level, message.to_string()));
	}
}

/// Builder wired to a fake transport and a recording logger.
pub fn offline_builder(http: &Arc<FakeHttpService>, logger: &Arc<RecordingLogger>) -> ClientBuilder {
	Client::builder().http_service(http.clone()).logger(logger.clone())
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
