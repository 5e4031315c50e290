//! One-shot, best-effort teardown of registered components.
//!
//! A registration is released iff it is tagged disposable and is a module or
//! a service. Release runs in registration order; a failure (error or panic)
//! in one component is logged and the remaining components are still
//! released. Nothing escapes to the caller.
//!
//! There is no "already disposed" guard here. Running teardown twice calls
//! every release hook twice, so hooks should be idempotent.

use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::capability::Capabilities;
use crate::error::{Error, panic_message};
use crate::logger::Logger;
use crate::registry::Registry;

/// What happened during a teardown pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DisposeReport {
	/// Components whose release hook returned normally.
	pub released: Vec<&'static str>,
	/// Components whose release hook failed.
	pub failed: Vec<&'static str>,
	/// Registrations not selected for teardown.
	pub skipped: usize,
}

impl DisposeReport {
	/// Number of release hooks invoked.
	pub fn attempted(&self) -> usize {
		self.released.len() + self.failed.len()
	}
}

/// Returns whether a registration with `capabilities` is selected for teardown.
pub fn is_teardown_target(capabilities: Capabilities) -> bool {
	capabilities.is_disposable() && (capabilities.is_module() || capabilities.is_service())
}

/// Releases every selected component of `registry`, logging failures to `logger`.
pub fn dispose_all(registry: &Registry, logger: &dyn Logger) -> DisposeReport {
	let mut report = DisposeReport::default();

	for registration in registry.iter() {
		let type_name = registration.type_name();
		let handle = match registration.disposer() {
			Some(handle) if is_teardown_target(registration.capabilities()) => handle,
			_ => {
				report.skipped += 1;
				continue;
			}
		};

		let outcome = panic::catch_unwind(AssertUnwindSafe(|| handle.dispose()));
		let message = match outcome {
			Ok(Ok(())) => {
				debug!(target = "wx.lifecycle", type_name, "component disposed");
				report.released.push(type_name);
				continue;
			}
			Ok(Err(err)) => err.to_string(),
			Err(payload) => panic_message(payload.as_ref()),
		};

		let err = Error::Disposal { type_name, message };
		logger.error(&err.to_string());
		report.failed.push(type_name);
	}

	debug!(
		target = "wx.lifecycle",
		released = report.released.len(),
		failed = report.failed.len(),
		skipped = report.skipped,
		"teardown finished"
	);
	report
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::capability::{Disposable, Service};
	use crate::error::BoxError;
	use crate::registry::Registration;
	use parking_lot::Mutex;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use tracing::Level;

	#[derive(Default)]
	struct RecordingLogger {
		lines: Mutex<Vec<(Level, String)>>,
	}

	impl Service for RecordingLogger {}

	impl Logger for RecordingLogger {
		fn log(&self, level: Level, message: &str) {
			self.lines.lock().push((level, message.to_string()));
		}
	}

	enum Behavior {
		Succeed,
		Fail,
		Panic,
	}

	struct Hook {
		calls: AtomicUsize,
		behavior: Behavior,
	}

	impl Hook {
		fn new(behavior: Behavior) -> Arc<Self> {
			Arc::new(Self { calls: AtomicUsize::new(0), behavior })
		}

		fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}

	impl Disposable for Hook {
		fn dispose(&self) -> std::result::Result<(), BoxError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			match self.behavior {
				Behavior::Succeed => Ok(()),
				Behavior::Fail => Err("socket already closed".into()),
				Behavior::Panic => panic!("release hook exploded"),
			}
		}
	}

	// Distinct requested types so the registry accepts all hooks.
	struct First;
	struct Second;
	struct Third;

	#[test]
	fn selection_requires_disposable_and_module_or_service() {
		assert!(is_teardown_target(Capabilities::MODULE | Capabilities::DISPOSABLE));
		assert!(is_teardown_target(Capabilities::SERVICE | Capabilities::DISPOSABLE));
		assert!(!is_teardown_target(Capabilities::DISPOSABLE));
		assert!(!is_teardown_target(Capabilities::MODULE));
		assert!(!is_teardown_target(Capabilities::NONE));
	}

	#[test]
	fn every_hook_runs_even_when_some_fail() {
		let ok = Hook::new(Behavior::Succeed);
		let failing = Hook::new(Behavior::Fail);
		let panicking = Hook::new(Behavior::Panic);

		let mut registry = Registry::new();
		registry.register(Registration::new(Arc::new(First)).module().disposable(failing.clone())).unwrap();
		registry.register(Registration::new(Arc::new(Second)).service().disposable(panicking.clone())).unwrap();
		registry.register(Registration::new(Arc::new(Third)).module().disposable(ok.clone())).unwrap();

		let logger = RecordingLogger::default();
		let report = dispose_all(&registry, &logger);

		assert_eq!(failing.calls(), 1);
		assert_eq!(panicking.calls(), 1);
		assert_eq!(ok.calls(), 1);
		assert_eq!(report.attempted(), 3);
		assert_eq!(report.failed.len(), 2);
		assert_eq!(report.released.len(), 1);

		let lines = logger.lines.lock();
		assert_eq!(lines.len(), 2);
		assert!(lines.iter().all(|(level, _)| *level == Level::ERROR));
		assert!(lines[0].1.contains("socket already closed"));
		assert!(lines[1].1.contains("release hook exploded"));
	}

	#[test]
	fn untagged_disposables_are_skipped() {
		let hook = Hook::new(Behavior::Succeed);
		let mut registry = Registry::new();
		registry.register(Registration::new(Arc::new(First)).disposable(hook.clone())).unwrap();
		registry.register(Registration::new(Arc::new(Second))).unwrap();

		let report = dispose_all(&registry, &RecordingLogger::default());
		assert_eq!(hook.calls(), 0);
		assert_eq!(report.skipped, 2);
		assert_eq!(report.attempted(), 0);
	}

	#[test]
	fn second_pass_calls_hooks_again() {
		let hook = Hook::new(Behavior::Succeed);
		let mut registry = Registry::new();
		registry.register(Registration::new(Arc::new(First)).module().disposable(hook.clone())).unwrap();

		let logger = RecordingLogger::default();
		dispose_all(&registry, &logger);
		dispose_all(&registry, &logger);
		assert_eq!(hook.calls(), 2);
	}
}
