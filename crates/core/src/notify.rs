//! Notification dispatch to the application's listener.
//!
//! The client holds at most one listener. A dispatch invokes it at most once
//! and never lets its failure reach the caller: errors and panics are logged
//! through the [`Logger`] service and the notification counts as delivered.
//! No queuing or coalescing happens here; overlapping asynchronous dispatches
//! may reach the listener in any order.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::trace;
use wx_protocol::NotifyEvent;
use wx_runtime::panic_message;

use crate::client::Client;
use crate::error::{BoxError, Error};
use crate::services::Logger;

/// Application callback for platform notifications.
///
/// May fan out to several subscribers internally; the client treats it as a
/// single opaque sink. Must be safe to call from several threads at once.
pub type NotifyListener = Arc<dyn Fn(&Client, &NotifyEvent) -> std::result::Result<(), BoxError> + Send + Sync>;

/// Outcome of a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
	/// No listener registered; the event was dropped.
	NoListener,
	Delivered,
	/// The listener failed; the failure was logged.
	ListenerFailed,
}

pub(crate) struct NotifyDispatcher {
	listener: Option<NotifyListener>,
}

impl NotifyDispatcher {
	pub(crate) fn new(listener: Option<NotifyListener>) -> Self {
		Self { listener }
	}

	pub(crate) fn has_listener(&self) -> bool {
		self.listener.is_some()
	}

	pub(crate) fn dispatch(&self, client: &Client, event: &NotifyEvent, logger: &dyn Logger) -> Delivery {
		let Some(listener) = &self.listener else {
			trace!(target = "wx.notify", kind = ?event.kind, "no listener; dropping notification");
			return Delivery::NoListener;
		};

		let message = match panic::catch_unwind(AssertUnwindSafe(|| listener(client, event))) {
			Ok(Ok(())) => return Delivery::Delivered,
			Ok(Err(err)) => err.to_string(),
			Err(payload) => panic_message(payload.as_ref()),
		};

		let err = Error::NotificationDelivery(format!("{:?} listener failed: {message}", event.kind));
		logger.error(&format!("FireNotify error: {err}"));
		Delivery::ListenerFailed
	}
}
