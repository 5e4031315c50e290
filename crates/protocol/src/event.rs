//! Notification and action events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a platform-originated notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotifyEventKind {
	/// A login QR code is available for scanning.
	QrCodeReady,
	/// The QR code was scanned and confirmed on the phone.
	QrCodeSuccess,
	/// The login handshake completed.
	LoginSuccess,
	/// The login handshake failed.
	LoginFailed,
	/// The session went offline.
	Offline,
	/// A message was received.
	Message,
}

/// Event pushed to the application's notify listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyEvent {
	pub kind: NotifyEventKind,
	#[serde(default, skip_serializing_if = "Value::is_null")]
	pub target: Value,
}

impl NotifyEvent {
	pub fn new(kind: NotifyEventKind, target: Value) -> Self {
		Self { kind, target }
	}

	/// Creates an event that carries no payload.
	pub fn bare(kind: NotifyEventKind) -> Self {
		Self { kind, target: Value::Null }
	}
}

/// Outcome category of an action event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionEventKind {
	Ok,
	Error,
	Progress,
	Canceled,
}

/// Event produced while an action runs, and as its final result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
	pub kind: ActionEventKind,
	#[serde(default, skip_serializing_if = "Value::is_null")]
	pub target: Value,
}

impl ActionEvent {
	pub fn new(kind: ActionEventKind, target: Value) -> Self {
		Self { kind, target }
	}

	pub fn ok(target: Value) -> Self {
		Self::new(ActionEventKind::Ok, target)
	}

	pub fn error(message: impl Into<String>) -> Self {
		Self::new(ActionEventKind::Error, Value::String(message.into()))
	}

	pub fn progress(target: Value) -> Self {
		Self::new(ActionEventKind::Progress, target)
	}

	pub fn is_ok(&self) -> bool {
		self.kind == ActionEventKind::Ok
	}
}
