//! Error types shared by the runtime and the client.

use thiserror::Error;

/// Boxed error returned by application callbacks and component teardown.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// A lookup asked for a type that was never registered.
	///
	/// Registrations are fixed at composition time, so this always points at a
	/// wiring mistake rather than a transient condition.
	#[error("Type not registered: {0}")]
	UnregisteredType(&'static str),

	#[error("Type already registered: {0}")]
	DuplicateRegistration(&'static str),

	/// The client behind a back-reference is gone or not yet composed.
	#[error("Client unavailable: {0}")]
	ClientUnavailable(String),

	#[error("Login failed: {0}")]
	Login(String),

	#[error("Transport error: {0}")]
	Transport(String),

	/// A notify listener failed. Only ever logged.
	#[error("Notification delivery failed: {0}")]
	NotificationDelivery(String),

	/// A component failed to release. Only ever logged.
	#[error("Failed to dispose {type_name}: {message}")]
	Disposal { type_name: &'static str, message: String },

	#[error("Protocol error: {0}")]
	ProtocolError(String),

	#[error("Invalid configuration: {0}")]
	Config(String),

	#[error("Serialization error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Returns `true` for lookups of types that were never registered.
	pub fn is_unregistered(&self) -> bool {
		matches!(self, Error::UnregisteredType(_))
	}
}

/// Renders a caught panic payload as text.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"panic with non-string payload".to_string()
	}
}
