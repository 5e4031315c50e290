//! Session state module.

use parking_lot::RwLock;
use tracing::debug;
use wx_protocol::{NotifyEvent, NotifyEventKind};

use crate::client::ClientContext;
use crate::error::BoxError;
use crate::{Disposable, Module};

/// Where the client is in its login lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
	#[default]
	Offline,
	Logining,
	Online,
}

/// Tracks the session state and reports when an online session drops.
pub struct SessionModule {
	state: RwLock<SessionState>,
	context: ClientContext,
}

impl SessionModule {
	pub fn new(context: ClientContext) -> Self {
		Self {
			state: RwLock::new(SessionState::Offline),
			context,
		}
	}

	pub fn state(&self) -> SessionState {
		*self.state.read()
	}

	pub fn is_online(&self) -> bool {
		self.state() == SessionState::Online
	}

	/// Moves to `state` and returns the previous state.
	///
	/// Leaving `Online` for `Offline` fires an [`NotifyEventKind::Offline`]
	/// notification through the client.
	pub fn set_state(&self, state: SessionState) -> SessionState {
		let previous = std::mem::replace(&mut *self.state.write(), state);
		if previous != state {
			debug!(target = "wx.session", ?previous, current = ?state, "session state changed");
		}
		if previous == SessionState::Online && state == SessionState::Offline {
			self.context.fire_notify(NotifyEvent::bare(NotifyEventKind::Offline));
		}
		previous
	}

	/// Claims the session for a login attempt.
	///
	/// Returns `None` when a login is already running or the session is online.
	/// Dropping the returned attempt without [`LoginAttempt::finish`] puts the
	/// session back to `Offline`, so a cancelled or unwound login never leaves
	/// it stuck in `Logining`.
	pub fn begin_login(&self) -> Option<LoginAttempt<'_>> {
		let mut state = self.state.write();
		if *state != SessionState::Offline {
			return None;
		}
		*state = SessionState::Logining;
		Some(LoginAttempt { session: self, finished: false })
	}
}

/// An in-flight login claimed through [`SessionModule::begin_login`].
#[must_use = "dropping the attempt resets the session to Offline"]
pub struct LoginAttempt<'a> {
	session: &'a SessionModule,
	finished: bool,
}

impl LoginAttempt<'_> {
	/// Hands the session state back to the caller; dropping no longer resets it.
	pub fn finish(mut self) {
		self.finished = true;
	}
}

impl Drop for LoginAttempt<'_> {
	fn drop(&mut self) {
		if self.finished {
			return;
		}
		let mut state = self.session.state.write();
		if *state == SessionState::Logining {
			*state = SessionState::Offline;
			debug!(target = "wx.session", "login attempt abandoned; session reset to Offline");
		}
	}
}

impl Module for SessionModule {}

impl Disposable for SessionModule {
	/// Resets to `Offline` without notifying; the client is being torn down.
	fn dispose(&self) -> std::result::Result<(), BoxError> {
		*self.state.write() = SessionState::Offline;
		Ok(())
	}
}
