//! Login module.
//!
//! The client's `login` call is a thin delegation to the registered
//! [`LoginModule`]. The default implementation drives the login action built
//! by the [`ActionFactory`] and fans the outcome out to the session, account
//! and store modules and to the application's notify listener.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::{Value, json};
use tracing::{info, warn};
use wx_protocol::{Account, ActionEvent, NotifyEvent, NotifyEventKind};
use wx_runtime::{Registry, panic_message};

use super::account::AccountModule;
use super::session::{SessionModule, SessionState};
use super::store::StoreModule;
use crate::Module;
use crate::client::ClientContext;
use crate::error::{Error, Result};
use crate::services::{ActionFactory, HttpService, Logger};

/// Store key holding the raw reply of the last successful login.
pub const LOGIN_REPLY_KEY: &str = "login";

/// Receives progress and result events of a single login call.
pub type ActionEventListener = Arc<dyn Fn(&ActionEvent) + Send + Sync>;

pub trait LoginModule: Module {
	/// Runs the login handshake.
	///
	/// Completes with the final `Ok` action event, or fails with whatever
	/// error the handshake produced (usually [`Error::Login`] or
	/// [`Error::Transport`]).
	fn login(&self, listener: Option<ActionEventListener>) -> BoxFuture<'_, Result<ActionEvent>>;
}

/// Login module built on the registered services and modules.
pub struct DefaultLoginModule {
	context: ClientContext,
	http: Arc<dyn HttpService>,
	actions: Arc<dyn ActionFactory>,
	logger: Arc<dyn Logger>,
	session: Arc<SessionModule>,
	account: Arc<AccountModule>,
	store: Arc<StoreModule>,
}

impl DefaultLoginModule {
	/// Resolves every dependency from a registry under composition.
	///
	/// # Errors
	///
	/// Returns [`Error::UnregisteredType`] if a dependency was not registered
	/// before this module.
	pub fn from_registry(registry: &Registry) -> Result<Self> {
		Ok(Self {
			context: (*registry.resolve::<ClientContext>()?).clone(),
			http: registry.resolve::<dyn HttpService>()?,
			actions: registry.resolve::<dyn ActionFactory>()?,
			logger: registry.resolve::<dyn Logger>()?,
			session: registry.resolve::<SessionModule>()?,
			account: registry.resolve::<AccountModule>()?,
			store: registry.resolve::<StoreModule>()?,
		})
	}

	/// Hands `event` to the caller's listener. A panicking listener is logged
	/// and does not abort the login.
	fn emit(&self, listener: Option<&ActionEventListener>, event: &ActionEvent) {
		let Some(listener) = listener else {
			return;
		};
		if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
			let message = panic_message(payload.as_ref());
			warn!(target = "wx.login", kind = ?event.kind, %message, "action listener panicked");
			self.logger.error(&format!("ActionEventListener error: {message}"));
		}
	}

	async fn run(&self, listener: Option<&ActionEventListener>) -> Result<ActionEvent> {
		let action = self.actions.create_login_action();
		self.emit(listener, &ActionEvent::progress(json!({ "action": action.name() })));

		let event = action.execute(self.http.as_ref()).await?;
		let account = account_from_reply(&event.target)?;

		info!(target = "wx.login", user = %account.user_name, "login succeeded");
		self.account.set_account(account.clone());
		self.store.set(LOGIN_REPLY_KEY, event.target.clone());
		self.session.set_state(SessionState::Online);

		self.emit(listener, &event);
		self.context.fire_notify(NotifyEvent::new(NotifyEventKind::LoginSuccess, serde_json::to_value(&account)?));
		Ok(event)
	}
}

impl Module for DefaultLoginModule {}

impl LoginModule for DefaultLoginModule {
	fn login(&self, listener: Option<ActionEventListener>) -> BoxFuture<'_, Result<ActionEvent>> {
		Box::pin(async move {
			// Dropping this future mid-handshake drops the attempt, which
			// returns the session to Offline.
			let Some(attempt) = self.session.begin_login() else {
				return Err(Error::Login(format!("cannot start login while session is {:?}", self.session.state())));
			};

			let result = self.run(listener.as_ref()).await;
			match &result {
				Ok(_) => attempt.finish(),
				Err(err) => {
					warn!(target = "wx.login", error = %err, "login failed");
					self.logger.warn(&format!("Login failed: {err}"));
					drop(attempt);
					self.session.set_state(SessionState::Offline);
					self.emit(listener.as_ref(), &ActionEvent::error(err.to_string()));
					self.context.fire_notify(NotifyEvent::new(NotifyEventKind::LoginFailed, Value::String(err.to_string())));
				}
			}
			result
		})
	}
}

/// Extracts the account from a login reply, looking at `User` first.
fn account_from_reply(reply: &Value) -> Result<Account> {
	let candidate = reply.get("User").unwrap_or(reply);
	serde_json::from_value(candidate.clone()).map_err(|e| Error::Login(format!("login reply carries no account: {e}")))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn account_is_read_from_user_object() {
		let reply = json!({"User": {"Uin": 5, "UserName": "@u", "NickName": "n"}});
		let account = account_from_reply(&reply).unwrap();
		assert_eq!(account.uin, 5);
		assert_eq!(account.user_name, "@u");
	}

	#[test]
	fn account_falls_back_to_top_level() {
		let reply = json!({"UserName": "@top"});
		assert_eq!(account_from_reply(&reply).unwrap().user_name, "@top");
	}

	#[test]
	fn missing_account_is_a_login_error() {
		let err = account_from_reply(&json!({"BaseResponse": {"Ret": 0}})).unwrap_err();
		assert!(matches!(err, Error::Login(_)));
	}
}
