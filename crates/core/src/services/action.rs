//! Action construction service.
//!
//! An [`Action`] is one request/response exchange with the platform that ends
//! in an [`ActionEvent`]. Modules never build requests themselves; they ask
//! the registered [`ActionFactory`] for actions and run them against the
//! registered [`HttpService`]. Replacing the factory swaps the platform
//! dialect without touching the modules.

use downcast_rs::{Downcast, impl_downcast};
use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::debug;
use wx_protocol::ActionEvent;

use super::http::{HttpRequest, HttpService};
use crate::Service;
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// A single exchange with the platform.
pub trait Action: Downcast + Send + Sync {
	fn name(&self) -> &str;

	fn execute<'a>(&'a self, http: &'a dyn HttpService) -> BoxFuture<'a, Result<ActionEvent>>;
}

impl_downcast!(Action);

/// Builds the actions modules run.
pub trait ActionFactory: Service {
	fn create_login_action(&self) -> Box<dyn Action>;
}

/// Factory for the platform's web endpoints, rooted at [`ClientConfig::base_url`].
#[derive(Debug, Clone)]
pub struct WebActionFactory {
	login_url: String,
}

impl WebActionFactory {
	pub fn new(config: &ClientConfig) -> Self {
		Self { login_url: config.login_url() }
	}
}

impl Service for WebActionFactory {}

impl ActionFactory for WebActionFactory {
	fn create_login_action(&self) -> Box<dyn Action> {
		Box::new(LoginAction::new(&self.login_url))
	}
}

/// Posts the login request and turns the JSON reply into an `Ok` event.
///
/// The reply is rejected when the HTTP status is not 2xx, the body is not
/// JSON, or its `BaseResponse.Ret` is non-zero.
#[derive(Debug, Clone)]
pub struct LoginAction {
	request: HttpRequest,
}

impl LoginAction {
	pub fn new(login_url: &str) -> Self {
		Self {
			request: HttpRequest::post_json(login_url, serde_json::json!({})),
		}
	}

	pub fn request(&self) -> &HttpRequest {
		&self.request
	}
}

impl Action for LoginAction {
	fn name(&self) -> &str {
		"login"
	}

	fn execute<'a>(&'a self, http: &'a dyn HttpService) -> BoxFuture<'a, Result<ActionEvent>> {
		Box::pin(async move {
			debug!(target = "wx.action", action = self.name(), url = %self.request.url, "executing action");
			let response = http.send(self.request.clone()).await?;
			if !response.is_success() {
				return Err(Error::Login(format!("login request returned HTTP {}", response.status)));
			}

			let reply: Value = response
				.json()
				.map_err(|e| Error::Login(format!("login reply is not JSON: {e}")))?;
			check_base_response(&reply)?;
			Ok(ActionEvent::ok(reply))
		})
	}
}

/// Fails when the reply's `BaseResponse.Ret` is present and non-zero.
fn check_base_response(reply: &Value) -> Result<()> {
	let Some(base) = reply.get("BaseResponse") else {
		return Ok(());
	};
	match base.get("Ret").and_then(Value::as_i64) {
		Some(0) | None => Ok(()),
		Some(ret) => {
			let message = base.get("ErrMsg").and_then(Value::as_str).unwrap_or_default();
			Err(Error::Login(format!("platform rejected login (Ret={ret}) {message}").trim_end().to_string()))
		}
	}
}
