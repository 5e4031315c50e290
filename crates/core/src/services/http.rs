//! HTTP transport service.
//!
//! The client talks to the platform exclusively through the registered
//! [`HttpService`]. The default [`ReqwestHttpService`] keeps a cookie store so
//! the session cookies set during login are replayed on later requests.

use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{BoxError, Error, Result};
use crate::{Disposable, Service};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
	Get,
	Post,
}

/// Request handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
	pub method: HttpMethod,
	pub url: String,
	pub query: Vec<(String, String)>,
	/// JSON body, sent only with `Post`.
	pub body: Option<Value>,
}

impl HttpRequest {
	pub fn get(url: impl Into<String>) -> Self {
		Self {
			method: HttpMethod::Get,
			url: url.into(),
			query: Vec::new(),
			body: None,
		}
	}

	pub fn post_json(url: impl Into<String>, body: Value) -> Self {
		Self {
			method: HttpMethod::Post,
			url: url.into(),
			query: Vec::new(),
			body: Some(body),
		}
	}

	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));
		self
	}
}

/// Response returned by the transport. The body is kept as text; callers
/// decide whether it is JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
	pub status: u16,
	pub body: String,
}

impl HttpResponse {
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}

	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
		Ok(serde_json::from_str(&self.body)?)
	}
}

/// Transport capability used by actions.
pub trait HttpService: Service {
	fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>>;
}

/// `reqwest`-backed transport with a cookie store.
///
/// Disposing the service closes it: later sends fail with
/// [`Error::Transport`] instead of reaching the network.
pub struct ReqwestHttpService {
	client: reqwest::Client,
	closed: AtomicBool,
}

impl ReqwestHttpService {
	pub fn new(config: &ClientConfig) -> Result<Self> {
		let client = reqwest::Client::builder()
			.cookie_store(true)
			.user_agent(config.user_agent.clone())
			.timeout(config.request_timeout())
			.build()
			.map_err(|e| Error::Transport(format!("Failed to build HTTP client: {e}")))?;

		Ok(Self {
			client,
			closed: AtomicBool::new(false),
		})
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}
}

impl Service for ReqwestHttpService {}

impl HttpService for ReqwestHttpService {
	fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
		Box::pin(async move {
			if self.is_closed() {
				return Err(Error::Transport(format!("HTTP service is closed; dropped request to {}", request.url)));
			}

			let mut builder = match request.method {
				HttpMethod::Get => self.client.get(&request.url),
				HttpMethod::Post => self.client.post(&request.url),
			};
			if !request.query.is_empty() {
				builder = builder.query(&request.query);
			}
			if let (HttpMethod::Post, Some(body)) = (request.method, &request.body) {
				builder = builder.json(body);
			}

			debug!(target = "wx.http", method = ?request.method, url = %request.url, "sending request");
			let response = builder.send().await.map_err(|e| Error::Transport(e.to_string()))?;
			let status = response.status().as_u16();
			let body = response.text().await.map_err(|e| Error::Transport(e.to_string()))?;
			Ok(HttpResponse { status, body })
		})
	}
}

impl Disposable for ReqwestHttpService {
	fn dispose(&self) -> std::result::Result<(), BoxError> {
		self.closed.store(true, Ordering::SeqCst);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn request_builders_set_method_and_body() {
		let get = HttpRequest::get("https://example.test/a").query("r", "1");
		assert_eq!(get.method, HttpMethod::Get);
		assert_eq!(get.query, vec![("r".to_string(), "1".to_string())]);
		assert!(get.body.is_none());

		let post = HttpRequest::post_json("https://example.test/b", json!({"k": 1}));
		assert_eq!(post.method, HttpMethod::Post);
		assert_eq!(post.body.unwrap()["k"], 1);
	}

	#[test]
	fn response_status_and_json() {
		let ok = HttpResponse::new(200, r#"{"Ret": 0}"#);
		assert!(ok.is_success());
		assert_eq!(ok.json::<Value>().unwrap()["Ret"], 0);

		let missing = HttpResponse::new(404, "not found");
		assert!(!missing.is_success());
		assert!(matches!(missing.json::<Value>(), Err(Error::Json(_))));
	}

	#[tokio::test]
	async fn disposed_service_refuses_requests() {
		let service = ReqwestHttpService::new(&ClientConfig::default()).unwrap();
		service.dispose().unwrap();
		assert!(service.is_closed());

		let err = service.send(HttpRequest::get("https://example.test")).await.unwrap_err();
		assert!(matches!(err, Error::Transport(msg) if msg.contains("closed")));
	}
}
