//! Fake HTTP service for testing actions and modules without a network.
//!
//! Responses are queued up front and handed out in order; every request is
//! recorded so tests can assert on what the client sent.
//!
//! # Example
//!
//! ```ignore
//! let http = Arc::new(FakeHttpService::new());
//! http.push_json(200, json!({"BaseResponse": {"Ret": 0}, "User": {"UserName": "@me"}}));
//!
//! let client = Client::builder().http_service(http.clone()).build()?;
//! client.login(None).await?;
//! assert_eq!(http.take_sent().len(), 1);
//! ```

use std::collections::VecDeque;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::Value;

use super::http::{HttpRequest, HttpResponse, HttpService};
use crate::Service;
use crate::error::{Error, Result};

/// In-memory [`HttpService`] with scripted responses.
#[derive(Default)]
pub struct FakeHttpService {
	responses: Mutex<VecDeque<Result<HttpResponse>>>,
	sent: Mutex<Vec<HttpRequest>>,
}

impl FakeHttpService {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a raw response.
	pub fn push_response(&self, response: HttpResponse) {
		self.responses.lock().push_back(Ok(response));
	}

	/// Queues a response whose body is `body` serialized as JSON.
	pub fn push_json(&self, status: u16, body: Value) {
		self.push_response(HttpResponse::new(status, body.to_string()));
	}

	/// Queues a transport failure.
	pub fn push_error(&self, message: &str) {
		self.responses.lock().push_back(Err(Error::Transport(message.to_string())));
	}

	/// Takes all recorded requests, clearing the buffer.
	pub fn take_sent(&self) -> Vec<HttpRequest> {
		std::mem::take(&mut *self.sent.lock())
	}

	pub fn pending_responses(&self) -> usize {
		self.responses.lock().len()
	}
}

impl Service for FakeHttpService {}

impl HttpService for FakeHttpService {
	fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
		Box::pin(async move {
			let url = request.url.clone();
			self.sent.lock().push(request);
			self.responses
				.lock()
				.pop_front()
				.unwrap_or_else(|| Err(Error::Transport(format!("No response queued for {url}"))))
		})
	}
}
