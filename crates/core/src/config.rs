//! Client configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is
//! a valid configuration.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://wx.qq.com";
pub const DEFAULT_LOGIN_PATH: &str = "/cgi-bin/mmwebwx-bin/login";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Settings consumed by the default services while composing a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Origin of the platform's web interface.
	pub base_url: String,
	/// Path of the login endpoint, appended to `base_url`.
	pub login_path: String,
	pub user_agent: String,
	pub request_timeout_ms: u64,
	/// Minimum level forwarded by the default logger (`error` .. `trace`).
	pub log_level: String,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			login_path: DEFAULT_LOGIN_PATH.to_string(),
			user_agent: DEFAULT_USER_AGENT.to_string(),
			request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
			log_level: "info".to_string(),
		}
	}
}

impl ClientConfig {
	pub fn from_json_str(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads configuration from a JSON file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)?;
		Self::from_json_str(&content)
	}

	/// Checks values the default services cannot work with.
	pub fn validate(&self) -> Result<()> {
		if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
			return Err(Error::Config(format!("base_url must be an http(s) URL, got '{}'", self.base_url)));
		}
		if self.request_timeout_ms == 0 {
			return Err(Error::Config("request_timeout_ms must be positive".to_string()));
		}
		self.log_level()?;
		Ok(())
	}

	pub fn log_level(&self) -> Result<Level> {
		Level::from_str(&self.log_level).map_err(|_| Error::Config(format!("unknown log_level '{}'", self.log_level)))
	}

	pub fn login_url(&self) -> String {
		format!("{}{}", self.base_url.trim_end_matches('/'), self.login_path)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}
}
