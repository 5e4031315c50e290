//! Signed-in account record.

use serde::{Deserialize, Serialize};

/// The user the client is logged in as.
///
/// Field names follow the platform's JSON (`Uin`, `UserName`, `NickName`);
/// anything else in the login reply is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
	#[serde(default)]
	pub uin: u64,
	pub user_name: String,
	#[serde(default)]
	pub nick_name: String,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn parses_platform_field_names() {
		let account: Account = serde_json::from_value(json!({
			"Uin": 1001,
			"UserName": "@abc",
			"NickName": "alice",
			"HeadImgUrl": "/ignored"
		}))
		.unwrap();
		assert_eq!(account.uin, 1001);
		assert_eq!(account.user_name, "@abc");
		assert_eq!(account.nick_name, "alice");
	}

	#[test]
	fn user_name_is_required() {
		let result = serde_json::from_value::<Account>(json!({"Uin": 1}));
		assert!(result.is_err());
	}
}
