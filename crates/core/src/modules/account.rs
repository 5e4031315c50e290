//! Signed-in account module.

use parking_lot::RwLock;
use wx_protocol::Account;

use crate::error::BoxError;
use crate::{Disposable, Module};

#[derive(Debug, Default)]
pub struct AccountModule {
	account: RwLock<Option<Account>>,
}

impl AccountModule {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn account(&self) -> Option<Account> {
		self.account.read().clone()
	}

	pub fn set_account(&self, account: Account) {
		*self.account.write() = Some(account);
	}

	pub fn clear(&self) {
		*self.account.write() = None;
	}

	pub fn is_signed_in(&self) -> bool {
		self.account.read().is_some()
	}
}

impl Module for AccountModule {}

impl Disposable for AccountModule {
	fn dispose(&self) -> std::result::Result<(), BoxError> {
		self.clear();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dispose_forgets_the_account() {
		let module = AccountModule::new();
		module.set_account(Account {
			uin: 1,
			user_name: "@me".to_string(),
			nick_name: "me".to_string(),
		});
		assert!(module.is_signed_in());
		assert_eq!(module.account().unwrap().user_name, "@me");

		module.dispose().unwrap();
		assert!(!module.is_signed_in());
		assert_eq!(module.account(), None);
	}
}
