//! Higher-level capability units composed from services.
//!
//! Modules are built in dependency order during client composition: store,
//! session and account first, then login, which resolves the other three.
//! Resolve them with [`Client::get_module`](crate::Client::get_module).

pub mod account;
pub mod login;
pub mod session;
pub mod store;

pub use account::AccountModule;
pub use login::{ActionEventListener, DefaultLoginModule, LOGIN_REPLY_KEY, LoginModule};
pub use session::{LoginAttempt, SessionModule, SessionState};
pub use store::StoreModule;
