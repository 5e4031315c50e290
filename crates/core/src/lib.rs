//! wx: client SDK for a messaging platform's private web interface
//!
//! A [`Client`] wires a fixed set of services (HTTP transport, logger, action
//! factory) and modules (store, session, account, login) into one object,
//! offers typed lookup of them, forwards platform notifications to a single
//! application listener and tears everything down on [`Client::dispose`].
//!
//! ```text
//! caller ──► Client ──► Registry ──► module / service
//! module ──► ClientContext ──► Client::fire_notify ──► listener
//! ```
//!
//! The login handshake, transport and payload formats are pluggable services;
//! the defaults talk to the platform's web endpoints.

pub mod client;
pub mod config;
pub mod error;
pub mod modules;
pub mod notify;
pub mod services;

pub use client::{Client, ClientBuilder, ClientContext, ComponentFactory, LoginModuleFactory};
pub use config::ClientConfig;
pub use error::{BoxError, Error, Result};
pub use modules::{ActionEventListener, LoginModule};
pub use notify::{Delivery, NotifyListener};
pub use wx_protocol::{Account, ActionEvent, ActionEventKind, NotifyEvent, NotifyEventKind};
pub use wx_runtime::{Capabilities, Disposable, Logger, Module, Registration, Registry, Service};
