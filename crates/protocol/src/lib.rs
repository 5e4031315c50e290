//! Data types exchanged between the web messaging client and its callers.
//!
//! This crate contains the serde-serializable shapes that flow out of the
//! client: platform notifications pushed to the application listener, action
//! events produced by long-running operations such as login, and the account
//! record of the signed-in user.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond construction and serialization
//! * Payload-agnostic: event targets stay as JSON so the platform adapter decides their shape
//!
//! Composition, lookup and dispatch live in `wx-runtime` and `wx-rs`.

pub mod account;
pub mod event;

pub use account::*;
pub use event::*;
