//! wx runtime - component registry, logger service and lifecycle
//!
//! This crate provides the composition plumbing underneath the client façade:
//!
//! - **Registry**: one singleton per requested type, populated once and read-only afterwards
//! - **Capabilities**: explicit module / service / disposable tag bits set at registration
//! - **Logger**: the leaf service every component reports non-fatal failures to
//! - **Lifecycle**: best-effort release of disposable modules and services
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │    wx-rs    │  Client façade, modules, services
//! └──────┬──────┘
//!        │ registers components, resolves by type
//! ┌──────▼──────┐
//! │ wx-runtime  │  This crate
//! │  ┌────────┐ │
//! │  │Registry│ │  TypeId → Arc<T> + tags
//! │  └────────┘ │
//! │  ┌────────┐ │
//! │  │Lifecyc.│ │  Teardown selection and failure isolation
//! │  └────────┘ │
//! └─────────────┘
//! ```

pub mod capability;
pub mod error;
pub mod lifecycle;
pub mod logger;
pub mod registry;

pub use capability::{Capabilities, Disposable, Module, Service};
pub use error::{BoxError, Error, Result, panic_message};
pub use lifecycle::{DisposeReport, dispose_all, is_teardown_target};
pub use logger::{Logger, TracingLogger};
pub use registry::{Registration, Registry};
