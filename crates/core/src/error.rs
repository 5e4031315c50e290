//! Error types, shared with `wx-runtime`.

pub use wx_runtime::error::{BoxError, Error, Result};
