//! Low-level capability providers: transport, logging and action construction.
//!
//! Services never depend on modules. Each is registered under its trait
//! object type (`dyn HttpService`, `dyn Logger`, `dyn ActionFactory`) and
//! resolved with [`Client::get_service`](crate::Client::get_service).

pub mod action;
pub mod fake_http;
pub mod http;

pub use action::{Action, ActionFactory, LoginAction, WebActionFactory};
pub use fake_http::FakeHttpService;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpService, ReqwestHttpService};
pub use wx_runtime::logger::{Logger, TracingLogger};
