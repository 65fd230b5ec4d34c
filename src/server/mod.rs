//! # Server Module
//!
//! HTTP plumbing on top of `may_minihttp`: request parsing, the mutable
//! [`Response`] object handlers mutate, the [`AppService`] that wires
//! parse → route → dispatch → write, and a start/stop server wrapper.

mod http_server;
mod request;
mod response;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_cookies, parse_query_params, parse_request, ParsedRequest};
pub use response::Response;
pub use service::AppService;
