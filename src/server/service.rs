use std::io;
use std::sync::Arc;

use may_minihttp::{HttpService, Request, Response as WireResponse};
use serde_json::json;
use tracing::error;

use super::request::{parse_request, ParsedRequest};
use super::response::{write_json_error, write_response, Response};
use crate::dispatcher::Dispatcher;
use crate::router::Router;

/// The HTTP service tying the pieces together: parse the request, match a
/// route, dispatch to the handler (with error recovery), and write the
/// result to the wire.
///
/// One instance is cloned per connection by the server; the router and
/// dispatcher are shared. Unmatched failures surfacing from dispatch are
/// transport infrastructure's problem, not the recovery core's: they are
/// logged and rendered as a generic 500 here.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new(router: Arc<Router>, dispatcher: Arc<Dispatcher>) -> Self {
        AppService { router, dispatcher }
    }
}

/// Basic health check endpoint returning `{ "status": "ok" }`.
fn health_endpoint(res: &mut WireResponse) -> io::Result<()> {
    let mut response = Response::new();
    response.set_body(json!({ "status": "ok" }));
    write_response(res, &response);
    Ok(())
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut WireResponse) -> io::Result<()> {
        let ParsedRequest {
            method,
            path,
            headers,
            cookies,
            query_params,
            body,
        } = parse_request(req);

        if method == "GET" && path == "/health" {
            return health_endpoint(res);
        }

        let Ok(method) = method.parse::<http::Method>() else {
            write_json_error(res, 400, json!({ "error": "Bad Request" }));
            return Ok(());
        };

        let Some(mut route_match) = self.router.route(method.clone(), &path) else {
            write_json_error(
                res,
                404,
                json!({ "error": "Not Found", "method": method.as_str(), "path": path }),
            );
            return Ok(());
        };
        route_match.query_params = query_params;

        match self.dispatcher.dispatch(route_match, body, headers, cookies) {
            Some(Ok(response)) => write_response(res, &response),
            Some(Err(failure)) => {
                error!(
                    kind = %failure.kind(),
                    message = failure.message(),
                    method = %method,
                    path = %path,
                    "Unhandled failure reached the transport"
                );
                write_json_error(
                    res,
                    500,
                    json!({ "error": "Internal Server Error", "method": method.as_str(), "path": path }),
                );
            }
            None => {
                write_json_error(
                    res,
                    500,
                    json!({ "error": "Handler not registered", "method": method.as_str(), "path": path }),
                );
            }
        }
        Ok(())
    }
}
