use serde::Serialize;
use serde_json::Value;

use crate::dispatcher::HeaderVec;

/// The mutable response object handlers work against.
///
/// Starts at `200` with no headers and a null body. A route handler's (or
/// recovery handler's) returned value becomes the body through
/// [`Response::set_body`] — unless the response was finalized first, e.g. by
/// [`Response::redirect`]. Finalized content always wins over a returned
/// body value.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    status: u16,
    #[serde(skip_serializing)]
    headers: HeaderVec,
    body: Value,
    #[serde(skip_serializing)]
    finalized: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Response {
            status: 200,
            headers: HeaderVec::new(),
            body: Value::Null,
            finalized: false,
        }
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.headers
    }

    /// Get a header by name (case-insensitive per RFC 7230).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((std::sync::Arc::from(name), value));
    }

    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Replace the body. Ignored once the response is finalized, so a
    /// redirect issued by a handler is never clobbered by its return value.
    pub fn set_body(&mut self, body: Value) {
        if !self.finalized {
            self.body = body;
        }
    }

    /// Append text to the body, coercing a null body to a string and a
    /// string body by concatenation. Ignored once finalized.
    pub fn write(&mut self, chunk: &str) {
        if self.finalized {
            return;
        }
        match &mut self.body {
            Value::String(existing) => existing.push_str(chunk),
            _ => self.body = Value::String(chunk.to_string()),
        }
    }

    /// Issue a `302 Found` to `location` and finalize the response.
    pub fn redirect(&mut self, location: &str) {
        self.status = 302;
        self.set_header("location", location.to_string());
        self.finalized = true;
    }

    /// Mark the response complete: later body writes are ignored.
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// Write a completed [`Response`] onto the wire.
///
/// String bodies go out as `text/plain`, null bodies as empty, anything else
/// as JSON — unless the handler set an explicit `content-type`.
pub(crate) fn write_response(out: &mut may_minihttp::Response, resp: &Response) {
    out.status_code(resp.status() as usize, status_reason(resp.status()));

    let explicit_content_type = resp.get_header("content-type").is_some();
    for (name, value) in resp.headers() {
        let header = format!("{name}: {value}").into_boxed_str();
        out.header(Box::leak(header));
    }

    match resp.body() {
        Value::Null => out.body_vec(Vec::new()),
        Value::String(s) => {
            if !explicit_content_type {
                out.header("Content-Type: text/plain");
            }
            out.body_vec(s.clone().into_bytes());
        }
        other => {
            if !explicit_content_type {
                out.header("Content-Type: application/json");
            }
            out.body_vec(other.to_string().into_bytes());
        }
    }
}

/// Write a transport-level JSON error, bypassing the handler response path.
pub(crate) fn write_json_error(out: &mut may_minihttp::Response, status: u16, body: Value) {
    out.status_code(status as usize, status_reason(status));
    out.header("Content-Type: application/json");
    out.body_vec(body.to_string().into_bytes());
}
