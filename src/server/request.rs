use std::io::Read;
use std::sync::Arc;

use may_minihttp::Request;
use tracing::{debug, info};

use crate::dispatcher::HeaderVec;
use crate::router::ParamVec;

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, …).
    pub method: String,
    /// Request path with any query string stripped.
    pub path: String,
    /// HTTP headers (lowercase names).
    pub headers: HeaderVec,
    /// Cookies parsed from the Cookie header.
    pub cookies: HeaderVec,
    /// Parsed query string parameters.
    pub query_params: ParamVec,
    /// Parsed JSON body, if any.
    pub body: Option<serde_json::Value>,
}

/// Split the Cookie header into name/value pairs.
pub fn parse_cookies(headers: &HeaderVec) -> HeaderVec {
    headers
        .iter()
        .find(|(name, _)| name.as_ref() == "cookie")
        .map(|(_, raw)| {
            raw.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name: Arc<str> = Arc::from(parts.next()?.trim());
                    let value = parts.next().unwrap_or("").trim().to_string();
                    Some((name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse and URL-decode the query string portion of a raw path.
pub fn parse_query_params(raw_path: &str) -> ParamVec {
    let Some(pos) = raw_path.find('?') else {
        return ParamVec::new();
    };
    url::form_urlencoded::parse(raw_path[pos + 1..].as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.to_string()))
        .collect()
}

/// Extract method, path, headers, cookies, query params, and JSON body from
/// a raw `may_minihttp` request.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase().as_str()),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let cookies = parse_cookies(&headers);
    let query_params = parse_query_params(&raw_path);

    debug!(
        header_count = headers.len(),
        cookie_count = cookies.len(),
        query_param_count = query_params.len(),
        "Request metadata extracted"
    );

    let body = {
        let mut body_str = String::new();
        match req.body().read_to_string(&mut body_str) {
            Ok(size) if size > 0 => serde_json::from_str(&body_str).ok(),
            _ => None,
        }
    };

    info!(
        method = %method,
        path = %path,
        has_body = body.is_some(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        cookies,
        query_params,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_parse_cookies() {
        let headers: HeaderVec = smallvec![(Arc::from("cookie"), "a=b; c=d".to_string())];
        let cookies = parse_cookies(&headers);
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0], (Arc::from("a"), "b".to_string()));
        assert_eq!(cookies[1], (Arc::from("c"), "d".to_string()));
    }

    #[test]
    fn test_parse_query_params() {
        let params = parse_query_params("/p?x=1&y=hello%20world");
        assert_eq!(params[0], (Arc::from("x"), "1".to_string()));
        assert_eq!(params[1], (Arc::from("y"), "hello world".to_string()));
    }

    #[test]
    fn test_parse_query_params_without_query() {
        assert!(parse_query_params("/plain").is_empty());
    }
}
