use serde_json::{json, Value};

use super::kind::ErrorKind;

/// A concrete failure occurrence: a kind, a human-readable message, and an
/// optional JSON payload for handler introspection.
///
/// Request handlers return `Err(Failure)` to signal that producing a
/// response failed. The dispatcher then consults the recovery registry with
/// the failure's kind; a failure that no registered kind matches is
/// re-emitted to the caller exactly as constructed here.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    kind: &'static ErrorKind,
    message: String,
    payload: Option<Value>,
}

impl Failure {
    #[must_use]
    pub fn new(kind: &'static ErrorKind, message: impl Into<String>) -> Self {
        Failure {
            kind,
            message: message.into(),
            payload: None,
        }
    }

    /// A failure with no explicit message: the kind's name stands in, the
    /// same default a bare `raise SomeError` produces in dynamic runtimes.
    #[must_use]
    pub fn of(kind: &'static ErrorKind) -> Self {
        Failure::new(kind, kind.name())
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    #[must_use]
    pub fn kind(&self) -> &'static ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// JSON mirror of this failure, the shape stored in the request
    /// environment under [`crate::recovery::ENV_ERROR_KEY`].
    #[must_use]
    pub fn to_env_value(&self) -> Value {
        json!({
            "kind": self.kind.name(),
            "message": self.message,
            "payload": self.payload,
        })
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.name(), self.message)
    }
}

impl std::error::Error for Failure {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FAILURE;

    static PARSE: ErrorKind = ErrorKind::new("ParseError", &FAILURE);

    #[test]
    fn test_default_message_is_kind_name() {
        let failure = Failure::of(&PARSE);
        assert_eq!(failure.message(), "ParseError");
    }

    #[test]
    fn test_display() {
        let failure = Failure::new(&PARSE, "bad token at byte 7");
        assert_eq!(failure.to_string(), "ParseError: bad token at byte 7");
    }

    #[test]
    fn test_env_value_shape() {
        let failure = Failure::new(&PARSE, "bad token").with_payload(json!({"offset": 7}));
        let env = failure.to_env_value();
        assert_eq!(env["kind"], "ParseError");
        assert_eq!(env["message"], "bad token");
        assert_eq!(env["payload"]["offset"], 7);
    }
}
