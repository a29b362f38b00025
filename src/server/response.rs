use std::fmt;

use http::StatusCode;

/// Body written when no handler matches.
pub const NOT_FOUND_BODY: &str = "404 Not Found!";

/// Outgoing response: a status and a writable text sink.
///
/// Handlers that receive the response may write to it directly; those writes are
/// passed straight through and are never rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    body: String,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            body: String::new(),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Append text to the body.
    pub fn write(&mut self, text: &str) {
        self.body.push_str(text);
    }

    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }
}

impl fmt::Write for Response {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s);
        Ok(())
    }
}
