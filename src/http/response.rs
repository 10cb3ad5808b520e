use std::collections::BTreeMap;
use std::fmt;

use crate::http::request::Request;

/// HTTP status code.
///
/// Any numeric code can be carried; only the codes listed in
/// [`StatusCode::reason_phrase`] have a reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode(200);
    /// 400 Bad Request
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// 405 Method Not Allowed
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    /// 413 Request Entity Too Large
    pub const PAYLOAD_TOO_LARGE: StatusCode = StatusCode(413);
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    pub const fn new(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use httplet::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the standard reason phrase, or `None` for codes without one.
    ///
    /// # Example
    ///
    /// ```
    /// # use httplet::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.reason_phrase(), Some("OK"));
    /// assert_eq!(StatusCode::new(299).reason_phrase(), None);
    /// ```
    pub fn reason_phrase(&self) -> Option<&'static str> {
        let phrase = match self.0 {
            200 => "OK",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            307 => "Temporary Redirect",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            411 => "Length Required",
            413 => "Request Entity Too Large",
            414 => "Request-URI Too Long",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            505 => "HTTP Version Not Supported",
            _ => return None,
        };
        Some(phrase)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase().unwrap_or(""))
    }
}

/// Represents an HTTP response being prepared for a client.
///
/// Headers are kept sorted by name so that serializing the same response
/// twice produces the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers as key-value pairs
    pub headers: BTreeMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
    /// Minor protocol version of the request being answered
    request_minor: u8,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: BTreeMap::new(),
            body: Vec::new(),
            request_minor: 1,
        }
    }
}

impl Response {
    /// Creates a 200 response answering `req`.
    pub fn for_request(req: &Request) -> Self {
        Self {
            request_minor: req.protocol_minor,
            ..Self::default()
        }
    }

    /// Minor version echoed in the status line: 0 for HTTP/1.0 clients, 1 otherwise.
    pub fn minor_version(&self) -> u8 {
        if self.request_minor == 0 { 0 } else { 1 }
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Adds or replaces a header.
    ///
    /// An existing header whose name differs only in case is replaced too.
    ///
    /// # Example
    ///
    /// ```
    /// # use httplet::http::response::Response;
    /// let mut res = Response::default();
    /// res.header("content-type", "text/plain");
    /// res.header("Content-Type", "text/html");
    /// assert_eq!(res.headers.len(), 1);
    /// assert_eq!(res.get_header("CONTENT-TYPE"), Some("text/html"));
    /// ```
    pub fn header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
        self.headers.insert(key, value.into());
    }

    /// Looks a header up by name, ignoring case.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    /// Replaces the body with a minimal HTML page describing the status.
    ///
    /// Also sets `Content-Type: text/html` and disables caching.
    pub fn error_page(&mut self) {
        self.header("Content-Type", "text/html");
        self.header("Cache-Control", "no-cache, no-store, must-revalidate");

        let code = self.status.as_u16();
        let phrase = self.status.reason_phrase().unwrap_or("");
        self.body = format!(
            "<!doctype html><html lang=\"en\">\
             <head><title>Error</title></head>\
             <body><h1>Error {}</h1><hr><p>{}</p></body></html>",
            code, phrase
        )
        .into_bytes();
    }

    /// Forces the headers every response carries on the wire.
    ///
    /// `Content-Length` always matches the current body and the connection is
    /// always closed after the exchange.
    pub fn prepare(&mut self) {
        let len = self.body.len().to_string();
        self.header("Content-Length", len);
        self.header("Connection", "close");
    }

    /// Creates a 200 OK response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// Creates a response carrying the HTML error page for `status`.
    pub fn error(status: StatusCode) -> Self {
        let mut res = Self {
            status,
            ..Self::default()
        };
        res.error_page();
        res
    }
}
