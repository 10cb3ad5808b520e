use std::borrow::Cow;
use std::collections::HashMap;
use std::net::SocketAddr;

/// Represents an HTTP request read from a client.
///
/// The parser fills the fields in the order they appear on the wire. A
/// request that never reaches a field (for example a truncated request line)
/// leaves that field at its default value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Request method, not checked against any known verb (e.g. "GET")
    pub method: String,
    /// Request path without the query string (e.g. "/index.html")
    pub target: String,
    /// Raw query string after `?`, not percent-decoded
    pub query_string: String,
    /// Major protocol version digit
    pub protocol_major: u8,
    /// Minor protocol version digit
    pub protocol_minor: u8,
    /// Request headers keyed by lower-cased name
    pub headers: HashMap<String, String>,
    /// Set when the protocol token is not `HTTP` or the major version is not 1
    pub has_error: bool,
    /// Remote address of the connection, when known
    pub peer: Option<SocketAddr>,
}

/// Builder for constructing Request objects.
///
/// Mostly useful for exercising handlers without going through the parser.
#[derive(Debug)]
pub struct RequestBuilder {
    request: Request,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            request: Request {
                protocol_major: 1,
                protocol_minor: 1,
                ..Request::default()
            },
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.request.method = method.into();
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.request.target = target.into();
        self
    }

    pub fn query_string(mut self, query: impl Into<String>) -> Self {
        self.request.query_string = query.into();
        self
    }

    pub fn version(mut self, major: u8, minor: u8) -> Self {
        self.request.protocol_major = major;
        self.request.protocol_minor = minor;
        self
    }

    /// Adds a header; the name is lower-cased the same way the parser does.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut key = key.into();
        key.make_ascii_lowercase();
        self.request.headers.insert(key, value.into());
        self
    }

    pub fn peer(mut self, peer: SocketAddr) -> Self {
        self.request.peer = Some(peer);
        self
    }

    pub fn build(self) -> Request {
        self.request
    }
}

impl Request {
    /// Creates an empty request bound to a remote address.
    pub fn with_peer(peer: SocketAddr) -> Self {
        Self {
            peer: Some(peer),
            ..Self::default()
        }
    }

    /// Retrieves a header value by name.
    ///
    /// Names are stored lower-cased, so the lookup is case-insensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use httplet::http::request::RequestBuilder;
    /// let req = RequestBuilder::new().header("Host", "example.com").build();
    /// assert_eq!(req.header("HOST"), Some("example.com"));
    /// ```
    pub fn header(&self, key: &str) -> Option<&str> {
        if let Some(v) = self.headers.get(key) {
            return Some(v.as_str());
        }
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Protocol version as `(major, minor)`.
    pub fn version(&self) -> (u8, u8) {
        (self.protocol_major, self.protocol_minor)
    }

    /// Decodes the query string as `application/x-www-form-urlencoded` pairs.
    ///
    /// `query_string` itself stays raw; decoding only happens here.
    pub fn query_pairs(&self) -> Vec<(Cow<'_, str>, Cow<'_, str>)> {
        url::form_urlencoded::parse(self.query_string.as_bytes()).collect()
    }
}
