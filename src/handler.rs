//! Request handlers.
//!
//! A [`Handler`] is invoked once per successfully parsed request. It reads
//! the [`Request`] and fills in the [`Response`]; sending is done by the
//! connection afterwards.

use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

pub trait Handler: Send + Sync + 'static {
    fn handle(&self, req: &Request, res: &mut Response);
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut Response) + Send + Sync + 'static,
{
    fn handle(&self, req: &Request, res: &mut Response) {
        self(req, res)
    }
}

/// Describes the incoming request back to the client as plain text.
///
/// Only `/` and `/index.cpp` are served; anything else gets a 404 page.
#[derive(Debug, Clone)]
pub struct EchoHandler {
    server_name: String,
}

impl EchoHandler {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
        }
    }

    fn describe(req: &Request) -> String {
        let mut out = format!(
            "Your Request:\nmethod: {}\nhttp version: {}.{}\nurl: {}\n",
            req.method, req.protocol_major, req.protocol_minor, req.target
        );
        if !req.query_string.is_empty() {
            out.push_str(&format!("query string: {}\n", req.query_string));
        }

        out.push_str("headers:\n");
        let mut headers: Vec<_> = req.headers.iter().collect();
        headers.sort();
        for (k, v) in headers {
            out.push_str(&format!("{}: {}\n", k, v));
        }

        out
    }
}

impl Default for EchoHandler {
    fn default() -> Self {
        Self::new("httplet")
    }
}

impl Handler for EchoHandler {
    fn handle(&self, req: &Request, res: &mut Response) {
        res.header("Content-Type", "text/plain");
        res.header("Server", self.server_name.as_str());
        res.header("Cache-Control", "no-cache, no-store, must-revalidate");

        match req.target.as_str() {
            "/" | "/index.cpp" => {
                res.set_body(Self::describe(req));
            }
            _ => {
                tracing::debug!(path = %req.target, "No route for request");
                res.set_status(StatusCode::NOT_FOUND);
                res.error_page();
            }
        }
    }
}
