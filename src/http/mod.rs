//! HTTP/1.x protocol implementation.
//!
//! Each connection serves a single request and is closed afterwards. There is
//! no keep-alive, no pipelining and request bodies are never read.
//!
//! # Architecture
//!
//! - **`sanitize`**: Drops `<`, `>`, `"` and `'` from the URL and query string
//! - **`parser`**: Resumable byte scanner filling a [`request::Request`]
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation, status codes and error page
//! - **`writer`**: Serializes a response and writes it as head + body
//! - **`connection`**: Drives one exchange on a stream
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Feed chunks to the parser until the blank line
//!        └──────┬──────┘
//!               │ Blank line or EOF       (EOF before any byte → Closed)
//!               ▼                         (head too large → 413 → Writing)
//!        ┌──────────────────┐
//!        │   Processing     │ ← 400 page on has_error, otherwise the handler
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Head block, then body
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use httplet::config::Config;
//! use httplet::handler::EchoHandler;
//! use httplet::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(Config::default());
//!     let handler = Arc::new(EchoHandler::default());
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, addr) = listener.accept().await?;
//!         let (config, handler) = (config.clone(), handler.clone());
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, Some(addr), handler, config);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod sanitize;
pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
