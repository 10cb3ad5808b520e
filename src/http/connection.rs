use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::Config;
use crate::handler::Handler;
use crate::http::parser::{ParseStatus, RequestParser};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// One client connection serving exactly one exchange.
pub struct Connection<S> {
    stream: S,
    peer: Option<SocketAddr>,
    buffer: BytesMut,
    parser: RequestParser,
    /// True while the raw line being read holds nothing but `\r`.
    line_empty: bool,
    handler: Arc<dyn Handler>,
    config: Arc<Config>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading(Request),
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

enum ReadOutcome {
    Complete,
    /// Peer closed the stream before sending any byte.
    Eof,
    TooLarge,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        stream: S,
        peer: Option<SocketAddr>,
        handler: Arc<dyn Handler>,
        config: Arc<Config>,
    ) -> Self {
        let request = match peer {
            Some(addr) => Request::with_peer(addr),
            None => Request::default(),
        };

        Self {
            stream,
            peer,
            buffer: BytesMut::with_capacity(config.recv_buffer_size),
            parser: RequestParser::new(),
            line_empty: false,
            handler,
            config,
            state: ConnectionState::Reading(request),
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading(mut req) => match self.read_request(&mut req).await? {
                    ReadOutcome::Complete => {
                        self.state = ConnectionState::Processing(req);
                    }
                    ReadOutcome::Eof => {
                        tracing::debug!(
                            peer = ?self.peer,
                            "Client closed connection without sending a request"
                        );
                    }
                    ReadOutcome::TooLarge => {
                        tracing::warn!(
                            peer = ?self.peer,
                            bytes = self.parser.bytes_seen(),
                            limit = self.config.max_head_size,
                            "Request head too large"
                        );
                        let mut res = Response::for_request(&req);
                        res.set_status(StatusCode::PAYLOAD_TOO_LARGE);
                        res.error_page();
                        self.state = ConnectionState::Writing(ResponseWriter::new(&mut res));
                    }
                },

                ConnectionState::Processing(req) => {
                    let mut res = self.respond(&req);
                    self.state = ConnectionState::Writing(ResponseWriter::new(&mut res));
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(peer = ?self.peer, error = %e, "Shutdown failed");
        }

        Ok(())
    }

    async fn read_request(&mut self, req: &mut Request) -> anyhow::Result<ReadOutcome> {
        loop {
            self.buffer.clear();
            let n = self
                .stream
                .read_buf(&mut self.buffer)
                .await
                .context("failed to read request")?;

            if n == 0 {
                if self.parser.bytes_seen() == 0 {
                    return Ok(ReadOutcome::Eof);
                }
                tracing::debug!(
                    peer = ?self.peer,
                    bytes = self.parser.bytes_seen(),
                    "Client closed connection mid-head"
                );
                self.parser.finish(req);
                return Ok(ReadOutcome::Complete);
            }

            // Never scan past the head limit, even within a single read.
            let room = self.config.max_head_size - self.parser.bytes_seen();
            let mut take = n.min(room);

            let head_end = find_head_end(&mut self.line_empty, &self.buffer[..take]);
            if let Some(end) = head_end {
                take = end;
            }

            let status = self.parser.feed(req, &self.buffer[..take]);

            // An empty line ends the head even when the request line never
            // reached the header section.
            if status == ParseStatus::Incomplete && head_end.is_some() {
                self.parser.finish(req);
            }

            if self.parser.is_complete() {
                return Ok(ReadOutcome::Complete);
            }

            if self.parser.bytes_seen() >= self.config.max_head_size {
                return Ok(ReadOutcome::TooLarge);
            }
        }
    }

    fn respond(&self, req: &Request) -> Response {
        let mut res = Response::for_request(req);

        if req.has_error {
            tracing::warn!(
                peer = ?self.peer,
                method = %req.method,
                major = req.protocol_major,
                minor = req.protocol_minor,
                "Rejecting malformed request"
            );
            res.set_status(StatusCode::BAD_REQUEST);
            res.error_page();
            return res;
        }

        self.handler.handle(req, &mut res);

        tracing::info!(
            peer = ?self.peer,
            method = %req.method,
            path = %req.target,
            status = %res.status,
            "Request handled"
        );

        res
    }
}

/// Returns the index just past the first empty line (`\n\n` or `\n\r\n`)
/// in `chunk`, carrying the line state across calls in `line_empty`.
fn find_head_end(line_empty: &mut bool, chunk: &[u8]) -> Option<usize> {
    for (i, &b) in chunk.iter().enumerate() {
        match b {
            b'\n' if *line_empty => return Some(i + 1),
            b'\n' => *line_empty = true,
            b'\r' => {}
            _ => *line_empty = false,
        }
    }
    None
}
