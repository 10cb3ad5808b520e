//! Byte-at-a-time HTTP/1.x request head scanner.
//!
//! The scanner walks the request line and header block in a single forward
//! pass. Its position and the partially accumulated token live in
//! [`RequestParser`], so the head may arrive split across any number of reads.
//!
//! Malformed input never produces an error value. A protocol token other than
//! `HTTP` or a major version other than 1 sets [`Request::has_error`] and the
//! caller decides what to answer.

use crate::http::request::Request;
use crate::http::sanitize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// The header block has not been terminated yet.
    Incomplete,
    /// The empty line after the headers was seen.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Method,
    Url,
    QueryString,
    Protocol,
    Major,
    Minor,
    Headers,
    Done,
}

/// Resumable request head parser.
///
/// ```
/// # use httplet::http::parser::{ParseStatus, RequestParser};
/// # use httplet::http::request::Request;
/// let mut parser = RequestParser::new();
/// let mut req = Request::default();
///
/// assert_eq!(parser.feed(&mut req, b"GET /a?b=1 HT"), ParseStatus::Incomplete);
/// assert_eq!(parser.feed(&mut req, b"TP/1.1\r\n\r\n"), ParseStatus::Complete);
/// assert_eq!(req.target, "/a");
/// assert_eq!(req.query_string, "b=1");
/// assert!(!req.has_error);
/// ```
#[derive(Debug)]
pub struct RequestParser {
    state: State,
    token: Vec<u8>,
    /// Header line sub-mode: collecting the name (true) or the value.
    in_key: bool,
    /// Name the value bytes belong to.
    current_key: Option<String>,
    /// One leading space after the colon is still allowed to be skipped.
    skip_space: bool,
    /// Current header line holds nothing but carriage returns so far.
    blank_line: bool,
    seen: usize,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self {
            state: State::Method,
            token: Vec::with_capacity(64),
            in_key: true,
            current_key: None,
            skip_space: false,
            blank_line: true,
            seen: 0,
        }
    }

    /// Number of bytes scanned so far.
    pub fn bytes_seen(&self) -> usize {
        self.seen
    }

    pub fn is_complete(&self) -> bool {
        self.state == State::Done
    }

    /// Scans `chunk` and updates `req` in place.
    ///
    /// Bytes after the end of the header block are ignored.
    pub fn feed(&mut self, req: &mut Request, chunk: &[u8]) -> ParseStatus {
        for &b in chunk {
            if self.state == State::Done {
                break;
            }
            self.seen += 1;
            self.step(req, b);
        }

        if self.state == State::Done {
            ParseStatus::Complete
        } else {
            ParseStatus::Incomplete
        }
    }

    /// Ends the scan at end of input.
    ///
    /// A header value still being collected is stored. Request-line tokens
    /// that were never terminated are discarded, leaving those fields empty.
    pub fn finish(&mut self, req: &mut Request) {
        if self.state == State::Done {
            return;
        }
        if self.state == State::Headers && !self.in_key {
            self.commit_value(req);
        }
        self.complete(req);
    }

    fn step(&mut self, req: &mut Request, b: u8) {
        match self.state {
            State::Method => {
                if b == b' ' {
                    req.method = self.take_token();
                    self.state = State::Url;
                } else {
                    self.token.push(b);
                }
            }

            State::Url => match b {
                b' ' => {
                    req.target = self.take_token();
                    self.state = State::Protocol;
                }
                b'?' => {
                    req.target = self.take_token();
                    self.state = State::QueryString;
                }
                _ => sanitize::push_filtered(&mut self.token, b),
            },

            State::QueryString => {
                if b == b' ' {
                    req.query_string = self.take_token();
                    self.state = State::Protocol;
                } else {
                    sanitize::push_filtered(&mut self.token, b);
                }
            }

            State::Protocol => {
                if b == b'/' {
                    if self.token != b"HTTP" {
                        req.has_error = true;
                    }
                    self.token.clear();
                    self.state = State::Major;
                } else {
                    self.token.push(b);
                }
            }

            // Each digit replaces the previous one; "12" reads as 2.
            State::Major => {
                if b.is_ascii_digit() {
                    req.protocol_major = b - b'0';
                } else if b == b'.' {
                    self.state = State::Minor;
                }
            }

            State::Minor => {
                if b.is_ascii_digit() {
                    req.protocol_minor = b - b'0';
                } else if b == b'\n' {
                    self.start_line();
                    self.state = State::Headers;
                }
            }

            State::Headers => self.header_byte(req, b),

            State::Done => {}
        }
    }

    fn header_byte(&mut self, req: &mut Request, b: u8) {
        if b == b'\n' {
            if self.in_key && self.blank_line {
                self.complete(req);
                return;
            }
            if !self.in_key {
                self.commit_value(req);
            }
            self.start_line();
            return;
        }

        if b != b'\r' {
            self.blank_line = false;
        }

        if self.in_key {
            if b == b':' {
                let mut key = self.take_token();
                key.make_ascii_lowercase();
                req.headers.insert(key.clone(), String::new());
                self.current_key = Some(key);
                self.in_key = false;
                self.skip_space = true;
            } else {
                self.token.push(b);
            }
            return;
        }

        match b {
            b'\r' => {}
            b' ' if self.skip_space => self.skip_space = false,
            _ => {
                self.skip_space = false;
                self.token.push(b);
            }
        }
    }

    fn start_line(&mut self) {
        self.token.clear();
        self.in_key = true;
        self.current_key = None;
        self.skip_space = false;
        self.blank_line = true;
    }

    fn commit_value(&mut self, req: &mut Request) {
        if let Some(key) = self.current_key.take() {
            let value = self.take_token();
            req.headers.insert(key, value);
        }
    }

    fn complete(&mut self, req: &mut Request) {
        if req.protocol_major != 1 {
            req.has_error = true;
        }
        self.token.clear();
        self.state = State::Done;
    }

    fn take_token(&mut self) -> String {
        let s = String::from_utf8_lossy(&self.token).into_owned();
        self.token.clear();
        s
    }
}

/// Parses `buf` into `req` as one complete input.
pub fn parse_into(req: &mut Request, buf: &[u8]) {
    let mut parser = RequestParser::new();
    parser.feed(req, buf);
    parser.finish(req);
}

/// Parses `buf` into a fresh [`Request`].
pub fn parse_http_request(buf: &[u8]) -> Request {
    let mut req = Request::default();
    parse_into(&mut req, buf);
    req
}
