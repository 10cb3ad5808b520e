use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use httplet::http::request::RequestBuilder;
use httplet::http::response::{Response, StatusCode};
use httplet::http::writer::{ResponseWriter, serialize_head, serialize_response};
use tokio::io::AsyncWrite;

/// Sink that accepts at most `max_chunk` bytes per write and fails on the
/// `fail_on`-th write call.
#[derive(Default)]
struct TestSink {
    data: Vec<u8>,
    calls: usize,
    max_chunk: Option<usize>,
    fail_on: Option<usize>,
    zero_on: Option<usize>,
}

impl AsyncWrite for TestSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let call = self.calls;
        self.calls += 1;

        if self.fail_on == Some(call) {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe")));
        }
        if self.zero_on == Some(call) {
            return Poll::Ready(Ok(0));
        }

        let n = self.max_chunk.map_or(buf.len(), |max| max.min(buf.len()));
        self.data.extend_from_slice(&buf[..n]);
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn test_serialize_response_layout() {
    let req = RequestBuilder::new().version(1, 1).build();
    let mut res = Response::for_request(&req);
    res.header("Content-Type", "text/plain");
    res.set_body("hi");

    let out = text(&serialize_response(&mut res));

    assert_eq!(
        out,
        "HTTP/1.1 200 OK\r\n\
         Connection: close\r\n\
         Content-Length: 2\r\n\
         Content-Type: text/plain\r\n\
         \r\n\
         hi"
    );
}

#[test]
fn test_serialize_http10_status_line() {
    let req = RequestBuilder::new().version(1, 0).build();
    let mut res = Response::for_request(&req);

    let out = text(&serialize_response(&mut res));
    assert!(out.starts_with("HTTP/1.0 200 OK\r\n"));
}

#[test]
fn test_serialize_unknown_status_has_empty_reason() {
    let mut res = Response::default();
    res.set_status(StatusCode::new(299));

    let out = text(&serialize_response(&mut res));
    assert!(out.starts_with("HTTP/1.1 299 \r\n"));
}

#[test]
fn test_serialize_overrides_caller_content_length() {
    let mut res = Response::ok("four");
    res.header("Content-Length", "999");
    res.header("connection", "keep-alive");

    let out = text(&serialize_response(&mut res));

    assert!(out.contains("Content-Length: 4\r\n"));
    assert!(out.contains("Connection: close\r\n"));
    assert!(!out.contains("999"));
    assert!(!out.contains("keep-alive"));
}

#[test]
fn test_serialize_is_idempotent() {
    let mut res = Response::ok("same");
    res.header("X-A", "1");

    let first = serialize_response(&mut res);
    let second = serialize_response(&mut res);
    assert_eq!(first, second);

    res.set_body("different");
    let third = text(&serialize_response(&mut res));
    assert!(third.contains("Content-Length: 9\r\n"));
}

#[test]
fn test_serialize_head_ends_with_blank_line() {
    let mut res = Response::ok("body");
    res.prepare();

    let head = serialize_head(&res);
    assert!(head.ends_with(b"\r\n\r\n"));
    assert!(!text(&head).contains("body"));
}

#[test]
fn test_writer_splits_head_and_body() {
    let mut res = Response::ok("payload");
    let writer = ResponseWriter::new(&mut res);

    assert_eq!(writer.body(), b"payload");
    assert!(text(writer.head()).contains("Content-Length: 7\r\n"));
    assert_eq!(res.get_header("Connection"), Some("close"));
}

#[tokio::test]
async fn test_writer_writes_everything() {
    let mut res = Response::ok("hello world");
    let expected = serialize_response(&mut res.clone());
    let writer = ResponseWriter::new(&mut res);

    let mut out: Vec<u8> = Vec::new();
    writer.write_to_stream(&mut out).await.unwrap();

    assert_eq!(out, expected);
}

#[tokio::test]
async fn test_writer_handles_partial_writes() {
    let mut res = Response::ok("a body longer than three bytes");
    let expected = serialize_response(&mut res.clone());
    let writer = ResponseWriter::new(&mut res);

    let mut sink = TestSink {
        max_chunk: Some(3),
        ..TestSink::default()
    };
    writer.write_to_stream(&mut sink).await.unwrap();

    assert_eq!(sink.data, expected);
    assert!(sink.calls > 2);
}

#[tokio::test]
async fn test_writer_head_failure_skips_body() {
    let mut res = Response::ok("never sent");
    let writer = ResponseWriter::new(&mut res);

    let mut sink = TestSink {
        fail_on: Some(0),
        ..TestSink::default()
    };
    let err = writer.write_to_stream(&mut sink).await.unwrap_err();

    assert!(err.to_string().contains("head"));
    assert_eq!(sink.calls, 1);
    assert!(sink.data.is_empty());
}

#[tokio::test]
async fn test_writer_body_failure_after_head() {
    let mut res = Response::ok("body");
    let writer = ResponseWriter::new(&mut res);
    let head_len = writer.head().len();

    let mut sink = TestSink {
        fail_on: Some(1),
        ..TestSink::default()
    };
    let err = writer.write_to_stream(&mut sink).await.unwrap_err();

    assert!(err.to_string().contains("body"));
    assert_eq!(sink.data.len(), head_len);
}

#[tokio::test]
async fn test_writer_zero_length_write_fails() {
    let mut res = Response::ok("x");
    let writer = ResponseWriter::new(&mut res);

    let mut sink = TestSink {
        zero_on: Some(0),
        ..TestSink::default()
    };

    assert!(writer.write_to_stream(&mut sink).await.is_err());
    assert_eq!(sink.calls, 1);
}
