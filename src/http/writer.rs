use anyhow::Context;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Serializes the status line and header block, including the blank line.
///
/// The response is not modified; call [`Response::prepare`] first to get the
/// forced `Content-Length` and `Connection` headers.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);

    // Status line
    let status_line = format!(
        "HTTP/1.{} {} {}\r\n",
        resp.minor_version(),
        resp.status.as_u16(),
        resp.status.reason_phrase().unwrap_or("")
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Prepares `resp` and returns its complete wire form.
pub fn serialize_response(resp: &mut Response) -> Vec<u8> {
    resp.prepare();

    let mut buf = serialize_head(resp);
    buf.extend_from_slice(&resp.body);
    buf
}

/// Sends one response as two ordered writes: header block, then body.
pub struct ResponseWriter {
    head: Vec<u8>,
    body: Vec<u8>,
}

impl ResponseWriter {
    pub fn new(response: &mut Response) -> Self {
        response.prepare();

        Self {
            head: serialize_head(response),
            body: response.body.clone(),
        }
    }

    pub fn head(&self) -> &[u8] {
        &self.head
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Writes the header block and then the body.
    ///
    /// Fails on the first write error or zero-length write; the body is never
    /// attempted after a failed header write.
    pub async fn write_to_stream<W>(&self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        write_fully(stream, &self.head)
            .await
            .context("failed to write response head")?;
        write_fully(stream, &self.body)
            .await
            .context("failed to write response body")?;
        stream.flush().await.context("failed to flush response")?;
        Ok(())
    }
}

async fn write_fully<W>(stream: &mut W, buf: &[u8]) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;

    while written < buf.len() {
        let n = stream.write(&buf[written..]).await?;

        if n == 0 {
            return Err(anyhow::anyhow!("connection closed while writing"));
        }

        written += n;
    }

    Ok(())
}
