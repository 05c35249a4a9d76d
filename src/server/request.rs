//! Reads one HTTP/1.1 request: headers up to the blank line, then exactly `Content-Length`
//! body bytes.

use std::io::Read;

pub const MAX_HEADER_BYTES: usize = 16_384;
pub const MAX_BODY_BYTES: usize = 1_048_576;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Connection closed before the request headers were complete")]
    Incomplete,

    #[error("Request headers exceed {0} bytes")]
    HeadersTooLarge(usize),

    #[error("Request body of {length} bytes exceeds the limit of {max} bytes")]
    BodyTooLarge { length: usize, max: usize },

    #[error("Invalid Content-Length header")]
    BadContentLength,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}

/// `Ok(None)` when the peer closed without sending anything.
pub fn read_request<R: Read>(reader: &mut R) -> Result<Option<HttpRequest>, RequestError> {
    let mut buf: Vec<u8> = Vec::with_capacity(4096);
    let mut chunk = [0_u8; 4096];
    let header_end = loop {
        if let Some(end) = find_header_end(&buf) {
            break end;
        }
        if buf.len() > MAX_HEADER_BYTES {
            return Err(RequestError::HeadersTooLarge(MAX_HEADER_BYTES));
        }
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            return Err(RequestError::Incomplete);
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_parts = lines.next().unwrap_or_default().split_whitespace();
    let method = request_parts.next().unwrap_or("GET").to_string();
    let path = request_parts.next().unwrap_or("/").to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .map(|(_, value)| {
            value
                .trim()
                .parse::<usize>()
                .map_err(|_| RequestError::BadContentLength)
        })
        .transpose()?
        .unwrap_or(0);
    if content_length > MAX_BODY_BYTES {
        return Err(RequestError::BodyTooLarge {
            length: content_length,
            max: MAX_BODY_BYTES,
        });
    }

    let mut body = buf.split_off(header_end);
    if body.len() < content_length {
        let already = body.len();
        body.resize(content_length, 0);
        reader.read_exact(&mut body[already..])?;
    }
    body.truncate(content_length);

    Ok(Some(HttpRequest {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    }))
}
