//! Splitting a raw HTTP/1.1 response into status, headers and body.

use crate::chunked::decode_chunked;
use crate::error::HttpError;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// A fully read and de-framed HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code from the status line.
    pub status: u16,
    /// Reason phrase from the status line (may be empty).
    pub reason: String,
    /// Header fields in the order received.
    pub headers: Vec<(String, String)>,
    /// Body with any chunked framing removed.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns the first header value whose name matches case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Parses a complete raw response as read from a closed connection.
///
/// The head is everything before the first blank line. A body sent with
/// `Transfer-Encoding: chunked` is decoded; otherwise, if `Content-Length`
/// is present, the body is cut to that length.
///
/// # Errors
///
/// Returns [`HttpError::Protocol`] if there is no blank line separating the
/// head from the body, the status line is malformed, or the body is shorter
/// than its declared `Content-Length`. Chunk decoding failures surface as
/// [`HttpError::MalformedChunk`].
pub fn parse_response(raw: &[u8]) -> Result<HttpResponse, HttpError> {
    let head_len = raw
        .windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
        .ok_or_else(|| HttpError::Protocol {
            reason: "no blank line between headers and body".to_string(),
        })?;

    let head = String::from_utf8_lossy(&raw[..head_len]);
    let body = &raw[head_len + HEAD_TERMINATOR.len()..];

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let (status, reason) = parse_status_line(status_line)?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect();

    let mut response = HttpResponse {
        status,
        reason,
        headers,
        body: Vec::new(),
    };

    let chunked = response
        .headers
        .iter()
        .any(|(k, v)| {
            k.eq_ignore_ascii_case("transfer-encoding") && v.to_ascii_lowercase().contains("chunked")
        });

    response.body = if chunked {
        decode_chunked(body)?
    } else if let Some(length) = response.header("content-length") {
        let length: usize = length.parse().map_err(|_| HttpError::Protocol {
            reason: format!("invalid Content-Length '{length}'"),
        })?;
        if body.len() < length {
            return Err(HttpError::Protocol {
                reason: format!(
                    "body truncated: Content-Length is {length} but only {} bytes arrived",
                    body.len()
                ),
            });
        }
        body[..length].to_vec()
    } else {
        body.to_vec()
    };

    Ok(response)
}

/// Parses `HTTP/1.1 200 OK` into `(200, "OK")`.
fn parse_status_line(line: &str) -> Result<(u16, String), HttpError> {
    let malformed = || HttpError::Protocol {
        reason: format!("malformed status line '{line}'"),
    };

    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(malformed());
    }
    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(malformed)?;
    let reason = parts.next().unwrap_or_default().to_string();
    Ok((status, reason))
}
