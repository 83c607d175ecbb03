//! Decoding of `Transfer-Encoding: chunked` bodies.
//!
//! A chunked body is a sequence of `<hex size>[;ext]\r\n<data>\r\n` records
//! closed by a zero-size chunk (optionally followed by trailers). Decoding
//! works on the complete in-memory body, so it does not matter how the bytes
//! were split across reads.

use crate::error::HttpError;

const CRLF: &[u8] = b"\r\n";

/// Decodes a complete chunked body into its payload.
///
/// Decoding stops at the zero-size terminal chunk, ignoring any trailers
/// after it, or when the input runs out between chunks. Trailing blank lines
/// are tolerated.
///
/// # Errors
///
/// Returns [`HttpError::MalformedChunk`] if a size line is not terminated,
/// is not valid hexadecimal, declares more bytes than remain, or if chunk
/// data is followed by something other than CRLF.
pub fn decode_chunked(body: &[u8]) -> Result<Vec<u8>, HttpError> {
    let mut out = Vec::with_capacity(body.len());
    let mut pos = 0;

    while pos < body.len() {
        let rest = &body[pos..];
        if rest.iter().all(u8::is_ascii_whitespace) {
            break;
        }

        let line_len = find_crlf(rest).ok_or_else(|| HttpError::MalformedChunk {
            offset: pos,
            reason: "chunk size line is not terminated by CRLF".to_string(),
        })?;
        let size = parse_size(&rest[..line_len]).ok_or_else(|| HttpError::MalformedChunk {
            offset: pos,
            reason: format!(
                "invalid chunk size '{}'",
                String::from_utf8_lossy(&rest[..line_len])
            ),
        })?;

        let data_start = pos + line_len + CRLF.len();
        if size == 0 {
            break;
        }

        let remaining = body.len() - data_start;
        if size > remaining {
            return Err(HttpError::MalformedChunk {
                offset: data_start,
                reason: format!("chunk declares {size} bytes but only {remaining} remain"),
            });
        }
        let data_end = data_start + size;
        out.extend_from_slice(&body[data_start..data_end]);
        pos = data_end;

        if body[pos..].starts_with(CRLF) {
            pos += CRLF.len();
        } else if pos < body.len() {
            return Err(HttpError::MalformedChunk {
                offset: pos,
                reason: "chunk data is not followed by CRLF".to_string(),
            });
        }
    }

    Ok(out)
}

/// Returns the offset of the first CRLF in `data`.
pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|w| w == CRLF)
}

/// Parses a chunk size line, ignoring chunk extensions after `;`.
fn parse_size(line: &[u8]) -> Option<usize> {
    let line = std::str::from_utf8(line).ok()?;
    let digits = line.split(';').next()?.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    usize::from_str_radix(digits, 16).ok()
}
