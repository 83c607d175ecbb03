//! One-shot `POST` over a raw TCP connection.

use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::HttpError;
use crate::response::{parse_response, HttpResponse};

/// Timeout applied when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP/1.1 client bound to a single host.
///
/// Every request opens a new connection, sends `Connection: close` and reads
/// until the server hangs up. There is no connection reuse, pipelining or
/// retry. Connecting, writing and reading are each bounded by the configured
/// timeout; expiry is reported as [`HttpError::Connection`].
#[derive(Debug, Clone)]
pub struct RawHttpClient {
    host: String,
    port: u16,
    timeout: Duration,
    referer: Option<String>,
}

impl RawHttpClient {
    /// Creates a client for `host:port` with the default timeout and no referer.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
            referer: None,
        }
    }

    /// Sets the connect/read/write timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `Referer` header sent with each request.
    pub fn with_referer(mut self, referer: Option<String>) -> Self {
        self.referer = referer;
        self
    }

    /// The `host:port` this client talks to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Serializes a form `POST` request for `path` carrying `body`.
    pub fn build_request(&self, path: &str, body: &str) -> Vec<u8> {
        let mut request = format!("POST {path} HTTP/1.1\r\nHost: {}\r\n", self.host);
        if let Some(referer) = &self.referer {
            request.push_str(&format!("Referer: {referer}\r\n"));
        }
        request.push_str("Content-Type: application/x-www-form-urlencoded\r\n");
        request.push_str(&format!("Content-Length: {}\r\n", body.len()));
        request.push_str("Connection: close\r\n\r\n");

        let mut bytes = request.into_bytes();
        bytes.extend_from_slice(body.as_bytes());
        bytes
    }

    /// Sends a URL-encoded form to `path` and returns the de-framed response.
    ///
    /// # Errors
    ///
    /// [`HttpError::Connection`] when the host cannot be resolved or reached
    /// or the exchange fails or times out; [`HttpError::Protocol`] and
    /// [`HttpError::MalformedChunk`] when the response cannot be framed.
    pub fn post_form(&self, path: &str, body: &str) -> Result<HttpResponse, HttpError> {
        let addr = self.addr();
        let connection_error = |source: std::io::Error| HttpError::Connection {
            addr: addr.clone(),
            source,
        };

        let deadline = Instant::now() + self.timeout;
        let mut stream = self.connect().map_err(connection_error)?;
        stream
            .set_write_timeout(Some(self.timeout))
            .map_err(connection_error)?;

        debug!(addr = %addr, path, body_len = body.len(), "sending POST");
        stream
            .write_all(&self.build_request(path, body))
            .map_err(connection_error)?;
        stream.flush().map_err(connection_error)?;

        let raw = read_until_deadline(&mut stream, deadline).map_err(connection_error)?;
        debug!(addr = %addr, bytes = raw.len(), "response received");

        let response = parse_response(&raw)?;
        if !response.is_success() {
            warn!(
                addr = %addr,
                status = response.status,
                reason = %response.reason,
                "non-success status from compiler service"
            );
        }
        Ok(response)
    }

    /// Connects to the first resolved address that accepts within the timeout.
    fn connect(&self) -> std::io::Result<TcpStream> {
        let mut last_err = None;
        for sock_addr in (self.host.as_str(), self.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&sock_addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            std::io::Error::new(
                ErrorKind::NotFound,
                format!("no addresses found for {}", self.host),
            )
        }))
    }
}

/// Reads until the peer closes the connection or `deadline` passes.
///
/// Each read waits at most for the time left, so a peer trickling bytes
/// cannot stretch the exchange past the deadline.
fn read_until_deadline(stream: &mut TcpStream, deadline: Instant) -> std::io::Result<Vec<u8>> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            return Err(std::io::Error::new(
                ErrorKind::TimedOut,
                "response not complete before the deadline",
            ));
        }
        stream.set_read_timeout(Some(left))?;
        match stream.read(&mut buf) {
            Ok(0) => return Ok(raw),
            Ok(n) => raw.extend_from_slice(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Err(std::io::Error::new(ErrorKind::TimedOut, e));
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    /// Accepts one connection, captures the request and replies with `response`.
    fn serve_once(response: &'static [u8]) -> (u16, thread::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            // Read until the full head plus declared body has arrived.
            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_string();
                    let len: usize = head
                        .lines()
                        .find_map(|l| l.strip_prefix("Content-Length: "))
                        .map(|v| v.trim().parse().unwrap())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + len {
                        break;
                    }
                }
            }
            stream.write_all(response).unwrap();
            request
        });
        (port, handle)
    }

    #[test]
    fn request_layout() {
        let client = RawHttpClient::new("closure-compiler.appspot.com", 80)
            .with_referer(Some("https://example.com/".to_string()));
        let request = String::from_utf8(client.build_request("/compile", "a=1&b=2")).unwrap();
        assert_eq!(
            request,
            "POST /compile HTTP/1.1\r\n\
             Host: closure-compiler.appspot.com\r\n\
             Referer: https://example.com/\r\n\
             Content-Type: application/x-www-form-urlencoded\r\n\
             Content-Length: 7\r\n\
             Connection: close\r\n\
             \r\n\
             a=1&b=2"
        );
    }

    #[test]
    fn request_without_referer() {
        let client = RawHttpClient::new("localhost", 80);
        let request = String::from_utf8(client.build_request("/compile", "")).unwrap();
        assert!(!request.contains("Referer"));
        assert!(request.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn content_length_counts_bytes() {
        let client = RawHttpClient::new("localhost", 80);
        let request = String::from_utf8(client.build_request("/compile", "é")).unwrap();
        assert!(request.contains("Content-Length: 2\r\n"));
    }

    #[test]
    fn post_plain_response() {
        let (port, server) = serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok");
        let client = RawHttpClient::new("127.0.0.1", port);
        let resp = client.post_form("/compile", "js_code=x").unwrap();
        assert_eq!(resp.body, b"ok");

        let request = String::from_utf8(server.join().unwrap()).unwrap();
        assert!(request.starts_with("POST /compile HTTP/1.1\r\n"));
        assert!(request.ends_with("\r\n\r\njs_code=x"));
    }

    #[test]
    fn post_chunked_response() {
        let (port, server) = serve_once(
            b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc\r\n2\r\nde\r\n0\r\n\r\n",
        );
        let client = RawHttpClient::new("127.0.0.1", port);
        let resp = client.post_form("/compile", "").unwrap();
        assert_eq!(resp.body, b"abcde");
        server.join().unwrap();
    }

    #[test]
    fn trickling_server_hits_overall_deadline() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            // One byte every 100ms keeps each read alive for about 4s in total.
            for byte in b"HTTP/1.1 200 OK\r\nContent-Length: 20\r\n\r\n" {
                if stream.write_all(&[*byte]).is_err() {
                    break;
                }
                thread::sleep(Duration::from_millis(100));
            }
        });

        let client = RawHttpClient::new("127.0.0.1", port).with_timeout(Duration::from_millis(300));
        let started = Instant::now();
        let err = client.post_form("/compile", "js_code=x").unwrap_err();
        let elapsed = started.elapsed();

        match err {
            HttpError::Connection { source, .. } => {
                assert_eq!(source.kind(), ErrorKind::TimedOut);
            }
            other => panic!("expected Connection error, got {other:?}"),
        }
        assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
        server.join().unwrap();
    }

    #[test]
    fn refused_connection_is_connection_error() {
        // Bind then drop to find a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = RawHttpClient::new("127.0.0.1", port).with_timeout(Duration::from_secs(2));
        let err = client.post_form("/compile", "").unwrap_err();
        assert!(matches!(err, HttpError::Connection { .. }));
    }

    #[test]
    fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_millis(800));
            drop(stream);
        });

        let client =
            RawHttpClient::new("127.0.0.1", port).with_timeout(Duration::from_millis(200));
        let err = client.post_form("/compile", "").unwrap_err();
        assert!(matches!(err, HttpError::Connection { .. }));
        server.join().unwrap();
    }

    #[test]
    fn response_without_separator_is_protocol_error() {
        let (port, server) = serve_once(b"HTTP/1.1 200 OK\r\n");
        let client = RawHttpClient::new("127.0.0.1", port);
        let err = client.post_form("/compile", "").unwrap_err();
        assert!(matches!(err, HttpError::Protocol { .. }));
        server.join().unwrap();
    }
}
