//! Test support for end-to-end bundling workflows.
//!
//! Provides a fake Closure Compiler service listening on a loopback port and
//! an on-disk public directory fixture, so integration tests can drive the
//! full resolve pipeline (bucket → stale check → compile → write → render)
//! without network access.

#![warn(missing_docs)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, SystemTime};

use crush_cache::CacheManager;
use crush_config::{ClosureConfig, CrushConfig, PathsConfig};
use tracing::debug;

/// How the fake service frames its reply body.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Body sent with a `Content-Length` header.
    Plain(String),
    /// Body sent with `Transfer-Encoding: chunked`, split into chunks of at
    /// most `chunk_size` bytes.
    Chunked {
        /// The decoded body.
        body: String,
        /// Maximum payload size of each chunk.
        chunk_size: usize,
    },
    /// Bytes written to the socket verbatim.
    Raw(Vec<u8>),
}

impl Reply {
    /// A JSON reply carrying `code` as `compiledCode`.
    pub fn compiled(code: &str) -> Self {
        Reply::Plain(compiled_json(code))
    }

    fn to_bytes(&self) -> Vec<u8> {
        match self {
            Reply::Plain(body) => format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            )
            .into_bytes(),
            Reply::Chunked { body, chunk_size } => {
                let mut out = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
                out.extend_from_slice(&encode_chunked(body.as_bytes(), *chunk_size));
                out
            }
            Reply::Raw(bytes) => bytes.clone(),
        }
    }
}

/// Frames `body` as a chunked transfer body ending in a zero-size chunk.
pub fn encode_chunked(body: &[u8], chunk_size: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in body.chunks(chunk_size.max(1)) {
        out.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        out.extend_from_slice(chunk);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"0\r\n\r\n");
    out
}

/// A minimal service response with the given compiled code and statistics.
pub fn compiled_json(code: &str) -> String {
    let escaped: String = code
        .chars()
        .flat_map(|c| match c {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            '\n' => vec!['\\', 'n'],
            c => vec![c],
        })
        .collect();
    format!(
        r#"{{"compiledCode":"{escaped}","statistics":{{"originalSize":{orig},"compressedSize":{comp},"compileTime":0}}}}"#,
        orig = code.len() * 2,
        comp = code.len(),
    )
}

/// One request received by the fake service.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Request line and headers.
    pub head: String,
    /// The form-encoded body.
    pub body: String,
}

impl CapturedRequest {
    /// Decoded values of form field `key`, in order.
    pub fn form_values(&self, key: &str) -> Vec<String> {
        url::form_urlencoded::parse(self.body.as_bytes())
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .collect()
    }

    /// Value of header `name`, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }
}

/// A loopback HTTP server standing in for the Closure Compiler service.
///
/// Every connection gets the same canned reply. Requests are captured for
/// inspection. The server stops when dropped.
pub struct FakeCompilerServer {
    port: u16,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    reply: Arc<Mutex<Reply>>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeCompilerServer {
    /// Starts the server on an ephemeral port.
    pub fn start(reply: Reply) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let reply = Arc::new(Mutex::new(reply));
        let stop = Arc::new(AtomicBool::new(false));

        let handle = {
            let requests = Arc::clone(&requests);
            let reply = Arc::clone(&reply);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                for stream in listener.incoming() {
                    if stop.load(Ordering::SeqCst) {
                        break;
                    }
                    let Ok(stream) = stream else { continue };
                    if let Err(e) = serve(stream, &requests, &reply) {
                        debug!(error = %e, "fake compiler connection failed");
                    }
                }
            })
        };

        Ok(Self {
            port,
            requests,
            reply,
            stop,
            handle: Some(handle),
        })
    }

    /// The port the server listens on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Replaces the reply served to subsequent requests.
    pub fn set_reply(&self, reply: Reply) {
        *lock(&self.reply) = reply;
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// A `[closure]` section pointing at this server.
    pub fn closure_config(&self) -> ClosureConfig {
        ClosureConfig {
            host: "127.0.0.1".to_string(),
            port: self.port,
            path: "/compile".to_string(),
            timeout_secs: 5,
            ..ClosureConfig::default()
        }
    }
}

impl Drop for FakeCompilerServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        // Wake the blocking accept so the thread sees the flag.
        let _ = TcpStream::connect(("127.0.0.1", self.port));
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn serve(
    mut stream: TcpStream,
    requests: &Mutex<Vec<CapturedRequest>>,
    reply: &Mutex<Reply>,
) -> std::io::Result<()> {
    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    let mut received = Vec::new();
    let mut buf = [0u8; 4096];

    let (head, body) = loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Ok(());
        }
        received.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&received).into_owned();
        if let Some((head, body)) = text.split_once("\r\n\r\n") {
            let declared = head
                .lines()
                .find_map(|l| {
                    let (k, v) = l.split_once(':')?;
                    k.eq_ignore_ascii_case("content-length").then(|| v.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if body.len() >= declared {
                break (head.to_string(), body.to_string());
            }
        }
    };

    lock(requests).push(CapturedRequest { head, body });
    let bytes = lock(reply).to_bytes();
    stream.write_all(&bytes)?;
    stream.flush()
}

/// A temporary public directory holding asset sources.
pub struct PublicDir {
    dir: tempfile::TempDir,
}

impl PublicDir {
    /// Creates an empty public directory.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// The directory root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `rel`.
    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Writes a source file, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Sets the modification time of `path`.
    pub fn set_mtime(path: &Path, time: SystemTime) -> std::io::Result<()> {
        std::fs::File::options()
            .write(true)
            .open(path)?
            .set_modified(time)
    }

    /// A configuration serving this directory at `/` with bundles under
    /// `cache/`, compiling scripts through `closure`.
    pub fn config(&self, closure: ClosureConfig) -> CrushConfig {
        CrushConfig {
            paths: PathsConfig {
                public_dir: self.dir.path().to_string_lossy().into_owned(),
                cache_dir: "cache".to_string(),
                asset_url: "/".to_string(),
            },
            closure,
        }
    }

    /// A cache manager for this directory wired to the fake compiler.
    pub fn manager(&self, server: &FakeCompilerServer) -> CacheManager {
        CacheManager::from_config(&self.config(server.closure_config()), self.dir.path())
    }

    /// Names of the files currently in the cache directory, sorted.
    pub fn cache_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.join("cache")) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
