//! Remote compilation of script bundles.

use std::time::Duration;

use crush_config::ClosureConfig;
use crush_http::RawHttpClient;
use tracing::{debug, warn};

use crate::banner::{render_banner, LINE_BREAK};
use crate::error::CompileError;
use crate::request::{CompileOptions, CompileRequest, ScriptSource};
use crate::response::CompileResponse;

/// Timestamp format of the banner's `Generated:` line.
const GENERATED_FORMAT: &str = "%Y/%m/%d %H:%M:%S %Z";

/// Sends script bundles to the Closure Compiler service.
///
/// One blocking round-trip per call. Errors reported by the compiler about
/// the code itself do not fail the call: they are logged, included in the
/// debug banner when enabled, and whatever code came back is returned.
#[derive(Debug, Clone)]
pub struct RemoteCompiler {
    client: RawHttpClient,
    path: String,
    options: CompileOptions,
}

impl RemoteCompiler {
    /// Creates a compiler posting to `path` through `client`.
    pub fn new(client: RawHttpClient, path: impl Into<String>, options: CompileOptions) -> Self {
        Self {
            client,
            path: path.into(),
            options,
        }
    }

    /// Creates a compiler from the `[closure]` configuration section.
    pub fn from_config(config: &ClosureConfig) -> Self {
        let client = RawHttpClient::new(config.host.clone(), config.port)
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_referer(config.referer.clone());
        Self::new(client, config.path.clone(), CompileOptions::from(config))
    }

    /// The options applied to every request.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Posts `sources` and decodes the service's reply.
    pub fn compile(&self, sources: &[ScriptSource]) -> Result<CompileResponse, CompileError> {
        let body = CompileRequest::new(sources, &self.options).to_form_body();
        debug!(
            addr = %self.client.addr(),
            sources = sources.len(),
            level = %self.options.compilation_level,
            "requesting remote compilation"
        );

        let response = self.client.post_form(&self.path, &body)?;
        let decoded = CompileResponse::from_json(&response.body)?;

        for server_error in &decoded.server_errors {
            warn!(
                code = ?server_error.code,
                error = server_error.error.as_deref().unwrap_or_default(),
                "compiler service rejected the request"
            );
        }
        if !decoded.errors.is_empty() {
            warn!(
                errors = decoded.errors.len(),
                warnings = decoded.warnings.len(),
                "compiler reported errors"
            );
        }
        Ok(decoded)
    }

    /// Compiles `sources` into the final bundle text.
    ///
    /// With `debug` enabled the console banner comes first. The compiled code
    /// is always followed by a line break.
    pub fn compress(&self, sources: &[ScriptSource]) -> Result<String, CompileError> {
        let response = self.compile(sources)?;
        let generated = chrono::Local::now().format(GENERATED_FORMAT).to_string();
        Ok(self.render(&response, &generated))
    }

    /// Assembles the bundle text from a decoded response.
    pub fn render(&self, response: &CompileResponse, generated: &str) -> String {
        let mut out = String::new();
        if self.options.debug {
            out.push_str(&render_banner(response, generated));
        }
        match &response.compiled_code {
            Some(code) => out.push_str(code),
            None => warn!("compiler response has no compiledCode"),
        }
        out.push_str(LINE_BREAK);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crush_http::HttpError;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one request with an HTTP 200 carrying `body`, returning the request text.
    fn serve_json(body: &'static str) -> (u16, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            // Read until the head and the declared body have both arrived.
            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some((head, received)) = text.split_once("\r\n\r\n") {
                    let len: usize = head
                        .lines()
                        .find_map(|l| l.strip_prefix("Content-Length: "))
                        .map(|v| v.trim().parse().unwrap())
                        .unwrap_or(0);
                    if received.len() >= len {
                        break;
                    }
                }
            }
            let reply = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).unwrap();
            String::from_utf8(request).unwrap()
        });
        (port, handle)
    }

    fn compiler(port: u16, options: CompileOptions) -> RemoteCompiler {
        let client = RawHttpClient::new("127.0.0.1", port).with_timeout(Duration::from_secs(5));
        RemoteCompiler::new(client, "/compile", options)
    }

    #[test]
    fn compress_returns_code_with_line_break() {
        let (port, server) = serve_json(r#"{"compiledCode":"var a=1,b=a+1;"}"#);
        let sources = vec![
            ScriptSource::new("js/a.js", "var a = 1;"),
            ScriptSource::new("js/b.js", "var b = a + 1;"),
        ];
        let out = compiler(port, CompileOptions::default())
            .compress(&sources)
            .unwrap();
        assert_eq!(out, "var a=1,b=a+1;\r\n");

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /compile HTTP/1.1\r\n"));
        assert!(request.contains("js_code=var+a+%3D+1%3B%0A%0Avar+b+%3D+a+%2B+1%3B%0A%0A"));
    }

    #[test]
    fn debug_prepends_banner() {
        let (port, server) = serve_json(
            r#"{"compiledCode":"x();","statistics":{"originalSize":5},"errors":[{"value":"oops","attributes":{"type":"E","lineno":"1","charno":"0","line":"x("}}]}"#,
        );
        let options = CompileOptions {
            debug: true,
            ..CompileOptions::default()
        };
        let out = compiler(port, options)
            .compress(&[ScriptSource::new("a.js", "x(")])
            .unwrap();
        server.join().unwrap();

        assert!(out.starts_with("if(window.console&&window.console.log){\r\n"));
        assert!(out.contains("Original Size: 5\\n"));
        assert!(out.contains("window.console.error('E: oops"));
        assert!(out.ends_with("}\r\n\r\nx();\r\n"));
    }

    #[test]
    fn compile_errors_do_not_fail_the_call() {
        let (port, server) = serve_json(
            r#"{"compiledCode":"","errors":[{"value":"Parse error","attributes":{"type":"JSC_PARSE_ERROR","lineno":"1","charno":"3","line":"var"}}]}"#,
        );
        let out = compiler(port, CompileOptions::default())
            .compress(&[ScriptSource::new("a.js", "var")])
            .unwrap();
        server.join().unwrap();
        assert_eq!(out, "\r\n");
    }

    #[test]
    fn missing_compiled_code_yields_line_break() {
        let compiler = compiler(1, CompileOptions::default());
        let out = compiler.render(&CompileResponse::default(), "now");
        assert_eq!(out, "\r\n");
    }

    #[test]
    fn non_json_reply_is_service_error() {
        let (port, server) = serve_json("<html>503</html>");
        let err = compiler(port, CompileOptions::default())
            .compile(&[ScriptSource::new("a.js", "a();")])
            .unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, CompileError::Service { .. }));
    }

    #[test]
    fn unreachable_service_is_connection_error() {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = compiler(port, CompileOptions::default())
            .compress(&[ScriptSource::new("a.js", "a();")])
            .unwrap_err();
        assert!(matches!(
            err,
            CompileError::Http(HttpError::Connection { .. })
        ));
    }

    #[test]
    fn from_config_carries_options() {
        let config = ClosureConfig {
            debug: true,
            pretty_print: true,
            ..ClosureConfig::default()
        };
        let compiler = RemoteCompiler::from_config(&config);
        assert!(compiler.options().debug);
        assert!(compiler.options().pretty_print);
    }
}
