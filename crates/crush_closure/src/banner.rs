//! The debug banner prepended to script bundles.
//!
//! The banner is JavaScript that logs compile statistics and every reported
//! warning and error to the browser console, guarded so it is a no-op where
//! no console exists.

use crate::response::{value_text, CompileResponse, CompilerMessage, Statistics};

/// Line break used between banner statements.
pub const LINE_BREAK: &str = "\r\n";

/// Renders the banner for `response`, stamped with `generated`.
///
/// Statistics the service did not report render as empty values.
pub fn render_banner(response: &CompileResponse, generated: &str) -> String {
    let empty = Statistics::default();
    let stats = response.statistics.as_ref().unwrap_or(&empty);

    let summary = [
        "Closure Compiler Stats:".to_string(),
        "-----------------------".to_string(),
        format!("Original Size: {}", value_text(stats.original_size.as_ref())),
        format!(
            "Original Gzip Size: {}",
            value_text(stats.original_gzip_size.as_ref())
        ),
        format!(
            "Compressed Size: {}",
            value_text(stats.compressed_size.as_ref())
        ),
        format!(
            "Compressed Gzip Size: {}",
            value_text(stats.compressed_gzip_size.as_ref())
        ),
        format!("Compile Time: {}", value_text(stats.compile_time.as_ref())),
        format!("Generated: {generated}"),
    ];

    let mut out = format!("if(window.console&&window.console.log){{{LINE_BREAK}");
    out.push_str(&console_call("log", &summary));

    for server_error in &response.server_errors {
        out.push_str(&console_call(
            "error",
            &[format!(
                "Server error {}: {}",
                value_text(server_error.code.as_ref()),
                server_error.error.as_deref().unwrap_or_default()
            )],
        ));
    }
    for error in &response.errors {
        out.push_str(&message_call("error", error));
    }
    for warning in &response.warnings {
        out.push_str(&message_call("warn", warning));
    }

    out.push('}');
    out.push_str(LINE_BREAK);
    out.push_str(LINE_BREAK);
    out
}

fn message_call(level: &str, message: &CompilerMessage) -> String {
    console_call(
        level,
        &[
            format!("{}: {}", message.kind(), message.description()),
            format!("Line: {}", message.lineno()),
            format!("Char: {}", message.charno()),
            format!("Line: {}", message.line()),
        ],
    )
}

/// `window.console.<level>('<lines joined by \n>');`
fn console_call(level: &str, lines: &[String]) -> String {
    let text = lines
        .iter()
        .map(|line| escape_js(line))
        .collect::<Vec<_>>()
        .join("\\n");
    format!("window.console.{level}('{text}');{LINE_BREAK}")
}

/// Escapes text for a single-quoted JavaScript string literal.
pub fn escape_js(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}
