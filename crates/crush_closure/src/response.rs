//! The JSON document returned by the compiler service.
//!
//! Every field is optional: the service omits sections it has nothing to say
//! about, and a missing section must never turn a usable reply into a failure.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CompileError;

/// Top-level reply of the compile endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResponse {
    /// The minified output.
    #[serde(default)]
    pub compiled_code: Option<String>,
    /// Size and timing figures.
    #[serde(default)]
    pub statistics: Option<Statistics>,
    /// Non-fatal diagnostics.
    #[serde(default)]
    pub warnings: Vec<CompilerMessage>,
    /// Compilation errors in the submitted code.
    #[serde(default)]
    pub errors: Vec<CompilerMessage>,
    /// Problems with the request itself (bad parameter, size limit, ...).
    #[serde(default)]
    pub server_errors: Vec<ServerError>,
}

impl CompileResponse {
    /// Decodes a response body.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Service`] when the body is not a JSON object of
    /// the expected shape.
    pub fn from_json(body: &[u8]) -> Result<Self, CompileError> {
        serde_json::from_slice(body).map_err(|e| CompileError::Service {
            reason: e.to_string(),
        })
    }
}

/// Size and timing statistics for one compilation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Input size in bytes.
    #[serde(default)]
    pub original_size: Option<Value>,
    /// Gzipped input size in bytes.
    #[serde(default)]
    pub original_gzip_size: Option<Value>,
    /// Output size in bytes.
    #[serde(default)]
    pub compressed_size: Option<Value>,
    /// Gzipped output size in bytes.
    #[serde(default)]
    pub compressed_gzip_size: Option<Value>,
    /// Compilation time in seconds.
    #[serde(default)]
    pub compile_time: Option<Value>,
}

/// Location details nested under a message's `attributes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageAttributes {
    /// Diagnostic type, e.g. `JSC_PARSE_ERROR`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// 1-based line number.
    #[serde(default)]
    pub lineno: Option<Value>,
    /// 0-based column.
    #[serde(default)]
    pub charno: Option<Value>,
    /// The offending source line.
    #[serde(default)]
    pub line: Option<String>,
}

/// A warning or error reported by the compiler.
///
/// The service has used two layouts over time: a `value` plus nested
/// `attributes`, and a flat object with `type`, `lineno`, `charno`, `line`
/// and the text under `error` or `warning`. Both are accepted; the accessor
/// methods prefer the nested layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompilerMessage {
    /// Message text in the nested layout.
    #[serde(default)]
    pub value: Option<String>,
    /// Location details in the nested layout.
    #[serde(default)]
    pub attributes: Option<MessageAttributes>,
    /// Diagnostic type in the flat layout.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Line number in the flat layout.
    #[serde(default)]
    pub lineno: Option<Value>,
    /// Column in the flat layout.
    #[serde(default)]
    pub charno: Option<Value>,
    /// Source line in the flat layout.
    #[serde(default)]
    pub line: Option<String>,
    /// Error text in the flat layout.
    #[serde(default)]
    pub error: Option<String>,
    /// Warning text in the flat layout.
    #[serde(default)]
    pub warning: Option<String>,
}

impl CompilerMessage {
    /// The human-readable description.
    pub fn description(&self) -> &str {
        self.value
            .as_deref()
            .or(self.error.as_deref())
            .or(self.warning.as_deref())
            .unwrap_or_default()
    }

    /// The diagnostic type.
    pub fn kind(&self) -> &str {
        self.attributes
            .as_ref()
            .and_then(|a| a.kind.as_deref())
            .or(self.kind.as_deref())
            .unwrap_or_default()
    }

    /// The line number as text, empty if unknown.
    pub fn lineno(&self) -> String {
        let nested = self.attributes.as_ref().and_then(|a| a.lineno.as_ref());
        value_text(nested.or(self.lineno.as_ref()))
    }

    /// The column as text, empty if unknown.
    pub fn charno(&self) -> String {
        let nested = self.attributes.as_ref().and_then(|a| a.charno.as_ref());
        value_text(nested.or(self.charno.as_ref()))
    }

    /// The offending source line.
    pub fn line(&self) -> &str {
        self.attributes
            .as_ref()
            .and_then(|a| a.line.as_deref())
            .or(self.line.as_deref())
            .unwrap_or_default()
    }
}

/// A request-level failure reported by the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerError {
    /// Numeric error code.
    #[serde(default)]
    pub code: Option<Value>,
    /// Error text.
    #[serde(default)]
    pub error: Option<String>,
}

/// Renders an optional JSON scalar for display: strings verbatim, other
/// values in their JSON form, absent or `null` as the empty string.
pub fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
