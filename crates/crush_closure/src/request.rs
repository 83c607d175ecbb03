//! Building the form body of a compile request.

use crush_config::{ClosureConfig, CompilationLevel, WarningLevel};

/// Output sections requested from the service, in request order.
const OUTPUT_INFO: [&str; 4] = ["compiled_code", "statistics", "warnings", "errors"];

/// One script to compile: where it lives under the public directory and what it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSource {
    /// Path relative to the public directory, used to build `code_url` values.
    pub path: String,
    /// The script text, inlined into `js_code` when no URL prefix is set.
    pub code: String,
}

impl ScriptSource {
    /// Creates a source from its public path and contents.
    pub fn new(path: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: code.into(),
        }
    }
}

/// Compiler settings that shape every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Optimization mode.
    pub compilation_level: CompilationLevel,
    /// Warning verbosity.
    pub warning_level: WarningLevel,
    /// Request pretty-printed output.
    pub pretty_print: bool,
    /// Make the Closure Library available.
    pub use_closure_library: bool,
    /// Prepend the console statistics banner to the output.
    pub debug: bool,
    /// Send `code_url` references under this prefix instead of inline code.
    pub code_url_prefix: Option<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::from(&ClosureConfig::default())
    }
}

impl From<&ClosureConfig> for CompileOptions {
    fn from(config: &ClosureConfig) -> Self {
        Self {
            compilation_level: config.compilation_level,
            warning_level: config.warning_level,
            pretty_print: config.pretty_print,
            use_closure_library: config.use_closure_library,
            debug: config.debug,
            code_url_prefix: config
                .code_url_prefix
                .clone()
                .filter(|prefix| !prefix.is_empty()),
        }
    }
}

/// A single compile request: the sources in bundle order plus the options.
///
/// Built fresh for every call to the service and dropped afterwards.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    sources: &'a [ScriptSource],
    options: &'a CompileOptions,
}

impl<'a> CompileRequest<'a> {
    /// Creates a request over `sources`, which are concatenated in order.
    pub fn new(sources: &'a [ScriptSource], options: &'a CompileOptions) -> Self {
        Self { sources, options }
    }

    /// The form parameters in wire order.
    ///
    /// Repeated keys (`code_url`, `output_info`) appear once per value; the
    /// service collects them into lists.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        match &self.options.code_url_prefix {
            Some(prefix) => {
                for source in self.sources {
                    params.push(("code_url", format!("{prefix}{}", source.path)));
                }
            }
            None => {
                let mut code = String::new();
                for source in self.sources {
                    code.push_str(&source.code);
                    code.push_str("\n\n");
                }
                params.push(("js_code", code));
            }
        }

        params.push((
            "compilation_level",
            self.options.compilation_level.as_str().to_string(),
        ));
        params.push(("output_format", "json".to_string()));
        params.push((
            "warning_level",
            self.options.warning_level.as_str().to_string(),
        ));
        for info in OUTPUT_INFO {
            params.push(("output_info", info.to_string()));
        }
        if self.options.pretty_print {
            params.push(("formatting", "pretty_print".to_string()));
        }
        if self.options.use_closure_library {
            params.push(("use_closure_library", "true".to_string()));
        }

        params
    }

    /// The `application/x-www-form-urlencoded` body.
    pub fn to_form_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params())
            .finish()
    }
}
