//! Client for the Closure Compiler web service.
//!
//! Script bundles are minified remotely: the sources (or URLs the service
//! should fetch them from) are posted as a form, and the JSON reply carries
//! the compiled code together with statistics, warnings and errors.

#![warn(missing_docs)]

pub mod banner;
pub mod compiler;
pub mod error;
pub mod request;
pub mod response;

pub use compiler::RemoteCompiler;
pub use error::CompileError;
pub use request::{CompileOptions, CompileRequest, ScriptSource};
pub use response::{CompileResponse, CompilerMessage, ServerError, Statistics};
