use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for reqpin operations outside the merge engine.
#[derive(Debug, Error, Diagnostic)]
pub enum ReqpinError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A requirement line or requirements file could not be parsed.
    #[error("Parse error: {message}")]
    #[diagnostic(code(reqpin::parse))]
    Parse { message: String },

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.reqpin/config.toml for syntax errors"))]
    Config { message: String },

    /// The local package index could not be loaded.
    #[error("Package index error: {message}")]
    Index { message: String },

    /// Invalid combination of command-line options.
    #[error("Invalid usage: {message}")]
    Usage { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
