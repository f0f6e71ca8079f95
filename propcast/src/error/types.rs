//! Primary error enum for parsing, loading and conversion flows.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type PropsResult<T> = Result<T, PropsError>;

/// Errors that can occur while loading, tokenizing or converting properties.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PropsError {
    /// An identifier contained a character that cannot be decomposed into
    /// candidate keys.
    #[error("Illegal identifier char `{ch}` in `{identifier}`")]
    IllegalIdentifierChar {
        /// Identifier being mapped.
        identifier: String,
        /// Offending character.
        ch: char,
    },

    /// A grammar string could not be parsed, or declared an option
    /// name or alias twice.
    #[error("{message} -- pos={position}, spec=`{spec}`")]
    MalformedGrammarSpec {
        /// Grammar text, empty when the grammar was assembled from bindings.
        spec: String,
        /// Character offset of the failure within `spec`.
        position: usize,
        /// Human-readable explanation.
        message: String,
    },

    /// An argument vector was rejected; no partial result is produced.
    #[error("Bad option syntax in `{argument}`: {message}")]
    IllegalArgumentSyntax {
        /// Argument token as supplied on the command line.
        argument: String,
        /// Human-readable explanation.
        message: String,
    },

    /// No conversion strategy accepted the value for the requested type.
    #[error("No parser method for `{value}` to type {target}")]
    UnsupportedConversion {
        /// Raw text that was being converted.
        value: String,
        /// Name of the requested type.
        target: String,
    },

    /// A primitive parser recognised the target type but rejected the text.
    #[error("Invalid value `{value}` for type {target}: {message}")]
    InvalidValue {
        /// Raw text that was being converted.
        value: String,
        /// Name of the requested type.
        target: String,
        /// Parser diagnostic.
        message: String,
    },

    /// Properties text contained a malformed escape sequence.
    #[error("Malformed properties text in {origin} at line {line}: {message}")]
    PropertiesSyntax {
        /// Source label of the text (for example `file:/etc/app.properties`).
        origin: String,
        /// One-based line number where the logical line started.
        line: usize,
        /// Human-readable explanation.
        message: String,
    },

    /// An existing configuration file could not be read.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
