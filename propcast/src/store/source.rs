//! Labels recording where a stored property came from.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};

/// Origin of a merged property.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum PropsSource {
    /// The initial key/value map handed to the loader.
    InitialMap,
    /// A resource compiled into the program, identified by name.
    Bundled(String),
    /// A properties file on disk.
    File(Utf8PathBuf),
    /// Literal properties text supplied by the caller.
    Text,
    /// Values parsed from an argument vector.
    Argv,
    /// Any other caller-defined source.
    Named(String),
}

impl PropsSource {
    /// Label a file source.
    #[must_use]
    pub fn file(path: &Utf8Path) -> Self {
        Self::File(path.to_path_buf())
    }

    /// Label a bundled resource.
    #[must_use]
    pub fn bundled(name: impl Into<String>) -> Self {
        Self::Bundled(name.into())
    }
}

impl fmt::Display for PropsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitialMap => f.write_str("initmap"),
            Self::Bundled(name) => write!(f, "bundled:{name}"),
            Self::File(path) => write!(f, "file:{path}"),
            Self::Text => f.write_str("string"),
            Self::Argv => f.write_str("argv"),
            Self::Named(name) => f.write_str(name),
        }
    }
}
