//! Constructors for `PropsError`.

use camino::Utf8Path;

use super::PropsError;

impl PropsError {
    /// Construct a [`PropsError::MalformedGrammarSpec`].
    ///
    /// # Examples
    ///
    /// ```
    /// use propcast::PropsError;
    /// let e = PropsError::grammar("a! b?", 1, "Bad arg-type char `!`");
    /// assert!(matches!(e, PropsError::MalformedGrammarSpec { position: 1, .. }));
    /// ```
    #[must_use]
    pub fn grammar(spec: &str, position: usize, message: impl Into<String>) -> Self {
        Self::MalformedGrammarSpec {
            spec: spec.to_owned(),
            position,
            message: message.into(),
        }
    }

    /// Construct a [`PropsError::IllegalArgumentSyntax`] for `argument`.
    #[must_use]
    pub fn argument(argument: &str, message: impl Into<String>) -> Self {
        Self::IllegalArgumentSyntax {
            argument: argument.to_owned(),
            message: message.into(),
        }
    }

    /// Construct a [`PropsError::UnsupportedConversion`].
    ///
    /// # Examples
    ///
    /// ```
    /// use propcast::PropsError;
    /// let e = PropsError::unsupported("x", "Widget");
    /// assert_eq!(e.to_string(), "No parser method for `x` to type Widget");
    /// ```
    #[must_use]
    pub fn unsupported(value: &str, target: &str) -> Self {
        Self::UnsupportedConversion {
            value: value.to_owned(),
            target: target.to_owned(),
        }
    }

    /// Construct a [`PropsError::InvalidValue`].
    #[must_use]
    pub fn invalid_value(value: &str, target: &str, message: impl ToString) -> Self {
        Self::InvalidValue {
            value: value.to_owned(),
            target: target.to_owned(),
            message: message.to_string(),
        }
    }

    /// Construct a [`PropsError::File`] for a configuration path.
    #[must_use]
    pub fn file(path: &Utf8Path, source: std::io::Error) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the error is scoped to a single value rather than the whole
    /// parse or load.
    #[must_use]
    pub const fn is_conversion(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedConversion { .. } | Self::InvalidValue { .. }
        )
    }
}
