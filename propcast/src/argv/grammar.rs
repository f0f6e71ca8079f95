//! Parsing and validation of option grammars.
//!
//! The textual form is a list of `name[,alias]*<arity>[{default}]` entries
//! separated by any mix of spaces, commas and semicolons:
//!
//! ```text
//! verbose,v? output,o* level*{info} input+
//! ```
//!
//! Names use letters, digits and `-` and may not start or end with `-`.
//! A default is only accepted after `*`; `\` escapes the next character
//! inside the braces.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use super::{Arity, ArgvTokenizer, OptionSpec, ResolvedArgs, kebab_to_camel};
use crate::{PropsError, PropsResult};

/// Immutable table of option declarations.
///
/// # Examples
///
/// ```
/// use propcast::{ArgvGrammar, Arity};
///
/// # fn main() -> propcast::PropsResult<()> {
/// let grammar: ArgvGrammar = "verbose,v? level*{info}".parse()?;
/// assert_eq!(grammar.resolve("v").map(|o| o.arity()), Some(Arity::Flag));
/// assert_eq!(grammar.to_string(), "{verbose=?, level=*}");
///
/// let args = grammar.tokenize(&["-v", "--level"])?;
/// assert_eq!(args.to_string(), "{verbose=[true], level=[info]}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ArgvGrammar {
    specs: IndexMap<String, OptionSpec>,
    aliases: HashMap<String, String>,
}

impl ArgvGrammar {
    /// A grammar declaring nothing; every option is accepted as a flag or a
    /// valued option depending on how it is written.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a textual grammar.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::MalformedGrammarSpec`] for an illegal character,
    /// a missing or unknown arity marker, an unterminated default, or a name
    /// or alias declared twice.
    pub fn parse(spec: &str) -> PropsResult<Self> {
        GrammarParser::new(spec).run()
    }

    /// Build a grammar from declarations.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::MalformedGrammarSpec`] when a name or alias is
    /// declared twice.
    pub fn from_specs<I>(specs: I) -> PropsResult<Self>
    where
        I: IntoIterator<Item = OptionSpec>,
    {
        let mut grammar = Self::default();
        for spec in specs {
            grammar
                .declare(spec)
                .map_err(|message| PropsError::grammar("", 0, message))?;
        }
        Ok(grammar)
    }

    /// Declaration for a primary name or alias.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&OptionSpec> {
        let primary = self.aliases.get(name).map_or(name, String::as_str);
        self.specs.get(primary)
    }

    /// Declarations in order.
    pub fn specs(&self) -> impl Iterator<Item = &OptionSpec> + '_ {
        self.specs.values()
    }

    /// Number of declared options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Tokenize `argv` against this grammar.
    ///
    /// # Errors
    ///
    /// See [`ArgvTokenizer::tokenize`].
    pub fn tokenize<S: AsRef<str>>(&self, argv: &[S]) -> PropsResult<ResolvedArgs> {
        ArgvTokenizer::new(self).tokenize(argv)
    }

    fn declare(&mut self, spec: OptionSpec) -> Result<(), String> {
        self.check_free(spec.name())?;
        let primary = spec.name().to_owned();
        let aliases = spec.aliases().to_vec();
        self.specs.insert(primary.clone(), spec);
        for alias in aliases {
            self.check_free(&alias)?;
            self.aliases.insert(alias, primary.clone());
        }
        Ok(())
    }

    fn check_free(&self, name: &str) -> Result<(), String> {
        if self.specs.contains_key(name) {
            return Err(format!("Option `{name}` already exists in specs"));
        }
        if self.aliases.contains_key(name) {
            return Err(format!("Option `{name}` already exists in aliases"));
        }
        Ok(())
    }
}

impl FromStr for ArgvGrammar {
    type Err = PropsError;

    fn from_str(spec: &str) -> PropsResult<Self> {
        Self::parse(spec)
    }
}

impl fmt::Display for ArgvGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, spec) in self.specs.values().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", spec.name(), spec.arity().marker())?;
        }
        f.write_str("}")
    }
}

const fn is_separator(ch: char) -> bool {
    matches!(ch, ' ' | ',' | ';')
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-'
}

struct GrammarParser<'a> {
    spec: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> GrammarParser<'a> {
    fn new(spec: &'a str) -> Self {
        Self {
            spec,
            chars: spec.chars().collect(),
            pos: 0,
        }
    }

    fn run(mut self) -> PropsResult<ArgvGrammar> {
        let mut grammar = ArgvGrammar::default();
        loop {
            self.skip_separators();
            if self.peek().is_none() {
                return Ok(grammar);
            }
            let start = self.pos;
            let spec = self.entry()?;
            grammar
                .declare(spec)
                .map_err(|message| self.error_at(start, message))?;
        }
    }

    fn entry(&mut self) -> PropsResult<OptionSpec> {
        let names = self.names()?;
        let Some(marker) = self.peek() else {
            return Err(self.error("Unexpected end"));
        };
        let Some(arity) = Arity::from_marker(marker) else {
            return Err(self.error(format!("Bad arg-type char `{marker}`")));
        };
        self.pos += 1;

        let mut names_iter = names.iter();
        let Some(primary) = names_iter.next() else {
            return Err(self.error("No options found"));
        };
        let mut spec = OptionSpec::new(primary, arity);
        for alias in names_iter {
            spec = spec.with_alias(alias);
        }
        if arity == Arity::Optional && self.peek() == Some('{') {
            self.pos += 1;
            spec = spec.with_default(self.default_value()?);
        }
        Ok(spec)
    }

    fn names(&mut self) -> PropsResult<Vec<String>> {
        let mut names = Vec::new();
        loop {
            let start = self.pos;
            while self.peek().is_some_and(is_name_char) {
                self.pos += 1;
            }
            if self.pos == start {
                return Err(self.error("Illegal char"));
            }
            let name = self.text(start, self.pos);
            if name.starts_with('-') || name.ends_with('-') {
                return Err(self.error_at(
                    start,
                    format!("Option `{name}` may not start or end with `-`"),
                ));
            }
            names.push(kebab_to_camel(&name));
            if self.peek() != Some(',') {
                return Ok(names);
            }
            self.pos += 1;
        }
    }

    fn default_value(&mut self) -> PropsResult<String> {
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error("Bad OPTIONAL default value syntax")),
                Some('}') => {
                    self.pos += 1;
                    return Ok(value);
                }
                Some('\\') if self.pos + 1 < self.chars.len() => {
                    self.pos += 1;
                    value.extend(self.peek());
                    self.pos += 1;
                }
                Some(ch) => {
                    value.push(ch);
                    self.pos += 1;
                }
            }
        }
    }

    fn skip_separators(&mut self) {
        while self.peek().is_some_and(is_separator) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.chars.get(start..end).unwrap_or_default().iter().collect()
    }

    fn error(&self, message: impl Into<String>) -> PropsError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, position: usize, message: impl Into<String>) -> PropsError {
        PropsError::grammar(self.spec, position, message)
    }
}
