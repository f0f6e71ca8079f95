//! Argument vector grammar and tokenizer.
//!
//! An [`ArgvGrammar`] declares options with an [`Arity`], aliases and an
//! optional default. The [`ArgvTokenizer`] walks an argument vector against
//! it and produces [`ResolvedArgs`], a multi-valued table keyed by primary
//! option name that a [`crate::PropsStore`] can merge.
//!
//! Without a grammar every option is accepted:
//!
//! | argv                 | result                              |
//! |----------------------|-------------------------------------|
//! | `-a arg1 arg2`       | `a=[true]`, `_args=[arg1, arg2]`    |
//! | `-ab arg1 arg2`      | `a=[true]`, `b=[true]`, `_args=...` |
//! | `--ab arg1 arg2`     | `ab=[arg1]`, `_args=[arg2]`         |
//! | `-a=arg1 arg2`       | `a=[arg1]`, `_args=[arg2]`          |
//!
//! Double-dash options always name a single option. A single-dash token
//! that is not itself a declared option is read as bundled flags, unless its
//! first character is a declared non-flag option, in which case the rest of
//! the token is that option's value (`-carg1`).

mod grammar;
mod tokenizer;

use std::fmt;

use indexmap::IndexMap;

pub use grammar::ArgvGrammar;
pub use tokenizer::ArgvTokenizer;

/// Key holding positional arguments in [`ResolvedArgs`].
pub const ARGS_KEY: &str = "_args";
/// Key set to `true` when a lone `-` was seen.
pub const DASH_KEY: &str = "_dash";

/// How many values an option takes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Arity {
    /// Boolean switch; repeats keep only the last value.
    Flag,
    /// Takes a value and may declare a default.
    Optional,
    /// Takes a value and has no default.
    Required,
}

impl Arity {
    /// Grammar marker for this arity: `?`, `*` or `+`.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Flag => '?',
            Self::Optional => '*',
            Self::Required => '+',
        }
    }

    /// Arity for a grammar marker.
    #[must_use]
    pub const fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '?' => Some(Self::Flag),
            '*' => Some(Self::Optional),
            '+' => Some(Self::Required),
            _ => None,
        }
    }
}

/// Declaration of one option.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OptionSpec {
    name: String,
    arity: Arity,
    aliases: Vec<String>,
    default: Option<String>,
}

impl OptionSpec {
    /// Declare `name` with `arity`. Kebab-case names are converted to camel
    /// case.
    #[must_use]
    pub fn new(name: &str, arity: Arity) -> Self {
        Self {
            name: kebab_to_camel(name),
            arity,
            aliases: Vec::new(),
            default: None,
        }
    }

    /// Declare a flag.
    #[must_use]
    pub fn flag(name: &str) -> Self {
        Self::new(name, Arity::Flag)
    }

    /// Declare an optional option.
    #[must_use]
    pub fn optional(name: &str) -> Self {
        Self::new(name, Arity::Optional)
    }

    /// Declare a required option.
    #[must_use]
    pub fn required(name: &str) -> Self {
        Self::new(name, Arity::Required)
    }

    /// Add an alias.
    #[must_use]
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(kebab_to_camel(alias));
        self
    }

    /// Set the value used when the option appears without one.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Change the arity.
    #[must_use]
    pub const fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Primary name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arity.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.arity
    }

    /// Aliases in declaration order.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Default value, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

/// Options and positional arguments read from one argument vector.
///
/// Values are keyed by primary option name in first-seen order. A value is
/// `None` when the option appeared without one and declares no default.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResolvedArgs {
    values: IndexMap<String, Vec<Option<String>>>,
}

impl ResolvedArgs {
    /// Values recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Option<String>]> {
        self.values.get(name).map(Vec::as_slice)
    }

    /// Positional arguments in order.
    #[must_use]
    pub fn positional(&self) -> Vec<&str> {
        self.get(ARGS_KEY)
            .unwrap_or_default()
            .iter()
            .filter_map(Option::as_deref)
            .collect()
    }

    /// Whether a lone `-` was seen.
    #[must_use]
    pub fn dash(&self) -> bool {
        self.values.contains_key(DASH_KEY)
    }

    /// Iterate over names and their values in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<String>])> + '_ {
        self.values
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn slot(&mut self, name: &str) -> &mut Vec<Option<String>> {
        self.values.entry(name.to_owned()).or_default()
    }
}

impl fmt::Display for ResolvedArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, values)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let shown: Vec<&str> = values
                .iter()
                .map(|value| value.as_deref().unwrap_or("null"))
                .collect();
            write!(f, "{name}=[{}]", shown.join(", "))?;
        }
        f.write_str("}")
    }
}

/// Convert `foo-bar` to `fooBar`.
pub(crate) fn kebab_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
