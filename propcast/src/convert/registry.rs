//! Registry of caller-supplied parsers.
//!
//! Parsers are matched by the exact type they produce and always take
//! precedence over the built-in strategies. Registration is append-only:
//! a second parser of the same concrete type is ignored with a warning.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::LazyLock;

use parking_lot::RwLock;

use super::AnyValue;

/// A single-type parser from text.
pub trait PropParser: Send + Sync + 'static {
    /// Type produced by the parser.
    type Target: Any + Send + Sync;

    /// Parse `raw`, returning `None` to let the next parser or strategy try.
    fn parse(&self, raw: &str) -> Option<Self::Target>;
}

/// Adapter registering a closure as a [`PropParser`].
///
/// # Examples
///
/// ```
/// use propcast::{FnParser, ParserRegistry};
///
/// #[derive(Debug, PartialEq)]
/// struct Port(u16);
///
/// let registry = ParserRegistry::new();
/// let added = registry.register(FnParser::new(|raw: &str| {
///     raw.strip_prefix(':')?.parse().ok().map(Port)
/// }));
/// assert!(added);
/// ```
pub struct FnParser<T, F> {
    parse: F,
    target: PhantomData<fn() -> T>,
}

impl<T, F> FnParser<T, F>
where
    F: Fn(&str) -> Option<T>,
{
    /// Wrap `parse`.
    #[must_use]
    pub const fn new(parse: F) -> Self {
        Self {
            parse,
            target: PhantomData,
        }
    }
}

impl<T, F> PropParser for FnParser<T, F>
where
    T: Any + Send + Sync,
    F: Fn(&str) -> Option<T> + Send + Sync + 'static,
{
    type Target = T;

    fn parse(&self, raw: &str) -> Option<T> {
        (self.parse)(raw)
    }
}

type ErasedParse = Box<dyn Fn(&str) -> Option<AnyValue> + Send + Sync>;

struct Registered {
    parser: TypeId,
    parser_name: &'static str,
    target: TypeId,
    parse: ErasedParse,
}

/// Thread-safe, append-only parser registry.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: RwLock<Vec<Registered>>,
}

static GLOBAL: LazyLock<ParserRegistry> = LazyLock::new(ParserRegistry::new);

impl ParserRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by [`super::TypeConverter::global`].
    ///
    /// Register parsers during start-up, before concurrent lookups begin.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Add `parser`.
    ///
    /// Returns `false`, leaving the registry unchanged, when a parser of the
    /// same concrete type is already registered.
    pub fn register<P: PropParser>(&self, parser: P) -> bool {
        let id = TypeId::of::<P>();
        let mut parsers = self.parsers.write();
        if parsers.iter().any(|existing| existing.parser == id) {
            tracing::warn!(parser = type_name::<P>(), "parser already registered");
            return false;
        }
        parsers.push(Registered {
            parser: id,
            parser_name: type_name::<P>(),
            target: TypeId::of::<P::Target>(),
            parse: Box::new(move |raw| parser.parse(raw).map(|value| Box::new(value) as AnyValue)),
        });
        true
    }

    /// Run every parser producing `target`, in registration order, until one
    /// accepts `raw`.
    #[must_use]
    pub fn parse(&self, raw: &str, target: TypeId) -> Option<AnyValue> {
        self.parsers
            .read()
            .iter()
            .filter(|registered| registered.target == target)
            .find_map(|registered| (registered.parse)(raw))
    }

    /// Whether any parser produces `target`.
    #[must_use]
    pub fn handles(&self, target: TypeId) -> bool {
        self.parsers
            .read()
            .iter()
            .any(|registered| registered.target == target)
    }

    /// Number of registered parsers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parsers.read().len()
    }

    /// Whether no parser is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parsers.read().is_empty()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parsers = self.parsers.read();
        let names: Vec<&str> = parsers.iter().map(|r| r.parser_name).collect();
        f.debug_struct("ParserRegistry")
            .field("parsers", &names)
            .finish()
    }
}
