//! Conversion of raw property text into typed values.
//!
//! A [`TypeConverter`] runs an ordered chain of [`Strategy`] values; the
//! first strategy that produces a value wins:
//!
//! 1. custom parsers registered for the exact target type,
//! 2. identity for `String`,
//! 3. primitive parsing of numbers, `bool` and `char`,
//! 4. a `FromStr` creator,
//! 5. a `From<String>` constructor,
//! 6. arrays, split from one CSV line with each field converted in turn,
//! 7. collections, likewise, provided an element type is known. A
//!    collection that does not name its element type becomes the default
//!    container of its [`CollectionKind`].
//!
//! A strategy that does not apply yields no value rather than an error.
//! Only a primitive rejecting its text, or the whole chain finding no match,
//! fails the conversion.

mod descriptor;
mod registry;

use crate::csv::{CsvTokenizer, DEFAULT_QUOTE, DEFAULT_SEPARATOR};
use crate::{PropsError, PropsResult};

pub use descriptor::{
    AnyValue, AssembleFn, CollectionKind, ConstructFn, Container, ElementBinding, ParseFn,
    PropType, TypeDescriptor,
};
pub use registry::{FnParser, ParserRegistry, PropParser};

/// Raw text paired with the type it should become.
#[derive(Clone, Copy, Debug)]
pub struct ConversionRequest<'a> {
    raw: &'a str,
    target: &'a TypeDescriptor,
    element_hint: Option<&'a ElementBinding>,
}

impl<'a> ConversionRequest<'a> {
    /// Request converting `raw` to `target`, using the target's own element
    /// type when it is a collection.
    #[must_use]
    pub fn new(raw: &'a str, target: &'a TypeDescriptor) -> Self {
        Self {
            raw,
            target,
            element_hint: target.collection_element(),
        }
    }

    /// Request without structural context: collection targets find no
    /// element type and do not convert.
    #[must_use]
    pub const fn bare(raw: &'a str, target: &'a TypeDescriptor) -> Self {
        Self {
            raw,
            target,
            element_hint: None,
        }
    }

    /// Supply the element type for a collection target that does not name
    /// one. The target's [`CollectionKind`] still chooses the container.
    #[must_use]
    pub const fn with_element_hint(mut self, hint: &'a ElementBinding) -> Self {
        self.element_hint = Some(hint);
        self
    }

    /// Text being converted.
    #[must_use]
    pub const fn raw(&self) -> &'a str {
        self.raw
    }

    /// Requested type.
    #[must_use]
    pub const fn target(&self) -> &'a TypeDescriptor {
        self.target
    }

    /// Element type for collection targets.
    #[must_use]
    pub const fn element_hint(&self) -> Option<&'a ElementBinding> {
        self.element_hint
    }
}

/// One step of the conversion chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Strategy {
    /// A registered [`PropParser`] for the exact type.
    CustomParser,
    /// `String` targets take the text unchanged.
    Text,
    /// Canonical parsing of primitive types.
    Primitive,
    /// A `FromStr` creator.
    Creator,
    /// A `From<String>` constructor.
    Constructor,
    /// Array targets.
    Array,
    /// Collection targets with a known element type.
    Collection,
}

impl Strategy {
    /// Strategies in the order they are tried.
    pub const ORDER: [Self; 7] = [
        Self::CustomParser,
        Self::Text,
        Self::Primitive,
        Self::Creator,
        Self::Constructor,
        Self::Array,
        Self::Collection,
    ];

    /// Try this strategy alone. `Ok(None)` means it does not apply.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::InvalidValue`] when a primitive rejects the
    /// text, and propagates element failures from containers.
    pub fn attempt(
        self,
        converter: &TypeConverter<'_>,
        request: &ConversionRequest<'_>,
    ) -> PropsResult<Option<AnyValue>> {
        let raw = request.raw();
        let target = request.target();
        match self {
            Self::CustomParser => Ok(target
                .type_id()
                .and_then(|id| converter.registry().parse(raw, id))),
            Self::Text => Ok(target
                .is_text()
                .then(|| Box::new(raw.to_owned()) as AnyValue)),
            Self::Primitive => target.primitive_parser().map_or(Ok(None), |parse| {
                parse(raw)
                    .map(Some)
                    .map_err(|message| PropsError::invalid_value(raw, target.name(), message))
            }),
            Self::Creator => Ok(target.creator().and_then(|parse| {
                parse(raw)
                    .inspect_err(|message| {
                        tracing::debug!(
                            type_name = target.name(),
                            value = raw,
                            %message,
                            "creator rejected value"
                        );
                    })
                    .ok()
            })),
            Self::Constructor => Ok(target.constructor().map(|construct| construct(raw.to_owned()))),
            Self::Array => match target.container() {
                Some(Container::Array(binding)) => {
                    converter.convert_elements(raw, binding, |items| binding.assemble(items))
                }
                _ => Ok(None),
            },
            Self::Collection => match (target.container(), request.element_hint()) {
                (Some(Container::Collection(_, Some(own))), Some(_)) => {
                    converter.convert_elements(raw, own, |items| own.assemble(items))
                }
                (Some(Container::Collection(kind, None)), Some(hint)) => {
                    hint.assembler(*kind).map_or(Ok(None), |assemble| {
                        converter.convert_elements(raw, hint, assemble)
                    })
                }
                _ => Ok(None),
            },
        }
    }
}

/// Entry point of the conversion chain.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use propcast::TypeConverter;
///
/// # fn main() -> propcast::PropsResult<()> {
/// let converter = TypeConverter::global();
/// assert_eq!(converter.convert_to::<u16>("8080")?, 8080);
/// assert_eq!(converter.convert_to::<Vec<String>>("a, \"b,c\"")?, ["a", "b,c"]);
/// let sorted: BTreeSet<i32> = converter.convert_to("3,1,2,1")?;
/// assert_eq!(sorted.into_iter().collect::<Vec<_>>(), [1, 2, 3]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TypeConverter<'r> {
    registry: &'r ParserRegistry,
    csv: CsvTokenizer,
}

impl TypeConverter<'static> {
    /// Converter backed by [`ParserRegistry::global`].
    #[must_use]
    pub fn global() -> Self {
        Self::new(ParserRegistry::global())
    }
}

impl Default for TypeConverter<'static> {
    fn default() -> Self {
        Self::global()
    }
}

impl<'r> TypeConverter<'r> {
    /// Converter backed by `registry`.
    #[must_use]
    pub const fn new(registry: &'r ParserRegistry) -> Self {
        Self {
            registry,
            csv: CsvTokenizer::new(DEFAULT_SEPARATOR, DEFAULT_QUOTE),
        }
    }

    /// Use `csv` to split array and collection values.
    #[must_use]
    pub const fn with_csv(mut self, csv: CsvTokenizer) -> Self {
        self.csv = csv;
        self
    }

    /// Registry consulted by [`Strategy::CustomParser`].
    #[must_use]
    pub const fn registry(&self) -> &'r ParserRegistry {
        self.registry
    }

    /// Run the chain for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::UnsupportedConversion`] when no strategy
    /// applies, or the error of the strategy that failed.
    pub fn convert(&self, request: &ConversionRequest<'_>) -> PropsResult<AnyValue> {
        for strategy in Strategy::ORDER {
            if let Some(value) = strategy.attempt(self, request)? {
                tracing::trace!(
                    ?strategy,
                    type_name = request.target().name(),
                    "converted value"
                );
                return Ok(value);
            }
        }
        Err(PropsError::unsupported(request.raw(), request.target().name()))
    }

    /// Convert `raw` to `T`.
    ///
    /// # Errors
    ///
    /// As for [`TypeConverter::convert`].
    pub fn convert_to<T: PropType>(&self, raw: &str) -> PropsResult<T> {
        let target = T::descriptor();
        self.convert(&ConversionRequest::new(raw, &target))?
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| PropsError::unsupported(raw, target.name()))
    }

    fn convert_elements<F>(
        &self,
        raw: &str,
        binding: &ElementBinding,
        assemble: F,
    ) -> PropsResult<Option<AnyValue>>
    where
        F: FnOnce(Vec<AnyValue>) -> Option<AnyValue>,
    {
        let fields = self.csv.split(raw.trim()).unwrap_or_default();
        let mut items = Vec::with_capacity(fields.len());
        for field in &fields {
            items.push(self.convert(&ConversionRequest::new(field, binding.element_type()))?);
        }
        Ok(assemble(items))
    }
}
