//! Explicit binding of named fields to typed values.
//!
//! A [`BindingTable`] lists the fields an application wants, each with its
//! target type and option declaration. The table derives the argument
//! grammar, and [`BindingTable::bind`] looks every field up in a
//! [`FrozenProps`] and converts it, yielding [`BoundValues`].
//!
//! ```
//! use propcast::{BindingTable, FieldBinding, PropsStore, StoreOptions, TypeConverter};
//!
//! # fn main() -> propcast::PropsResult<()> {
//! let table = BindingTable::new()
//!     .with(FieldBinding::of::<bool>("verbose").with_alias("v"))
//!     .with(FieldBinding::of::<u32>("numLines").with_default("10"));
//!
//! let args = table.parse_args(&["-v"])?;
//! let mut store = PropsStore::new(StoreOptions::default());
//! store.merge_args(&args);
//!
//! let values = table.bind(&store.freeze(), &TypeConverter::global())?;
//! assert!(values.flag("verbose"));
//! assert_eq!(values.get::<u32>("numLines"), Some(&10));
//! # Ok(())
//! # }
//! ```

use std::any::{Any, TypeId};
use std::fmt;

use indexmap::IndexMap;

use crate::argv::{ARGS_KEY, ArgvGrammar, ArgvTokenizer, Arity, DASH_KEY, OptionSpec, ResolvedArgs};
use crate::convert::{AnyValue, ConversionRequest, ElementBinding, PropType, TypeConverter, TypeDescriptor};
use crate::store::FrozenProps;
use crate::PropsResult;

/// One named field with its target type and option declaration.
#[derive(Clone, Debug)]
pub struct FieldBinding {
    name: String,
    descriptor: TypeDescriptor,
    element_hint: Option<ElementBinding>,
    spec: OptionSpec,
}

impl FieldBinding {
    /// Field of type `T`. `bool` fields are flags; everything else requires
    /// a value until a default is attached.
    #[must_use]
    pub fn of<T: PropType>(name: &str) -> Self {
        Self::new(name, T::descriptor())
    }

    /// Field described at runtime.
    #[must_use]
    pub fn new(name: &str, descriptor: TypeDescriptor) -> Self {
        let arity = if descriptor.type_id() == Some(TypeId::of::<bool>()) {
            Arity::Flag
        } else {
            Arity::Required
        };
        Self {
            name: name.to_owned(),
            descriptor,
            element_hint: None,
            spec: OptionSpec::new(name, arity),
        }
    }

    /// Add an option alias.
    #[must_use]
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.spec = self.spec.with_alias(alias);
        self
    }

    /// Attach a default. Non-flag fields become optional.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        let arity = match self.spec.arity() {
            Arity::Flag => Arity::Flag,
            Arity::Optional | Arity::Required => Arity::Optional,
        };
        self.spec = self.spec.with_default(default).with_arity(arity);
        self
    }

    /// Element type used when the descriptor is a collection without one.
    #[must_use]
    pub fn with_element_hint(mut self, hint: ElementBinding) -> Self {
        self.element_hint = Some(hint);
        self
    }

    /// Field name, used both as the lookup identifier and the key in
    /// [`BoundValues`].
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target type.
    #[must_use]
    pub const fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Option declaration derived for the field.
    #[must_use]
    pub const fn spec(&self) -> &OptionSpec {
        &self.spec
    }

    fn is_reserved(&self) -> bool {
        self.name == ARGS_KEY || self.name == DASH_KEY
    }
}

/// Ordered set of [`FieldBinding`]s.
#[derive(Clone, Debug, Default)]
pub struct BindingTable {
    fields: Vec<FieldBinding>,
}

impl BindingTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `field`.
    #[must_use]
    pub fn with(mut self, field: FieldBinding) -> Self {
        self.fields.push(field);
        self
    }

    /// Append `field` in place.
    pub fn push(&mut self, field: FieldBinding) {
        self.fields.push(field);
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldBinding] {
        &self.fields
    }

    /// Grammar declaring every field except `_args` and `_dash`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PropsError::MalformedGrammarSpec`] when two fields
    /// share a name or alias.
    pub fn grammar(&self) -> PropsResult<ArgvGrammar> {
        ArgvGrammar::from_specs(
            self.fields
                .iter()
                .filter(|field| !field.is_reserved())
                .map(|field| field.spec.clone()),
        )
    }

    /// Tokenize `argv` against [`BindingTable::grammar`], presetting every
    /// flag to `false`.
    ///
    /// # Errors
    ///
    /// Fails when the grammar is inconsistent or `argv` is malformed.
    pub fn parse_args<S: AsRef<str>>(&self, argv: &[S]) -> PropsResult<ResolvedArgs> {
        let grammar = self.grammar()?;
        ArgvTokenizer::new(&grammar).preset_flags(true).tokenize(argv)
    }

    /// Look up and convert every field.
    ///
    /// A field missing from `props` takes its default, if any; otherwise it
    /// is absent from the result.
    ///
    /// # Errors
    ///
    /// Fails on the first field whose name is illegal or whose value does not
    /// convert.
    pub fn bind(&self, props: &FrozenProps, converter: &TypeConverter<'_>) -> PropsResult<BoundValues> {
        let mut values = IndexMap::with_capacity(self.fields.len());
        for field in &self.fields {
            let Some(raw) = props.lookup(&field.name)?.or(field.spec.default_value()) else {
                continue;
            };
            let request = ConversionRequest::new(raw, &field.descriptor);
            let request = match &field.element_hint {
                Some(hint) => request.with_element_hint(hint),
                None => request,
            };
            values.insert(field.name.clone(), converter.convert(&request)?);
        }
        Ok(BoundValues { values })
    }
}

/// Typed values produced by [`BindingTable::bind`].
#[derive(Default)]
pub struct BoundValues {
    values: IndexMap<String, AnyValue>,
}

impl BoundValues {
    /// Borrow the value of `name` as `T`.
    ///
    /// `None` when the field is absent or has another type.
    #[must_use]
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(|value| value.downcast_ref::<T>())
    }

    /// Remove and return the value of `name` as `T`.
    ///
    /// A value of another type stays in place.
    pub fn take<T: Any>(&mut self, name: &str) -> Option<T> {
        let value = self.values.shift_remove(name)?;
        match value.downcast::<T>() {
            Ok(typed) => Some(*typed),
            Err(original) => {
                self.values.insert(name.to_owned(), original);
                None
            }
        }
    }

    /// Value of a flag field; absent flags are `false`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.get::<bool>(name).copied().unwrap_or(false)
    }

    /// Whether `name` has a value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names of the bound fields in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    /// Number of bound fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for BoundValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundValues")
            .field("names", &self.values.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
