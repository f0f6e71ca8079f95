//! Runtime descriptions of conversion targets.
//!
//! A [`TypeDescriptor`] records which conversion strategies a type supports:
//! a primitive parser, a fallible creator (`FromStr`), an infallible
//! constructor (`From<String>`), or a container shape whose elements are
//! themselves described. [`PropType`] ties a Rust type to its descriptor.

use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::path::PathBuf;
use std::str::FromStr;

use camino::Utf8PathBuf;
use indexmap::IndexSet;

/// A converted value of any supported type.
pub type AnyValue = Box<dyn Any + Send + Sync>;

/// Parse text into a value, or explain why not.
pub type ParseFn = fn(&str) -> Result<AnyValue, String>;

/// Build a value from owned text; cannot fail.
pub type ConstructFn = fn(String) -> AnyValue;

/// Gather converted elements into a container; `None` when an element has
/// the wrong type.
pub type AssembleFn = fn(Vec<AnyValue>) -> Option<AnyValue>;

/// Flavour of a collection target.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CollectionKind {
    /// Ordered sequence keeping duplicates.
    List,
    /// Unique elements in insertion order.
    Set,
    /// Unique elements in natural order.
    SortedSet,
}

/// Element type of a container together with the functions assembling it.
///
/// Besides the container it was declared with, a binding knows how to build
/// the default container of each [`CollectionKind`] its element type allows:
/// `Vec` for lists, [`IndexSet`] for sets and [`BTreeSet`] for sorted sets.
#[derive(Clone, Debug)]
pub struct ElementBinding {
    element: Box<TypeDescriptor>,
    container: AssembleFn,
    list: AssembleFn,
    set: Option<AssembleFn>,
    sorted_set: Option<AssembleFn>,
}

impl ElementBinding {
    /// Binding for containers `C` of `T`. Used as a hint, it only assembles
    /// lists.
    #[must_use]
    pub fn of<T, C>() -> Self
    where
        T: PropType,
        C: FromIterator<T> + Any + Send + Sync,
    {
        Self {
            element: Box::new(T::descriptor()),
            container: assemble::<T, C>,
            list: assemble::<T, Vec<T>>,
            set: None,
            sorted_set: None,
        }
    }

    /// Element type `T` for lists only.
    #[must_use]
    pub fn sequence<T: PropType>() -> Self {
        Self::of::<T, Vec<T>>()
    }

    /// Element type `T` for lists and insertion-ordered sets.
    #[must_use]
    pub fn unique<T>() -> Self
    where
        T: PropType + Eq + Hash,
    {
        Self {
            set: Some(assemble::<T, IndexSet<T>>),
            ..Self::sequence::<T>()
        }
    }

    /// Element type `T` for every [`CollectionKind`].
    #[must_use]
    pub fn element<T>() -> Self
    where
        T: PropType + Eq + Hash + Ord,
    {
        Self {
            sorted_set: Some(assemble::<T, BTreeSet<T>>),
            ..Self::unique::<T>()
        }
    }

    /// Element descriptor.
    #[must_use]
    pub fn element_type(&self) -> &TypeDescriptor {
        &self.element
    }

    /// Collect converted elements into the declared container.
    #[must_use]
    pub fn assemble(&self, items: Vec<AnyValue>) -> Option<AnyValue> {
        (self.container)(items)
    }

    /// Assembler for the default container of `kind`, if the element type
    /// supports it.
    #[must_use]
    pub const fn assembler(&self, kind: CollectionKind) -> Option<AssembleFn> {
        match kind {
            CollectionKind::List => Some(self.list),
            CollectionKind::Set => self.set,
            CollectionKind::SortedSet => self.sorted_set,
        }
    }
}

/// Container shape of a target type.
#[derive(Clone, Debug)]
pub enum Container {
    /// Fixed element type known from the type itself.
    Array(ElementBinding),
    /// Collection whose element type may be unknown.
    Collection(CollectionKind, Option<ElementBinding>),
}

/// What the conversion chain knows about a target type.
#[derive(Clone)]
pub struct TypeDescriptor {
    name: &'static str,
    type_id: Option<TypeId>,
    primitive: Option<ParseFn>,
    creator: Option<ParseFn>,
    constructor: Option<ConstructFn>,
    container: Option<Container>,
}

impl TypeDescriptor {
    const fn bare(name: &'static str, type_id: Option<TypeId>) -> Self {
        Self {
            name,
            type_id,
            primitive: None,
            creator: None,
            constructor: None,
            container: None,
        }
    }

    /// A type only custom parsers can produce.
    #[must_use]
    pub fn opaque<T: Any>() -> Self {
        Self::bare(type_name::<T>(), Some(TypeId::of::<T>()))
    }

    /// A primitive parsed with its canonical grammar; rejected text is an
    /// error rather than a fall through.
    #[must_use]
    pub fn primitive<T>() -> Self
    where
        T: FromStr + Any + Send + Sync,
        T::Err: fmt::Display,
    {
        Self {
            primitive: Some(parse_from_str::<T>),
            ..Self::opaque::<T>()
        }
    }

    /// A type created through `FromStr`; rejected text falls through to the
    /// next strategy.
    #[must_use]
    pub fn parsed<T>() -> Self
    where
        T: FromStr + Any + Send + Sync,
        T::Err: fmt::Display,
    {
        Self {
            creator: Some(parse_from_str::<T>),
            ..Self::opaque::<T>()
        }
    }

    /// A type built from owned text through `From<String>`.
    #[must_use]
    pub fn constructed<T>() -> Self
    where
        T: From<String> + Any + Send + Sync,
    {
        Self {
            constructor: Some(construct::<T>),
            ..Self::opaque::<T>()
        }
    }

    /// A fixed-shape container `C` of `T`, converted from one CSV line.
    #[must_use]
    pub fn array<C, T>() -> Self
    where
        T: PropType,
        C: FromIterator<T> + Any + Send + Sync,
    {
        Self {
            container: Some(Container::Array(ElementBinding::of::<T, C>())),
            ..Self::opaque::<C>()
        }
    }

    /// A collection `C` of `T`, converted from one CSV line.
    #[must_use]
    pub fn collection<C, T>(kind: CollectionKind) -> Self
    where
        T: PropType,
        C: FromIterator<T> + Any + Send + Sync,
    {
        Self {
            container: Some(Container::Collection(kind, Some(ElementBinding::of::<T, C>()))),
            ..Self::opaque::<C>()
        }
    }

    /// A collection whose element type is unknown. It converts only when the
    /// request carries an element hint.
    #[must_use]
    pub fn unparameterized(name: &'static str, kind: CollectionKind) -> Self {
        Self {
            container: Some(Container::Collection(kind, None)),
            ..Self::bare(name, None)
        }
    }

    /// Replace the creator.
    #[must_use]
    pub const fn with_creator(mut self, creator: ParseFn) -> Self {
        self.creator = Some(creator);
        self
    }

    /// Type name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Identity of the described type, when it is a concrete Rust type.
    #[must_use]
    pub const fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    /// Whether the target is `String`.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.type_id == Some(TypeId::of::<String>())
    }

    /// Primitive parser, if any.
    #[must_use]
    pub const fn primitive_parser(&self) -> Option<ParseFn> {
        self.primitive
    }

    /// `FromStr`-style creator, if any.
    #[must_use]
    pub const fn creator(&self) -> Option<ParseFn> {
        self.creator
    }

    /// `From<String>`-style constructor, if any.
    #[must_use]
    pub const fn constructor(&self) -> Option<ConstructFn> {
        self.constructor
    }

    /// Container shape, if any.
    #[must_use]
    pub const fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    /// Element binding of a collection target.
    #[must_use]
    pub fn collection_element(&self) -> Option<&ElementBinding> {
        match &self.container {
            Some(Container::Collection(_, element)) => element.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("primitive", &self.primitive.is_some())
            .field("creator", &self.creator.is_some())
            .field("constructor", &self.constructor.is_some())
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

/// A type the conversion chain can produce.
///
/// Implement it for your own types by picking the matching
/// [`TypeDescriptor`] constructor:
///
/// ```
/// use std::str::FromStr;
/// use propcast::{PropType, TypeConverter, TypeDescriptor};
///
/// #[derive(Debug, PartialEq)]
/// enum Level { Low, High }
///
/// impl FromStr for Level {
///     type Err = String;
///     fn from_str(s: &str) -> Result<Self, String> {
///         match s {
///             "low" => Ok(Self::Low),
///             "high" => Ok(Self::High),
///             other => Err(format!("unknown level {other}")),
///         }
///     }
/// }
///
/// impl PropType for Level {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::parsed::<Self>()
///     }
/// }
///
/// # fn main() -> propcast::PropsResult<()> {
/// let levels: Vec<Level> = TypeConverter::global().convert_to("low, high")?;
/// assert_eq!(levels, [Level::Low, Level::High]);
/// # Ok(())
/// # }
/// ```
pub trait PropType: Any + Send + Sync + Sized {
    /// Describe the type.
    fn descriptor() -> TypeDescriptor;
}

fn parse_from_str<T>(raw: &str) -> Result<AnyValue, String>
where
    T: FromStr + Any + Send + Sync,
    T::Err: fmt::Display,
{
    raw.parse::<T>()
        .map(|value| Box::new(value) as AnyValue)
        .map_err(|err| err.to_string())
}

fn construct<T>(raw: String) -> AnyValue
where
    T: From<String> + Any + Send + Sync,
{
    Box::new(T::from(raw))
}

fn assemble<T, C>(items: Vec<AnyValue>) -> Option<AnyValue>
where
    T: Any,
    C: FromIterator<T> + Any + Send + Sync,
{
    items
        .into_iter()
        .map(|item| item.downcast::<T>().ok().map(|boxed| *boxed))
        .collect::<Option<C>>()
        .map(|container| Box::new(container) as AnyValue)
}

impl PropType for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::opaque::<Self>()
    }
}

impl PropType for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor {
            // Anything but `true`, in any case, is false; empty text included.
            primitive: Some(|raw: &str| -> Result<AnyValue, String> {
                Ok(Box::new(raw.eq_ignore_ascii_case("true")))
            }),
            ..TypeDescriptor::opaque::<Self>()
        }
    }
}

macro_rules! primitive_prop_types {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PropType for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::primitive::<Self>()
                }
            }
        )*
    };
}

primitive_prop_types!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char,
);

impl PropType for PathBuf {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::constructed::<Self>()
    }
}

impl PropType for Utf8PathBuf {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::constructed::<Self>()
    }
}

impl<T: PropType> PropType for Box<[T]> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::array::<Self, T>()
    }
}

impl<T: PropType> PropType for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(CollectionKind::List)
    }
}

impl<T: PropType> PropType for VecDeque<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(CollectionKind::List)
    }
}

impl<T: PropType> PropType for LinkedList<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(CollectionKind::List)
    }
}

impl<T: PropType + Ord> PropType for BTreeSet<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(CollectionKind::SortedSet)
    }
}

impl<T, S> PropType for HashSet<T, S>
where
    T: PropType + Eq + Hash,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(CollectionKind::Set)
    }
}

impl<T, S> PropType for IndexSet<T, S>
where
    T: PropType + Eq + Hash,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(CollectionKind::Set)
    }
}
