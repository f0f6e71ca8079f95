//! Typed property binding from properties text and argument vectors.
//!
//! `propcast` merges key/value pairs from an initial map, bundled and
//! on-disk properties files, literal text and a tokenized argument vector
//! into one [`PropsStore`], later sources overriding earlier ones. Values
//! may reference earlier keys, process properties and environment
//! variables with `${name}`. Once frozen, the store answers lookups by
//! identifier (`dbUserName` finds `db.user.name`) and converts raw text into
//! typed values through [`TypeConverter`].
//!
//! # Examples
//!
//! ```
//! use propcast::{BindingTable, FieldBinding, PropsLoader, TypeConverter};
//!
//! # fn main() -> propcast::PropsResult<()> {
//! let table = BindingTable::new()
//!     .with(FieldBinding::of::<bool>("includeEmpty"))
//!     .with(FieldBinding::of::<String>("fileName").with_alias("f"))
//!     .with(FieldBinding::of::<u32>("numLines").with_default("10"))
//!     .with(FieldBinding::of::<Vec<String>>("_args"));
//!
//! let loader = PropsLoader::builder()
//!     .bundle("tail.properties", "file.name=/var/log/syslog\n")
//!     .base_name("tail")
//!     .build();
//!
//! let values = loader.bind(&table, &["--num-lines", "25", "extra"], &TypeConverter::global())?;
//! assert!(!values.flag("includeEmpty"));
//! assert_eq!(values.get::<String>("fileName").map(String::as_str), Some("/var/log/syslog"));
//! assert_eq!(values.get::<u32>("numLines"), Some(&25));
//! assert_eq!(values.get::<Vec<String>>("_args"), Some(&vec!["extra".to_owned()]));
//! # Ok(())
//! # }
//! ```

mod argv;
mod binding;
mod convert;
mod csv;
mod error;
mod expand;
mod identifier;
mod loader;
mod properties;
mod provider;
mod result_ext;
mod store;

pub use argv::{ARGS_KEY, ArgvGrammar, ArgvTokenizer, Arity, DASH_KEY, OptionSpec, ResolvedArgs};
pub use binding::{BindingTable, BoundValues, FieldBinding};
pub use convert::{
    AnyValue, AssembleFn, CollectionKind, ConstructFn, Container, ConversionRequest,
    ElementBinding, FnParser, ParseFn, ParserRegistry, PropParser, PropType, Strategy,
    TypeConverter, TypeDescriptor,
};
pub use csv::{CsvTokenizer, DEFAULT_QUOTE, DEFAULT_SEPARATOR};
pub use error::{PropsError, PropsResult};
pub use expand::{ProcessProperties, VarResolution, expand};
pub use identifier::candidate_keys;
pub use loader::{PropsLoader, PropsLoaderBuilder};
pub use properties::parse_properties;
pub use result_ext::LookupResultExt;
pub use store::{FrozenProps, PropsSource, PropsStore, StoreOptions};
