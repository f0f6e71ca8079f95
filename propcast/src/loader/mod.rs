//! Loading of properties from every configured source.
//!
//! Sources are merged lowest precedence first:
//!
//! 1. the initial map,
//! 2. `{base}-default.properties` from bundled resources, then from each
//!    search directory,
//! 3. `{base}.properties` in the same order,
//! 4. the literal text added with [`PropsLoaderBuilder::add_props`],
//! 5. argument values, when loading with an argument vector.
//!
//! Missing resources contribute nothing.

mod builder;

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;

use crate::argv::ArgvGrammar;
use crate::binding::{BindingTable, BoundValues};
use crate::convert::TypeConverter;
use crate::expand::ProcessProperties;
use crate::store::{FrozenProps, PropsSource, PropsStore, StoreOptions};
use crate::{PropsError, PropsResult};

pub use builder::PropsLoaderBuilder;

/// Configured set of property sources.
#[derive(Debug, Clone)]
pub struct PropsLoader {
    base_name: Option<String>,
    options: StoreOptions,
    initial: IndexMap<String, String>,
    text: Option<String>,
    search_dirs: Vec<Utf8PathBuf>,
    bundled: IndexMap<String, String>,
    search_bundled: bool,
    search_default: bool,
    process: ProcessProperties,
}

impl PropsLoader {
    /// Start configuring a loader.
    #[must_use]
    pub fn builder() -> PropsLoaderBuilder {
        PropsLoaderBuilder::new()
    }

    /// Settings applied to the loaded store.
    #[must_use]
    pub const fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Resource names searched, lowest precedence first.
    #[must_use]
    pub fn resource_names(&self) -> Vec<String> {
        let Some(base) = self.base_name.as_deref() else {
            return Vec::new();
        };
        let mut names = Vec::with_capacity(2);
        if self.search_default {
            names.push(format!("{base}-default.properties"));
        }
        names.push(format!("{base}.properties"));
        names
    }

    /// Merge every source and freeze the result.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError::File`] when an existing file cannot be read and
    /// [`PropsError::PropertiesSyntax`] when a source is malformed.
    pub fn load(&self) -> PropsResult<FrozenProps> {
        Ok(self.load_store()?.freeze())
    }

    /// Merge every source, then the values tokenized from `argv`.
    ///
    /// # Errors
    ///
    /// As for [`PropsLoader::load`], plus
    /// [`PropsError::IllegalArgumentSyntax`] for a malformed `argv`.
    pub fn load_with_args<S: AsRef<str>>(
        &self,
        argv: &[S],
        grammar: &ArgvGrammar,
    ) -> PropsResult<FrozenProps> {
        let args = grammar.tokenize(argv)?;
        let mut store = self.load_store()?;
        store.merge_args(&args);
        Ok(store.freeze())
    }

    /// Load every source and `argv` against the grammar derived from
    /// `table`, then bind the table's fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use propcast::{BindingTable, FieldBinding, PropsLoader, TypeConverter};
    ///
    /// # fn main() -> propcast::PropsResult<()> {
    /// let table = BindingTable::new()
    ///     .with(FieldBinding::of::<u16>("port"))
    ///     .with(FieldBinding::of::<bool>("verbose").with_alias("v"));
    /// let loader = PropsLoader::builder().add_props("port=80").build();
    ///
    /// let values = loader.bind(&table, &["-v", "--port", "8080"], &TypeConverter::global())?;
    /// assert_eq!(values.get::<u16>("port"), Some(&8080));
    /// assert!(values.flag("verbose"));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Fails when loading, tokenizing or converting fails.
    pub fn bind<S: AsRef<str>>(
        &self,
        table: &BindingTable,
        argv: &[S],
        converter: &TypeConverter<'_>,
    ) -> PropsResult<BoundValues> {
        let args = table.parse_args(argv)?;
        let mut store = self.load_store()?;
        store.merge_args(&args);
        table.bind(&store.freeze(), converter)
    }

    fn load_store(&self) -> PropsResult<PropsStore> {
        let mut store = PropsStore::with_process(self.options.clone(), self.process.clone());
        if !self.initial.is_empty() {
            let source = PropsSource::InitialMap;
            let merged = store.merge_pairs(&self.initial, &source);
            log_loaded(&source, merged);
        }
        for name in self.resource_names() {
            if self.search_bundled {
                self.merge_bundled(&mut store, &name)?;
            }
            for dir in &self.search_dirs {
                merge_file(&mut store, &dir.join(&name))?;
            }
        }
        if let Some(text) = &self.text {
            let source = PropsSource::Text;
            let merged = store.merge_text(text, &source)?;
            log_loaded(&source, merged);
        }
        Ok(store)
    }

    fn merge_bundled(&self, store: &mut PropsStore, name: &str) -> PropsResult<()> {
        let Some(text) = self.bundled.get(name) else {
            return Ok(());
        };
        let source = PropsSource::bundled(name);
        let merged = store.merge_text(text, &source)?;
        log_loaded(&source, merged);
        Ok(())
    }
}

fn merge_file(store: &mut PropsStore, path: &Utf8Path) -> PropsResult<()> {
    if !path.is_file() {
        return Ok(());
    }
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(PropsError::file(path, err)),
    };
    let source = PropsSource::file(path);
    let merged = store.merge_text(&text, &source)?;
    log_loaded(&source, merged);
    Ok(())
}

fn log_loaded(source: &PropsSource, keys: usize) {
    tracing::info!(source = %source, keys, "loaded properties");
}
