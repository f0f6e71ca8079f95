//! Ordered property table built by successive merges.
//!
//! A [`PropsStore`] collects key/value pairs from each source in precedence
//! order; a later write to a key replaces its value but keeps its position.
//! Values merged from text or maps have their `${name}` references expanded
//! against what the store already holds, so a reference can only see keys
//! merged before it. Once loading is complete the store is frozen into
//! [`FrozenProps`], which builds the lookup index and answers identifier
//! queries.

mod frozen;
mod source;

use std::fmt;

use indexmap::IndexMap;

use crate::argv::ResolvedArgs;
use crate::csv::CsvTokenizer;
use crate::expand::{ProcessProperties, VarResolution, expand};
use crate::properties::parse_properties;
use crate::PropsResult;

pub use frozen::FrozenProps;
pub use source::PropsSource;

/// Settings shared by a store and its frozen view.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoreOptions {
    prefix: Option<String>,
    ignore_case: bool,
    resolution: VarResolution,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            ignore_case: true,
            resolution: VarResolution::default(),
        }
    }
}

impl StoreOptions {
    /// Prepend `prefix` and a `.` to every candidate key during lookup.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Compare keys case-insensitively (the default) or exactly.
    #[must_use]
    pub const fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Select where `${name}` references are resolved.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: VarResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Lookup prefix, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Whether keys are compared case-insensitively.
    #[must_use]
    pub const fn ignores_case(&self) -> bool {
        self.ignore_case
    }

    /// Variable resolution mode.
    #[must_use]
    pub const fn resolution(&self) -> VarResolution {
        self.resolution
    }
}

/// Mutable property table with per-key provenance.
///
/// # Examples
///
/// ```
/// use propcast::{PropsSource, PropsStore, StoreOptions, VarResolution};
///
/// # fn main() -> propcast::PropsResult<()> {
/// let mut store = PropsStore::new(
///     StoreOptions::default().with_resolution(VarResolution::StoreOnly),
/// );
/// store.merge_text("home=/srv\nlogs=${home}/logs\n", &PropsSource::Text)?;
/// assert_eq!(store.get("logs"), Some("/srv/logs"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct PropsStore {
    entries: IndexMap<String, String>,
    provenance: IndexMap<String, Vec<PropsSource>>,
    options: StoreOptions,
    process: ProcessProperties,
}

impl PropsStore {
    /// Create an empty store that resolves process properties from the
    /// running platform.
    #[must_use]
    pub fn new(options: StoreOptions) -> Self {
        Self::with_process(options, ProcessProperties::detect())
    }

    /// Create an empty store with an explicit process property table.
    #[must_use]
    pub fn with_process(options: StoreOptions, process: ProcessProperties) -> Self {
        Self {
            entries: IndexMap::new(),
            provenance: IndexMap::new(),
            options,
            process,
        }
    }

    /// Store settings.
    #[must_use]
    pub const fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Raw value stored under exactly `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Sources that wrote `key`, oldest first.
    #[must_use]
    pub fn provenance(&self, key: &str) -> Option<&[PropsSource]> {
        self.provenance.get(key).map(Vec::as_slice)
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over stored pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `pairs` in order, expanding `${name}` references in each value
    /// against the keys stored so far.
    ///
    /// Returns the number of pairs merged.
    pub fn merge_pairs<I, K, V>(&mut self, pairs: I, source: &PropsSource) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut merged = 0;
        for (key, value) in pairs {
            let expanded = expand(value.as_ref(), |name| self.resolve_var(name));
            self.insert(key.into(), expanded, source);
            merged += 1;
        }
        merged
    }

    /// Decode properties `text` and merge its pairs in file order.
    ///
    /// Returns the number of pairs merged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PropsError::PropertiesSyntax`] when the text contains
    /// a malformed escape; nothing is merged in that case.
    pub fn merge_text(&mut self, text: &str, source: &PropsSource) -> PropsResult<usize> {
        let pairs = parse_properties(text, &source.to_string())?;
        Ok(self.merge_pairs(pairs, source))
    }

    /// Merge tokenized arguments without variable expansion.
    ///
    /// Absent values are dropped. A single remaining value is stored as-is
    /// and several are stored as one CSV line; an option whose values were
    /// all absent is stored as the empty string.
    pub fn merge_args(&mut self, args: &ResolvedArgs) -> usize {
        let csv = CsvTokenizer::default();
        let mut merged = 0;
        for (name, values) in args.iter() {
            let present: Vec<&str> = values.iter().filter_map(Option::as_deref).collect();
            let value = match present.as_slice() {
                [only] => (*only).to_owned(),
                many => csv.join_fields(many),
            };
            self.insert(name.to_owned(), value, &PropsSource::Argv);
            merged += 1;
        }
        tracing::debug!(keys = merged, "merged argument values");
        merged
    }

    /// Build the lookup index.
    #[must_use]
    pub fn freeze(self) -> FrozenProps {
        FrozenProps::new(self)
    }

    fn insert(&mut self, key: String, value: String, source: &PropsSource) {
        self.provenance
            .entry(key.clone())
            .or_default()
            .push(source.clone());
        self.entries.insert(key, value);
    }

    fn resolve_var(&self, name: &str) -> Option<String> {
        if let Some(value) = self.entries.get(name) {
            return Some(value.clone());
        }
        match self.options.resolution {
            VarResolution::StoreOnly => None,
            VarResolution::StoreAndProcess => self.process.resolve(name),
        }
    }

    fn fmt_report(&self, title: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut by_source: IndexMap<String, Vec<&str>> = IndexMap::new();
        for (key, sources) in &self.provenance {
            for source in sources {
                by_source.entry(source.to_string()).or_default().push(key);
            }
        }
        writeln!(f, "{title}[")?;
        writeln!(f, "  locations")?;
        for (source, keys) in &by_source {
            writeln!(f, "    {source} [{}]", keys.join(", "))?;
        }
        writeln!(f, "  values")?;
        let values: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        writeln!(f, "    {{{}}}", values.join(", "))?;
        write!(f, "]")
    }
}

impl fmt::Display for PropsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_report("PropsStore", f)
    }
}

#[cfg(test)]
mod tests;
