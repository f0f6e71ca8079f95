//! Read-only view of a store with its key index.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use uncased::{Uncased, UncasedStr};

use super::{PropsSource, PropsStore, StoreOptions};
use crate::convert::{AnyValue, ConversionRequest, PropType, TypeConverter, TypeDescriptor};
use crate::identifier::candidate_keys;
use crate::PropsResult;

#[derive(Clone, Debug)]
enum KeyIndex {
    Exact,
    Folded(HashMap<Uncased<'static>, usize>),
}

/// A frozen [`PropsStore`] answering identifier lookups.
///
/// Safe to share between threads for concurrent reads. Call
/// [`FrozenProps::thaw`] to merge further sources, then freeze again.
#[derive(Clone, Debug)]
pub struct FrozenProps {
    store: PropsStore,
    index: KeyIndex,
}

impl FrozenProps {
    pub(super) fn new(store: PropsStore) -> Self {
        let index = if store.options.ignores_case() {
            let mut folded = HashMap::with_capacity(store.entries.len());
            for (position, key) in store.entries.keys().enumerate() {
                folded.insert(Uncased::from_owned(fold(key).into_owned()), position);
            }
            KeyIndex::Folded(folded)
        } else {
            KeyIndex::Exact
        };
        Self { store, index }
    }

    /// Store settings.
    #[must_use]
    pub const fn options(&self) -> &StoreOptions {
        &self.store.options
    }

    /// Return the raw value for `identifier`.
    ///
    /// Each candidate key from [`candidate_keys`] is tried in order, with the
    /// configured prefix prepended.
    ///
    /// # Examples
    ///
    /// ```
    /// use propcast::{PropsSource, PropsStore, StoreOptions};
    ///
    /// # fn main() -> propcast::PropsResult<()> {
    /// let mut store = PropsStore::new(StoreOptions::default().with_prefix("app"));
    /// store.merge_pairs([("app.db.user.name", "fred")], &PropsSource::InitialMap);
    /// let props = store.freeze();
    /// assert_eq!(props.lookup("dbUserName")?, Some("fred"));
    /// assert_eq!(props.lookup("DB_USER_NAME")?, Some("fred"));
    /// assert_eq!(props.lookup("dbPassword")?, None);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`crate::PropsError::IllegalIdentifierChar`] when the
    /// identifier cannot be decomposed.
    pub fn lookup(&self, identifier: &str) -> PropsResult<Option<&str>> {
        for candidate in candidate_keys(identifier)? {
            let key = match self.store.options.prefix() {
                Some(prefix) => format!("{prefix}.{candidate}"),
                None => candidate,
            };
            if let Some(value) = self.value_for(&key) {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Look up `identifier` and convert it to `T`.
    ///
    /// # Errors
    ///
    /// Fails when the identifier is illegal or the value cannot be converted.
    pub fn get<T: PropType>(
        &self,
        identifier: &str,
        converter: &TypeConverter<'_>,
    ) -> PropsResult<Option<T>> {
        match self.lookup(identifier)? {
            Some(raw) => converter.convert_to::<T>(raw).map(Some),
            None => Ok(None),
        }
    }

    /// Look up `identifier` and convert it to the type `target` describes.
    ///
    /// The conversion carries no element type hint, so unparameterised
    /// collection targets are rejected while arrays still convert.
    ///
    /// # Errors
    ///
    /// Fails when the identifier is illegal or the value cannot be converted.
    pub fn get_as(
        &self,
        identifier: &str,
        target: &TypeDescriptor,
        converter: &TypeConverter<'_>,
    ) -> PropsResult<Option<AnyValue>> {
        match self.lookup(identifier)? {
            Some(raw) => converter
                .convert(&ConversionRequest::bare(raw, target))
                .map(Some),
            None => Ok(None),
        }
    }

    /// Sources that wrote exactly `key`, oldest first.
    #[must_use]
    pub fn provenance(&self, key: &str) -> Option<&[PropsSource]> {
        self.store.provenance(key)
    }

    /// Iterate over stored pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.store.iter()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drop the index and return the mutable store.
    #[must_use]
    pub fn thaw(self) -> PropsStore {
        self.store
    }

    fn value_for(&self, key: &str) -> Option<&str> {
        match &self.index {
            KeyIndex::Exact => self.store.get(key),
            KeyIndex::Folded(folded) => folded
                .get(UncasedStr::new(&fold(key)))
                .and_then(|&position| self.store.entries.get_index(position))
                .map(|(_, value)| value.as_str()),
        }
    }
}

/// `uncased` compares ASCII only; other keys are lowercased first.
fn fold(key: &str) -> Cow<'_, str> {
    if key.is_ascii() {
        Cow::Borrowed(key)
    } else {
        Cow::Owned(key.to_lowercase())
    }
}

impl fmt::Display for FrozenProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.store.fmt_report("FrozenProps", f)
    }
}
