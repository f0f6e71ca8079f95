//! Extension for treating failed lookups as absent values.
//!
//! Lookups and conversions fail loudly by default. Where a caller explicitly
//! wants an optional value, [`LookupResultExt::or_absent`] discards the error
//! and logs it at debug level.
//!
//! # Examples
//!
//! ```
//! use propcast::{LookupResultExt, PropsSource, PropsStore, StoreOptions, TypeConverter};
//!
//! let mut store = PropsStore::new(StoreOptions::default());
//! store.merge_pairs([("port", "http")], &PropsSource::InitialMap);
//! let props = store.freeze();
//!
//! let port = props.get::<u16>("port", &TypeConverter::global()).or_absent();
//! assert_eq!(port, None);
//! ```

use crate::PropsResult;

/// Collapse a fallible optional lookup into an `Option`.
pub trait LookupResultExt<T> {
    /// Return the value, or `None` when the lookup failed or found nothing.
    fn or_absent(self) -> Option<T>;
}

impl<T> LookupResultExt<T> for PropsResult<Option<T>> {
    fn or_absent(self) -> Option<T> {
        self.unwrap_or_else(|err| {
            tracing::debug!(error = %err, "treating failed lookup as absent");
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::LookupResultExt;
    use crate::{PropsError, PropsResult};

    #[test]
    fn keeps_values_and_absence() {
        let found: PropsResult<Option<u8>> = Ok(Some(3));
        let missing: PropsResult<Option<u8>> = Ok(None);
        assert_eq!(found.or_absent(), Some(3));
        assert_eq!(missing.or_absent(), None);
    }

    #[test]
    fn discards_errors() {
        let failed: PropsResult<Option<u8>> = Err(PropsError::unsupported("x", "u8"));
        assert_eq!(failed.or_absent(), None);
    }
}
