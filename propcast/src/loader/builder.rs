//! Builder for [`PropsLoader`].

use camino::Utf8PathBuf;
use indexmap::IndexMap;

use super::PropsLoader;
use crate::expand::{ProcessProperties, VarResolution};
use crate::store::StoreOptions;

/// Builder for [`PropsLoader`].
///
/// # Examples
///
/// ```
/// use propcast::PropsLoader;
///
/// # fn main() -> propcast::PropsResult<()> {
/// let props = PropsLoader::builder()
///     .base_name("app")
///     .bundle("app-default.properties", "port=80\nhost=localhost\n")
///     .bundle("app.properties", "port=8080\n")
///     .add_props("host=example.org")
///     .build()
///     .load()?;
/// assert_eq!(props.lookup("port")?, Some("8080"));
/// assert_eq!(props.lookup("host")?, Some("example.org"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PropsLoaderBuilder {
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

impl Default for PropsLoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PropsLoaderBuilder {
    /// Creates a builder with no sources, searching bundled resources and
    /// `-default` resources once a base name is set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_name: None,
            options: StoreOptions::default(),
            initial: IndexMap::new(),
            text: None,
            search_dirs: Vec::new(),
            bundled: IndexMap::new(),
            search_bundled: true,
            search_default: true,
            process: ProcessProperties::detect(),
        }
    }

    /// Sets the resource base name: `{name}-default.properties` and
    /// `{name}.properties` are searched.
    #[must_use]
    pub fn base_name(mut self, name: impl Into<String>) -> Self {
        self.base_name = Some(name.into());
        self
    }

    /// Prefixes every lookup with `prefix` and a `.`.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options = self.options.with_prefix(prefix);
        self
    }

    /// Adds pairs merged before any resource, in iteration order.
    #[must_use]
    pub fn initial<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.initial
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets properties text merged after every resource.
    #[must_use]
    pub fn add_props(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Replaces the directories searched for properties files.
    #[must_use]
    pub fn search_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        self.search_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a directory searched for properties files.
    #[must_use]
    pub fn add_search_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    /// Appends the user's configuration directory joined with `app`, when
    /// the platform has one with a UTF-8 path.
    #[must_use]
    pub fn add_user_config_dir(mut self, app: &str) -> Self {
        if let Some(dir) = dirs::config_dir().and_then(|d| Utf8PathBuf::from_path_buf(d).ok()) {
            self.search_dirs.push(dir.join(app));
        }
        self
    }

    /// Registers a resource compiled into the program, typically with
    /// `include_str!`.
    #[must_use]
    pub fn bundle(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.bundled.insert(name.into(), text.into());
        self
    }

    /// Whether bundled resources are searched. Defaults to `true`.
    #[must_use]
    pub const fn search_bundled(mut self, search: bool) -> Self {
        self.search_bundled = search;
        self
    }

    /// Whether `-default` resources are searched. Defaults to `true`.
    #[must_use]
    pub const fn search_default(mut self, search: bool) -> Self {
        self.search_default = search;
        self
    }

    /// Compare keys case-insensitively. Defaults to `true`.
    #[must_use]
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.options = self.options.with_ignore_case(ignore_case);
        self
    }

    /// Selects where `${name}` references are resolved.
    #[must_use]
    pub fn resolution(mut self, resolution: VarResolution) -> Self {
        self.options = self.options.with_resolution(resolution);
        self
    }

    /// Adds a process property visible to `${name}` references.
    #[must_use]
    pub fn process_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.process.insert(key, value);
        self
    }

    /// Replaces the process property table.
    #[must_use]
    pub fn process_properties(mut self, process: ProcessProperties) -> Self {
        self.process = process;
        self
    }

    /// Finalises the builder.
    #[must_use]
    pub fn build(self) -> PropsLoader {
        PropsLoader {
            base_name: self.base_name,
            options: self.options,
            initial: self.initial,
            text: self.text,
            search_dirs: self.search_dirs,
            bundled: self.bundled,
            search_bundled: self.search_bundled,
            search_default: self.search_default,
            process: self.process,
        }
    }
}
