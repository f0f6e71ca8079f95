//! `${name}` variable expansion inside property values.
//!
//! A reference is replaced when the resolver knows the name; otherwise it is
//! left untouched. `\${` escapes a reference and yields a literal `${`.
//! Expansion is single pass: substituted text is never scanned again.

use std::collections::BTreeMap;

/// Where `${name}` references are looked up after the store itself.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum VarResolution {
    /// Only values already present in the store being built.
    StoreOnly,
    /// The store, then [`ProcessProperties`], then the OS environment.
    #[default]
    StoreAndProcess,
}

/// Process-level properties consulted between the store and the
/// environment.
///
/// Seeded with platform facts such as `os.name`, `user.dir` and
/// `user.home`; callers may add their own entries.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProcessProperties {
    values: BTreeMap<String, String>,
}

impl ProcessProperties {
    /// An empty table.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// A table describing the running process.
    #[must_use]
    pub fn detect() -> Self {
        let mut props = Self::empty();
        props.insert("os.name", std::env::consts::OS);
        props.insert("os.arch", std::env::consts::ARCH);
        props.insert("os.family", std::env::consts::FAMILY);
        props.insert("file.separator", std::path::MAIN_SEPARATOR_STR);
        props.insert("path.separator", if cfg!(windows) { ";" } else { ":" });
        props.insert("line.separator", if cfg!(windows) { "\r\n" } else { "\n" });
        if let Ok(dir) = std::env::current_dir() {
            props.insert("user.dir", dir.to_string_lossy());
        }
        if let Some(home) = dirs::home_dir() {
            props.insert("user.home", home.to_string_lossy());
        }
        props
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up an entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Resolve `name` from this table, falling back to the OS environment.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(str::to_owned)
            .or_else(|| std::env::var(name).ok())
    }
}

/// Expand `${name}` references in `value` using `resolve`.
///
/// # Examples
///
/// ```
/// use propcast::expand;
///
/// let lookup = |name: &str| (name == "user").then(|| "fred".to_owned());
/// assert_eq!(expand("hi ${user}", lookup), "hi fred");
/// assert_eq!(expand("hi ${nobody}", lookup), "hi ${nobody}");
/// assert_eq!(expand(r"hi \${user}", lookup), "hi ${user}");
/// ```
pub fn expand<F>(value: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find("${") {
        let (head, tail) = rest.split_at(pos);
        let body = tail.strip_prefix("${").unwrap_or(tail);

        if let Some(literal) = head.strip_suffix('\\') {
            out.push_str(literal);
            out.push_str("${");
            rest = body;
            continue;
        }

        out.push_str(head);
        if let Some(end) = body.find('}').filter(|&end| end > 0) {
            let (name, closing) = body.split_at(end);
            if let Some(replacement) = resolve(name) {
                out.push_str(&replacement);
                rest = closing.strip_prefix('}').unwrap_or(closing);
                continue;
            }
        }
        out.push_str("${");
        rest = body;
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ProcessProperties, expand};

    fn known(name: &str) -> Option<String> {
        match name {
            "a" => Some("1".to_owned()),
            "b" => Some("${a}".to_owned()),
            "home" => Some("/home/fred".to_owned()),
            _ => None,
        }
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case("${a}", "1")]
    #[case("x${a}y${a}z", "x1y1z")]
    #[case("${home}/bin", "/home/fred/bin")]
    #[case("${missing}", "${missing}")]
    #[case("${missing}${a}", "${missing}1")]
    #[case("${}", "${}")]
    #[case("open ${a", "open ${a")]
    #[case("${b}", "${a}")]
    fn expands_known_references(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(expand(value, known), expected);
    }

    #[rstest]
    #[case(r"\${a}", "${a}")]
    #[case(r"x\${a}${a}", "x${a}1")]
    #[case(r"\${missing}", "${missing}")]
    fn escaped_references_stay_literal(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(expand(value, known), expected);
    }

    #[test]
    fn resolver_sees_only_the_name() {
        let mut seen = Vec::new();
        let out = expand("${one}-${two}", |name| {
            seen.push(name.to_owned());
            None
        });
        assert_eq!(out, "${one}-${two}");
        assert_eq!(seen, ["one", "two"]);
    }

    #[test]
    fn detected_properties_describe_the_platform() {
        let props = ProcessProperties::detect();
        assert_eq!(props.get("os.name"), Some(std::env::consts::OS));
        assert!(props.get("user.dir").is_some(), "cwd should be known");
    }

    #[test]
    fn caller_entries_take_priority_over_environment() {
        let mut props = ProcessProperties::empty();
        props.insert("PATH", "overridden");
        assert_eq!(props.resolve("PATH").as_deref(), Some("overridden"));
    }
}
