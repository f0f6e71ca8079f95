//! Temporary directory for properties files.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary directory removed on drop, addressed with UTF-8 paths.
///
/// # Examples
///
/// ```
/// use test_helpers::PropsDir;
///
/// # fn main() -> anyhow::Result<()> {
/// let dir = PropsDir::new()?;
/// let file = dir.write("app.properties", "port=8080\n")?;
/// assert!(file.starts_with(dir.path()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PropsDir {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl PropsDir {
    /// Create an empty directory.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be created or its path is not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temporary directory")?;
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|p| anyhow!("temporary path is not UTF-8: {}", p.display()))?;
        Ok(Self { _dir: dir, path })
    }

    /// Directory path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Write `contents` to `name` inside the directory, returning the file
    /// path.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let file = self.path.join(name);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        std::fs::write(&file, contents).with_context(|| format!("write {file}"))?;
        Ok(file)
    }
}
