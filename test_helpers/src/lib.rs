//! Test helpers shared across crates in the workspace.
//!
//! Provides environment variable guards, a temporary directory for
//! properties files and a shorthand for building argument vectors.

pub mod env;
mod props_dir;

pub use props_dir::PropsDir;

/// Owned argument vector from string literals.
///
/// # Examples
///
/// ```
/// let argv = test_helpers::argv(&["-v", "--level", "debug"]);
/// assert_eq!(argv.len(), 3);
/// ```
#[must_use]
pub fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|&arg| arg.to_owned()).collect()
}
