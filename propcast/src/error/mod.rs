//! Error types produced by the parsing and conversion engine.

mod constructors;
mod types;

pub use types::{PropsError, PropsResult};

#[cfg(test)]
mod tests;
