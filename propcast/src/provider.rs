//! `figment` provider over frozen properties.
//!
//! Keys nest on `.`, so `db.user=fred` becomes `{ db: { user: "fred" } }`.
//! When the store has a prefix only keys under it are emitted, with the
//! prefix removed. Values read as figment scalars where possible; a value
//! holding an unquoted separator is split into an array with the CSV
//! tokenizer, which lets list fields deserialize into `Vec<T>`.

use figment::{
    Metadata, Profile, Provider,
    error::Error,
    value::{Dict, Map, Value},
};

use crate::csv::CsvTokenizer;
use crate::store::FrozenProps;

impl Provider for FrozenProps {
    fn metadata(&self) -> Metadata {
        Metadata::named("propcast properties")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let csv = CsvTokenizer::default();
        let options = self.options();
        let mut dict = Dict::new();
        for (key, raw) in self.iter() {
            let path = match options.prefix() {
                Some(prefix) => match strip_key_prefix(key, prefix, options.ignores_case()) {
                    Some(rest) => rest,
                    None => continue,
                },
                None => key,
            };
            let segments: Vec<&str> = path.split('.').collect();
            insert_nested(&mut dict, key, &segments, parse_value(&csv, raw))?;
        }
        Ok(Profile::Default.collect(dict))
    }
}

fn strip_key_prefix<'k>(key: &'k str, prefix: &str, ignore_case: bool) -> Option<&'k str> {
    let (head, tail) = key.split_at_checked(prefix.len())?;
    let matches = if ignore_case {
        head.eq_ignore_ascii_case(prefix)
    } else {
        head == prefix
    };
    if matches { tail.strip_prefix('.') } else { None }
}

fn should_split(csv: &CsvTokenizer, value: &str) -> bool {
    value.contains(csv.separator()) && !matches!(value.chars().next(), Some('[' | '{' | '\''))
}

fn parse_value(csv: &CsvTokenizer, raw: &str) -> Value {
    let trimmed = raw.trim();
    if should_split(csv, trimmed) {
        if let Some(fields) = csv.split(trimmed) {
            return fields.into_iter().map(Value::from).collect::<Vec<_>>().into();
        }
    }
    trimmed
        .parse()
        .unwrap_or_else(|_| Value::from(trimmed.to_owned()))
}

fn insert_nested(dict: &mut Dict, key: &str, segments: &[&str], value: Value) -> Result<(), Error> {
    let Some((head, rest)) = segments.split_first() else {
        return Ok(());
    };
    if rest.is_empty() {
        if matches!(dict.get(*head), Some(Value::Dict(..))) {
            return Err(conflict(key));
        }
        dict.insert((*head).to_owned(), value);
        return Ok(());
    }
    let entry = dict
        .entry((*head).to_owned())
        .or_insert_with(|| Value::from(Dict::new()));
    match entry {
        Value::Dict(_, child) => insert_nested(child, key, rest, value),
        _ => Err(conflict(key)),
    }
}

fn conflict(key: &str) -> Error {
    Error::from(format!(
        "property key `{key}` is both a value and a parent of other keys"
    ))
}
