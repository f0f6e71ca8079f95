//! Mapping of identifiers to candidate property keys.
//!
//! An identifier is either taken literally (it contains a `.`), treated as
//! snake case (it contains a `_`) or decomposed as camel case. The two styles
//! are never mixed: any underscore selects the snake case rules.
//!
//! | identifier   | candidates                                |
//! |--------------|-------------------------------------------|
//! | `db.user`    | `db.user`                                 |
//! | `db_userName`| `db_userName`, `db.userName`              |
//! | `dbUserName` | `dbUserName`, `db.user.name`              |
//! | `restAPI`    | `restAPI`, `rest.API`                     |
//! | `RESTApi`    | `RESTApi`, `RESTA.pi`                     |
//! | `db$user`    | `db$user`, `db.user`                      |
//! | `db1user`    | `db1user`, `db1.user`, `db.1.user`        |
//!
//! Digit runs may belong to the preceding word or stand alone; the combined
//! form is shorter and is tried first.

use crate::{PropsError, PropsResult};

/// Return the ordered candidate keys for `identifier`.
///
/// The first candidate is always the identifier itself.
///
/// # Examples
///
/// ```
/// use propcast::candidate_keys;
/// # fn main() -> propcast::PropsResult<()> {
/// assert_eq!(candidate_keys("restAPI")?, ["restAPI", "rest.API"]);
/// assert_eq!(candidate_keys("db_user")?, ["db_user", "db.user"]);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`PropsError::IllegalIdentifierChar`] when a camel case identifier
/// contains something other than letters, digits or `$`.
pub fn candidate_keys(identifier: &str) -> PropsResult<Vec<String>> {
    let mut keys = vec![identifier.to_owned()];
    if identifier.contains('.') {
        return Ok(keys);
    }
    if identifier.contains('_') {
        keys.push(identifier.replace('_', "."));
        return Ok(keys);
    }
    keys.extend(camel_case_keys(identifier)?);
    Ok(keys)
}

fn camel_case_keys(identifier: &str) -> PropsResult<Vec<String>> {
    let words = split_words(identifier)?;
    let Some((first, rest)) = words.split_first() else {
        return Ok(Vec::new());
    };

    let mut combined = first.clone();
    for word in rest {
        if !is_digits(word) {
            combined.push('.');
        }
        combined.push_str(word);
    }
    let separated = words.join(".");

    let mut keys = Vec::with_capacity(2);
    if combined.len() < separated.len() {
        keys.push(combined);
    }
    keys.push(separated);
    Ok(keys)
}

fn is_digits(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_digit())
}

/// Split a camel case identifier into its words.
fn split_words(identifier: &str) -> PropsResult<Vec<String>> {
    let chars: Vec<char> = identifier.chars().collect();
    let mut words = Vec::new();
    let mut i = 0;
    while let Some(&ch) = chars.get(i) {
        if ch == '$' {
            i += 1;
            continue;
        }
        let (word, next) = if ch.is_alphabetic() {
            letter_run(&chars, i, ch)
        } else if ch.is_ascii_digit() {
            let end = run_end(&chars, i + 1, |c| c.is_ascii_digit());
            (chars.get(i..end).unwrap_or_default().iter().collect(), end)
        } else {
            return Err(PropsError::IllegalIdentifierChar {
                identifier: identifier.to_owned(),
                ch,
            });
        };
        words.push(word);
        i = next;
    }
    Ok(words)
}

/// Read the letter word starting at `start`, returning it with the index of
/// the first character after it.
fn letter_run(chars: &[char], start: usize, ch: char) -> (String, usize) {
    let Some(&next) = chars.get(start + 1) else {
        return (ch.to_string(), start + 1);
    };
    if ch.is_uppercase() && next.is_uppercase() {
        let end = run_end(chars, start + 2, char::is_uppercase);
        return (slice(chars, start, end), end);
    }
    let end = run_end(chars, start + 1, char::is_lowercase);
    if ch.is_uppercase() {
        let mut word: String = ch.to_lowercase().collect();
        word.push_str(&slice(chars, start + 1, end));
        (word, end)
    } else {
        (slice(chars, start, end), end)
    }
}

fn run_end(chars: &[char], from: usize, keep: impl Fn(char) -> bool) -> usize {
    let mut end = from;
    while chars.get(end).is_some_and(|&c| keep(c)) {
        end += 1;
    }
    end.min(chars.len())
}

fn slice(chars: &[char], start: usize, end: usize) -> String {
    chars.get(start..end).unwrap_or_default().iter().collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::candidate_keys;
    use crate::PropsError;

    #[rstest]
    #[case("db_userName", &["db_userName", "db.userName"])]
    #[case("db.user.name", &["db.user.name"])]
    #[case("a.b_c", &["a.b_c"])]
    fn maps_literal_and_snake_case(#[case] identifier: &str, #[case] expected: &[&str]) {
        let keys = candidate_keys(identifier).expect("valid identifier");
        assert_eq!(keys, expected);
    }

    #[rstest]
    #[case("dbUserName", &["dbUserName", "db.user.name"])]
    #[case("restAPI", &["restAPI", "rest.API"])]
    #[case("restApi", &["restApi", "rest.api"])]
    #[case("RestApi", &["RestApi", "rest.api"])]
    #[case("RESTApi", &["RESTApi", "RESTA.pi"])]
    #[case("db$user", &["db$user", "db.user"])]
    #[case("db$$$user", &["db$$$user", "db.user"])]
    #[case("$db$user$", &["$db$user$", "db.user"])]
    #[case("name", &["name", "name"])]
    fn maps_camel_case(#[case] identifier: &str, #[case] expected: &[&str]) {
        let keys = candidate_keys(identifier).expect("valid identifier");
        assert_eq!(keys, expected);
    }

    #[rstest]
    #[case("appUser1", &["appUser1", "app.user1", "app.user.1"])]
    #[case("appUSER1", &["appUSER1", "app.USER1", "app.USER.1"])]
    #[case("db1user", &["db1user", "db1.user", "db.1.user"])]
    #[case("db123user", &["db123user", "db123.user", "db.123.user"])]
    #[case("99db1user", &["99db1user", "99.db1.user", "99.db.1.user"])]
    #[case("42", &["42", "42"])]
    fn maps_digit_runs_both_ways(#[case] identifier: &str, #[case] expected: &[&str]) {
        let keys = candidate_keys(identifier).expect("valid identifier");
        assert_eq!(keys, expected);
    }

    #[test]
    fn rejects_illegal_characters() {
        let err = candidate_keys("db-user").expect_err("hyphen is not an identifier char");
        assert!(matches!(
            err,
            PropsError::IllegalIdentifierChar { ch: '-', .. }
        ));
    }

    #[test]
    fn empty_identifier_is_its_own_key() {
        assert_eq!(candidate_keys("").expect("empty is accepted"), [""]);
    }
}
