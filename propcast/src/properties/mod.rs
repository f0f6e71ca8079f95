//! Decoder for line-oriented properties text.
//!
//! Understands the usual grammar: `key=value`, `key:value` and
//! `key value` pairs, `#` and `!` comment lines, backslash line
//! continuation and the `\t \n \r \f \uXXXX` escapes. Pairs are returned in
//! file order; duplicate keys are kept so the caller decides which wins.

use crate::{PropsError, PropsResult};

/// Decode `text` into ordered key/value pairs.
///
/// `origin` labels the text in error messages.
///
/// # Examples
///
/// ```
/// use propcast::parse_properties;
///
/// # fn main() -> propcast::PropsResult<()> {
/// let pairs = parse_properties("# comment\ndb.user = fred\ndb.pass:\\\n  secret\n", "string")?;
/// assert_eq!(pairs, [
///     ("db.user".to_owned(), "fred".to_owned()),
///     ("db.pass".to_owned(), "secret".to_owned()),
/// ]);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`PropsError::PropertiesSyntax`] when a `\u` escape is not
/// followed by four hexadecimal digits.
pub fn parse_properties(text: &str, origin: &str) -> PropsResult<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for (line_no, line) in logical_lines(text) {
        let (key, value) = split_pair(&line);
        let syntax = |message: String| PropsError::PropertiesSyntax {
            origin: origin.to_owned(),
            line: line_no,
            message,
        };
        pairs.push((unescape(key).map_err(syntax)?, unescape(value).map_err(syntax)?));
    }
    Ok(pairs)
}

const fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{c}')
}

/// Split `text` into logical lines, joining continuations and dropping
/// blank and comment lines. Each line is paired with its starting line
/// number.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, natural) in natural_lines(text).into_iter().enumerate() {
        let trimmed = natural.trim_start_matches(is_blank);
        let (start, mut logical) = match pending.take() {
            Some(open) => open,
            None => {
                if trimmed.is_empty() || trimmed.starts_with(['#', '!']) {
                    continue;
                }
                (index + 1, String::new())
            }
        };
        if ends_with_odd_backslashes(trimmed) {
            logical.push_str(trimmed.strip_suffix('\\').unwrap_or(trimmed));
            pending = Some((start, logical));
        } else {
            logical.push_str(trimmed);
            lines.push((start, logical));
        }
    }
    if let Some(open) = pending {
        lines.push(open);
    }
    lines
}

/// Split on `\n`, `\r` or `\r\n`.
fn natural_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(['\n', '\r']) {
        let (line, tail) = rest.split_at(pos);
        lines.push(line);
        rest = tail
            .strip_prefix("\r\n")
            .or_else(|| tail.strip_prefix(['\n', '\r']))
            .unwrap_or(tail);
    }
    if !rest.is_empty() {
        lines.push(rest);
    }
    lines
}

fn ends_with_odd_backslashes(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split a logical line into its raw (still escaped) key and value.
fn split_pair(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (pos, ch) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '=' || ch == ':' || is_blank(ch) {
            key_end = pos;
            break;
        }
    }
    let (key, tail) = line.split_at(key_end);
    let padded = tail.trim_start_matches(is_blank);
    let value = padded.strip_prefix(['=', ':']).unwrap_or(padded);
    (key, value.trim_start_matches(is_blank))
}

fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => out.push(unicode_escape(&mut chars)?),
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

/// Decode the digits of a `\uXXXX` escape, pairing UTF-16 surrogates.
fn unicode_escape(chars: &mut std::str::Chars<'_>) -> Result<char, String> {
    let unit = utf16_unit(chars)?;
    if !(0xD800..0xDC00).contains(&unit) {
        return char::from_u32(u32::from(unit))
            .ok_or_else(|| format!("Escape `\\u{unit:04X}` is not a scalar value"));
    }
    let low = match (chars.next(), chars.next()) {
        (Some('\\'), Some('u')) => utf16_unit(chars)?,
        _ => return Err(format!("Unpaired surrogate `\\u{unit:04X}`")),
    };
    char::decode_utf16([unit, low])
        .next()
        .and_then(Result::ok)
        .ok_or_else(|| format!("Invalid surrogate pair `\\u{unit:04X}\\u{low:04X}`"))
}

fn utf16_unit(chars: &mut std::str::Chars<'_>) -> Result<u16, String> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("Malformed \\uxxxx encoding: `\\u{digits}`"));
    }
    u16::from_str_radix(&digits, 16).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests;
