//! CSV field tokenizer used for multi-valued properties.
//!
//! Follows RFC 4180 with a few lenient extensions:
//!
//! - Spaces around the separator are always trimmed: `a, b` reads as
//!   [`a`, `b`] while `a, " b"` reads as [`a`, ` b`].
//! - Quotes may appear anywhere in a field and protect everything inside
//!   them, separators and line breaks included: `a","b` reads as [`a,b`].
//! - A literal quote needs two quotes in a row *inside* quotes:
//!   `"a""b"` reads as [`a"b`] whereas `a""b` reads as [`ab`].
//! - Unbalanced quotes never fail; the remainder of the input is folded into
//!   the current field, so `"a"b",c` reads as [`ab,c`].

use std::borrow::Cow;

/// Default field separator.
pub const DEFAULT_SEPARATOR: char = ',';
/// Default quote character.
pub const DEFAULT_QUOTE: char = '"';

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Unquoted,
    Quoted,
}

/// Tokenizer for one line of CSV text.
///
/// # Examples
///
/// ```
/// use propcast::CsvTokenizer;
///
/// let csv = CsvTokenizer::default();
/// assert_eq!(csv.split("a, b,\"c,d\""), Some(vec!["a".into(), "b".into(), "c,d".into()]));
/// assert_eq!(csv.split(""), None);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CsvTokenizer {
    separator: char,
    quote: char,
}

impl Default for CsvTokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR, DEFAULT_QUOTE)
    }
}

impl CsvTokenizer {
    /// Create a tokenizer with a custom separator and quote character.
    #[must_use]
    pub const fn new(separator: char, quote: char) -> Self {
        Self { separator, quote }
    }

    /// Separator in use.
    #[must_use]
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// Quote character in use.
    #[must_use]
    pub const fn quote(&self) -> char {
        self.quote
    }

    /// Read one line of fields from `chars`.
    ///
    /// Consumes characters up to and including the first unquoted line feed.
    /// Returns `None` only when `chars` is exhausted before the first
    /// character; otherwise the final field is always emitted, even when empty.
    pub fn read_line<I>(&self, chars: &mut I) -> Option<Vec<String>>
    where
        I: Iterator<Item = char>,
    {
        let mut ch = chars.next()?;
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut state = State::Unquoted;
        let mut started = false;
        let mut spaces = 0_usize;
        let mut prev: Option<char> = None;

        loop {
            match state {
                State::Quoted => {
                    started = true;
                    if ch == self.quote {
                        state = State::Unquoted;
                    } else {
                        field.push(ch);
                    }
                }
                State::Unquoted if ch == self.quote => {
                    state = State::Quoted;
                    if started && prev == Some(self.quote) {
                        push_spaces(&mut field, &mut spaces);
                        field.push(self.quote);
                    }
                }
                State::Unquoted if ch == ' ' => {
                    if started || !field.is_empty() {
                        spaces += 1;
                    }
                }
                State::Unquoted if ch == self.separator => {
                    fields.push(std::mem::take(&mut field));
                    started = false;
                    spaces = 0;
                }
                State::Unquoted if ch == '\r' => {}
                State::Unquoted if ch == '\n' => break,
                State::Unquoted => {
                    push_spaces(&mut field, &mut spaces);
                    field.push(ch);
                }
            }
            prev = Some(ch);
            match chars.next() {
                Some(next) => ch = next,
                None => break,
            }
        }
        fields.push(field);
        Some(fields)
    }

    /// Tokenize the first line of `line`.
    #[must_use]
    pub fn split(&self, line: &str) -> Option<Vec<String>> {
        self.read_line(&mut line.chars())
    }

    /// Tokenize every line of `text`.
    #[must_use]
    pub fn read_all(&self, text: &str) -> Vec<Vec<String>> {
        let mut chars = text.chars();
        std::iter::from_fn(|| self.read_line(&mut chars)).collect()
    }

    /// Quote `field` so that [`CsvTokenizer::split`] reads it back verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use propcast::CsvTokenizer;
    ///
    /// let csv = CsvTokenizer::default();
    /// assert_eq!(csv.quote_field("plain"), "plain");
    /// assert_eq!(csv.quote_field("x,y"), "\"x,y\"");
    /// assert_eq!(csv.quote_field("1\"2"), "\"1\"\"2\"");
    /// ```
    #[must_use]
    pub fn quote_field<'a>(&self, field: &'a str) -> Cow<'a, str> {
        let needs_quotes = field.contains([self.separator, self.quote, '\n', '\r'])
            || field.starts_with(' ')
            || field.ends_with(' ');
        if !needs_quotes {
            return Cow::Borrowed(field);
        }
        let doubled = format!("{q}{q}", q = self.quote);
        let escaped = field.replace(self.quote, &doubled);
        Cow::Owned(format!("{q}{escaped}{q}", q = self.quote))
    }

    /// Join `fields` into one CSV line, quoting where required.
    ///
    /// A lone empty field is written as a quoted empty string so that it
    /// survives a round trip through [`CsvTokenizer::split`].
    #[must_use]
    pub fn join_fields<S: AsRef<str>>(&self, fields: &[S]) -> String {
        if let [only] = fields {
            if only.as_ref().is_empty() {
                return format!("{q}{q}", q = self.quote);
            }
        }
        let mut line = String::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                line.push(self.separator);
            }
            line.push_str(&self.quote_field(field.as_ref()));
        }
        line
    }
}

fn push_spaces(field: &mut String, spaces: &mut usize) {
    field.extend(std::iter::repeat_n(' ', *spaces));
    *spaces = 0;
}

#[cfg(test)]
mod tests;
