//! The TOON grammar shared by the encoder and the decoder.
//!
//! Every rule that decides how a scalar or key is written lives here, and the
//! decoder reads text back with the inverse of the same rules.
//!
//! # Lines
//!
//! TOON is line oriented. Each line is indented by a whole number of indent
//! units (spaces only, 2 by default) and is one of:
//!
//! | Kind | Example |
//! |------|---------|
//! | key:scalar | `name:Alice` |
//! | key:inline collection | `skills:[Python,JavaScript]`, `tags:[]`, `meta:{}` |
//! | key: block opener | `address:` |
//! | block array item | `- 42`, `- [1,2]`, `- id:7`, `-` |
//!
//! # Objects
//!
//! ```text
//! name:Alice
//! age:30
//! address:
//!   city:New York
//!   zip:"10001"
//! ```
//!
//! A non-empty object nested in another is written as a block: a bare `key:`
//! line, then its members one level deeper. The empty object is `{}`.
//!
//! # Arrays
//!
//! An array whose members are all scalars is written inline, `[a,b,c]`, with
//! `[]` for the empty array. Any other array is a block of `- ` items:
//!
//! ```text
//! users:
//!   - id:1
//!     name:Alice
//!   - id:2
//!     name:Bob
//!   - [1,2]
//!   -
//!     - nested
//!     - list
//! ```
//!
//! An object item starts on the dash line with its first member; the rest of
//! its members follow one level below the dash. An array item that itself
//! needs a block is a bare `-` with its items one level below.
//!
//! # Root
//!
//! A root object is written as top-level lines with no enclosing key (the empty
//! root object is the empty text). Any other root is wrapped under the reserved
//! key `@`:
//!
//! ```text
//! @:[1,2,3]
//! ```
//!
//! A user key spelled `@` is always quoted, so it never reads as the marker.
//!
//! # Scalars
//!
//! `null`, `true`, `false` and number literals
//! (`-?[0-9]+(\.[0-9]+)?([eE][-+]?[0-9]+)?`) are written bare. Strings are
//! bare unless reading them back bare would change them. A string is quoted
//! when it:
//!
//! - is empty, or starts or ends with whitespace
//! - contains a control character (newline, tab, ...)
//! - contains `:` followed by whitespace
//! - starts with `[`, `{` or `"`
//! - reads as `true`, `false`, `null` or a number literal
//! - sits in an inline array and contains `,` or `]`
//! - is a block array item and contains `:`
//!
//! Quoted text uses JSON escapes: `\"`, `\\`, `\/`, `\b`, `\f`, `\n`, `\r`,
//! `\t` and `\uXXXX` (with surrogate pairs for characters outside the BMP).
//!
//! # Keys
//!
//! Keys are bare unless they are empty, contain `:` or a control character,
//! start or end with whitespace, start with `"`, `[`, `{` or `- `, or are the
//! root marker `@`.
//!
//! # Numbers
//!
//! Numbers are written with the fewest characters that parse back to the same
//! `f64`: the shortest round-trip digits, positioned either plainly (`0.25`,
//! `1500`) or with an exponent (`1e21`, `2.5e-7`), whichever is shorter.
//! Negative zero is `-0`.

use crate::Value;

/// Top-level key that wraps a root array or scalar.
pub(crate) const ROOT_KEY: &str = "@";

/// Where a string scalar is written; some positions reserve extra characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Context {
    /// After `key:` on a member line.
    Member,
    /// After `- ` on a block array item line.
    Item,
    /// Between the brackets of an inline array.
    Inline,
}

/// Returns `true` if `s` matches `-?[0-9]+(\.[0-9]+)?([eE][-+]?[0-9]+)?`.
pub(crate) fn is_number_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    if bytes.first() == Some(&b'-') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == int_start {
        return false;
    }

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// Returns `true` if bare `s` would read back as something other than a string.
fn is_literal(s: &str) -> bool {
    matches!(s, "true" | "false" | "null") || is_number_literal(s)
}

/// Reads bare scalar text. Returns `None` for a number literal outside `f64` range.
pub(crate) fn bare_scalar(text: &str) -> Option<Value> {
    match text {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "null" => Some(Value::Null),
        _ if is_number_literal(text) => match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(Value::Number(n)),
            _ => None,
        },
        _ => Some(Value::String(text.to_string())),
    }
}

pub(crate) fn string_needs_quotes(s: &str, context: Context) -> bool {
    if s.is_empty()
        || s.starts_with(char::is_whitespace)
        || s.ends_with(char::is_whitespace)
        || s.starts_with(['[', '{', '"'])
        || is_literal(s)
    {
        return true;
    }

    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch.is_control() {
            return true;
        }
        match (ch, context) {
            (':', Context::Item) => return true,
            (':', _) if chars.peek().is_some_and(|next| next.is_whitespace()) => return true,
            (',' | ']', Context::Inline) => return true,
            _ => {}
        }
    }
    false
}

pub(crate) fn key_needs_quotes(key: &str) -> bool {
    key.is_empty()
        || key == ROOT_KEY
        || key.starts_with(char::is_whitespace)
        || key.ends_with(char::is_whitespace)
        || key.starts_with(['"', '[', '{'])
        || key.starts_with("- ")
        || key.chars().any(|ch| ch == ':' || ch.is_control())
}

/// Writes `s` as a double-quoted string with JSON escapes.
pub(crate) fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

pub(crate) fn write_string(out: &mut String, s: &str, context: Context) {
    if string_needs_quotes(s, context) {
        write_quoted(out, s);
    } else {
        out.push_str(s);
    }
}

pub(crate) fn write_key(out: &mut String, key: &str) {
    if key_needs_quotes(key) {
        write_quoted(out, key);
    } else {
        out.push_str(key);
    }
}

/// Formats a finite number with the fewest characters that parse back exactly.
pub(crate) fn format_number(n: f64) -> String {
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.25e-7" or "3e1".
    let scientific = format!("{:e}", n);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = match exponent.parse() {
        Ok(exp) => exp,
        Err(_) => return scientific,
    };

    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let plain = positional(n.is_sign_negative(), &digits, exponent);
    if scientific.len() < plain.len() {
        scientific
    } else {
        plain
    }
}

fn positional(negative: bool, digits: &str, exponent: i32) -> String {
    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }

    let len = digits.len() as i32;
    if exponent < 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-exponent - 1) as usize));
        out.push_str(digits);
    } else if exponent + 1 >= len {
        out.push_str(digits);
        out.extend(std::iter::repeat('0').take((exponent + 1 - len) as usize));
    } else {
        let point = (exponent + 1) as usize;
        out.push_str(&digits[..point]);
        out.push('.');
        out.push_str(&digits[point..]);
    }
    out
}

/// Why a quoted region could not be read.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum QuoteError {
    /// The line ended before the closing quote.
    Unterminated,
    /// A bad escape starting at byte offset `at`.
    InvalidEscape { at: usize, escape: String },
}

/// Reads the quoted string whose opening `"` is at byte offset `open` of `text`.
///
/// Returns the unescaped string and the byte offset just past the closing quote.
pub(crate) fn read_quoted(text: &str, open: usize) -> Result<(String, usize), QuoteError> {
    let mut out = String::new();
    let mut chars = text[open + 1..]
        .char_indices()
        .map(|(i, ch)| (i + open + 1, ch))
        .peekable();

    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => return Ok((out, i + 1)),
            '\\' => {
                let (_, escaped) = chars.next().ok_or(QuoteError::Unterminated)?;
                match escaped {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    '/' => out.push('/'),
                    'b' => out.push('\u{0008}'),
                    'f' => out.push('\u{000C}'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'u' => out.push(read_unicode_escape(text, i, &mut chars)?),
                    other => {
                        return Err(QuoteError::InvalidEscape {
                            at: i,
                            escape: format!("\\{}", other),
                        })
                    }
                }
            }
            other => out.push(other),
        }
    }

    Err(QuoteError::Unterminated)
}

/// Reads the hex digits of a `\u` escape whose backslash is at byte offset `at`,
/// pairing surrogates when needed.
fn read_unicode_escape<I>(
    text: &str,
    at: usize,
    chars: &mut std::iter::Peekable<I>,
) -> Result<char, QuoteError>
where
    I: Iterator<Item = (usize, char)>,
{
    let invalid = |end: usize| QuoteError::InvalidEscape {
        at,
        escape: text[at..end.min(text.len())].to_string(),
    };

    let first = read_hex4(&mut *chars).map_err(|end| invalid(end.unwrap_or(text.len())))?;
    let code = match first {
        0xD800..=0xDBFF => {
            // A high surrogate must be followed by `\u` and a low surrogate.
            let mut pair = || -> Option<u32> {
                if chars.next()?.1 != '\\' || chars.next()?.1 != 'u' {
                    return None;
                }
                read_hex4(&mut *chars).ok()
            };
            match pair() {
                Some(low @ 0xDC00..=0xDFFF) => 0x10000 + ((first - 0xD800) << 10) + (low - 0xDC00),
                _ => {
                    let end = chars.peek().map_or(text.len(), |(i, _)| *i);
                    return Err(invalid(end));
                }
            }
        }
        0xDC00..=0xDFFF => return Err(invalid(at + 6)),
        code => code,
    };

    char::from_u32(code).ok_or_else(|| invalid(at + 6))
}

/// Reads exactly four hex digits. On failure returns the byte offset reached.
fn read_hex4<I>(chars: &mut std::iter::Peekable<I>) -> Result<u32, Option<usize>>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut code = 0u32;
    for _ in 0..4 {
        match chars.next() {
            Some((_, ch)) if ch.is_ascii_hexdigit() => {
                code = code * 16 + ch.to_digit(16).unwrap_or(0);
            }
            Some((i, ch)) => return Err(Some(i + ch.len_utf8())),
            None => return Err(None),
        }
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_literal_grammar() {
        for ok in ["0", "-0", "05", "30", "-12.5", "1e5", "1E+5", "2.5e-7"] {
            assert!(is_number_literal(ok), "{ok}");
        }
        for bad in ["", "-", "1.", ".5", "1e", "1e+", "+1", "0x10", "inf", "NaN", "1 "] {
            assert!(!is_number_literal(bad), "{bad}");
        }
    }

    #[test]
    fn test_format_number_shortest() {
        assert_eq!(format_number(30.0), "30");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "-0");
        assert_eq!(format_number(1e21), "1e21");
        assert_eq!(format_number(1_000_000.0), "1e6");
        assert_eq!(format_number(123.456), "123.456");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(0.001), "0.001");
        assert_eq!(format_number(f64::MAX), "1.7976931348623157e308");
    }

    #[test]
    fn test_format_number_reparses_exactly() {
        for n in [0.1 + 0.2, 1.0 / 3.0, 5e-324, -9007199254740993.0, 6.02214076e23] {
            let text = format_number(n);
            assert!(is_number_literal(&text), "{text}");
            assert_eq!(text.parse::<f64>().unwrap(), n);
        }
    }

    #[test]
    fn test_string_quoting_rules() {
        for quoted in ["", " lead", "trail ", "true", "null", "123", "-4.5e3", "a: b", "[x", "{}", "\"q", "line\nbreak"] {
            assert!(string_needs_quotes(quoted, Context::Member), "{quoted:?}");
        }
        for bare in ["Alice", "New York", "a:b", "12abc", "-", "x,y", "say \"hi\"", "True"] {
            assert!(!string_needs_quotes(bare, Context::Member), "{bare:?}");
        }
    }

    #[test]
    fn test_context_specific_quoting() {
        assert!(!string_needs_quotes("a,b", Context::Member));
        assert!(string_needs_quotes("a,b", Context::Inline));
        assert!(string_needs_quotes("a]", Context::Inline));
        assert!(!string_needs_quotes("a:b", Context::Inline));
        assert!(string_needs_quotes("a:b", Context::Item));
    }

    #[test]
    fn test_key_quoting_rules() {
        for quoted in ["", "@", "a:b", " x", "x ", "\"x", "[x", "{x", "- x", "tab\tkey"] {
            assert!(key_needs_quotes(quoted), "{quoted:?}");
        }
        for bare in ["name", "user name", "-x", "-", "@@", "a\"b", "123", "true"] {
            assert!(!key_needs_quotes(bare), "{bare:?}");
        }
    }

    #[test]
    fn test_write_quoted_escapes() {
        let mut out = String::new();
        write_quoted(&mut out, "a\"b\\c\nd\te\u{1}");
        assert_eq!(out, r#""a\"b\\c\nd\te\u0001""#);
    }

    #[test]
    fn test_read_quoted() {
        let text = r#"key:"a\"bé😀" tail"#;
        let (s, end) = read_quoted(text, 4).unwrap();
        assert_eq!(s, "a\"bé😀");
        assert_eq!(&text[end..], " tail");
    }

    #[test]
    fn test_read_quoted_errors() {
        assert_eq!(read_quoted(r#""abc"#, 0), Err(QuoteError::Unterminated));
        assert_eq!(read_quoted(r#""abc\"#, 0), Err(QuoteError::Unterminated));
        assert_eq!(
            read_quoted(r#""a\qb""#, 0),
            Err(QuoteError::InvalidEscape {
                at: 2,
                escape: "\\q".to_string()
            })
        );
        assert!(matches!(
            read_quoted(r#""\ud800x""#, 0),
            Err(QuoteError::InvalidEscape { at: 1, .. })
        ));
        assert!(matches!(
            read_quoted(r#""\udc00""#, 0),
            Err(QuoteError::InvalidEscape { at: 1, .. })
        ));
        assert!(matches!(
            read_quoted(r#""\u12g4""#, 0),
            Err(QuoteError::InvalidEscape { at: 1, .. })
        ));
        assert_eq!(
            read_quoted("\"\\u12é\"", 0),
            Err(QuoteError::InvalidEscape {
                at: 1,
                escape: "\\u12é".to_string()
            })
        );
    }

    #[test]
    fn test_bare_scalar() {
        assert_eq!(bare_scalar("true"), Some(Value::Bool(true)));
        assert_eq!(bare_scalar("null"), Some(Value::Null));
        assert_eq!(bare_scalar("-1.5"), Some(Value::Number(-1.5)));
        assert_eq!(bare_scalar("1e400"), None);
        assert_eq!(bare_scalar("hello"), Some(Value::String("hello".to_string())));
    }
}
