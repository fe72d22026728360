//! Line scanning, the first decoder pass.
//!
//! Splits input into non-blank lines, measures and validates indentation, and
//! classifies each line as a member (`key:value`, `key:[..]`, `key:`) or a block
//! array item (`-`, `- value`, `- key:value`). Scalars and inline collections are
//! read here, so the tree builder only deals with structure.

use crate::grammar::{self, QuoteError, ROOT_KEY};
use crate::options::IndentMode;
use crate::{Error, Position, Result, ToonMap, Value};

/// One classified, non-blank input line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Line {
    /// 1-based line number.
    pub number: usize,
    /// Nesting level in indent units.
    pub depth: usize,
    /// 1-based column of the first content character.
    pub column: usize,
    pub kind: LineKind,
}

impl Line {
    pub(crate) fn position(&self) -> Position {
        Position::new(self.number, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LineKind {
    Member(Member),
    Item(Item),
}

/// A `key:` line, or the first member of a compact list-item object.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Member {
    pub key: String,
    /// 1-based column where the key starts.
    pub column: usize,
    /// The bare `@` root marker, as opposed to a quoted `"@"` key.
    pub root_marker: bool,
    /// Scalar or inline collection; `None` for a block opener.
    pub value: Option<Value>,
}

/// The body of a `-` line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Item {
    /// A lone `-`, opening a nested block.
    Bare,
    Value(Value),
    Member(Member),
}

/// Scans `input` into classified lines.
pub(crate) fn scan(input: &str, mode: IndentMode) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    let mut unit = match mode {
        IndentMode::Fixed(n) => Some(n.max(1)),
        IndentMode::Auto => None,
    };

    for (index, raw) in input.split('\n').enumerate() {
        let number = index + 1;
        let text = raw.strip_suffix('\r').unwrap_or(raw).trim_end();
        if text.trim_start().is_empty() {
            continue;
        }

        let indent = text.len() - text.trim_start_matches(' ').len();
        let column = indent + 1;
        if text[indent..].starts_with(char::is_whitespace) {
            return Err(Error::indentation(
                Position::new(number, column),
                "indentation must use spaces only",
            ));
        }

        if lines.is_empty() && indent > 0 {
            return Err(Error::indentation(
                Position::new(number, column),
                "the first line must not be indented",
            ));
        }

        let depth = if indent == 0 {
            0
        } else {
            let unit = *unit.get_or_insert(indent);
            if indent % unit != 0 {
                return Err(Error::indentation(
                    Position::new(number, column),
                    format!("indent of {} is not a multiple of {}", indent, unit),
                ));
            }
            indent / unit
        };

        let kind = LineScanner::new(text, number, indent).classify()?;
        lines.push(Line {
            number,
            depth,
            column,
            kind,
        });
    }

    tracing::trace!(lines = lines.len(), unit = ?unit, "scanned input");
    Ok(lines)
}

/// Cursor over the content of a single line.
struct LineScanner<'a> {
    text: &'a str,
    number: usize,
    pos: usize,
}

impl<'a> LineScanner<'a> {
    fn new(text: &'a str, number: usize, start: usize) -> Self {
        LineScanner {
            text,
            number,
            pos: start,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_spaces(&mut self) {
        while self.peek_char() == Some(' ') {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn position_at(&self, byte: usize) -> Position {
        Position::new(self.number, self.text[..byte].chars().count() + 1)
    }

    fn position(&self) -> Position {
        self.position_at(self.pos)
    }

    fn classify(mut self) -> Result<LineKind> {
        let rest = self.rest();
        if rest == "-" {
            return Ok(LineKind::Item(Item::Bare));
        }
        if rest.starts_with("- ") {
            self.pos += 2;
            self.skip_spaces();
            return self.parse_item().map(LineKind::Item);
        }
        self.parse_member().map(LineKind::Member)
    }

    fn parse_item(&mut self) -> Result<Item> {
        match self.peek_char() {
            Some('[') | Some('{') => {
                let value = self.parse_inline()?;
                self.expect_end()?;
                Ok(Item::Value(value))
            }
            Some('"') => {
                let start = self.pos;
                let text = self.parse_quoted()?;
                self.skip_spaces();
                if self.peek_char() == Some(':') {
                    self.pos = start;
                    return self.parse_member().map(Item::Member);
                }
                self.expect_end()?;
                Ok(Item::Value(Value::String(text)))
            }
            _ => {
                if self.rest().contains(':') {
                    self.parse_member().map(Item::Member)
                } else {
                    self.parse_bare_scalar().map(Item::Value)
                }
            }
        }
    }

    fn parse_member(&mut self) -> Result<Member> {
        let column = self.position().column;
        let (key, root_marker) = if self.peek_char() == Some('"') {
            let key = self.parse_quoted()?;
            self.skip_spaces();
            (key, false)
        } else {
            let rest = self.rest();
            let end = match rest.find(':') {
                Some(0) => return Err(Error::MissingKey { position: self.position() }),
                Some(end) => end,
                None => {
                    return Err(Error::ExpectedColon {
                        position: self.position_at(self.text.len()),
                    })
                }
            };
            let key = rest[..end].to_string();
            self.pos += end;
            let root_marker = key == ROOT_KEY;
            (key, root_marker)
        };

        if self.peek_char() != Some(':') {
            return Err(Error::ExpectedColon {
                position: self.position(),
            });
        }
        self.pos += 1;
        self.skip_spaces();

        let value = if self.at_end() {
            None
        } else {
            Some(self.parse_value()?)
        };

        Ok(Member {
            key,
            column,
            root_marker,
            value,
        })
    }

    /// Parses the value after `key:` through to the end of the line.
    fn parse_value(&mut self) -> Result<Value> {
        let value = match self.peek_char() {
            Some('[') | Some('{') => self.parse_inline()?,
            Some('"') => Value::String(self.parse_quoted()?),
            _ => return self.parse_bare_scalar(),
        };
        self.expect_end()?;
        Ok(value)
    }

    fn parse_bare_scalar(&mut self) -> Result<Value> {
        let start = self.pos;
        let text = self.rest();
        self.pos = self.text.len();
        grammar::bare_scalar(text).ok_or_else(|| Error::invalid_number(self.position_at(start), text))
    }

    fn parse_quoted(&mut self) -> Result<String> {
        let open = self.pos;
        match grammar::read_quoted(self.text, open) {
            Ok((text, end)) => {
                self.pos = end;
                Ok(text)
            }
            Err(QuoteError::Unterminated) => Err(Error::unterminated_string(self.position_at(open))),
            Err(QuoteError::InvalidEscape { at, escape }) => {
                Err(Error::invalid_escape(self.position_at(at), escape))
            }
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        self.skip_spaces();
        match self.peek_char() {
            None => Ok(()),
            Some(found) => Err(Error::unexpected_char(self.position(), found, "end of line")),
        }
    }

    /// Parses `[...]` or `{}` starting at the opening bracket.
    fn parse_inline(&mut self) -> Result<Value> {
        let open = self.pos;
        match self.next_char() {
            Some('{') => {
                self.skip_spaces();
                match self.next_char() {
                    Some('}') => Ok(Value::Object(ToonMap::new())),
                    None => Err(Error::unclosed_collection(self.position_at(open), '}')),
                    Some(found) => {
                        self.pos -= found.len_utf8();
                        Err(Error::unexpected_char(
                            self.position(),
                            found,
                            "`}`; inline objects must be empty",
                        ))
                    }
                }
            }
            _ => self.parse_inline_array(open),
        }
    }

    fn parse_inline_array(&mut self, open: usize) -> Result<Value> {
        let mut items = Vec::new();
        self.skip_spaces();
        if self.peek_char() == Some(']') {
            self.pos += 1;
            return Ok(Value::Array(items));
        }

        loop {
            self.skip_spaces();
            let item = match self.peek_char() {
                None => return Err(Error::unclosed_collection(self.position_at(open), ']')),
                Some('"') => Value::String(self.parse_quoted()?),
                Some(found @ ('[' | '{')) => {
                    return Err(Error::unexpected_char(
                        self.position(),
                        found,
                        "a scalar; inline arrays hold scalars only",
                    ))
                }
                Some(found @ (',' | ']')) => {
                    return Err(Error::unexpected_char(self.position(), found, "an array element"))
                }
                Some(_) => self.parse_inline_scalar(open)?,
            };
            items.push(item);

            self.skip_spaces();
            match self.next_char() {
                Some(',') => continue,
                Some(']') => return Ok(Value::Array(items)),
                None => return Err(Error::unclosed_collection(self.position_at(open), ']')),
                Some(found) => {
                    self.pos -= found.len_utf8();
                    return Err(Error::unexpected_char(self.position(), found, "`,` or `]`"));
                }
            }
        }
    }

    fn parse_inline_scalar(&mut self, open: usize) -> Result<Value> {
        let start = self.pos;
        let len = match self.rest().find([',', ']']) {
            Some(len) => len,
            None => return Err(Error::unclosed_collection(self.position_at(open), ']')),
        };
        self.pos += len;

        let text = self.text[start..self.pos].trim_end();
        grammar::bare_scalar(text).ok_or_else(|| Error::invalid_number(self.position_at(start), text))
    }
}
