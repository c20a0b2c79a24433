//! Parser for the list-of-objects encoding used by catalog list fields.
//!
//! TMDB exports store `genres` and `production_companies` as literal lists of
//! objects, written either with single-quoted strings (the common case) or as
//! JSON:
//!
//! ```text
//! [{'id': 878, 'name': 'Science Fiction'}, {'id': 18, 'name': 'Drama'}]
//! [{"id": 878, "name": "Science Fiction"}]
//! ```
//!
//! Literals are parsed into [`serde_json::Value`] so callers can inspect the
//! shape with the usual accessors. Parsing is strict: trailing garbage, unknown
//! bare words and unterminated strings are all rejected.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Containers nested deeper than this are rejected instead of recursed into.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected character {found:?} at byte {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("invalid number literal at byte {0}")]
    InvalidNumber(usize),
    #[error("invalid escape sequence at byte {0}")]
    InvalidEscape(usize),
    #[error("dictionary keys must be strings (byte {0})")]
    NonStringKey(usize),
    #[error("trailing input at byte {0}")]
    Trailing(usize),
    #[error("nesting deeper than {MAX_DEPTH} levels at byte {0}")]
    TooDeep(usize),
}

/// Parse a complete literal into a JSON value.
pub fn parse_literal(input: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser {
        src: input,
        pos: 0,
        depth: 0,
    };
    parser.skip_ws();
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos < input.len() {
        return Err(LiteralError::Trailing(parser.pos));
    }
    Ok(value)
}

/// Extract the `name` attribute of every object in an encoded list.
///
/// Returns `None` when the encoding does not parse, the top level is not a list,
/// or any element is not an object with a string `name`.
pub fn extract_names(encoded: &str) -> Option<Vec<String>> {
    let value = parse_literal(encoded).ok()?;
    value
        .as_array()?
        .iter()
        .map(|item| item.get("name")?.as_str().map(str::to_string))
        .collect()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), LiteralError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(found) => Err(LiteralError::Unexpected {
                found,
                offset: self.pos - found.len_utf8(),
            }),
            None => Err(LiteralError::UnexpectedEof),
        }
    }

    fn unexpected(&self) -> LiteralError {
        match self.peek() {
            Some(found) => LiteralError::Unexpected {
                found,
                offset: self.pos,
            },
            None => LiteralError::UnexpectedEof,
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        match self.peek() {
            Some(open @ ('[' | '(' | '{')) => {
                if self.depth >= MAX_DEPTH {
                    return Err(LiteralError::TooDeep(self.pos));
                }
                self.depth += 1;
                let nested = match open {
                    '[' => self.sequence('[', ']').map(Value::Array),
                    '(' => self.sequence('(', ')').map(Value::Array),
                    _ => self.object(),
                };
                self.depth -= 1;
                nested
            }
            Some(q @ ('\'' | '"')) => self.string(q).map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() => self.keyword(),
            _ => Err(self.unexpected()),
        }
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Vec<Value>, LiteralError> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {
                    self.bump();
                    return Ok(items);
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn object(&mut self) -> Result<Value, LiteralError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(Value::Object(map));
                }
                Some(q @ ('\'' | '"')) => {
                    let key = self.string(q)?;
                    self.skip_ws();
                    self.expect(':')?;
                    self.skip_ws();
                    let value = self.value()?;
                    map.insert(key, value);
                }
                Some(_) => return Err(LiteralError::NonStringKey(self.pos)),
                None => return Err(LiteralError::UnexpectedEof),
            }
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    return Ok(Value::Object(map));
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        self.expect(quote)?;
        let mut out = String::new();
        loop {
            let start = self.pos;
            match self.bump() {
                None => return Err(LiteralError::UnexpectedEof),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some('/') => out.push('/'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some('u') => out.push(self.unicode_escape(start)?),
                    Some('\n') => {}
                    Some(_) | None => return Err(LiteralError::InvalidEscape(start)),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn unicode_escape(&mut self, start: usize) -> Result<char, LiteralError> {
        let end = self.pos + 4;
        let hex = self
            .src
            .get(self.pos..end)
            .ok_or(LiteralError::InvalidEscape(start))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| LiteralError::InvalidEscape(start))?;
        self.pos = end;
        char::from_u32(code).ok_or(LiteralError::InvalidEscape(start))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E' | '_') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.src[start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();
        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(LiteralError::InvalidNumber(start))
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        match &self.src[start..self.pos] {
            "None" | "null" => Ok(Value::Null),
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            _ => {
                self.pos = start;
                Err(self.unexpected())
            }
        }
    }
}
