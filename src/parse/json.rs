//! Recursive-descent reader for an object-only subset of JSON.
//!
//! Supported: objects, double-quoted strings without escapes, bare numbers and
//! the literals `true`, `false` and `null`. Scalars keep their literal text.
//! Arrays are rejected, as are objects nested more than 128 deep.

use super::cursor::Cursor;
use crate::core::{Table, Value};
use crate::error::{ParseErrorKind, Result};

/// Parse a JSON document whose root is an object.
///
/// # Errors
///
/// Returns a `ParseError` for malformed or unsupported input.
///
/// # Examples
///
/// ```rust
/// use figstore::parse::parse_json;
///
/// let tree = parse_json(br#"{"a": "1", "b": {"c": true}}"#)?;
/// assert_eq!(tree["a"].as_str(), Some("1"));
/// assert_eq!(tree["b"].get("c").and_then(|v| v.as_str()), Some("true"));
/// # Ok::<(), figstore::error::ConfigError>(())
/// ```
pub fn parse_json(input: &[u8]) -> Result<Table> {
    let mut cursor = Cursor::new(input, "json");
    let found = cursor.peek_token()?;
    if found != b'{' {
        return Err(cursor.unexpected("'{'", found));
    }
    let root = read_object(&mut cursor)?;
    cursor.finish()?;
    Ok(root)
}

/// Dispatch on the first significant byte.
fn read_value(cursor: &mut Cursor<'_>) -> Result<Value> {
    match cursor.peek_token()? {
        b'{' => read_object(cursor).map(Value::Nested),
        b'"' => read_string(cursor).map(Value::Scalar),
        b'[' => Err(cursor.error(ParseErrorKind::UnsupportedArray)),
        b'n' => read_literal(cursor, "null"),
        b't' => read_literal(cursor, "true"),
        b'f' => read_literal(cursor, "false"),
        b if is_number_byte(b) => read_number(cursor),
        b => Err(cursor.unexpected("a value", b)),
    }
}

fn read_object(cursor: &mut Cursor<'_>) -> Result<Table> {
    cursor.enter()?;
    let map = read_members(cursor)?;
    cursor.leave();
    Ok(map)
}

fn read_members(cursor: &mut Cursor<'_>) -> Result<Table> {
    cursor.expect(b'{', "'{'")?;
    let mut map = Table::new();

    if cursor.peek_token()? == b'}' {
        cursor.advance(1);
        return Ok(map);
    }

    loop {
        let found = cursor.peek_token()?;
        if found != b'"' {
            return Err(cursor.unexpected("a quoted key", found));
        }
        let key = read_string(cursor)?;
        cursor.expect(b':', "':'")?;
        let value = read_value(cursor)?;
        map.insert(key, value);

        match cursor.peek_token()? {
            b',' => cursor.advance(1),
            b'}' => {
                cursor.advance(1);
                return Ok(map);
            }
            b => return Err(cursor.unexpected("',' or '}'", b)),
        }
    }
}

/// Read a `"..."` string; the cursor sits on the opening quote.
fn read_string(cursor: &mut Cursor<'_>) -> Result<String> {
    cursor.advance(1);
    let body = cursor.take_while(|b| b != b'"' && b != b'\\');
    match cursor.peek() {
        Some(b'"') => {
            let text = cursor.text(body)?;
            cursor.advance(1);
            Ok(text)
        }
        Some(_) => Err(cursor.error(ParseErrorKind::EscapeSequence)),
        None => Err(cursor.error(ParseErrorKind::UnterminatedString)),
    }
}

fn is_number_byte(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E')
}

fn read_number(cursor: &mut Cursor<'_>) -> Result<Value> {
    let digits = cursor.take_while(is_number_byte);
    cursor.text(digits).map(Value::Scalar)
}

fn read_literal(cursor: &mut Cursor<'_>, literal: &'static str) -> Result<Value> {
    if !cursor.starts_with(literal.as_bytes()) {
        let expected = match literal {
            "null" => "'null'",
            "true" => "'true'",
            _ => "'false'",
        };
        // Point at the first byte that diverges from the literal.
        let offset = literal
            .bytes()
            .enumerate()
            .position(|(i, b)| cursor.peek_at(i) != Some(b))
            .unwrap_or(0);
        cursor.advance(offset);
        return match cursor.peek() {
            Some(b) => Err(cursor.unexpected(expected, b)),
            None => Err(cursor.error(ParseErrorKind::UnexpectedEnd)),
        };
    }
    cursor.advance(literal.len());
    Ok(Value::Scalar(literal.to_string()))
}
