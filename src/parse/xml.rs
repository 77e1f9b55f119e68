//! Recursive-descent reader for a minimal XML subset.
//!
//! Elements whose content starts with another start tag become nested maps
//! keyed by child tag name; all other elements become their raw text. There is
//! no support for attributes, entities, comments, processing instructions or
//! self-closing tags. A tag's key is its content up to the first whitespace;
//! anything after that is ignored. Elements may nest at most 128 deep.

use super::cursor::Cursor;
use crate::core::{Table, Value};
use crate::error::{ParseErrorKind, Result};

/// Parse an XML document with a single root element.
///
/// The root's own tag name is not part of the result: a container root yields
/// its children, a leaf root yields its text.
///
/// # Errors
///
/// Returns a `ParseError` for malformed or unsupported input.
///
/// # Examples
///
/// ```rust
/// use figstore::parse::parse_xml;
///
/// let tree = parse_xml(b"<r><a>1</a><b><c>2</c></b></r>")?;
/// assert_eq!(tree.navigate("b.c")?.as_str(), Some("2"));
/// # Ok::<(), figstore::error::ConfigError>(())
/// ```
pub fn parse_xml(input: &[u8]) -> Result<Value> {
    let mut cursor = Cursor::new(input, "xml");
    let (_, root) = read_element(&mut cursor)?;
    cursor.finish()?;
    Ok(root)
}

/// Read `<name>...</name>` and return the name with its value.
fn read_element(cursor: &mut Cursor<'_>) -> Result<(String, Value)> {
    cursor.enter()?;
    let element = read_element_body(cursor)?;
    cursor.leave();
    Ok(element)
}

fn read_element_body(cursor: &mut Cursor<'_>) -> Result<(String, Value)> {
    let name = read_start_tag(cursor)?;

    let content_start = cursor.position();
    cursor.skip_whitespace();
    if cursor.peek() == Some(b'<') && cursor.peek_at(1) != Some(b'/') {
        let children = read_children(cursor, &name)?;
        return Ok((name, Value::Nested(children)));
    }

    cursor.rewind(content_start);
    let text = cursor.take_while(|b| b != b'<');
    let text = cursor.text(text)?;
    if cursor.is_eof() {
        return Err(cursor.error(ParseErrorKind::UnexpectedEnd));
    }
    read_end_tag(cursor, &name)?;
    Ok((name, Value::Scalar(text)))
}

/// Read child elements until the parent's closing tag.
fn read_children(cursor: &mut Cursor<'_>, parent: &str) -> Result<Table> {
    let mut children = Table::new();
    loop {
        cursor.peek_token()?;
        if cursor.starts_with(b"</") {
            read_end_tag(cursor, parent)?;
            return Ok(children);
        }
        let (name, value) = read_element(cursor)?;
        // Later siblings with the same name replace earlier ones.
        children.insert(name, value);
    }
}

/// Read `<name ...>` and return `name`.
fn read_start_tag(cursor: &mut Cursor<'_>) -> Result<String> {
    cursor.expect(b'<', "'<'")?;
    if matches!(cursor.peek(), Some(b'?' | b'!')) {
        return Err(cursor.error(ParseErrorKind::UnsupportedMarkup));
    }

    let name_start = cursor.position();
    let name = cursor.take_while(|b| !is_tag_space(b) && b != b'>');
    let name = cursor.text(name)?;
    // Everything after the name, up to '>', is ignored.
    let rest = cursor.take_while(|b| b != b'>');
    if cursor.is_eof() {
        return Err(cursor.error(ParseErrorKind::UnexpectedEnd));
    }

    if name.ends_with('/') || rest.last() == Some(&b'/') {
        cursor.rewind(name_start);
        return Err(cursor.error(ParseErrorKind::SelfClosingTag(
            name.trim_end_matches('/').to_string(),
        )));
    }
    if name.is_empty() {
        cursor.rewind(name_start);
        return Err(cursor.error(ParseErrorKind::EmptyTag));
    }

    cursor.advance(1);
    Ok(name)
}

/// Read `</name>` and check it closes `open`.
fn read_end_tag(cursor: &mut Cursor<'_>, open: &str) -> Result<()> {
    if !cursor.starts_with(b"</") {
        return match cursor.peek() {
            Some(b) => Err(cursor.unexpected("closing tag", b)),
            None => Err(cursor.error(ParseErrorKind::UnexpectedEnd)),
        };
    }
    cursor.advance(2);

    let name_start = cursor.position();
    let close = cursor.take_while(|b| b != b'>');
    if cursor.is_eof() {
        return Err(cursor.error(ParseErrorKind::UnexpectedEnd));
    }
    let close_trimmed = close
        .iter()
        .rposition(|b| !is_tag_space(*b))
        .map_or(&close[..0], |end| &close[..=end]);

    if close_trimmed != open.as_bytes() {
        let close = cursor.text(close_trimmed)?;
        cursor.rewind(name_start);
        return Err(cursor.error(ParseErrorKind::MismatchedTag {
            open: open.to_string(),
            close,
        }));
    }

    cursor.advance(1);
    Ok(())
}

fn is_tag_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(input: &str) -> ParseErrorKind {
        parse_xml(input.as_bytes())
            .unwrap_err()
            .parse_kind()
            .cloned()
            .expect("parse error")
    }

    #[test]
    fn test_nested_document() {
        let tree = parse_xml(b"<r><a>1</a><b><c>2</c></b></r>").unwrap();
        assert_eq!(tree.get("a").unwrap().as_str(), Some("1"));

        let mut expected = Table::new();
        expected.insert("c".to_string(), Value::from("2"));
        assert_eq!(tree.navigate("b").unwrap(), &Value::Nested(expected));
    }

    #[test]
    fn test_indented_document() {
        let doc = "<config>\n  <server>\n    <port>8080</port>\n    <host> local </host>\n  </server>\n</config>\n";
        let tree = parse_xml(doc.as_bytes()).unwrap();
        assert_eq!(tree.navigate("server.port").unwrap().as_str(), Some("8080"));
        // Leaf text is kept raw.
        assert_eq!(tree.navigate("server.host").unwrap().as_str(), Some(" local "));
    }

    #[test]
    fn test_leaf_root() {
        let tree = parse_xml(b"<greeting>hello</greeting>").unwrap();
        assert_eq!(tree, Value::from("hello"));
    }

    #[test]
    fn test_empty_and_whitespace_leaves() {
        let tree = parse_xml(b"<r><a></a><b>  </b></r>").unwrap();
        assert_eq!(tree.get("a").unwrap().as_str(), Some(""));
        assert_eq!(tree.get("b").unwrap().as_str(), Some("  "));
    }

    #[test]
    fn test_tag_content_after_space_ignored() {
        let tree = parse_xml(br#"<r><a id="1">x</a ></r>"#).unwrap();
        assert_eq!(tree.get("a").unwrap().as_str(), Some("x"));
    }

    #[test]
    fn test_same_name_siblings_last_wins() {
        let tree = parse_xml(b"<r><a>1</a><a>2</a></r>").unwrap();
        assert_eq!(tree.get("a").unwrap().as_str(), Some("2"));
    }

    #[test]
    fn test_mismatched_tag() {
        assert_eq!(
            kind_of("<a>text</b>"),
            ParseErrorKind::MismatchedTag {
                open: "a".to_string(),
                close: "b".to_string()
            }
        );
    }

    #[test]
    fn test_mismatched_container_close() {
        assert!(matches!(
            kind_of("<r><a>1</a></x>"),
            ParseErrorKind::MismatchedTag { .. }
        ));
    }

    #[test]
    fn test_self_closing_rejected() {
        assert_eq!(
            kind_of("<r><a/></r>"),
            ParseErrorKind::SelfClosingTag("a".to_string())
        );
        assert_eq!(
            kind_of("<r><a /></r>"),
            ParseErrorKind::SelfClosingTag("a".to_string())
        );
    }

    #[test]
    fn test_markup_rejected() {
        assert_eq!(kind_of("<?xml version=\"1.0\"?><r/>"), ParseErrorKind::UnsupportedMarkup);
        assert_eq!(kind_of("<r><!-- c --><a>1</a></r>"), ParseErrorKind::UnsupportedMarkup);
    }

    #[test]
    fn test_mixed_content_rejected() {
        assert!(matches!(
            kind_of("<r>text<a>1</a></r>"),
            ParseErrorKind::UnexpectedByte { expected: "closing tag", .. }
        ));
    }

    #[test]
    fn test_truncated() {
        assert_eq!(kind_of("<r><a>1</a>"), ParseErrorKind::UnexpectedEnd);
        assert_eq!(kind_of("<r>text"), ParseErrorKind::UnexpectedEnd);
        assert_eq!(kind_of("<r"), ParseErrorKind::UnexpectedEnd);
    }

    #[test]
    fn test_empty_tag() {
        assert_eq!(kind_of("<>x</>"), ParseErrorKind::EmptyTag);
    }

    fn nested(depth: usize) -> String {
        format!("{}x{}", "<a>".repeat(depth), "</a>".repeat(depth))
    }

    #[test]
    fn test_nesting_limit() {
        use crate::parse::cursor::MAX_DEPTH;

        let tree = parse_xml(nested(MAX_DEPTH).as_bytes()).unwrap();
        assert!(tree.get("a").unwrap().is_nested());

        assert_eq!(
            kind_of(&nested(MAX_DEPTH + 1)),
            ParseErrorKind::TooDeep { limit: MAX_DEPTH }
        );
        assert_eq!(
            kind_of(&nested(200_000)),
            ParseErrorKind::TooDeep { limit: MAX_DEPTH }
        );
    }

    #[test]
    fn test_trailing_content() {
        assert!(matches!(
            kind_of("<a>1</a><b>2</b>"),
            ParseErrorKind::UnexpectedByte { expected: "end of input", found: '<' }
        ));
    }
}
