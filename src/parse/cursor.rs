//! Position-tracked byte cursor shared by the JSON and XML readers.

use crate::error::{ConfigError, ParseErrorKind, Result};

/// Deepest container nesting either reader accepts.
pub(crate) const MAX_DEPTH: usize = 128;

/// A read position over a byte buffer.
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    depth: usize,
    format: &'static str,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8], format: &'static str) -> Self {
        Self {
            buf,
            pos: 0,
            depth: 0,
            format,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Move back to a position previously returned by [`position`](Self::position).
    pub(crate) fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos);
        self.pos = pos;
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    pub(crate) fn peek_at(&self, offset: usize) -> Option<u8> {
        self.buf.get(self.pos + offset).copied()
    }

    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.buf.len());
    }

    pub(crate) fn starts_with(&self, prefix: &[u8]) -> bool {
        self.buf[self.pos..].starts_with(prefix)
    }

    /// Skip spaces, tabs, carriage returns and line feeds.
    pub(crate) fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// Skip whitespace, then peek; running out of input is an error.
    pub(crate) fn peek_token(&mut self) -> Result<u8> {
        self.skip_whitespace();
        self.peek().ok_or_else(|| self.error(ParseErrorKind::UnexpectedEnd))
    }

    /// Skip whitespace and consume `byte`, or fail naming `expected`.
    pub(crate) fn expect(&mut self, byte: u8, expected: &'static str) -> Result<()> {
        let found = self.peek_token()?;
        if found != byte {
            return Err(self.unexpected(expected, found));
        }
        self.pos += 1;
        Ok(())
    }

    /// Consume bytes while `pred` holds and return them.
    pub(crate) fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.buf[start..self.pos]
    }

    /// Decode `bytes` as UTF-8 text.
    pub(crate) fn text(&self, bytes: &[u8]) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| self.error(ParseErrorKind::InvalidUtf8))
    }

    /// Open one level of container nesting.
    pub(crate) fn enter(&mut self) -> Result<()> {
        if self.depth == MAX_DEPTH {
            return Err(self.error(ParseErrorKind::TooDeep { limit: MAX_DEPTH }));
        }
        self.depth += 1;
        Ok(())
    }

    /// Close the level opened by the matching [`enter`](Self::enter).
    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Require that only whitespace remains.
    pub(crate) fn finish(&mut self) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(()),
            Some(b) => Err(self.unexpected("end of input", b)),
        }
    }

    pub(crate) fn error(&self, kind: ParseErrorKind) -> ConfigError {
        ConfigError::ParseError {
            format: self.format,
            position: self.pos,
            kind,
        }
    }

    /// Report `found`, the byte at the current position, where `expected` belongs.
    ///
    /// A non-ASCII byte is reported as the character it starts, or as
    /// `InvalidUtf8` when it does not start one.
    pub(crate) fn unexpected(&self, expected: &'static str, found: u8) -> ConfigError {
        debug_assert_eq!(self.peek(), Some(found));
        let found = if found.is_ascii() {
            Some(char::from(found))
        } else {
            self.char_at_pos()
        };
        match found {
            Some(found) => self.error(ParseErrorKind::UnexpectedByte { expected, found }),
            None => self.error(ParseErrorKind::InvalidUtf8),
        }
    }

    fn char_at_pos(&self) -> Option<char> {
        (2..=4).find_map(|len| {
            let bytes = self.buf.get(self.pos..self.pos + len)?;
            std::str::from_utf8(bytes).ok()?.chars().next()
        })
    }
}
