//! Forward-only token cursor over init-file text.
//!
//! Tokens are maximal runs of non-whitespace. Newlines only matter for
//! comment bodies and trailing pattern text, which are line-scoped.

use std::str::FromStr;

/// Cursor over the init-file source. Never rewinds.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Move the cursor `len` bytes forward, counting the newlines passed.
    fn advance(&mut self, len: usize) {
        let end = self.pos + len;
        self.line += self.src[self.pos..end].bytes().filter(|b| *b == b'\n').count();
        self.pos = end;
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.advance(rest.len() - trimmed.len());
    }

    /// 1-based line number of the cursor.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Next whitespace-delimited token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.advance(end);
        Some(&rest[..end])
    }

    /// Consume the next token only if it parses as `T`.
    ///
    /// A token that does not parse is left in place for the next read.
    pub fn next_parsed<T: FromStr>(&mut self) -> Option<T> {
        let mut ahead = self.clone();
        let value = ahead.next_token()?.parse().ok()?;
        *self = ahead;
        Some(value)
    }

    /// Discard everything up to and including the next newline.
    pub fn skip_line(&mut self) {
        let rest = self.rest();
        self.advance(rest.find('\n').map_or(rest.len(), |idx| idx + 1));
    }

    /// Remainder of the current line with leading whitespace removed.
    ///
    /// Leading whitespace is skipped on the current line only. A trailing
    /// `\r` is dropped, the result is truncated to `max_chars` characters,
    /// and the line terminator is consumed.
    pub fn rest_of_line(&mut self, max_chars: usize) -> &'a str {
        let rest = self.rest();
        let line_end = rest.find('\n').unwrap_or(rest.len());
        let line = &rest[..line_end];
        self.advance((line_end + 1).min(rest.len()));

        let line = line.trim_start();
        let line = line.strip_suffix('\r').unwrap_or(line);
        match line.char_indices().nth(max_chars) {
            Some((idx, _)) => &line[..idx],
            None => line,
        }
    }
}
