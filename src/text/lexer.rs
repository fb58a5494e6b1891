//! Text VDF lexer.
//!
//! Splits input into string, brace and end-of-input tokens, tracking the
//! 1-based line and 0-based column of every token start. Handles quoted
//! strings with backslash escapes, unquoted strings, and `//` line comments.

use std::borrow::Cow;

use crate::error::{ErrorCode, VdfResult};

/// Token categories produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// End of input
    Eof,
    /// Quoted or unquoted string
    String,
    /// Left brace `{`
    LBrace,
    /// Right brace `}`
    RBrace,
}

/// One lexical token with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token category
    pub kind: TokenKind,
    /// Decoded value; borrowed from the input when no escapes were present
    pub value: Cow<'a, str>,
    /// Line of the first character (1-based)
    pub line: u64,
    /// Column of the first character (0-based)
    pub col: u64,
}

/// Whitespace test with an ASCII fast path and a Unicode fallback.
pub(crate) fn is_whitespace(c: char) -> bool {
    if c.is_ascii() {
        matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
    } else {
        c.is_whitespace()
    }
}

/// Characters that end an unquoted string.
fn ends_unquoted(c: char) -> bool {
    is_whitespace(c) || matches!(c, '{' | '}' | '"')
}

/// Text VDF lexer over an in-memory string.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: u64,
    col: u64,
}

impl<'a> Lexer<'a> {
    /// Create a lexer positioned at line 1, column 0.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 0,
        }
    }

    /// Current `(line, col)`.
    pub fn position(&self) -> (u64, u64) {
        (self.line, self.col)
    }

    /// Peek at the current character without consuming it.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Consume the current character and update the position.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !is_whitespace(c) {
                break;
            }
            self.advance();
        }
    }

    /// Skip to just past the next newline, or to end of input.
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Read a quoted string. The opening quote is at the current position.
    fn read_quoted_string(&mut self, line: u64, col: u64) -> VdfResult<Cow<'a, str>> {
        self.advance();
        let start = self.pos;
        // Allocated only once an escape forces a copy.
        let mut owned: Option<String> = None;

        loop {
            let before = self.pos;
            let (char_line, char_col) = self.position();
            let c = self
                .advance()
                .ok_or(ErrorCode::E201_UnexpectedEofInQuotedString { line, col })?;

            match c {
                '"' => {
                    return Ok(match owned {
                        Some(s) => Cow::Owned(s),
                        None => Cow::Borrowed(&self.input[start..before]),
                    });
                }
                '\\' => {
                    let buf = owned.get_or_insert_with(|| self.input[start..before].to_string());
                    let next = match self.advance() {
                        Some(next) => next,
                        None => {
                            return Err(ErrorCode::E202_UnexpectedEofInEscapeSequence {
                                line: char_line,
                                col: char_col,
                            });
                        }
                    };
                    match next {
                        'n' => buf.push('\n'),
                        't' => buf.push('\t'),
                        'r' => buf.push('\r'),
                        '\\' => buf.push('\\'),
                        '"' => buf.push('"'),
                        other => {
                            buf.push('\\');
                            buf.push(other);
                        }
                    }
                }
                other => {
                    if let Some(buf) = owned.as_mut() {
                        buf.push(other);
                    }
                }
            }
        }
    }

    /// Read an unquoted string starting at the current position.
    fn read_unquoted_string(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if ends_unquoted(c) {
                break;
            }
            self.advance();
        }
        &self.input[start..self.pos]
    }

    /// Read the next token, skipping whitespace and comments.
    pub fn next_token(&mut self) -> VdfResult<Token<'a>> {
        loop {
            self.skip_whitespace();

            let (line, col) = self.position();
            let start = self.pos;
            let token = |kind, value| Token { kind, value, line, col };

            let c = match self.peek() {
                Some(c) => c,
                None => return Ok(token(TokenKind::Eof, Cow::Borrowed(""))),
            };

            match c {
                '/' => {
                    // A second slash starts a comment; otherwise the slash
                    // begins an unquoted token such as a path.
                    self.advance();
                    if self.peek() == Some('/') {
                        self.skip_line_comment();
                        continue;
                    }
                    self.read_unquoted_string();
                    return Ok(token(TokenKind::String, Cow::Borrowed(&self.input[start..self.pos])));
                }
                '{' => {
                    self.advance();
                    return Ok(token(TokenKind::LBrace, Cow::Borrowed("{")));
                }
                '}' => {
                    self.advance();
                    return Ok(token(TokenKind::RBrace, Cow::Borrowed("}")));
                }
                '"' => {
                    let value = self.read_quoted_string(line, col)?;
                    return Ok(token(TokenKind::String, value));
                }
                _ => {
                    let value = self.read_unquoted_string();
                    if value.is_empty() {
                        return Err(ErrorCode::E203_UnexpectedCharacter { line, col });
                    }
                    return Ok(token(TokenKind::String, Cow::Borrowed(value)));
                }
            }
        }
    }
}
