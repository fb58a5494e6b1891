//! Text VDF parser.
//!
//! Recursive descent over lexer tokens with one token of look-ahead. Builds
//! a [`Document`] while enforcing the depth ceiling, the node ceiling and,
//! in strict mode, duplicate-key rejection per object scope and at the root.

use super::lexer::{Lexer, Token, TokenKind};
use crate::ast::{Document, Format, NodeId};
use crate::error::{ErrorCode, VdfResult};
use crate::limits::{object_scope, root_scope, KeyScope, LimitTracker};
use crate::options::DecodeOptions;

/// Text VDF parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token<'a>>,
    opts: DecodeOptions,
    limits: LimitTracker,
    doc: Document,
}

impl<'a> Parser<'a> {
    /// Create a parser for the given input.
    pub fn new(input: &'a str, opts: DecodeOptions) -> Self {
        Self {
            lexer: Lexer::new(input),
            peeked: None,
            limits: LimitTracker::new(&opts),
            opts,
            doc: Document::with_format(Format::Text),
        }
    }

    /// Parse root entries until end of input.
    pub fn parse(mut self) -> VdfResult<Document> {
        let mut roots = KeyScope::new(self.opts.strict);
        loop {
            if self.peek_kind()?.0 == TokenKind::Eof {
                break;
            }

            let root = self.parse_node(1)?;
            let key = self.key_of(root);
            roots.accept(&key, root_scope)?;
            self.doc.add_root(root);
        }

        tracing::trace!(nodes = self.limits.nodes(), "parsed text document");
        Ok(self.doc)
    }

    /// Consume the next token.
    fn next_token(&mut self) -> VdfResult<Token<'a>> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    /// Look at the next token without consuming it.
    fn peek_token(&mut self) -> VdfResult<&Token<'a>> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Kind and position of the next token.
    fn peek_kind(&mut self) -> VdfResult<(TokenKind, u64, u64)> {
        let token = self.peek_token()?;
        Ok((token.kind, token.line, token.col))
    }

    fn key_of(&self, id: NodeId) -> String {
        self.doc.node(id).map(|n| n.key.clone()).unwrap_or_default()
    }

    /// Parse one entry: a key followed by a value or an object body.
    fn parse_node(&mut self, depth: usize) -> VdfResult<NodeId> {
        self.limits.check_depth(depth)?;

        let key = self.next_token()?;
        if key.kind != TokenKind::String {
            return Err(ErrorCode::E301_ExpectedStringKey {
                line: key.line,
                col: key.col,
            });
        }

        let (kind, line, col) = self.peek_kind()?;
        match kind {
            TokenKind::String => {
                let value = self.next_token()?;
                let id = self.doc.new_string(key.value, value.value);
                self.limits.count_node()?;
                Ok(id)
            }
            TokenKind::LBrace => self.parse_object(key.value.into_owned(), depth),
            _ => Err(ErrorCode::E302_ExpectedValueOrObject { line, col }),
        }
    }

    /// Parse an object body up to and including its closing brace.
    fn parse_object(&mut self, key: String, depth: usize) -> VdfResult<NodeId> {
        let lbrace = self.next_token()?;
        if lbrace.kind != TokenKind::LBrace {
            return Err(ErrorCode::E303_ExpectedObjectStart {
                line: lbrace.line,
                col: lbrace.col,
            });
        }

        let id = self.doc.new_object(key.as_str());
        self.limits.count_node()?;
        let mut children = KeyScope::new(self.opts.strict);

        loop {
            let (kind, line, col) = self.peek_kind()?;
            match kind {
                TokenKind::RBrace => {
                    self.next_token()?;
                    return Ok(id);
                }
                TokenKind::Eof => {
                    return Err(ErrorCode::E304_UnexpectedEofInObject { key, line, col });
                }
                _ => {}
            }

            let child = self.parse_node(depth + 1)?;
            let child_key = self.key_of(child);
            children.accept(&child_key, || object_scope(&key))?;
            self.doc.add_child(id, child);
        }
    }
}

/// Parse text VDF into a document.
pub fn parse_text_document(input: &str, opts: DecodeOptions) -> VdfResult<Document> {
    Parser::new(input, opts).parse()
}
