//! Text VDF: lexer, recursive-descent parser and writer.

pub mod lexer;
pub mod parser;
pub mod writer;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse_text_document, Parser};
pub use writer::{escape, is_bare_token};
