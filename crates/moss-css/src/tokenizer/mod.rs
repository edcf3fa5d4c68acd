//! CSS tokenization.

mod lexer;
mod token;

pub use lexer::{LexPos, Lexer};
pub use token::{SourceLocation, Token, TokenKind};
