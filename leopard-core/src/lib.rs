//! Front half of the Leopard interpreter: tokens, the lexer, the syntax tree
//! and the Pratt parser that builds it.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use parser::{parse, ParseError, Parser};

/// Tokenizes and parses `input` in one go.
pub fn parse_source(input: &str) -> (ast::Program, Vec<ParseError>) {
    parse(lexer::Tokenizer::new(input))
}
