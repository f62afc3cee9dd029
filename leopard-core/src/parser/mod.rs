pub mod error;
pub mod expressions;
pub mod statements;

use std::rc::Rc;

use crate::ast::Program;
use crate::token::{Token, TokenKind};
pub use error::ParseError;
use statements::parse_statement;

/// Pratt parser over any token stream. The stream ends at the first `Eof`
/// token or when the iterator is exhausted, whichever comes first.
pub struct Parser<I: Iterator<Item = Token>> {
    pub iter: std::iter::Peekable<I>,
    errors: Vec<ParseError>,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: impl IntoIterator<IntoIter = I>) -> Self {
        let iter = tokens.into_iter().peekable();
        Self {
            iter,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        self.iter
            .peek()
            .map(|token| token.kind)
            .unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn peek_token(&mut self) -> Token {
        self.iter.peek().cloned().unwrap_or_else(Token::eof)
    }

    pub(crate) fn next_token(&mut self) -> Token {
        self.iter.next().unwrap_or_else(Token::eof)
    }

    pub(crate) fn skip_semicolon(&mut self) {
        self.iter.next_if(|token| token.kind == TokenKind::SemiColon);
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Rc<str>, ParseError> {
        self.expect_token(TokenKind::Ident).map(|token| token.literal)
    }

    /// Consumes the next token if it is of `token_kind`. A mismatching token
    /// is left in the stream.
    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<Token, ParseError> {
        match self.iter.next_if(|token| token.kind == token_kind) {
            Some(token) => Ok(token),
            None => Err(ParseError::unexpected_token(token_kind, self.peek_token())),
        }
    }

    /// Discards everything up to and including the next `;`, or up to the next
    /// token that can only start a statement.
    fn synchronize(&mut self) {
        loop {
            if matches!(
                self.peek_kind(),
                TokenKind::Eof | TokenKind::Let | TokenKind::Return
            ) {
                break;
            }
            let token = self.next_token();
            log::trace!("skipping {:?}", token);
            if token.kind == TokenKind::SemiColon {
                break;
            }
        }
    }

    /// Parses statements until the end of input. Failing statements are
    /// recorded in [`Parser::errors`] and left out of the program.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while self.peek_kind() != TokenKind::Eof {
            match parse_statement(self) {
                Ok(statement) => {
                    statements.push(statement);
                    self.skip_semicolon();
                }
                Err(err) => {
                    log::debug!("parse error: {err}");
                    self.errors.push(err);
                    self.synchronize();
                }
            }
        }

        Program { statements }
    }
}

/// Parses a whole token stream, returning the (possibly partial) program
/// together with every diagnostic found.
pub fn parse(tokens: impl IntoIterator<Item = Token>) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    (program, parser.into_errors())
}
