use crate::token::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParseError {
    #[error("expected next token to be {expected}, got {} instead", got.kind)]
    UnexpectedToken { expected: TokenKind, got: Token },
    #[error("no prefix parse function for {} found", .0.kind)]
    NoPrefixFunction(Token),
    #[error("could not parse {:?} as integer", .0.literal)]
    InvalidInteger(Token),
    #[error("illegal token {:?}", .0.literal)]
    IllegalToken(Token),
}

impl ParseError {
    pub fn unexpected_token(expected: TokenKind, got: Token) -> ParseError {
        ParseError::UnexpectedToken { expected, got }
    }

    /// Error for a token that cannot start an expression.
    pub fn no_prefix(token: Token) -> ParseError {
        match token.kind {
            TokenKind::Illegal => ParseError::IllegalToken(token),
            _ => ParseError::NoPrefixFunction(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ParseError;
    use crate::token::{Token, TokenKind};

    #[test]
    fn test_messages() {
        let tests = vec![
            (
                ParseError::unexpected_token(TokenKind::RParen, Token::eof()),
                "expected next token to be ), got EOF instead",
            ),
            (
                ParseError::unexpected_token(TokenKind::Assign, Token::new(TokenKind::Int, "5")),
                "expected next token to be =, got INT instead",
            ),
            (
                ParseError::no_prefix(Token::new(TokenKind::SemiColon, ";")),
                "no prefix parse function for ; found",
            ),
            (
                ParseError::no_prefix(Token::new(TokenKind::Illegal, "@")),
                "illegal token \"@\"",
            ),
            (
                ParseError::InvalidInteger(Token::new(TokenKind::Int, "99999999999999999999")),
                "could not parse \"99999999999999999999\" as integer",
            ),
        ];

        for (error, expected) in tests {
            assert_eq!(error.to_string(), expected);
        }
    }
}
