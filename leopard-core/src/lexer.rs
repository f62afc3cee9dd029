use crate::token::{lookup_ident, Token, TokenKind};

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self {
            input,
            iter,
            finished: false,
        }
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| Self::is_letter(*ch)).is_some() {}

        let ident = &self.input[start..self.next_idx()];
        Token::new(lookup_ident(ident), ident)
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        let number = &self.input[start..self.next_idx()];
        Token::new(TokenKind::Int, number)
    }

    fn read_string(&mut self, start: usize) -> Token {
        loop {
            match self.iter.next() {
                Some((end, '"')) => {
                    return Token::new(TokenKind::String, &self.input[start + 1..end]);
                }
                None => return Token::new(TokenKind::Illegal, &self.input[start..]),
                _ => {}
            }
        }
    }

    /// Consumes `second` if it follows, producing the two-character token.
    fn either(&mut self, start: usize, second: char, double: TokenKind, single: TokenKind) -> Token {
        let kind = if self.iter.next_if(|(_, ch)| *ch == second).is_some() {
            double
        } else {
            single
        };
        self.token(kind, start)
    }

    fn token(&mut self, kind: TokenKind, start: usize) -> Token {
        let end = self.next_idx();
        Token::new(kind, &self.input[start..end])
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.iter.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}

        let Some((idx, ch)) = self.iter.next() else {
            if self.finished {
                return None;
            }
            self.finished = true;
            return Some(Token::eof());
        };

        let tok = match ch {
            '=' => self.either(idx, '=', TokenKind::Equal, TokenKind::Assign),
            '!' => self.either(idx, '=', TokenKind::NotEqual, TokenKind::Bang),
            '+' => self.token(TokenKind::Plus, idx),
            '-' => self.token(TokenKind::Minus, idx),
            '*' => self.token(TokenKind::Asterisk, idx),
            '/' => self.token(TokenKind::Slash, idx),
            '<' => self.token(TokenKind::LessThan, idx),
            '>' => self.token(TokenKind::GreaterThan, idx),
            ',' => self.token(TokenKind::Comma, idx),
            ':' => self.token(TokenKind::Colon, idx),
            ';' => self.token(TokenKind::SemiColon, idx),
            '(' => self.token(TokenKind::LParen, idx),
            ')' => self.token(TokenKind::RParen, idx),
            '{' => self.token(TokenKind::LBrace, idx),
            '}' => self.token(TokenKind::RBrace, idx),
            '[' => self.token(TokenKind::LBracket, idx),
            ']' => self.token(TokenKind::RBracket, idx),
            '"' => self.read_string(idx),
            c if Tokenizer::is_letter(c) => self.read_identifier(idx),
            c if c.is_ascii_digit() => self.read_number(idx),
            _ => self.token(TokenKind::Illegal, idx),
        };
        Some(tok)
    }
}
