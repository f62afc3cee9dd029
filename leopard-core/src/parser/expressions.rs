use std::rc::Rc;

use super::error::ParseError;
use super::statements::parse_statement;
use crate::ast::{BlockStatement, Expression, Identifier, InfixOperationKind, PrefixOperationKind};
use crate::parser::Parser;
use crate::token::{Token, TokenKind};

#[derive(PartialOrd, PartialEq, Debug, Clone, Copy)]
pub enum Precedence {
    Lowest = 0,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

pub fn precedence_of(token: TokenKind) -> Precedence {
    match token {
        TokenKind::Equal => Precedence::Equals,
        TokenKind::NotEqual => Precedence::Equals,
        TokenKind::LessThan => Precedence::LessGreater,
        TokenKind::GreaterThan => Precedence::LessGreater,
        TokenKind::Plus => Precedence::Sum,
        TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk => Precedence::Product,
        TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

pub fn parse_expression<I: Iterator<Item = Token>>(
    parser: &mut Parser<I>,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    // A token that cannot start an expression stays in the stream so that
    // recovery can resynchronise on it.
    let token = parser.peek_token();
    if !has_prefix_parsing(token.kind) {
        return Err(ParseError::no_prefix(token));
    }
    parser.next_token();
    let mut left_expression = prefix_parsing(token, parser)?;

    loop {
        let next_kind = parser.peek_kind();
        if precedence >= precedence_of(next_kind) {
            break;
        }
        let Some(infix) = infix_parsing_function(next_kind) else {
            break;
        };
        parser.next_token();
        left_expression = infix.parse(left_expression, parser)?;
    }

    Ok(left_expression)
}

fn parse_prefix_operation<I: Iterator<Item = Token>>(
    kind: PrefixOperationKind,
    parser: &mut Parser<I>,
) -> Result<Expression, ParseError> {
    Ok(Expression::PrefixOperation(
        kind,
        Box::new(parse_expression(parser, Precedence::Prefix)?),
    ))
}

fn parse_grouped_expression<I: Iterator<Item = Token>>(
    parser: &mut Parser<I>,
) -> Result<Expression, ParseError> {
    let expression = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

/// Parses `element (, element)* ,? terminator`; the opening delimiter has
/// already been consumed.
fn parse_sequence<I: Iterator<Item = Token>, T>(
    parser: &mut Parser<I>,
    parse_element: impl Fn(&mut Parser<I>) -> Result<T, ParseError>,
    terminator: TokenKind,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();

    loop {
        if parser.iter.next_if(|token| token.kind == terminator).is_some() {
            return Ok(elements);
        }

        elements.push(parse_element(parser)?);

        if parser
            .iter
            .next_if(|token| token.kind == TokenKind::Comma)
            .is_none()
        {
            parser.expect_token(terminator)?;
            return Ok(elements);
        }
    }
}

fn parse_array_literal<I: Iterator<Item = Token>>(
    parser: &mut Parser<I>,
) -> Result<Expression, ParseError> {
    let expressions = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::RBracket,
    )?;
    Ok(Expression::ArrayLiteral(expressions))
}

fn parse_hash_literal<I: Iterator<Item = Token>>(
    parser: &mut Parser<I>,
) -> Result<Expression, ParseError> {
    let pairs = parse_sequence(
        parser,
        |parser| {
            let key = parse_expression(parser, Precedence::Lowest)?;
            parser.expect_token(TokenKind::Colon)?;
            let value = parse_expression(parser, Precedence::Lowest)?;
            Ok((key, value))
        },
        TokenKind::RBrace,
    )?;
    Ok(Expression::HashLiteral(pairs))
}

fn parse_if_expression<I: Iterator<Item = Token>>(
    parser: &mut Parser<I>,
) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let condition = Box::new(parse_expression(parser, Precedence::Lowest)?);
    parser.expect_token(TokenKind::RParen)?;

    let consequence = parse_block_statement(parser)?;

    let alternative = if parser
        .iter
        .next_if(|token| token.kind == TokenKind::Else)
        .is_some()
    {
        Some(parse_block_statement(parser)?)
    } else {
        None
    };

    Ok(Expression::IfExpression {
        condition,
        consequence,
        alternative,
    })
}

pub(crate) fn parse_block_statement<I: Iterator<Item = Token>>(
    parser: &mut Parser<I>,
) -> Result<BlockStatement, ParseError> {
    parser.expect_token(TokenKind::LBrace)?;

    let mut statements = Vec::new();
    loop {
        match parser.peek_kind() {
            TokenKind::RBrace => {
                parser.next_token();
                return Ok(BlockStatement { statements });
            }
            TokenKind::Eof => {
                return Err(ParseError::unexpected_token(
                    TokenKind::RBrace,
                    parser.peek_token(),
                ))
            }
            _ => {
                statements.push(parse_statement(parser)?);
                parser.skip_semicolon();
            }
        }
    }
}

fn parse_function_literal<I: Iterator<Item = Token>>(
    parser: &mut Parser<I>,
) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_sequence(
        parser,
        |parser| parser.parse_ident().map(|name| Identifier { name }),
        TokenKind::RParen,
    )?;

    let body = parse_block_statement(parser)?;

    Ok(Expression::FunctionLiteral {
        parameters,
        body: Rc::new(body),
    })
}

fn has_prefix_parsing(token: TokenKind) -> bool {
    matches!(
        token,
        TokenKind::Ident
            | TokenKind::Int
            | TokenKind::String
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Bang
            | TokenKind::Minus
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::If
            | TokenKind::Function
    )
}

pub fn prefix_parsing<I: Iterator<Item = Token>>(
    token: Token,
    parser: &mut Parser<I>,
) -> Result<Expression, ParseError> {
    match token.kind {
        TokenKind::Ident => Ok(Expression::Identifier(Identifier {
            name: token.literal,
        })),
        TokenKind::Int => match token.literal.parse() {
            Ok(value) => Ok(Expression::IntegerLiteral(value)),
            Err(_) => Err(ParseError::InvalidInteger(token)),
        },
        TokenKind::String => Ok(Expression::StringLiteral(token.literal)),
        TokenKind::True => Ok(Expression::BooleanLiteral(true)),
        TokenKind::False => Ok(Expression::BooleanLiteral(false)),
        TokenKind::Bang => parse_prefix_operation(PrefixOperationKind::Bang, parser),
        TokenKind::Minus => parse_prefix_operation(PrefixOperationKind::Minus, parser),
        TokenKind::LParen => parse_grouped_expression(parser),
        TokenKind::LBracket => parse_array_literal(parser),
        TokenKind::LBrace => parse_hash_literal(parser),
        TokenKind::If => parse_if_expression(parser),
        TokenKind::Function => parse_function_literal(parser),
        _ => Err(ParseError::no_prefix(token)),
    }
}

/// The handler registered for a token that continues an expression.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InfixParsing {
    Operation(InfixOperationKind, Precedence),
    Call,
    Index,
}

impl InfixParsing {
    fn parse<I: Iterator<Item = Token>>(
        self,
        left: Expression,
        parser: &mut Parser<I>,
    ) -> Result<Expression, ParseError> {
        match self {
            InfixParsing::Operation(kind, precedence) => Ok(Expression::InfixOperation(
                kind,
                Box::new(left),
                Box::new(parse_expression(parser, precedence)?),
            )),
            InfixParsing::Call => parse_call_function(left, parser),
            InfixParsing::Index => parse_index_expression(left, parser),
        }
    }
}

fn parse_call_function<I: Iterator<Item = Token>>(
    left: Expression,
    parser: &mut Parser<I>,
) -> Result<Expression, ParseError> {
    let arguments = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::RParen,
    )?;

    Ok(Expression::CallExpression {
        function: Box::new(left),
        arguments,
    })
}

fn parse_index_expression<I: Iterator<Item = Token>>(
    left: Expression,
    parser: &mut Parser<I>,
) -> Result<Expression, ParseError> {
    let index = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RBracket)?;

    Ok(Expression::IndexExpression {
        left: Box::new(left),
        index: Box::new(index),
    })
}

pub fn infix_parsing_function(token: TokenKind) -> Option<InfixParsing> {
    use InfixOperationKind as InfixKind;

    let operation = |kind| Some(InfixParsing::Operation(kind, precedence_of(token)));
    match token {
        TokenKind::Plus => operation(InfixKind::Plus),
        TokenKind::Minus => operation(InfixKind::Minus),
        TokenKind::LessThan => operation(InfixKind::LessThan),
        TokenKind::GreaterThan => operation(InfixKind::GreaterThan),
        TokenKind::Equal => operation(InfixKind::Equal),
        TokenKind::NotEqual => operation(InfixKind::NotEqual),
        TokenKind::Asterisk => operation(InfixKind::Multiply),
        TokenKind::Slash => operation(InfixKind::Divide),
        TokenKind::LParen => Some(InfixParsing::Call),
        TokenKind::LBracket => Some(InfixParsing::Index),
        _ => None,
    }
}
