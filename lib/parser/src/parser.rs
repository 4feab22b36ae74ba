mod expr;

use diagnostics::Diagnostic;
use log::{debug, trace};
use scanner::{Token, TokenType};

pub use expr::Expr;

use TokenType::*;

pub type Result<T> = std::result::Result<T, ParserError>;

/// `token` is the token the parser was looking at, if any was left.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct ParserError {
    pub error: ParserErrorType,
    pub token: Option<Token>,
}

impl ParserError {
    fn new(error: ParserErrorType, token: Option<Token>) -> Self {
        Self { error, token }
    }
}

impl From<ParserError> for Diagnostic {
    fn from(e: ParserError) -> Self {
        let diagnostic = Diagnostic::error(e.error);
        match e.token {
            Some(token) => diagnostic.at(token.line, token.col),
            None => diagnostic,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErrorType {
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect ')' after {0}.")]
    ExpectedRightParen(&'static str),
    #[error("Invalid assignment target.")]
    InvalidAssignmentTarget,
    #[error("Expect function name.")]
    ExpectedFunctionName,
    #[error("Expect '(' after {0}.")]
    ExpectedLeftParen(&'static str),
    #[error("Expect parameter name.")]
    ExpectedParameterName,
    #[error("Expect '{{' before function body.")]
    ExpectedLeftBrace,
    #[error("Expect '}}' after block.")]
    ExpectedRightBrace,
}

/// Recursive descent over one compilation unit, loosest binding first:
///
/// ```text
/// expression -> assignment
/// assignment -> equality ( "=" assignment )?
/// equality   -> comparison ( ( "==" | "!=" ) comparison )*
/// comparison -> term ( ( "<" | "<=" | ">" | ">=" ) term )*
/// term       -> factor ( ( "+" | "-" ) factor )*
/// factor     -> primary ( ( "*" | "/" ) primary )*
/// primary    -> NUMBER | IDENTIFIER | "(" expression ")" | function
/// function   -> "fun" IDENTIFIER "(" parameters? ")" "{" expression* "}"
/// ```
///
/// The first error aborts the whole parse, there is no synchronization.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn parse(mut self) -> std::result::Result<Vec<Expr>, Diagnostic> {
        let mut exprs = Vec::new();
        while !self.is_at_end() {
            exprs.push(self.expression()?);
        }
        debug!("Parsed {} top-level expressions from {} tokens", exprs.len(), self.tokens.len());
        Ok(exprs)
    }

    fn expression(&mut self) -> Result<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr> {
        let expr = self.equality()?;

        if let Some(equal) = self.consume(Equal) {
            let _value = self.assignment()?;

            // None of the expression kinds refers to a variable, so there is
            // nothing that could be assigned to.
            return match expr {
                Expr::Literal(_)
                | Expr::Grouping(_)
                | Expr::Binary { .. }
                | Expr::Function { .. } => Err(ParserError::new(
                    ParserErrorType::InvalidAssignmentTarget,
                    Some(equal.clone()),
                )),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut expr = self.comparison()?;

        while let Some(operator) = self.consume_any(&[EqualEqual, BangEqual]) {
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator.clone(), right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let mut expr = self.term()?;

        while let Some(operator) = self.consume_any(&[Less, LessEqual, Greater, GreaterEqual]) {
            let right = self.term()?;
            expr = Expr::binary(expr, operator.clone(), right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut expr = self.factor()?;

        while let Some(operator) = self.consume_any(&[Plus, Minus]) {
            let right = self.factor()?;
            expr = Expr::binary(expr, operator.clone(), right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;

        // The scanner never emits `Slash`, but the grammar accepts it.
        while let Some(operator) = self.consume_any(&[Star, Slash]) {
            let right = self.primary()?;
            expr = Expr::binary(expr, operator.clone(), right);
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr> {
        let Some(token) = self.peek_token() else {
            return Err(ParserError::new(ParserErrorType::ExpectedExpression, None));
        };
        trace!("primary at {:?} '{}'", token.kind, token.lexeme);

        match token.kind {
            Number | Identifier => {
                self.advance();
                Ok(Expr::Literal(token.lexeme.clone()))
            }
            LeftParen => {
                self.advance();
                let expr = self.expression()?;

                self.consume_or_error(
                    RightParen,
                    ParserErrorType::ExpectedRightParen("expression"),
                )?;

                Ok(Expr::Grouping(Box::new(expr)))
            }
            Fun => {
                self.advance();
                self.function()
            }
            _ => Err(ParserError::new(ParserErrorType::ExpectedExpression, Some(token.clone()))),
        }
    }

    fn function(&mut self) -> Result<Expr> {
        let name = self.consume_or_error(Identifier, ParserErrorType::ExpectedFunctionName)?;
        self.consume_or_error(LeftParen, ParserErrorType::ExpectedLeftParen("function name"))?;

        let mut parameters = Vec::new();
        while !self.check(RightParen) && !self.is_at_end() {
            parameters
                .push(self.consume_or_error(Identifier, ParserErrorType::ExpectedParameterName)?);
            if self.consume(Comma).is_none() {
                break;
            }
        }

        self.consume_or_error(RightParen, ParserErrorType::ExpectedRightParen("parameters"))?;
        self.consume_or_error(LeftBrace, ParserErrorType::ExpectedLeftBrace)?;
        let body = self.block()?;

        trace!("function {} with {} parameters", name.lexeme, parameters.len());
        Ok(Expr::Function { name, parameters, body })
    }

    fn block(&mut self) -> Result<Vec<Expr>> {
        let mut exprs = Vec::new();
        while !self.check(RightBrace) && !self.is_at_end() {
            exprs.push(self.expression()?);
        }

        self.consume_or_error(RightBrace, ParserErrorType::ExpectedRightBrace)?;
        Ok(exprs)
    }
}

// Helpers
impl<'a> Parser<'a> {
    fn peek_token(&self) -> Option<&'a Token> {
        let tokens: &'a [Token] = self.tokens;
        tokens.get(self.current)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.peek_token();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.peek_token().map_or(true, |t| t.kind == Eof)
    }

    fn check(&self, kind: TokenType) -> bool {
        !self.is_at_end() && self.peek_token().is_some_and(|t| t.kind == kind)
    }

    fn consume(&mut self, kind: TokenType) -> Option<&'a Token> {
        self.consume_any(&[kind])
    }

    fn consume_any(&mut self, kinds: &[TokenType]) -> Option<&'a Token> {
        if kinds.iter().any(|&kind| self.check(kind)) {
            self.advance()
        } else {
            None
        }
    }

    fn consume_or_error(&mut self, kind: TokenType, error: ParserErrorType) -> Result<Token> {
        match self.consume(kind) {
            Some(token) => Ok(token.clone()),
            None => Err(ParserError::new(error, self.peek_token().cloned())),
        }
    }
}

pub fn parse(tokens: &[Token]) -> std::result::Result<Vec<Expr>, Diagnostic> {
    Parser::new(tokens).parse()
}
