use crate::ast::{Expr, Stmt};
use crate::error::{LoxError, ParseErrors};
use crate::lexer::{Token, TokenType};
use crate::value::Value;
use tracing::trace;

/// Recursive-descent parser over a finished token stream.
///
/// Grammar, lowest precedence first:
///
/// ```text
/// expression → ternary
/// ternary    → equality ( "?" expression ":" ternary )?
/// equality   → comparison ( ( "!=" | "==" ) comparison )*
/// comparison → term ( ( ">" | ">=" | "<" | "<=" ) term )*
/// term       → factor ( ( "-" | "+" ) factor )*
/// factor     → unary ( ( "/" | "*" ) unary )*
/// unary      → ( "!" | "-" ) unary | primary
/// primary    → NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        // The cursor relies on an end marker it never moves past.
        if tokens.last().map(|t| t.token_type) != Some(TokenType::Eof) {
            tokens.push(Token::synthetic(TokenType::Eof, ""));
        }
        Self { tokens, current: 0 }
    }

    /// Parse the whole stream as a single expression.
    pub fn parse(&mut self) -> Result<Expr, LoxError> {
        let expr = self.expression()?;

        if !self.is_at_end() {
            return Err(LoxError::parse_error(self.peek(), "Expect end of expression.")
                .with_help("Only one expression can be parsed here; separate expressions with ';'."));
        }

        Ok(expr)
    }

    /// Parse `;`-separated expressions, recovering after each error so every
    /// diagnostic in the input is collected.
    pub fn parse_program(&mut self) -> Result<Vec<Stmt>, ParseErrors> {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            if self.match_types(&[TokenType::Semicolon]) {
                continue;
            }

            match self.expression_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(error) => {
                    trace!(message = %error.message, "recovering from parse error");
                    errors.push(error);
                    self.synchronize();
                }
            }
        }

        if errors.is_empty() {
            Ok(statements)
        } else {
            Err(ParseErrors { errors })
        }
    }

    fn expression_statement(&mut self) -> Result<Stmt, LoxError> {
        let expr = self.expression()?;

        // The last statement may omit its ';'
        if !self.is_at_end() {
            self.consume(TokenType::Semicolon, "Expect ';' after expression.")?;
        }

        Ok(Stmt::Expression { expr })
    }

    fn expression(&mut self) -> Result<Expr, LoxError> {
        self.ternary()
    }

    fn ternary(&mut self) -> Result<Expr, LoxError> {
        let condition = self.equality()?;

        if self.match_types(&[TokenType::Question]) {
            let then_branch = self.expression()?;
            self.consume(
                TokenType::Colon,
                "Expect ':' after true branch of ternary expression.",
            )?;
            let else_branch = self.ternary()?;

            return Ok(Expr::ternary(condition, then_branch, else_branch));
        }

        Ok(condition)
    }

    fn equality(&mut self) -> Result<Expr, LoxError> {
        let mut expr = self.comparison()?;

        while self.match_types(&[TokenType::BangEqual, TokenType::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, LoxError> {
        let mut expr = self.term()?;

        while self.match_types(&[
            TokenType::Greater,
            TokenType::GreaterEqual,
            TokenType::Less,
            TokenType::LessEqual,
        ]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, LoxError> {
        let mut expr = self.factor()?;

        while self.match_types(&[TokenType::Minus, TokenType::Plus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, LoxError> {
        let mut expr = self.unary()?;

        while self.match_types(&[TokenType::Slash, TokenType::Star]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, LoxError> {
        if self.match_types(&[TokenType::Bang, TokenType::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::unary(operator, right));
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, LoxError> {
        if self.match_types(&[TokenType::False]) {
            return Ok(Expr::literal(false));
        }
        if self.match_types(&[TokenType::True]) {
            return Ok(Expr::literal(true));
        }
        if self.match_types(&[TokenType::Nil]) {
            return Ok(Expr::literal(()));
        }
        if self.match_types(&[TokenType::Number]) {
            let token = self.previous();
            let value = match &token.literal {
                Some(value @ Value::Number(_)) => value.clone(),
                _ => token
                    .lexeme
                    .parse::<f64>()
                    .map(Value::Number)
                    .map_err(|_| LoxError::parse_error(token, "Invalid number literal."))?,
            };
            return Ok(Expr::Literal { value });
        }
        if self.match_types(&[TokenType::String]) {
            let token = self.previous();
            let value = match &token.literal {
                Some(value @ Value::String(_)) => value.clone(),
                _ => Value::String(token.lexeme.trim_matches('"').to_string()),
            };
            return Ok(Expr::Literal { value });
        }
        if self.match_types(&[TokenType::LeftParen]) {
            let expr = self.expression()?;
            self.consume(TokenType::RightParen, "Expect ')' after expression.")
                .map_err(|e| {
                    e.with_help(
                        "Every opening parenthesis '(' must have a matching closing parenthesis ')'.",
                    )
                })?;
            return Ok(Expr::grouping(expr));
        }

        let help = match self.peek().token_type {
            TokenType::RightParen => "Found ')' without matching '('. Check for unbalanced parentheses.",
            TokenType::Eof => "Reached end of input while expecting an expression.",
            _ => "Expected a number, string, 'true', 'false', 'nil' or a parenthesized expression here.",
        };
        Err(LoxError::parse_error(self.peek(), "Expect expression.").with_help(help))
    }

    /// Discard tokens until the start of the next statement: just past a
    /// `;`, or at a keyword that begins a statement.
    pub fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().token_type == TokenType::Semicolon {
                return;
            }

            match self.peek().token_type {
                TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return => return,
                _ => {}
            }

            self.advance();
        }
    }

    /// Index of the next unconsumed token.
    pub fn position(&self) -> usize {
        self.current
    }

    fn match_types(&mut self, types: &[TokenType]) -> bool {
        for token_type in types {
            if self.check(*token_type) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, token_type: TokenType) -> bool {
        if self.is_at_end() {
            false
        } else {
            self.peek().token_type == token_type
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
            trace!(token = %self.tokens[self.current - 1].lexeme, index = self.current - 1, "consume");
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        // Before the first advance there is no previous token; the first
        // token stands in.
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> Result<&Token, LoxError> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(LoxError::parse_error(self.peek(), message))
        }
    }
}

/// Parse a token stream into one expression; the first error wins.
pub fn parse(tokens: Vec<Token>) -> Result<Expr, LoxError> {
    Parser::new(tokens).parse()
}
