use crate::ast::Expr;
use crate::error::LoxError;
use crate::lexer::{self, Token, TokenType};
use crate::value::Value;

/// Reads the prefix form produced by [`crate::printer::AstPrinter`] back
/// into an expression tree.
pub struct Reader {
    tokens: Vec<Token>,
    current: usize,
}

impl Reader {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.token_type) != Some(TokenType::Eof) {
            tokens.push(Token::synthetic(TokenType::Eof, ""));
        }
        Self { tokens, current: 0 }
    }

    pub fn read(&mut self) -> Result<Expr, LoxError> {
        let expr = self.read_expr()?;
        if !self.is_at_end() {
            return Err(LoxError::parse_error(self.peek(), "Expect end of input."));
        }
        Ok(expr)
    }

    fn read_expr(&mut self) -> Result<Expr, LoxError> {
        let token = self.peek().clone();
        match token.token_type {
            TokenType::Number | TokenType::String => {
                self.advance();
                let value = token.literal.clone().ok_or_else(|| {
                    LoxError::parse_error(&token, "Literal token carries no value.")
                })?;
                Ok(Expr::Literal { value })
            }
            TokenType::True => {
                self.advance();
                Ok(Expr::literal(true))
            }
            TokenType::False => {
                self.advance();
                Ok(Expr::literal(false))
            }
            TokenType::Nil => {
                self.advance();
                Ok(Expr::Literal { value: Value::Nil })
            }
            TokenType::Identifier => {
                self.advance();
                Ok(Expr::Variable { name: token })
            }
            TokenType::This => {
                self.advance();
                Ok(Expr::This { keyword: token })
            }
            TokenType::LeftParen => {
                self.advance();
                self.read_form()
            }
            _ => Err(LoxError::parse_error(&token, "Expect expression.")),
        }
    }

    /// Everything after an opening `(`.
    fn read_form(&mut self) -> Result<Expr, LoxError> {
        if self.is_at_end() {
            return Err(LoxError::parse_error(self.peek(), "Expect form after '('."));
        }
        let head = self.advance().clone();

        let expr = match head.token_type {
            TokenType::Identifier => match head.lexeme.as_str() {
                "group" => Expr::grouping(self.read_expr()?),
                "call" => return self.read_call(),
                "get" => {
                    let object = self.read_expr()?;
                    let name = self.expect_name()?;
                    Expr::Get {
                        object: Box::new(object),
                        name,
                    }
                }
                "set" => {
                    let object = self.read_expr()?;
                    let name = self.expect_name()?;
                    let value = self.read_expr()?;
                    Expr::Set {
                        object: Box::new(object),
                        name,
                        value: Box::new(value),
                    }
                }
                _ => return Err(self.unknown_form(&head)),
            },
            TokenType::Super => {
                let method = self.expect_name()?;
                Expr::Super {
                    keyword: head,
                    method,
                }
            }
            TokenType::Question => {
                let condition = self.read_expr()?;
                let then_branch = self.read_expr()?;
                let else_branch = self.read_expr()?;
                Expr::ternary(condition, then_branch, else_branch)
            }
            TokenType::Equal => {
                let name = self.expect_name()?;
                let value = self.read_expr()?;
                Expr::Assign {
                    name,
                    value: Box::new(value),
                }
            }
            TokenType::And | TokenType::Or => {
                let left = self.read_expr()?;
                let right = self.read_expr()?;
                Expr::Logical {
                    left: Box::new(left),
                    operator: head,
                    right: Box::new(right),
                }
            }
            TokenType::Bang => Expr::unary(head, self.read_expr()?),
            // `-` is unary with one operand, binary with two
            TokenType::Minus => {
                let first = self.read_expr()?;
                if self.check(TokenType::RightParen) {
                    Expr::unary(head, first)
                } else {
                    Expr::binary(first, head, self.read_expr()?)
                }
            }
            TokenType::Plus
            | TokenType::Star
            | TokenType::Slash
            | TokenType::EqualEqual
            | TokenType::BangEqual
            | TokenType::Greater
            | TokenType::GreaterEqual
            | TokenType::Less
            | TokenType::LessEqual => {
                let left = self.read_expr()?;
                let right = self.read_expr()?;
                Expr::binary(left, head, right)
            }
            _ => return Err(self.unknown_form(&head)),
        };

        self.expect_close()?;
        Ok(expr)
    }

    fn read_call(&mut self) -> Result<Expr, LoxError> {
        let callee = self.read_expr()?;
        let mut arguments = Vec::new();

        while !self.check(TokenType::RightParen) && !self.is_at_end() {
            if !arguments.is_empty() {
                self.expect(TokenType::Comma, "Expect ',' between call arguments.")?;
            }
            arguments.push(self.read_expr()?);
        }

        let paren = self.expect_close()?;
        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn unknown_form(&self, head: &Token) -> LoxError {
        LoxError::parse_error(head, format!("Unknown form '{}'.", head.lexeme))
    }

    fn expect_name(&mut self) -> Result<Token, LoxError> {
        self.expect(TokenType::Identifier, "Expect name.")
    }

    fn expect_close(&mut self) -> Result<Token, LoxError> {
        self.expect(TokenType::RightParen, "Expect ')' to close form.")
    }

    fn expect(&mut self, token_type: TokenType, message: &str) -> Result<Token, LoxError> {
        if self.check(token_type) {
            Ok(self.advance().clone())
        } else {
            Err(LoxError::parse_error(self.peek(), message))
        }
    }

    fn check(&self, token_type: TokenType) -> bool {
        !self.is_at_end() && self.peek().token_type == token_type
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }
}

/// Read a prefix rendering back into an expression.
pub fn read(source: &str) -> Result<Expr, LoxError> {
    let tokens = lexer::scan(source)?;
    Reader::new(tokens).read()
}
