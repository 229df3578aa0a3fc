use crate::ast::Expr;
use crate::error::LoxError;
use crate::lexer::{Token, TokenType};
use crate::value::Value;

/// Tree-walking evaluator for expressions.
///
/// Holds no state: evaluating one tree never affects another.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(level = "trace", skip_all, fields(depth = expr.depth()))]
    pub fn evaluate(&self, expr: &Expr) -> Result<Value, LoxError> {
        self.evaluate_expression(expr)
    }

    fn evaluate_expression(&self, expr: &Expr) -> Result<Value, LoxError> {
        match expr {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { expr } => self.evaluate_expression(expr),
            Expr::Unary { operator, right } => {
                let operand = self.evaluate_expression(right)?;
                self.evaluate_unary_op(operator, operand)
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left_val = self.evaluate_expression(left)?;
                let right_val = self.evaluate_expression(right)?;
                self.evaluate_binary_op(operator, left_val, right_val)
            }
            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate_expression(condition)?.is_truthy() {
                    self.evaluate_expression(then_branch)
                } else {
                    self.evaluate_expression(else_branch)
                }
            }
            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left_val = self.evaluate_expression(left)?;

                match operator.token_type {
                    TokenType::Or => {
                        if left_val.is_truthy() {
                            Ok(left_val)
                        } else {
                            self.evaluate_expression(right)
                        }
                    }
                    TokenType::And => {
                        if !left_val.is_truthy() {
                            Ok(left_val)
                        } else {
                            self.evaluate_expression(right)
                        }
                    }
                    _ => Err(unknown_operator(operator)),
                }
            }
            Expr::Variable { name } => Err(unsupported(name, "Variable lookup")),
            Expr::Assign { name, .. } => Err(unsupported(name, "Assignment")),
            Expr::Call { paren, .. } => Err(unsupported(paren, "Function calls")),
            Expr::Get { name, .. } => Err(unsupported(name, "Property access")),
            Expr::Set { name, .. } => Err(unsupported(name, "Property assignment")),
            Expr::This { keyword } => Err(unsupported(keyword, "'this'")),
            Expr::Super { keyword, .. } => Err(unsupported(keyword, "'super'")),
        }
    }

    fn evaluate_unary_op(&self, operator: &Token, operand: Value) -> Result<Value, LoxError> {
        match operator.token_type {
            TokenType::Bang => Ok(Value::Boolean(!operand.is_truthy())),
            TokenType::Minus => match operand {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(LoxError::runtime_error(
                    operator,
                    format!(
                        "Operand must be a number. Operator '{}' got {}.",
                        operator.lexeme,
                        other.describe()
                    ),
                )),
            },
            _ => Err(unknown_operator(operator)),
        }
    }

    fn evaluate_binary_op(
        &self,
        operator: &Token,
        left: Value,
        right: Value,
    ) -> Result<Value, LoxError> {
        match operator.token_type {
            TokenType::EqualEqual => Ok(Value::Boolean(self.is_equal(&left, &right))),
            TokenType::BangEqual => Ok(Value::Boolean(!self.is_equal(&left, &right))),
            TokenType::Plus => match (left, right) {
                (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
                (l, r) => Err(LoxError::runtime_error(
                    operator,
                    format!(
                        "Operands must be two numbers or two strings. Operator '{}' got {} and {}.",
                        operator.lexeme,
                        l.describe(),
                        r.describe()
                    ),
                )),
            },
            TokenType::Minus => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Number(l - r))
            }
            // IEEE-754 division: x / 0 is ±Infinity or NaN, not an error
            TokenType::Slash => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Number(l / r))
            }
            TokenType::Star => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Number(l * r))
            }
            TokenType::Greater => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Boolean(l > r))
            }
            TokenType::GreaterEqual => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Boolean(l >= r))
            }
            TokenType::Less => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Boolean(l < r))
            }
            TokenType::LessEqual => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Boolean(l <= r))
            }
            _ => Err(unknown_operator(operator)),
        }
    }

    fn number_operands(
        &self,
        operator: &Token,
        left: Value,
        right: Value,
    ) -> Result<(f64, f64), LoxError> {
        match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok((l, r)),
            (l, r) => Err(LoxError::runtime_error(
                operator,
                format!(
                    "Operands must be numbers. Operator '{}' got {} and {}.",
                    operator.lexeme,
                    l.describe(),
                    r.describe()
                ),
            )),
        }
    }

    /// Same-type value equality; values of different types are never equal.
    fn is_equal(&self, left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(l), Value::Boolean(r)) => l == r,
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::String(l), Value::String(r)) => l == r,
            _ => false,
        }
    }
}

fn unsupported(token: &Token, what: &str) -> LoxError {
    LoxError::runtime_error(
        token,
        format!("{} is not supported by the expression evaluator.", what),
    )
    .with_help("Only literals, grouping, unary, binary, logical and ternary expressions can be evaluated.")
}

fn unknown_operator(operator: &Token) -> LoxError {
    LoxError::runtime_error(
        operator,
        format!("Unknown operator '{}'.", operator.lexeme),
    )
}

/// Evaluate `expr` with a fresh evaluator.
pub fn evaluate(expr: &Expr) -> Result<Value, LoxError> {
    Evaluator::new().evaluate(expr)
}
