use crate::ast::Expr;
use crate::value::Value;
use std::fmt::{self, Write};

/// Renders expressions in fully parenthesized prefix form, e.g.
/// `(* (group (+ 1 2)) 3)`. The output can be read back with
/// [`crate::reader::read`].
#[derive(Debug, Default)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&self, expr: &Expr) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_expr(&mut out, expr);
        out
    }

    fn write_expr(&self, out: &mut String, expr: &Expr) -> fmt::Result {
        match expr {
            Expr::Literal { value } => self.write_literal(out, value),
            Expr::Grouping { expr } => self.parenthesize(out, "group", &[Part::Expr(expr)]),
            Expr::Unary { operator, right } => {
                self.parenthesize(out, &operator.lexeme, &[Part::Expr(right)])
            }
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => self.parenthesize(
                out,
                &operator.lexeme,
                &[Part::Expr(left), Part::Expr(right)],
            ),
            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => self.parenthesize(
                out,
                "?",
                &[
                    Part::Expr(condition),
                    Part::Expr(then_branch),
                    Part::Expr(else_branch),
                ],
            ),
            Expr::Variable { name } => write!(out, "{}", name.lexeme),
            Expr::Assign { name, value } => {
                self.parenthesize(out, "=", &[Part::Text(&name.lexeme), Part::Expr(value)])
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                write!(out, "(call ")?;
                self.write_expr(out, callee)?;
                for (i, argument) in arguments.iter().enumerate() {
                    out.push(if i == 0 { ' ' } else { ',' });
                    self.write_expr(out, argument)?;
                }
                write!(out, ")")
            }
            Expr::Get { object, name } => {
                self.parenthesize(out, "get", &[Part::Expr(object), Part::Text(&name.lexeme)])
            }
            Expr::Set {
                object,
                name,
                value,
            } => self.parenthesize(
                out,
                "set",
                &[
                    Part::Expr(object),
                    Part::Text(&name.lexeme),
                    Part::Expr(value),
                ],
            ),
            Expr::This { .. } => write!(out, "this"),
            Expr::Super { method, .. } => {
                self.parenthesize(out, "super", &[Part::Text(&method.lexeme)])
            }
        }
    }

    fn write_literal(&self, out: &mut String, value: &Value) -> fmt::Result {
        match value {
            Value::String(s) => write!(out, "\"{}\"", s),
            other => write!(out, "{}", other),
        }
    }

    fn parenthesize(&self, out: &mut String, name: &str, parts: &[Part]) -> fmt::Result {
        write!(out, "({}", name)?;
        for part in parts {
            out.push(' ');
            match part {
                Part::Expr(expr) => self.write_expr(out, expr)?,
                Part::Text(text) => out.push_str(text),
            }
        }
        write!(out, ")")
    }
}

enum Part<'a> {
    Expr(&'a Expr),
    Text(&'a str),
}

/// Prefix rendering of `expr`.
pub fn print(expr: &Expr) -> String {
    AstPrinter::new().print(expr)
}
