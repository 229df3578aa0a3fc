use crate::ast::Stmt;
use crate::error::ErrorKind;
use crate::evaluator::Evaluator;
use crate::lexer;
use crate::parser::Parser;
use crate::printer::AstPrinter;
use std::io::{self, Write};
use tracing::debug;

/// What to do with each parsed expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Evaluate,
    PrintAst,
}

/// Run a script, printing one line per expression to stdout.
///
/// Diagnostics are reported to stderr; the returned kind tells the caller
/// which stage failed.
pub fn run(source: &str, filename: Option<&str>, mode: Mode) -> Result<(), ErrorKind> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_to(source, filename, mode, &mut out)
}

pub fn run_to<W: Write>(
    source: &str,
    filename: Option<&str>,
    mode: Mode,
    out: &mut W,
) -> Result<(), ErrorKind> {
    let tokens = match lexer::scan(source) {
        Ok(tokens) => tokens,
        Err(error) => {
            error.report(source, filename);
            return Err(error.kind);
        }
    };
    debug!(tokens = tokens.len(), "scanned source");

    let mut parser = Parser::new(tokens);
    let statements = match parser.parse_program() {
        Ok(statements) => statements,
        Err(errors) => {
            debug!(errors = errors.errors.len(), "parse failed");
            errors.report(source, filename);
            return Err(ErrorKind::ParseError);
        }
    };
    debug!(statements = statements.len(), ?mode, "parsed program");

    let evaluator = Evaluator::new();
    let printer = AstPrinter::new();
    for expr in statements.iter().flat_map(Stmt::expressions) {
        let line = match mode {
            Mode::Evaluate => match evaluator.evaluate(expr) {
                Ok(value) => value.to_string(),
                Err(error) => {
                    error.report(source, filename);
                    return Err(error.kind);
                }
            },
            Mode::PrintAst => printer.print(expr),
        };

        if writeln!(out, "{}", line).is_err() {
            debug!("output closed");
            break;
        }
    }

    Ok(())
}
