use crate::error::LoxError;
use crate::evaluator::Evaluator;
use crate::lexer;
use crate::parser::Parser;
use crate::printer::AstPrinter;
use crate::runner::Mode;
use std::io::{self, BufRead, Write};
use tracing::debug;

pub const PROMPT: &str = "> ";

/// Interactive loop on stdin/stdout.
pub fn start(mode: Mode) {
    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(error) = run(stdin.lock(), stdout.lock(), mode) {
        eprintln!("Error reading input: {}", error);
    }
}

/// Read lines from `input` until EOF or `exit`/`quit`, writing each
/// line's result to `output`. Diagnostics go to stderr.
pub fn run<R: BufRead, W: Write>(mut input: R, mut output: W, mode: Mode) -> io::Result<()> {
    writeln!(output, "Lox v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(output, "Type 'exit' or press Ctrl+D to quit")?;
    writeln!(output)?;

    let evaluator = Evaluator::new();
    let printer = AstPrinter::new();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF reached (Ctrl+D or piped input ended)
            writeln!(output)?;
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            writeln!(output, "Goodbye!")?;
            break;
        }

        match run_line(line, mode, &evaluator, &printer) {
            Ok(result) => writeln!(output, "{}", result)?,
            Err(error) => {
                debug!(%error, "line failed");
                error.report(line, None);
            }
        }
    }

    Ok(())
}

fn run_line(
    source: &str,
    mode: Mode,
    evaluator: &Evaluator,
    printer: &AstPrinter,
) -> Result<String, LoxError> {
    let tokens = lexer::scan(source)?;
    let expr = Parser::new(tokens).parse()?;

    match mode {
        Mode::Evaluate => Ok(evaluator.evaluate(&expr)?.to_string()),
        Mode::PrintAst => Ok(printer.print(&expr)),
    }
}
