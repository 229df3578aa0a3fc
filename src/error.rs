use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

use crate::lexer::{Token, TokenType};

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LexError,
    ParseError,
    RuntimeError,
}

/// Every failure the front end can produce.
///
/// Parse and runtime errors carry the token they were raised at; lexical
/// errors only know a span and a line/column.
#[derive(Debug, Clone)]
pub struct LoxError {
    pub kind: ErrorKind,
    pub message: String,
    pub token: Option<Token>,
    pub span: Span,
    pub line: usize,
    pub column: usize,
    pub help: Option<String>,
}

impl LoxError {
    fn at_token(kind: ErrorKind, token: &Token, message: String) -> Self {
        Self {
            kind,
            message,
            token: Some(token.clone()),
            span: token.span.clone(),
            line: token.line,
            column: token.column,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn lex_error(span: Span, line: usize, column: usize, message: String) -> Self {
        Self {
            kind: ErrorKind::LexError,
            message,
            token: None,
            span,
            line,
            column,
            help: None,
        }
    }

    pub fn parse_error(token: &Token, message: impl Into<String>) -> Self {
        Self::at_token(ErrorKind::ParseError, token, message.into())
    }

    pub fn runtime_error(token: &Token, message: impl Into<String>) -> Self {
        Self::at_token(ErrorKind::RuntimeError, token, message.into())
    }

    pub fn is_parse_error(&self) -> bool {
        self.kind == ErrorKind::ParseError
    }

    pub fn is_runtime_error(&self) -> bool {
        self.kind == ErrorKind::RuntimeError
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");

        let color = match self.kind {
            ErrorKind::LexError => Color::Red,
            ErrorKind::ParseError => Color::Yellow,
            ErrorKind::RuntimeError => Color::Magenta,
        };

        let kind_str = match self.kind {
            ErrorKind::LexError => "Lexical Error",
            ErrorKind::ParseError => "Parse Error",
            ErrorKind::RuntimeError => "Runtime Error",
        };

        // ariadne wants the label inside the source; the end-of-input token
        // sits one past it.
        let start = self.span.start.min(source.len());
        let end = self.span.end.min(source.len()).max(start);

        let mut report_builder = Report::build(ReportKind::Error, filename, start)
            .with_message(format!("{}: {}", kind_str.fg(color), self.message))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        if report_builder
            .finish()
            .eprint((filename, Source::from(source)))
            .is_err()
        {
            eprintln!("{}", self);
        }
    }
}

impl fmt::Display for LoxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[Pos {}:{}] ", self.line, self.column)?;
        let label = match self.kind {
            ErrorKind::RuntimeError => "Runtime error",
            _ => "Error",
        };
        match &self.token {
            Some(token) if token.token_type == TokenType::Eof => {
                write!(f, "{} at end: {}", label, self.message)
            }
            Some(token) => write!(f, "{} at '{}': {}", label, token.lexeme, self.message),
            None => write!(f, "{}: {}", label, self.message),
        }
    }
}

impl std::error::Error for LoxError {}

/// The first error wins; the rest are kept for reporting.
#[derive(Debug, Clone)]
pub struct ParseErrors {
    pub errors: Vec<LoxError>,
}

impl ParseErrors {
    pub fn first(&self) -> Option<&LoxError> {
        self.errors.first()
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        for error in &self.errors {
            error.report(source, filename);
        }
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}
