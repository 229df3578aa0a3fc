// Lox expression front end
//
// Scans source text into tokens, parses them into expression trees with a
// precedence-climbing recursive-descent parser, and evaluates those trees
// over a small dynamically typed value model.

// Public modules
pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod reader;
pub mod repl;
pub mod runner;
pub mod value;

// Re-export commonly used items
pub use ast::{Expr, Stmt};
pub use error::{ErrorKind, LoxError, ParseErrors, Span};
pub use evaluator::{evaluate, Evaluator};
pub use lexer::{scan, Lexer, Token, TokenType};
pub use parser::{parse, Parser};
pub use printer::AstPrinter;
pub use reader::read;
pub use runner::Mode;
pub use value::Value;

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;
