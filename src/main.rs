use clap::{Arg, ArgAction, Command};
use lox::error::ErrorKind;
use lox::runner::{self, Mode};
use std::fs;
use std::path::Path;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let matches = Command::new("lox")
        .about("Parse and evaluate Lox expressions")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("file")
                .help("The script file to run; one expression per ';'")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ast")
                .long("ast")
                .help("Print each expression's syntax tree instead of evaluating it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log to stderr (-v debug, -vv trace); RUST_LOG overrides")
                .action(ArgAction::Count),
        )
        .get_matches();

    init_tracing(matches.get_count("verbose"));

    let mode = if matches.get_flag("ast") {
        Mode::PrintAst
    } else {
        Mode::Evaluate
    };

    match matches.get_one::<String>("file") {
        Some(file_path) if !matches.get_flag("interactive") => run_file(file_path, mode),
        _ => lox::repl::start(mode),
    }
}

/// Install a subscriber when RUST_LOG is set or `-v` was given.
fn init_tracing(verbosity: u8) {
    let filter = match (std::env::var("RUST_LOG"), verbosity) {
        (Ok(_), _) => EnvFilter::from_default_env(),
        (Err(_), 0) => return,
        (Err(_), 1) => EnvFilter::new("lox=debug"),
        (Err(_), _) => EnvFilter::new("lox=trace"),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn run_file(path: &str, mode: Mode) {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        process::exit(66);
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(74);
        }
    };

    let filename = path.display().to_string();
    if let Err(kind) = runner::run(&source, Some(&filename), mode) {
        process::exit(match kind {
            ErrorKind::LexError | ErrorKind::ParseError => 65,
            ErrorKind::RuntimeError => 70,
        });
    }
}
