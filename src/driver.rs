//! Pipeline helpers shared by the command line and the tests
//!
//! ```text
//! parse_source ─► check_source ─┬─► prepare / run_source ─► Interpreter
//!                               └─► emit_c ─► C text
//! ```

use crate::checker::{CheckedProgram, TypeChecker};
use crate::codegen::CEmitter;
use crate::config::Config;
use crate::error::TricaError;
use crate::interpreter::Interpreter;
use crate::parser::ast::Program;
use crate::parser::Parser;
use crate::runtime::Runtime;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Instant;

/// Limits applied to an interpreter run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub max_string_bytes: usize,
    pub snapshot_limit: usize,
    /// Keep snapshots for stepping through the run afterwards
    pub record_history: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions::from(&Config::default())
    }
}

impl From<&Config> for RunOptions {
    fn from(config: &Config) -> Self {
        RunOptions {
            max_string_bytes: config.runtime.max_string_bytes,
            snapshot_limit: config.history.snapshot_limit,
            record_history: true,
        }
    }
}

pub fn read_source(path: &Path) -> Result<String, TricaError> {
    std::fs::read_to_string(path).map_err(|source| TricaError::io(path, source))
}

pub fn parse_source(source: &str) -> Result<Program, TricaError> {
    let mut parser = Parser::new(source)?;
    Ok(parser.parse_program()?)
}

pub fn check_source(source: &str) -> Result<CheckedProgram, TricaError> {
    let program = parse_source(source)?;
    Ok(TypeChecker::new().check(program)?)
}

/// Build an interpreter for `source` without running it
pub fn prepare<W: Write>(
    source: &str,
    writer: W,
    input: Box<dyn BufRead>,
    options: RunOptions,
) -> Result<Interpreter<W>, TricaError> {
    let checked = check_source(source)?;
    let runtime = Runtime::new(writer)
        .with_max_string_bytes(options.max_string_bytes)
        .with_input(input);
    Ok(Interpreter::new(checked, runtime, options.snapshot_limit).with_history(options.record_history))
}

/// Parse, check and execute `source`, returning the finished interpreter
pub fn run_source<W: Write>(
    source: &str,
    writer: W,
    input: Box<dyn BufRead>,
    options: RunOptions,
) -> Result<Interpreter<W>, TricaError> {
    let mut interpreter = prepare(source, writer, input, options)?;

    let start = Instant::now();
    interpreter.run()?;
    tracing::info!(
        elapsed_ns = start.elapsed().as_nanos() as u64,
        statements = interpreter.statements_executed(),
        "execution complete"
    );

    Ok(interpreter)
}

/// Translate `source` to C
pub fn emit_c(source: &str) -> Result<String, TricaError> {
    let checked = check_source(source)?;
    Ok(CEmitter::emit(&checked)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_run_source() {
        let interp = run_source(
            "Print \"a\"\nPrint \"b\"\n",
            Vec::new(),
            Box::new(io::empty()),
            RunOptions::default(),
        )
        .unwrap();

        assert_eq!(interp.last_output(), "b");
        assert_eq!(interp.into_writer(), b"ab");
    }

    #[test]
    fn test_stage_errors() {
        assert!(matches!(parse_source("Print"), Err(TricaError::Parse(_))));
        assert!(matches!(check_source("Print x"), Err(TricaError::Type(_))));
        assert!(matches!(
            run_source("Print 1 / 0", Vec::new(), Box::new(io::empty()), RunOptions::default()),
            Err(TricaError::Runtime(_))
        ));
        assert!(matches!(
            read_source(Path::new("/definitely/not/here.trica")),
            Err(TricaError::Io { .. })
        ));
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.runtime.max_string_bytes = 7;
        let options = RunOptions::from(&config);

        assert_eq!(options.max_string_bytes, 7);
        assert_eq!(options.snapshot_limit, config.history.snapshot_limit);
        assert!(options.record_history);
    }
}
