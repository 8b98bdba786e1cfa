// Trica: interpreter, C back end and time-travel viewer

use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use trica::config::Config;
use trica::driver::{self, RunOptions};
use trica::ui::App;
use trica::TricaError;

#[derive(Parser, Debug)]
#[command(name = "trica", version, about = "Trica language compiler and time-travel viewer")]
struct Cli {
    /// Configuration file (defaults to ./trica.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Largest single runtime string in bytes
    #[arg(long, global = true)]
    max_string_bytes: Option<usize>,

    /// Memory budget for recorded history in bytes
    #[arg(long, global = true)]
    snapshot_limit: Option<usize>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Interpret a program, writing its output to stdout
    Run { file: PathBuf },
    /// Translate a program to C
    Build {
        file: PathBuf,
        /// Output path (defaults to the input with a .c extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse and type check a program without running it
    Check { file: PathBuf },
    /// Run a program, then browse its history in the terminal UI
    Debug { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TricaError> {
    let config = Config::discover(cli.config.as_deref(), Path::new("."))?;

    if !matches!(cli.cmd, Cmd::Debug { .. }) {
        init_tracing(cli.verbose, &config);
    }

    let mut options = RunOptions::from(&config);
    if let Some(bytes) = cli.max_string_bytes {
        options.max_string_bytes = bytes;
    }
    if let Some(limit) = cli.snapshot_limit {
        options.snapshot_limit = limit;
    }

    match cli.cmd {
        Cmd::Run { file } => cmd_run(
            &file,
            RunOptions {
                record_history: false,
                ..options
            },
        ),
        Cmd::Build { file, output } => cmd_build(&file, output),
        Cmd::Check { file } => cmd_check(&file),
        Cmd::Debug { file } => cmd_debug(&file, options),
    }
}

/// `TRICA_LOG` wins, then `-v`, then the config file's filter
fn init_tracing(verbose: u8, config: &Config) {
    let env_filter = EnvFilter::try_from_env("TRICA_LOG").unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new(&config.log.filter),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn cmd_run(file: &Path, options: RunOptions) -> Result<(), TricaError> {
    let source = driver::read_source(file)?;
    let input = Box::new(BufReader::new(io::stdin()));
    driver::run_source(&source, io::stdout().lock(), input, options)?;
    Ok(())
}

fn cmd_build(file: &Path, output: Option<PathBuf>) -> Result<(), TricaError> {
    let source = driver::read_source(file)?;
    let c_source = driver::emit_c(&source)?;

    let output = output.unwrap_or_else(|| file.with_extension("c"));
    std::fs::write(&output, c_source).map_err(|e| TricaError::io(&output, e))?;
    tracing::info!(path = %output.display(), "wrote C source");
    Ok(())
}

fn cmd_check(file: &Path) -> Result<(), TricaError> {
    let source = driver::read_source(file)?;
    let checked = driver::check_source(&source)?;
    println!(
        "{}: ok ({} statements, {} variables)",
        file.display(),
        checked.program.statements.len(),
        checked.variables().len()
    );
    Ok(())
}

fn cmd_debug(file: &Path, options: RunOptions) -> Result<(), TricaError> {
    let source = driver::read_source(file)?;
    let input = Box::new(BufReader::new(io::stdin()));
    let mut interpreter = driver::prepare(&source, io::stdout(), input, options)?;

    // Record the whole history up front; a runtime error keeps what ran so far
    let outcome = interpreter.run();
    if let Err(rewind_error) = interpreter.rewind_to_start() {
        // Nothing was recorded, so there is no history to browse
        return Err(match outcome {
            Err(run_error) => run_error.into(),
            Ok(()) => rewind_error.into(),
        });
    }
    let error_message = outcome.err().map(|e| e.to_string());

    let tty = |e: io::Error| TricaError::io("terminal", e);

    enable_raw_mode().map_err(tty)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(tty)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(tty)?;

    let mut app = App::new(interpreter, source, error_message);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode().map_err(tty)?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(tty)?;
    terminal.show_cursor().map_err(tty)?;

    res.map_err(tty)
}
