// Execution engine for the Trica interpreter

use crate::checker::CheckedProgram;
use crate::interpreter::errors::RuntimeError;
use crate::memory::Environment;
use crate::parser::ast::*;
use crate::runtime::Runtime;
use crate::snapshot::{SegmentKind, Snapshot, SnapshotManager, Transcript};
use std::io::Write;

/// The main interpreter that executes a Trica program
pub struct Interpreter<W: Write> {
    /// Checked program (statements plus the import table)
    pub(crate) program: CheckedProgram,

    /// Print/concat runtime that owns the output sink and the last output cache
    pub(crate) runtime: Runtime<W>,

    /// Program variables
    pub(crate) environment: Environment,

    /// Everything written to standard output so far (recorded with history only)
    pub(crate) transcript: Transcript,

    /// Whether snapshots and the transcript are kept
    record_history: bool,

    /// Current source location being executed
    pub(crate) current_location: SourceLocation,

    /// Snapshot manager for reverse execution
    snapshot_manager: SnapshotManager,

    /// Index of the snapshot currently shown
    history_position: usize,

    /// Statements completed at the current point in history
    statements_executed: usize,

    /// Whether execution has finished
    finished: bool,
}

impl<W: Write> Interpreter<W> {
    /// Create a new interpreter for a checked program
    pub fn new(program: CheckedProgram, runtime: Runtime<W>, snapshot_memory_limit: usize) -> Self {
        let current_location = program
            .program
            .main_location
            .unwrap_or(SourceLocation::new(1, 1));

        Interpreter {
            program,
            runtime,
            environment: Environment::new(),
            transcript: Transcript::new(),
            record_history: true,
            current_location,
            snapshot_manager: SnapshotManager::new(snapshot_memory_limit),
            history_position: 0,
            statements_executed: 0,
            finished: false,
        }
    }

    /// Turn history recording on or off (on by default).
    ///
    /// Without history the interpreter keeps no snapshots and no transcript,
    /// so memory use does not grow with the amount of output.
    pub fn with_history(mut self, record_history: bool) -> Self {
        self.record_history = record_history;
        self
    }

    /// Run the program from start to finish
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        // Take initial snapshot
        self.take_snapshot()?;

        let statements = self.program.program.statements.clone();
        for stmt in &statements {
            self.current_location = stmt.location();
            tracing::trace!(line = self.current_location.line, "executing statement");

            self.execute_statement(stmt)?;
            self.statements_executed += 1;
            self.take_snapshot()?;
        }

        self.runtime
            .flush()
            .map_err(|source| RuntimeError::Primitive {
                source,
                location: self.current_location,
            })?;
        self.finished = true;
        Ok(())
    }

    /// Take a snapshot of the current execution state
    fn take_snapshot(&mut self) -> Result<(), RuntimeError> {
        if !self.record_history {
            return Ok(());
        }

        let snapshot = Snapshot {
            environment: self.environment.clone(),
            transcript_len: self.transcript.len(),
            last_output: self.runtime.last_output_state().clone(),
            statement_index: self.statements_executed,
            source_location: self.current_location,
        };

        self.snapshot_manager
            .push(snapshot)
            .map_err(|current| RuntimeError::SnapshotLimitExceeded {
                current,
                limit: self.snapshot_manager.memory_limit(),
            })?;

        self.history_position = self.snapshot_manager.len() - 1;
        Ok(())
    }

    /// Restore execution state from a snapshot
    fn restore_snapshot(&mut self, index: usize) -> Result<(), RuntimeError> {
        let snapshot = self
            .snapshot_manager
            .get(index)
            .cloned()
            .ok_or_else(|| RuntimeError::HistoryOperationFailed {
                message: format!("Snapshot {} not found in history", index),
                location: self.current_location,
            })?;

        self.environment = snapshot.environment;
        self.transcript.show_prefix(snapshot.transcript_len);
        self.runtime.restore_last_output(snapshot.last_output);
        self.current_location = snapshot.source_location;
        self.statements_executed = snapshot.statement_index;
        self.history_position = index;
        Ok(())
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "Already at the beginning of execution".to_string(),
                location: self.current_location,
            });
        }

        self.restore_snapshot(self.history_position - 1)
    }

    /// Step forward in execution (replay the next recorded snapshot)
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.snapshot_manager.len() {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "No more snapshots available (execution finished)".to_string(),
                location: self.current_location,
            });
        }

        self.restore_snapshot(self.history_position + 1)
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        if self.snapshot_manager.is_empty() {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "No snapshots available".to_string(),
                location: self.current_location,
            });
        }

        self.restore_snapshot(0)
    }

    /// Jump to the last recorded snapshot
    pub fn jump_to_end(&mut self) -> Result<(), RuntimeError> {
        match self.snapshot_manager.len() {
            0 => Err(RuntimeError::HistoryOperationFailed {
                message: "No snapshots available".to_string(),
                location: self.current_location,
            }),
            len => self.restore_snapshot(len - 1),
        }
    }

    /// Append to the transcript when history is being recorded
    pub(crate) fn record_output(&mut self, text: String, kind: SegmentKind, location: SourceLocation) {
        if self.record_history {
            self.transcript.push(text, kind, location);
        }
    }

    // ========== Getter methods for UI ==========

    /// Get the current source location
    pub fn current_location(&self) -> SourceLocation {
        self.current_location
    }

    /// Get the variables at the current point in history
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Get the output written up to the current point in history
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Get the last output cache (`Print.output`)
    pub fn last_output(&self) -> &str {
        self.runtime.last_output()
    }

    pub fn runtime(&self) -> &Runtime<W> {
        &self.runtime
    }

    pub fn program(&self) -> &CheckedProgram {
        &self.program
    }

    /// Get the current history position
    pub fn history_position(&self) -> usize {
        self.history_position
    }

    /// Get the total number of snapshots
    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }

    /// Number of statements completed at the current point in history
    pub fn statements_executed(&self) -> usize {
        self.statements_executed
    }

    /// Get snapshot memory usage and limit in bytes
    pub fn history_memory(&self) -> (usize, usize) {
        (
            self.snapshot_manager.memory_usage(),
            self.snapshot_manager.memory_limit(),
        )
    }

    /// Check if execution has finished
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume the interpreter, returning its output sink
    pub fn into_writer(self) -> W {
        self.runtime.into_writer()
    }
}
