// Snapshot management for reverse execution

use crate::memory::Environment;
use crate::parser::ast::SourceLocation;
use crate::runtime::LastOutput;

/// What produced an output segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// A `Print` statement
    Print,
    /// The prompt written before reading input
    Prompt,
}

/// One write to standard output
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSegment {
    pub text: String,
    pub kind: SegmentKind,
    pub location: SourceLocation,
}

/// Everything written to standard output, segment by segment.
///
/// Segments are only ever appended while a program runs. History replay
/// narrows the view to a prefix with [`show_prefix`](Self::show_prefix), so a
/// snapshot needs to remember a segment count rather than a copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    segments: Vec<OutputSegment>,
    visible: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment after the visible prefix, dropping anything hidden
    pub fn push(&mut self, text: String, kind: SegmentKind, location: SourceLocation) {
        self.segments.truncate(self.visible);
        self.segments.push(OutputSegment {
            text,
            kind,
            location,
        });
        self.visible = self.segments.len();
    }

    /// Show only the first `len` recorded segments
    pub fn show_prefix(&mut self, len: usize) {
        self.visible = len.min(self.segments.len());
    }

    /// Segments written up to the current point in history
    pub fn segments(&self) -> &[OutputSegment] {
        &self.segments[..self.visible]
    }

    /// Printed segments only
    pub fn prints(&self) -> impl Iterator<Item = &OutputSegment> {
        self.segments()
            .iter()
            .filter(|s| s.kind == SegmentKind::Print)
    }

    /// The exact bytes standard output received
    pub fn text(&self) -> String {
        self.segments().iter().map(|s| s.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.visible
    }

    pub fn is_empty(&self) -> bool {
        self.visible == 0
    }
}

/// Snapshot of execution state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub environment: Environment,
    /// Transcript segments written when the snapshot was taken
    pub transcript_len: usize,
    pub last_output: LastOutput,
    /// Number of statements executed when the snapshot was taken
    pub statement_index: usize,
    pub source_location: SourceLocation,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        std::mem::size_of::<Snapshot>()
            + self.environment.estimated_size()
            + self.last_output.len()
    }
}

/// Manages execution history for reverse execution
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history; fails when the memory budget would be exceeded
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), usize> {
        let snapshot_size = snapshot.estimated_size();
        let total = self.current_memory.saturating_add(snapshot_size);

        if total > self.max_memory {
            return Err(total);
        }

        self.current_memory = total;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}
