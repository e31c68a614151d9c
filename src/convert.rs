//! Conversion between the two chart formats.
//!
//! - [`fnf_to_sm`] places the timed notes of [`crate::fnf`] charts on the tick grid and writes
//!   quantized measures of a [`crate::sm::Simfile`].
//! - [`sm_to_fnf`] reads the measures of a simfile chart back into timed sections.
//!
//! Both directions own their [`crate::tempo::TempoMap`] for the duration of one call. Problems
//! which only lose some notes are reported as [`ConvertWarning`]s, while a chart whose tempo
//! cannot be resolved aborts with [`ConvertError`].

pub mod fnf_to_sm;
pub mod sm_to_fnf;

use thiserror::Error;

use crate::{
    grid::{Column, NoteCell},
    tempo::{TempoError, Tick},
};

pub use self::{
    fnf_to_sm::{FnfToSmOptions, FnfToSmOutput, fnf_to_sm},
    sm_to_fnf::{SmToFnfOptions, SmToFnfOutput, sm_to_fnf},
};

/// A fatal error on conversion. No output is produced.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The tempo declarations do not form a valid tempo map.
    #[error("malformed tempo map: {0}")]
    TempoMap(#[from] TempoError),
    /// There was no chart to convert.
    #[error("no chart was given")]
    NoInput,
    /// A section changes the tempo to a non-positive value.
    #[error("section {section} declares an invalid bpm {bpm}")]
    InvalidSectionBpm {
        /// Index of the section.
        section: usize,
        /// The declared value.
        bpm: f64,
    },
    /// A section changes the tempo without declaring it.
    #[error("section {section} changes the tempo but has no bpm")]
    MissingSectionBpm {
        /// Index of the section.
        section: usize,
    },
}

/// A problem on conversion. The offending note or chart is dropped.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConvertWarning {
    /// A note on a raw lane which belongs to neither side.
    #[error("section {section}: note at {time}ms has raw column {column} outside 0..8")]
    ColumnOutOfRange {
        /// Index of the section.
        section: usize,
        /// Time of the note in milliseconds.
        time: f64,
        /// The raw column.
        column: i64,
    },
    /// A note placed before the chart start.
    #[error("section {section}: note at {time}ms is before the chart start")]
    NoteBeforeStart {
        /// Index of the section.
        section: usize,
        /// Time of the note in milliseconds.
        time: f64,
    },
    /// A note on a cell which already has one. The later note is dropped.
    #[error("section {section}: note at {time}ms on {column} collides with `{cell}` at {tick}")]
    NoteCollision {
        /// Index of the section.
        section: usize,
        /// Time of the dropped note in milliseconds.
        time: f64,
        /// The lane.
        column: Column,
        /// Where the notes collide.
        tick: Tick,
        /// The note kept there.
        cell: NoteCell,
    },
    /// A hold whose tail lands on a note in its lane. It is placed as a tap note.
    #[error("section {section}: hold at {time}ms on {column} ends on `{cell}` at {tick}")]
    HoldTailCollision {
        /// Index of the section.
        section: usize,
        /// Time of the hold in milliseconds.
        time: f64,
        /// The lane.
        column: Column,
        /// Where the tail would be.
        tick: Tick,
        /// The note kept there.
        cell: NoteCell,
    },
    /// A hold tail without an open hold in its lane.
    #[error("measure {measure}, row {row}: hold end on {column} has no start")]
    UnmatchedHoldEnd {
        /// Index of the measure.
        measure: usize,
        /// Index of the row in the measure.
        row: usize,
        /// The lane.
        column: Column,
    },
    /// A hold whose tail never came. It is kept as a tap note.
    #[error("hold on {column} from {start} is never closed")]
    UnclosedHold {
        /// Where the hold starts.
        start: Tick,
        /// The lane.
        column: Column,
    },
    /// A chart other than the selected one.
    #[error("skipped chart `{steps_type}` of difficulty `{difficulty}`")]
    SkippedChart {
        /// Lane layout of the chart.
        steps_type: String,
        /// Difficulty label of the chart.
        difficulty: String,
    },
    /// No chart has the selected difficulty.
    #[error("no dance-single chart of difficulty `{difficulty}`")]
    NoChart {
        /// The selected difficulty.
        difficulty: String,
    },
}

/// Logs the warning and collects it.
fn report(warnings: &mut Vec<ConvertWarning>, warning: ConvertWarning) {
    log::warn!("{warning}");
    warnings.push(warning);
}
