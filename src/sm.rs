//! The StepMania simfile format (`.sm`), a text file keyed by measure rows.
//!
//! A simfile is a sequence of `#TAG:value;` entries. The tempo is declared by `#BPMS` as
//! `beat=bpm` pairs and every chart is a `#NOTES` entry with six colon-separated fields:
//!
//! ```text
//! #NOTES:
//!     dance-single:
//!     :
//!     Challenge:
//!     10:
//!     :
//! 1000
//! 0100
//! ,
//! 0010
//! 0001
//! ;
//! ```
//!
//! Measures are separated by `,` and split evenly into their rows, so the row count decides the
//! note resolution of each measure.
//!
//! Reading is done in two phases: [`lex`] splits the source into tags with their source ranges,
//! then [`parse`] builds a [`Simfile`] from them. Both phases report problems as
//! [`SmWarningWithRange`] and keep going.

pub mod lex;
pub mod parse;
pub mod unparse;

use thiserror::Error;

use crate::{grid::Row, tempo::Bpm};

pub use self::parse::parse_sm;

/// Steps type of the only supported lane layout.
pub const DANCE_SINGLE: &str = "dance-single";

/// A simfile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Simfile {
    /// `#TITLE`.
    pub title: String,
    /// `#MUSIC`, the audio file name.
    pub music: Option<String>,
    /// `#OFFSET` in seconds.
    pub offset: f64,
    /// `#BPMS`, tempo changes in order of beats.
    pub bpms: Vec<BpmChange>,
    /// `#NOTES` of the supported layout, in order of appearance.
    pub charts: Vec<NoteChart>,
}

/// An entry of `#BPMS`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmChange {
    /// Position in beats, quarter notes.
    pub beat: f64,
    /// The tempo from here.
    pub bpm: Bpm,
}

/// A `#NOTES` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteChart {
    /// Lane layout, such as `dance-single`.
    pub steps_type: String,
    /// Free text, usually the chart author.
    pub description: String,
    /// Difficulty label, such as `Challenge`.
    pub difficulty: String,
    /// Numeric rating.
    pub meter: u32,
    /// Groove radar values, kept verbatim.
    pub radar: String,
    /// Note data.
    pub measures: Vec<Measure>,
}

/// Rows of one measure, spaced evenly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measure {
    /// The rows.
    pub rows: Vec<Row>,
}

/// A problem found on reading a simfile. The offending part is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum SmWarning {
    /// Text outside of any tag.
    #[error("expected `#` to start a tag, found `{0}`")]
    StrayText(String),
    /// A tag without `:` after its name.
    #[error("expected `:` after tag name `{0}`")]
    ExpectedColon(String),
    /// A tag value ended by a new tag or the end of file instead of `;`.
    #[error("tag `{0}` is not terminated by `;`")]
    MissingSemicolon(String),
    /// A number tag has a malformed value.
    #[error("invalid number `{value}` for `{tag}`")]
    InvalidNumber {
        /// Name of the tag.
        tag: String,
        /// The malformed value.
        value: String,
    },
    /// An entry of `#BPMS` is not `beat=bpm` with a positive tempo.
    #[error("invalid bpm entry `{0}`")]
    InvalidBpmEntry(String),
    /// A `#NOTES` entry has less than six fields.
    #[error("notes entry has {0} fields, expected 6")]
    MalformedNotes(usize),
    /// A `#NOTES` entry for a lane layout other than `dance-single`.
    #[error("unsupported steps type `{0}`")]
    UnsupportedStepsType(String),
    /// A note row which is not four cells of `01234M`.
    #[error("invalid note row `{0}`")]
    InvalidRow(String),
}

/// A value with the byte range of the source text it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WithRange<T> {
    /// The value.
    pub content: T,
    /// Byte range in the source, end exclusive.
    pub range: std::ops::Range<usize>,
}

impl<T> WithRange<T> {
    /// Attaches the range to the value.
    pub const fn new(content: T, range: std::ops::Range<usize>) -> Self {
        Self { content, range }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for WithRange<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at indices [{}, {})",
            self.content, self.range.start, self.range.end
        )
    }
}

impl<T: std::error::Error + 'static> std::error::Error for WithRange<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.content)
    }
}

/// A [`SmWarning`] with its source range.
pub type SmWarningWithRange = WithRange<SmWarning>;

/// Output of [`parse_sm`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct SmParseOutput {
    /// The simfile.
    pub simfile: Simfile,
    /// Warnings that occurred during reading.
    pub warnings: Vec<SmWarningWithRange>,
}
