//! Converter between Friday Night Funkin' charts and StepMania simfiles.
//!
//! The two formats describe the same kind of four lane chart with different notions of time:
//!
//! - [`fnf`] charts place every note by its time in milliseconds and split the song into
//!   sections carrying their own tempo,
//! - [`sm`] simfiles place notes on rows evenly dividing each measure, with a tempo map in beats.
//!
//! Conversion goes through the tick space of [`tempo`], 192 ticks per measure. A
//! [`tempo::TempoMap`] maps times onto ticks and back, a [`grid::NoteGrid`] collects notes by
//! tick, and [`convert`] drives both directions.
//!
//! ```
//! use fnf_sm::prelude::*;
//!
//! let source = r#"{"song": {"song": "Test", "bpm": 100, "notes": [
//!     {"lengthInSteps": 16, "mustHitSection": true, "sectionNotes": [[0, 0, 0]]}
//! ]}}"#;
//! let chart = parse_fnf(source).unwrap();
//! let output = fnf_to_sm(
//!     &[DifficultyChart { difficulty: Difficulty::Medium, song: chart.song }],
//!     FnfToSmOptions::default(),
//! )
//! .unwrap();
//! assert!(output.simfile.unparse().contains("#BPMS:0.000=100.000;"));
//! ```
//!
//! # Features
//!
//! - `diagnostics` renders simfile warnings with `ariadne`.
//! - `cli` builds the `fnf-sm` binary.

pub mod convert;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod fnf;
pub mod grid;
pub mod prelude;
pub mod sm;
pub mod tempo;
