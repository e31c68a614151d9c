//! Prelude module for the crate.
//!
//! You can use `use fnf_sm::prelude::*;` to import the commonly used types at once.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_sm_warnings};

pub use crate::{
    convert::{
        ConvertError, ConvertWarning, FnfToSmOptions, FnfToSmOutput, SmToFnfOptions,
        SmToFnfOutput, fnf_to_sm, sm_to_fnf,
    },
    fnf::{
        Difficulty, DifficultyChart, FnfChart, FnfParseError, Section, SectionNote, Side, Song,
        parse_fnf, sibling_difficulty_paths,
    },
    grid::{Column, HoldPlacementError, NoteCell, NoteGrid, Occupied, Row},
    sm::{
        BpmChange, Measure, NoteChart, SmParseOutput, SmWarning, SmWarningWithRange, Simfile,
        parse_sm,
    },
    tempo::{Bpm, TempoError, TempoMap, TempoMapBuilder, TempoMarker, Tick},
};
