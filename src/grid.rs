//! Sparse note grid in tick coordinates.
//!
//! A [`NoteGrid`] keeps only the ticks where something happens; every other tick reads as an
//! idle row. Columns are fixed to the four lanes of `dance-single`.

pub mod quantize;

use std::collections::BTreeMap;

use log::trace;

use crate::tempo::{MEASURE_TICKS, Tick};

use self::quantize::minimal_step;

/// Number of lanes.
pub const COLUMNS: usize = 4;

/// State of one lane on one row.
///
/// The variants are written as the digits and letters of the simfile note alphabet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NoteCell {
    /// No note, `0`.
    #[default]
    Empty,
    /// A tap note, `1`.
    Tap,
    /// The head of a hold note, `2`.
    HoldStart,
    /// The tail of a hold or roll note, `3`.
    HoldEnd,
    /// The head of a roll note, `4`. It pairs with [`NoteCell::HoldEnd`] like a hold.
    RollStart,
    /// A mine, `M`.
    Mine,
}

impl NoteCell {
    /// Parses a character of the note alphabet.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '0' => Self::Empty,
            '1' => Self::Tap,
            '2' => Self::HoldStart,
            '3' => Self::HoldEnd,
            '4' => Self::RollStart,
            'M' => Self::Mine,
            _ => return None,
        })
    }

    /// The character of the note alphabet.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Empty => '0',
            Self::Tap => '1',
            Self::HoldStart => '2',
            Self::HoldEnd => '3',
            Self::RollStart => '4',
            Self::Mine => 'M',
        }
    }

    /// Whether this cell opens a sustained note.
    #[must_use]
    pub const fn is_hold_start(self) -> bool {
        matches!(self, Self::HoldStart | Self::RollStart)
    }
}

impl std::fmt::Display for NoteCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;
        f.write_char(self.as_char())
    }
}

/// One lane, in `0..4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Column(u8);

impl Column {
    /// Creates a column if `index` is a lane.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        (index < COLUMNS).then_some(Self(index as u8))
    }

    /// Folds a raw lane number of either side into a lane.
    #[must_use]
    pub const fn fold(raw: i64) -> Self {
        Self(raw.rem_euclid(COLUMNS as i64) as u8)
    }

    /// Index of the lane.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// All the lanes from left to right.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..COLUMNS as u8).map(Self)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "column {}", self.0)
    }
}

/// Cells of all lanes on one row.
pub type Row = [NoteCell; COLUMNS];

/// A row without notes.
pub const IDLE_ROW: Row = [NoteCell::Empty; COLUMNS];

/// A cell which already had a note when placing another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupied {
    /// Where the note was to be placed.
    pub tick: Tick,
    /// The lane.
    pub column: Column,
    /// The note already there.
    pub cell: NoteCell,
}

/// Why [`NoteGrid::set_hold`] could not place a hold as asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldPlacementError {
    /// The head collides, so nothing was placed.
    Head(Occupied),
    /// The tail collides, so the hold was placed as a tap note.
    Tail(Occupied),
}

/// Sparse mapping from tick to the row there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteGrid {
    rows: BTreeMap<Tick, Row>,
}

impl NoteGrid {
    /// Creates an empty grid.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// The cell of `column` at `tick`.
    #[must_use]
    pub fn cell(&self, tick: Tick, column: Column) -> NoteCell {
        self.row(tick)[column.index()]
    }

    fn occupied(&self, tick: Tick, column: Column) -> Result<(), Occupied> {
        match self.cell(tick, column) {
            NoteCell::Empty => Ok(()),
            cell => Err(Occupied { tick, column, cell }),
        }
    }

    fn set(&mut self, tick: Tick, column: Column, cell: NoteCell) -> Result<(), Occupied> {
        self.occupied(tick, column)?;
        self.rows.entry(tick).or_insert(IDLE_ROW)[column.index()] = cell;
        Ok(())
    }

    /// Places a tap note.
    ///
    /// # Errors
    ///
    /// Returns [`Occupied`] and leaves the grid untouched if the cell already has a note.
    pub fn set_tap(&mut self, tick: Tick, column: Column) -> Result<(), Occupied> {
        self.set(tick, column, NoteCell::Tap)
    }

    /// Places the head of a hold note.
    ///
    /// # Errors
    ///
    /// Returns [`Occupied`] and leaves the grid untouched if the cell already has a note.
    pub fn set_hold_start(&mut self, tick: Tick, column: Column) -> Result<(), Occupied> {
        self.set(tick, column, NoteCell::HoldStart)
    }

    /// Places the tail of a hold note.
    ///
    /// # Errors
    ///
    /// Returns [`Occupied`] and leaves the grid untouched if the cell already has a note.
    pub fn set_hold_end(&mut self, tick: Tick, column: Column) -> Result<(), Occupied> {
        self.set(tick, column, NoteCell::HoldEnd)
    }

    /// Places both ends of a hold note. A hold which does not end after its start degrades into
    /// a tap note, since the tail would overwrite the head.
    ///
    /// # Errors
    ///
    /// Returns [`HoldPlacementError::Head`] and places nothing if the head cell is taken. If only
    /// the tail cell is taken, the hold is placed as a tap note on its head and
    /// [`HoldPlacementError::Tail`] is returned.
    pub fn set_hold(
        &mut self,
        start: Tick,
        end: Tick,
        column: Column,
    ) -> Result<(), HoldPlacementError> {
        if end <= start {
            return self.set_tap(start, column).map_err(HoldPlacementError::Head);
        }
        self.occupied(start, column).map_err(HoldPlacementError::Head)?;
        if let Err(tail) = self.occupied(end, column) {
            self.set(start, column, NoteCell::Tap).map_err(HoldPlacementError::Head)?;
            return Err(HoldPlacementError::Tail(tail));
        }
        self.set(start, column, NoteCell::HoldStart).map_err(HoldPlacementError::Head)?;
        self.set(end, column, NoteCell::HoldEnd).map_err(HoldPlacementError::Tail)
    }

    /// The row at `tick`, idle if nothing was placed there.
    #[must_use]
    pub fn row(&self, tick: Tick) -> Row {
        self.rows.get(&tick).copied().unwrap_or(IDLE_ROW)
    }

    /// Whether no note was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The last tick where a note was placed.
    #[must_use]
    pub fn last_occupied_tick(&self) -> Option<Tick> {
        self.rows.last_key_value().map(|(&tick, _)| tick)
    }

    /// Number of measures to cover every note, rounded up to a whole measure.
    #[must_use]
    pub fn measure_count(&self) -> u64 {
        self.last_occupied_tick().map_or(0, |tick| tick.measure() + 1)
    }

    /// Offsets from the measure start of the occupied ticks in the measure.
    pub fn occupied_offsets(&self, measure: u64) -> impl Iterator<Item = u64> + '_ {
        let start = Tick::measure_start(measure);
        let end = Tick::measure_start(measure + 1);
        self.rows.range(start..end).map(|(tick, _)| tick.offset_in_measure())
    }

    /// Rows of the measure at the minimal resolution which keeps every note.
    #[must_use]
    pub fn measure_rows(&self, measure: u64) -> Vec<Row> {
        let start = Tick::measure_start(measure).0;
        let step = minimal_step(self.occupied_offsets(measure), MEASURE_TICKS);
        trace!("measure {measure}: {} rows", MEASURE_TICKS / step);
        (0..MEASURE_TICKS)
            .step_by(step as usize)
            .map(|offset| self.row(Tick(start + offset)))
            .collect()
    }
}
