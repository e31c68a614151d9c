//! Tempo map and the tick coordinate space.
//!
//! Both chart formats place notes on the same musical grid, but only one of them knows the
//! wall-clock time of a note. The [`TempoMap`] is the bridge: it converts an absolute time in
//! milliseconds into a [`Tick`] and back.
//!
//! # Tick coordinates
//!
//! - One measure (4/4) is [`MEASURE_TICKS`] = 192 ticks,
//! - one beat (quarter note) is [`BEAT_TICKS`] = 48 ticks,
//! - one step (sixteenth note) is [`STEP_TICKS`] = 12 ticks.
//!
//! At `bpm` beats per minute one tick lasts `240000 / (192 * bpm)` milliseconds.

pub mod bpm;

use log::debug;
use thiserror::Error;

pub use self::bpm::Bpm;

/// Ticks in one measure.
pub const MEASURE_TICKS: u64 = 192;
/// Ticks in one beat, a quarter note.
pub const BEAT_TICKS: u64 = 48;
/// Ticks in one step, a sixteenth note.
pub const STEP_TICKS: u64 = 12;

/// Milliseconds of one measure multiplied by bpm.
const MEASURE_MS_BPM: f64 = 240_000.0;
const ORIGIN_EPSILON_MS: f64 = 1e-9;

/// Position on the chart in ticks, independent of the tempo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tick(pub u64);

impl Tick {
    /// Index of the measure containing this tick.
    #[must_use]
    pub const fn measure(self) -> u64 {
        self.0 / MEASURE_TICKS
    }

    /// Offset of this tick from the start of its measure.
    #[must_use]
    pub const fn offset_in_measure(self) -> u64 {
        self.0 % MEASURE_TICKS
    }

    /// The first tick of the measure `measure`.
    #[must_use]
    pub const fn measure_start(measure: u64) -> Self {
        Self(measure * MEASURE_TICKS)
    }

    /// Position in beats.
    #[must_use]
    pub fn as_beats(self) -> f64 {
        self.0 as f64 / BEAT_TICKS as f64
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tick {}", self.0)
    }
}

/// A tempo which is constant from `tick` (and `time`) until the next marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoMarker {
    /// The tempo.
    pub bpm: Bpm,
    /// Where the tempo starts, in ticks.
    pub tick: Tick,
    /// Where the tempo starts, in milliseconds.
    pub time: f64,
}

impl TempoMarker {
    fn ticks_at(&self, time: f64) -> f64 {
        self.tick.0 as f64
            + (time - self.time) * MEASURE_TICKS as f64 * self.bpm.as_f64() / MEASURE_MS_BPM
    }

    fn time_at(&self, tick: f64) -> f64 {
        self.time
            + (tick - self.tick.0 as f64) / MEASURE_TICKS as f64 * MEASURE_MS_BPM / self.bpm.as_f64()
    }
}

/// Violations of the tempo map invariants.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum TempoError {
    /// No tempo was declared at all.
    #[error("no tempo is defined")]
    Empty,
    /// The first tempo change must start the chart.
    #[error("the first tempo must start at tick 0, but found at {0}")]
    NotAtOrigin(Tick),
    /// The first tempo change must start the chart.
    #[error("the first tempo must start at 0ms, but found at {0}ms")]
    TimeNotAtOrigin(f64),
    /// A tempo change arrived before the last registered one.
    #[error("tempo change at {tick} comes before the previous one at {last}")]
    OutOfOrder {
        /// Tick of the incoming change.
        tick: Tick,
        /// Tick of the last registered marker.
        last: Tick,
    },
    /// A tempo change arrived before the last registered one.
    #[error("tempo change at {time}ms comes before the previous one at {last}ms")]
    OutOfOrderTime {
        /// Time of the incoming change.
        time: f64,
        /// Time of the last registered marker.
        last: f64,
    },
}

/// Index of the last marker satisfying `is_before`, falling back to the first one.
fn active_index(markers: &[TempoMarker], is_before: impl FnMut(&TempoMarker) -> bool) -> usize {
    markers.partition_point(is_before).saturating_sub(1)
}

/// Builder of [`TempoMap`], which registers tempo changes in order.
///
/// Every change is projected through the markers registered so far, so a change declared by
/// its tick gets its time from the tempo active before it, and vice versa.
#[derive(Debug, Clone, Default)]
pub struct TempoMapBuilder {
    markers: Vec<TempoMarker>,
}

impl TempoMapBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    /// Registers a tempo change at `tick`. Returns whether a marker was retained, a change to
    /// the tempo already active is coalesced.
    ///
    /// # Errors
    ///
    /// Returns [`TempoError::NotAtOrigin`] if the first change is not at tick 0, or
    /// [`TempoError::OutOfOrder`] if `tick` is before the last registered marker.
    pub fn push_at_tick(&mut self, tick: Tick, bpm: Bpm) -> Result<bool, TempoError> {
        let time = match self.markers.last() {
            None if tick != Tick(0) => return Err(TempoError::NotAtOrigin(tick)),
            None => 0.0,
            Some(last) if tick < last.tick => {
                return Err(TempoError::OutOfOrder {
                    tick,
                    last: last.tick,
                });
            }
            Some(_) => {
                let index = active_index(&self.markers, |marker| marker.tick <= tick);
                self.markers[index].time_at(tick.0 as f64)
            }
        };
        Ok(self.push(TempoMarker { bpm, tick, time }))
    }

    /// Registers a tempo change at `time` in milliseconds. Returns whether a marker was
    /// retained, a change to the tempo already active is coalesced.
    ///
    /// # Errors
    ///
    /// Returns [`TempoError::TimeNotAtOrigin`] if the first change is not at time 0, or
    /// [`TempoError::OutOfOrderTime`] if `time` is before the last registered marker.
    pub fn push_at_time(&mut self, time: f64, bpm: Bpm) -> Result<bool, TempoError> {
        let tick = match self.markers.last() {
            None if time.is_nan() || time.abs() > ORIGIN_EPSILON_MS => {
                return Err(TempoError::TimeNotAtOrigin(time));
            }
            None => Tick(0),
            Some(last) if time.is_nan() || time < last.time => {
                return Err(TempoError::OutOfOrderTime {
                    time,
                    last: last.time,
                });
            }
            Some(_) => {
                let index = active_index(&self.markers, |marker| marker.time <= time);
                Tick(self.markers[index].ticks_at(time).round() as u64)
            }
        };
        Ok(self.push(TempoMarker { bpm, tick, time }))
    }

    fn push(&mut self, marker: TempoMarker) -> bool {
        // the successor wins on coincident changes
        if self
            .markers
            .last()
            .is_some_and(|last| last.tick == marker.tick)
        {
            self.markers.pop();
        }
        if self
            .markers
            .last()
            .is_some_and(|last| last.bpm == marker.bpm)
        {
            return false;
        }
        debug!(
            "tempo marker: {} bpm from {} ({:.3}ms)",
            marker.bpm, marker.tick, marker.time
        );
        self.markers.push(marker);
        true
    }

    /// Finishes building.
    ///
    /// # Errors
    ///
    /// Returns [`TempoError::Empty`] if no tempo was registered.
    pub fn build(self) -> Result<TempoMap, TempoError> {
        if self.markers.is_empty() {
            return Err(TempoError::Empty);
        }
        Ok(TempoMap {
            markers: self.markers,
        })
    }
}

/// Ordered tempo markers of one chart, which has at least one marker at tick 0.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoMap {
    markers: Vec<TempoMarker>,
}

impl TempoMap {
    /// Builds a tempo map from tempo changes declared by ticks, in order.
    ///
    /// # Errors
    ///
    /// Returns [`TempoError`] if the changes are empty, not starting at tick 0 or out of order.
    pub fn from_changes(changes: impl IntoIterator<Item = (Tick, Bpm)>) -> Result<Self, TempoError> {
        let mut builder = TempoMapBuilder::new();
        for (tick, bpm) in changes {
            builder.push_at_tick(tick, bpm)?;
        }
        builder.build()
    }

    /// Markers in order of ticks and times.
    #[must_use]
    pub fn markers(&self) -> &[TempoMarker] {
        &self.markers
    }

    /// The tempo at the start of the chart.
    #[must_use]
    pub fn initial_bpm(&self) -> Bpm {
        self.markers[0].bpm
    }

    fn marker_at_time(&self, time: f64) -> &TempoMarker {
        &self.markers[active_index(&self.markers, |marker| marker.time <= time)]
    }

    fn marker_at_tick(&self, tick: f64) -> &TempoMarker {
        &self.markers[active_index(&self.markers, |marker| marker.tick.0 as f64 <= tick)]
    }

    /// Converts the time in milliseconds into the nearest tick. Returns `None` if the time is
    /// not finite or rounds before tick 0.
    #[must_use]
    pub fn time_to_tick(&self, time: f64) -> Option<Tick> {
        let ticks = self.marker_at_time(time).ticks_at(time).round();
        (ticks.is_finite() && ticks >= 0.0).then_some(Tick(ticks as u64))
    }

    /// Converts the tick into the time in milliseconds.
    #[must_use]
    pub fn tick_to_time(&self, tick: Tick) -> f64 {
        self.tick_to_time_f64(tick.0 as f64)
    }

    /// Converts the fractional tick position into the time in milliseconds. Rows of a measure
    /// whose row count does not divide [`MEASURE_TICKS`] are placed between ticks.
    #[must_use]
    pub fn tick_to_time_f64(&self, tick: f64) -> f64 {
        self.marker_at_tick(tick).time_at(tick)
    }

    /// The tempo active at the tick.
    #[must_use]
    pub fn tick_to_bpm(&self, tick: Tick) -> Bpm {
        self.marker_at_tick(tick.0 as f64).bpm
    }
}
