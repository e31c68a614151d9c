//! Timed FNF sections into a quantized simfile.

use log::debug;

use super::{ConvertError, ConvertWarning, report};
use crate::{
    fnf::{DifficultyChart, Side, Song},
    grid::{Column, HoldPlacementError, NoteGrid, Occupied},
    sm::{BpmChange, DANCE_SINGLE, Measure, NoteChart, Simfile},
    tempo::{Bpm, STEP_TICKS, TempoMap, TempoMapBuilder, Tick},
};

/// Number of raw lanes shared by both sides.
const RAW_COLUMNS: std::ops::Range<i64> = 0..8;

/// Options of [`fnf_to_sm`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FnfToSmOptions {
    /// Which side is converted into the lanes.
    pub side: Side,
}

/// Output of [`fnf_to_sm`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct FnfToSmOutput {
    /// The simfile with a chart for every non-empty difficulty.
    pub simfile: Simfile,
    /// Warnings that occurred during conversion.
    pub warnings: Vec<ConvertWarning>,
}

/// Converts the difficulties of one song into a simfile.
///
/// The tempo map, title and music file come from the first chart. Every chart with at least one
/// note of the selected side becomes a `dance-single` chart.
///
/// # Errors
///
/// Returns [`ConvertError::NoInput`] if `charts` is empty, or an error if the sections of the
/// first chart declare an invalid tempo.
pub fn fnf_to_sm(
    charts: &[DifficultyChart],
    options: FnfToSmOptions,
) -> Result<FnfToSmOutput, ConvertError> {
    let first = charts.first().ok_or(ConvertError::NoInput)?;
    let tempo_map = build_tempo_map(&first.song)?;
    let mut warnings = Vec::new();

    let charts = charts
        .iter()
        .filter_map(|chart| {
            let grid = encode_notes(&chart.song, &tempo_map, options.side, &mut warnings);
            if grid.is_empty() {
                debug!("{} has no notes for {}", chart.difficulty, options.side);
                return None;
            }
            debug!(
                "{}: {} measures for {}",
                chart.difficulty,
                grid.measure_count(),
                options.side
            );
            Some(NoteChart {
                steps_type: DANCE_SINGLE.into(),
                description: String::new(),
                difficulty: chart.difficulty.to_string(),
                meter: 1,
                radar: String::new(),
                measures: (0..grid.measure_count())
                    .map(|measure| Measure {
                        rows: grid.measure_rows(measure),
                    })
                    .collect(),
            })
        })
        .collect();

    let title = first.song.title.clone();
    let simfile = Simfile {
        music: Some(format!("{title}.ogg")),
        title,
        offset: 0.0,
        bpms: tempo_map
            .markers()
            .iter()
            .map(|marker| BpmChange {
                beat: marker.tick.as_beats(),
                bpm: marker.bpm,
            })
            .collect(),
        charts,
    };
    Ok(FnfToSmOutput { simfile, warnings })
}

/// Builds the tempo map from the sections. The first section starts at the song tempo unless
/// it changes the tempo itself, and a section without `changeBPM` keeps the current tempo.
///
/// # Errors
///
/// Returns an error if a section changing the tempo has no valid bpm.
pub fn build_tempo_map(song: &Song) -> Result<TempoMap, ConvertError> {
    let mut builder = TempoMapBuilder::new();
    builder.push_at_tick(Tick(0), song.bpm)?;
    let mut tick = 0;
    for (index, section) in song.notes.iter().enumerate() {
        if section.change_bpm {
            let bpm = section
                .bpm
                .ok_or(ConvertError::MissingSectionBpm { section: index })?;
            let bpm = Bpm::new(bpm).ok_or(ConvertError::InvalidSectionBpm {
                section: index,
                bpm,
            })?;
            builder.push_at_tick(Tick(tick), bpm)?;
        }
        tick += STEP_TICKS * u64::from(section.length_in_steps);
    }
    Ok(builder.build()?)
}

/// Places the notes of `side` onto a grid.
pub fn encode_notes(
    song: &Song,
    tempo_map: &TempoMap,
    side: Side,
    warnings: &mut Vec<ConvertWarning>,
) -> NoteGrid {
    let mut grid = NoteGrid::new();
    for (index, section) in song.notes.iter().enumerate() {
        for note in &section.section_notes {
            if !RAW_COLUMNS.contains(&note.column) {
                report(
                    warnings,
                    ConvertWarning::ColumnOutOfRange {
                        section: index,
                        time: note.time,
                        column: note.column,
                    },
                );
                continue;
            }
            if !side.owns(note.column, section.must_hit_section) {
                continue;
            }
            let Some(start) = tempo_map.time_to_tick(note.time) else {
                report(
                    warnings,
                    ConvertWarning::NoteBeforeStart {
                        section: index,
                        time: note.time,
                    },
                );
                continue;
            };
            let column = Column::fold(note.column);
            let placed = if note.is_hold() {
                let end = tempo_map
                    .time_to_tick(note.time + note.hold)
                    .unwrap_or(start);
                grid.set_hold(start, end, column)
            } else {
                grid.set_tap(start, column).map_err(HoldPlacementError::Head)
            };
            let warning = match placed {
                Ok(()) => continue,
                Err(HoldPlacementError::Head(Occupied { tick, column, cell })) => {
                    ConvertWarning::NoteCollision {
                        section: index,
                        time: note.time,
                        column,
                        tick,
                        cell,
                    }
                }
                Err(HoldPlacementError::Tail(Occupied { tick, column, cell })) => {
                    ConvertWarning::HoldTailCollision {
                        section: index,
                        time: note.time,
                        column,
                        tick,
                        cell,
                    }
                }
            };
            report(warnings, warning);
        }
    }
    grid
}
