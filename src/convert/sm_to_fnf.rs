//! Quantized simfile measures into timed FNF sections.

use std::collections::BTreeMap;

use log::debug;

use super::{ConvertError, ConvertWarning, report};
use crate::{
    fnf::{
        FnfChart, Section, SectionNote, Song, default_player1, default_player2, default_speed,
    },
    grid::{Column, NoteCell},
    sm::{BpmChange, DANCE_SINGLE, NoteChart, Simfile},
    tempo::{BEAT_TICKS, MEASURE_TICKS, TempoMap, TempoMapBuilder, Tick},
};

/// Steps of every written section, one measure.
const SECTION_STEPS: u32 = 16;
/// Title used when the simfile has none.
const FALLBACK_TITLE: &str = "Simfile";

/// Options of [`sm_to_fnf`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmToFnfOptions {
    /// Difficulty label of the chart to convert, compared ignoring ASCII case.
    pub difficulty: String,
}

impl Default for SmToFnfOptions {
    fn default() -> Self {
        Self {
            difficulty: "Challenge".into(),
        }
    }
}

/// Output of [`sm_to_fnf`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct SmToFnfOutput {
    /// The chart.
    pub chart: FnfChart,
    /// Warnings that occurred during conversion.
    pub warnings: Vec<ConvertWarning>,
}

/// Converts the chart of the selected difficulty into an FNF chart.
///
/// Every measure becomes a section of 16 steps in focus of the player. Times are shifted by
/// `#OFFSET`.
///
/// # Errors
///
/// Returns [`ConvertError::TempoMap`] if `#BPMS` is empty or out of order.
pub fn sm_to_fnf(
    simfile: &Simfile,
    options: &SmToFnfOptions,
) -> Result<SmToFnfOutput, ConvertError> {
    let tempo_map = build_tempo_map(&simfile.bpms)?;
    let mut warnings = Vec::new();

    let mut selected = None;
    for chart in &simfile.charts {
        let matches = chart.steps_type.eq_ignore_ascii_case(DANCE_SINGLE)
            && chart.difficulty.eq_ignore_ascii_case(&options.difficulty);
        if matches && selected.is_none() {
            selected = Some(chart);
        } else {
            report(
                &mut warnings,
                ConvertWarning::SkippedChart {
                    steps_type: chart.steps_type.clone(),
                    difficulty: chart.difficulty.clone(),
                },
            );
        }
    }

    let sections = match selected {
        Some(chart) => {
            debug!(
                "converting {} chart with {} measures",
                chart.difficulty,
                chart.measures.len()
            );
            decode_chart(chart, &tempo_map, simfile.offset * 1000.0, &mut warnings)
        }
        None => {
            report(
                &mut warnings,
                ConvertWarning::NoChart {
                    difficulty: options.difficulty.clone(),
                },
            );
            Vec::new()
        }
    };

    let title = if simfile.title.is_empty() {
        FALLBACK_TITLE.to_owned()
    } else {
        simfile.title.clone()
    };
    let song = Song {
        title,
        bpm: tempo_map.initial_bpm(),
        notes: sections,
        needs_voices: false,
        player1: default_player1(),
        player2: default_player2(),
        speed: default_speed(),
        sections: 0,
        section_lengths: Vec::new(),
    };
    Ok(SmToFnfOutput {
        chart: FnfChart { song },
        warnings,
    })
}

/// Builds the tempo map from `#BPMS`. Beats are rounded to the nearest tick and negative ones
/// are clamped to the chart start.
///
/// # Errors
///
/// Returns an error if there is no entry, or the entries are not in order of beats.
pub fn build_tempo_map(bpms: &[BpmChange]) -> Result<TempoMap, ConvertError> {
    let mut builder = TempoMapBuilder::new();
    for change in bpms {
        let tick = Tick((change.beat * BEAT_TICKS as f64).round() as u64);
        builder.push_at_tick(tick, change.bpm)?;
    }
    Ok(builder.build()?)
}

/// A hold waiting for its tail.
#[derive(Debug, Clone, Copy)]
struct OpenHold {
    section: usize,
    note: usize,
    tick: f64,
    time: f64,
}

/// Decodes the measures of the chart into sections, `offset_ms` subtracted from every time.
pub fn decode_chart(
    chart: &NoteChart,
    tempo_map: &TempoMap,
    offset_ms: f64,
    warnings: &mut Vec<ConvertWarning>,
) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::with_capacity(chart.measures.len());
    let mut open_holds = BTreeMap::<Column, OpenHold>::new();

    for (measure_index, measure) in chart.measures.iter().enumerate() {
        let measure_start = Tick::measure_start(measure_index as u64);
        let bpm = tempo_map.tick_to_bpm(measure_start).as_f64();
        let change_bpm = sections
            .last()
            .is_some_and(|last| last.bpm != Some(bpm));
        let mut notes = Vec::new();

        let ticks_per_row = MEASURE_TICKS as f64 / measure.rows.len().max(1) as f64;
        for (row_index, row) in measure.rows.iter().enumerate() {
            let tick = measure_start.0 as f64 + row_index as f64 * ticks_per_row;
            let time = tempo_map.tick_to_time_f64(tick);
            for (column, &cell) in Column::all().zip(row) {
                match cell {
                    NoteCell::Tap => {
                        notes.push(SectionNote::tap(time - offset_ms, column.index() as i64));
                    }
                    NoteCell::HoldStart | NoteCell::RollStart => {
                        let hold = OpenHold {
                            section: measure_index,
                            note: notes.len(),
                            tick,
                            time,
                        };
                        notes.push(SectionNote::tap(time - offset_ms, column.index() as i64));
                        if let Some(unclosed) = open_holds.insert(column, hold) {
                            report_unclosed(warnings, column, unclosed);
                        }
                    }
                    NoteCell::HoldEnd => match open_holds.remove(&column) {
                        Some(hold) => {
                            let duration = time - hold.time;
                            let note = if hold.section == measure_index {
                                notes.get_mut(hold.note)
                            } else {
                                sections
                                    .get_mut(hold.section)
                                    .and_then(|section| section.section_notes.get_mut(hold.note))
                            };
                            if let Some(note) = note {
                                note.hold = duration;
                            }
                        }
                        None => report(
                            warnings,
                            ConvertWarning::UnmatchedHoldEnd {
                                measure: measure_index,
                                row: row_index,
                                column,
                            },
                        ),
                    },
                    NoteCell::Empty | NoteCell::Mine => {}
                }
            }
        }

        sections.push(Section {
            length_in_steps: SECTION_STEPS,
            bpm: Some(bpm),
            change_bpm,
            must_hit_section: true,
            type_of_section: 0,
            section_notes: notes,
        });
    }

    for (column, hold) in open_holds {
        report_unclosed(warnings, column, hold);
    }
    sections
}

fn report_unclosed(warnings: &mut Vec<ConvertWarning>, column: Column, hold: OpenHold) {
    report(
        warnings,
        ConvertWarning::UnclosedHold {
            start: Tick(hold.tick.round() as u64),
            column,
        },
    );
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{sm::parse_sm, tempo::TempoError};

    fn convert(source: &str) -> SmToFnfOutput {
        let parsed = parse_sm(source);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        sm_to_fnf(&parsed.simfile, &SmToFnfOptions::default()).unwrap()
    }

    fn notes_of(output: &SmToFnfOutput) -> Vec<Vec<SectionNote>> {
        output
            .chart
            .song
            .notes
            .iter()
            .map(|section| section.section_notes.clone())
            .collect()
    }

    const HEADER: &str = "#TITLE:Test;\n#BPMS:0.000=120.000,4.000=60.000;\n";

    #[test]
    fn decodes_taps_and_holds() {
        let output = convert(&format!(
            "{HEADER}#NOTES:dance-single::Challenge:1::\n1000\n0200\n0000\n0300\n,\n0004\n0000\n0000\n0003\n;"
        ));
        assert!(output.warnings.is_empty());
        assert_eq!(
            notes_of(&output),
            vec![
                vec![
                    SectionNote::tap(0.0, 0),
                    SectionNote {
                        time: 500.0,
                        column: 1,
                        hold: 1000.0
                    },
                ],
                vec![SectionNote {
                    time: 2000.0,
                    column: 3,
                    hold: 3000.0
                }],
            ]
        );
        let sections = &output.chart.song.notes;
        assert_eq!(sections[0].bpm, Some(120.0));
        assert!(!sections[0].change_bpm);
        assert_eq!(sections[1].bpm, Some(60.0));
        assert!(sections[1].change_bpm);
        assert_eq!(output.chart.song.bpm.as_f64(), 120.0);
    }

    #[test]
    fn holds_cross_measures() {
        let output = convert(&format!(
            "{HEADER}#NOTES:dance-single::Challenge:1::\n0020\n,\n0030\n;"
        ));
        assert_eq!(
            notes_of(&output),
            vec![
                vec![SectionNote {
                    time: 0.0,
                    column: 2,
                    hold: 2000.0
                }],
                vec![],
            ]
        );
    }

    #[test]
    fn offset_shifts_times() {
        let output = convert(
            "#TITLE:Test;\n#OFFSET:0.100;\n#BPMS:0=120;\n#NOTES:dance-single::Challenge:1::\n0000\n1000\n;",
        );
        assert_eq!(notes_of(&output), vec![vec![SectionNote::tap(900.0, 0)]]);
    }

    #[test]
    fn unmatched_tails_and_unclosed_heads() {
        let output = convert(&format!(
            "{HEADER}#NOTES:dance-single::Challenge:1::\n3000\n0200\n;"
        ));
        assert_eq!(
            output.warnings,
            vec![
                ConvertWarning::UnmatchedHoldEnd {
                    measure: 0,
                    row: 0,
                    column: Column::fold(0)
                },
                ConvertWarning::UnclosedHold {
                    start: Tick(96),
                    column: Column::fold(1)
                },
            ]
        );
        assert_eq!(notes_of(&output), vec![vec![SectionNote::tap(1000.0, 1)]]);
    }

    #[test]
    fn selects_difficulty() {
        let source = format!(
            "{HEADER}#NOTES:dance-single::Hard:1::\n1000\n;\n#NOTES:dance-single::challenge:1::\n0001\n;"
        );
        let output = convert(&source);
        assert_eq!(notes_of(&output), vec![vec![SectionNote::tap(0.0, 3)]]);
        assert_eq!(
            output.warnings,
            vec![ConvertWarning::SkippedChart {
                steps_type: "dance-single".into(),
                difficulty: "Hard".into()
            }]
        );

        let parsed = parse_sm(&source);
        let options = SmToFnfOptions {
            difficulty: "Beginner".into(),
        };
        let output = sm_to_fnf(&parsed.simfile, &options).unwrap();
        assert!(output.chart.song.notes.is_empty());
        assert_eq!(
            output.warnings.last(),
            Some(&ConvertWarning::NoChart {
                difficulty: "Beginner".into()
            })
        );
    }

    #[test]
    fn empty_measure_keeps_section() {
        let output = convert(&format!(
            "{HEADER}#NOTES:dance-single::Challenge:1::\n\n,\n1000\n;"
        ));
        assert_eq!(
            notes_of(&output),
            vec![vec![], vec![SectionNote::tap(2000.0, 0)]]
        );
    }

    #[test]
    fn tempo_is_required() {
        assert_eq!(
            sm_to_fnf(&Simfile::default(), &SmToFnfOptions::default()),
            Err(ConvertError::TempoMap(TempoError::Empty))
        );
    }

    #[test]
    fn rows_between_ticks() {
        // five rows are 38.4 ticks apart, the tempo halves at the third beat
        let output = convert(
            "#TITLE:Test;\n#BPMS:0=120,2=60;\n#NOTES:dance-single::Challenge:1::\n0002\n1000\n0000\n0000\n0003\n;",
        );
        assert!(output.warnings.is_empty());
        let notes = &notes_of(&output)[0];
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].time, 0.0);
        assert_eq!(notes[0].column, 3);
        assert!((notes[0].hold - 2200.0).abs() < 1e-6, "{:?}", notes[0]);
        assert_eq!(notes[1].column, 0);
        assert!((notes[1].time - 400.0).abs() < 1e-6, "{:?}", notes[1]);
        assert_eq!(notes[1].hold, 0.0);
    }
}
