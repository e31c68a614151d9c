use std::path::Path;

use fnf_sm::prelude::*;
use pretty_assertions::assert_eq;

fn load_bopeebo() -> Vec<DifficultyChart> {
    let base = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/files/bopeebo.json");
    sibling_difficulty_paths(&base)
        .into_iter()
        .filter(|(_, path)| path.is_file())
        .map(|(difficulty, path)| {
            let source = std::fs::read_to_string(&path).expect("fixture must be readable");
            let chart = parse_fnf(&source).expect("fixture must be parsed");
            DifficultyChart {
                difficulty,
                song: chart.song,
            }
        })
        .collect()
}

#[test]
fn test_sibling_difficulties() {
    let charts = load_bopeebo();
    let difficulties: Vec<_> = charts.iter().map(|chart| chart.difficulty).collect();
    assert_eq!(difficulties, vec![Difficulty::Medium, Difficulty::Hard]);
    assert!(charts[0].song.needs_voices);
    assert_eq!(charts[0].song.notes.len(), 3);
    assert_eq!(charts[1].song.player2, "pico");
}

#[test]
fn test_boyfriend_side() {
    let output = fnf_to_sm(&load_bopeebo(), FnfToSmOptions::default()).expect("must be converted");
    assert_eq!(output.warnings, vec![]);
    let expected = "\
#TITLE:Bopeebo;
#MUSIC:Bopeebo.ogg;
#BPMS:0.000=100.000,4.000=150.000;

#NOTES:
    dance-single:
    :
    Medium:
    1:
    :
1000
0000
0100
0000
0000
0000
0002
0003
,
1000
0100
0000
0000
0000
0000
0000
0000
,
0010
;

#NOTES:
    dance-single:
    :
    Hard:
    1:
    :
1000
0100
0010
0001
0000
0000
0000
0000
;
";
    assert_eq!(output.simfile.unparse(), expected);
}

#[test]
fn test_dad_side() {
    let options = FnfToSmOptions {
        side: Side::Secondary,
    };
    let output = fnf_to_sm(&load_bopeebo(), options).expect("must be converted");
    assert_eq!(output.simfile.charts.len(), 1, "hard chart has no dad notes");
    let rows: Vec<Vec<String>> = output.simfile.charts[0]
        .measures
        .iter()
        .map(|measure| {
            measure
                .rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.as_char()).collect())
                .collect()
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["0000", "0010"],
            vec!["0000", "0000", "0000", "0100", "0000", "0000", "0000", "0000"],
        ]
    );
}

#[test]
fn test_single_note_scenario() {
    let chart = parse_fnf(
        r#"{"song": {"song": "Scenario", "bpm": 100, "notes": [
            {"lengthInSteps": 16, "mustHitSection": true, "sectionNotes": [[0, 0, 0]]}
        ]}}"#,
    )
    .expect("must be parsed");
    let output = fnf_to_sm(
        &[DifficultyChart {
            difficulty: Difficulty::Medium,
            song: chart.song,
        }],
        FnfToSmOptions {
            side: Side::from_str_lossy("primary"),
        },
    )
    .expect("must be converted");
    assert_eq!(
        output.simfile.charts[0].measures,
        vec![Measure {
            rows: vec![[NoteCell::Tap, NoteCell::Empty, NoteCell::Empty, NoteCell::Empty]],
        }]
    );
}

#[test]
fn test_hold_pairing() {
    let chart = parse_fnf(
        r#"{"song": {"song": "Hold", "bpm": 120, "notes": [
            {"lengthInSteps": 16, "mustHitSection": true, "sectionNotes": [[1000, 2, 500]]}
        ]}}"#,
    )
    .expect("must be parsed");
    let output = fnf_to_sm(
        &[DifficultyChart {
            difficulty: Difficulty::Hard,
            song: chart.song,
        }],
        FnfToSmOptions::default(),
    )
    .expect("must be converted");
    let rows = &output.simfile.charts[0].measures[0].rows;
    // heads at tick 96 and tails at tick 144 of the quarter note grid
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[2][2], NoteCell::HoldStart);
    assert_eq!(rows[3][2], NoteCell::HoldEnd);
}

#[test]
fn test_invalid_section_tempo() {
    let chart = parse_fnf(
        r#"{"song": {"song": "Broken", "bpm": 120, "notes": [
            {"lengthInSteps": 16, "mustHitSection": true, "sectionNotes": []},
            {"lengthInSteps": 16, "changeBPM": true, "mustHitSection": true, "sectionNotes": []}
        ]}}"#,
    )
    .expect("must be parsed");
    let result = fnf_to_sm(
        &[DifficultyChart {
            difficulty: Difficulty::Medium,
            song: chart.song,
        }],
        FnfToSmOptions::default(),
    );
    assert_eq!(result, Err(ConvertError::MissingSectionBpm { section: 1 }));
}
