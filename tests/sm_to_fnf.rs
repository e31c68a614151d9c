use fnf_sm::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_tempo_sm() {
    let source = include_str!("files/tempo.sm");
    let SmParseOutput { simfile, warnings } = parse_sm(source);
    assert_eq!(
        warnings
            .into_iter()
            .map(|warning| warning.content)
            .collect::<Vec<_>>(),
        vec![SmWarning::UnsupportedStepsType("dance-double".into())]
    );
    assert_eq!(simfile.title, "Tempo Test");
    assert_eq!(simfile.music.as_deref(), Some("tempo.ogg"));
    assert_eq!(simfile.offset, -0.25);
    assert_eq!(simfile.charts.len(), 1);
    assert_eq!(simfile.charts[0].description, "Someone");
    assert_eq!(simfile.charts[0].radar, "0.1,0.2,0.3,0.4,0.5");

    let output = sm_to_fnf(&simfile, &SmToFnfOptions::default()).expect("must be converted");
    assert_eq!(output.warnings, vec![]);
    let song = &output.chart.song;
    assert_eq!(song.title, "Tempo Test");
    assert_eq!(song.bpm.as_f64(), 120.0);
    assert_eq!(
        song.notes,
        vec![
            Section {
                length_in_steps: 16,
                bpm: Some(120.0),
                change_bpm: false,
                must_hit_section: true,
                type_of_section: 0,
                section_notes: vec![
                    SectionNote::tap(250.0, 0),
                    SectionNote {
                        time: 1250.0,
                        column: 1,
                        hold: 1500.0,
                    },
                ],
            },
            Section {
                length_in_steps: 16,
                bpm: Some(240.0),
                change_bpm: true,
                must_hit_section: true,
                type_of_section: 0,
                section_notes: vec![SectionNote {
                    time: 2250.0,
                    column: 3,
                    hold: 750.0,
                }],
            },
        ]
    );
}

#[test]
fn test_double_chart_is_skipped() {
    let source = "#TITLE:Double;\n#BPMS:0=120;\n#NOTES:dance-double::Challenge:8::\n10000000\n;\n";
    let SmParseOutput { simfile, warnings } = parse_sm(source);
    assert!(simfile.charts.is_empty());
    assert_eq!(
        warnings
            .iter()
            .map(|warning| &source[warning.range.clone()])
            .collect::<Vec<_>>(),
        vec!["#NOTES:dance-double::Challenge:8::\n10000000\n;"]
    );
    let output = sm_to_fnf(&simfile, &SmToFnfOptions::default()).expect("must be converted");
    assert_eq!(
        output.warnings,
        vec![ConvertWarning::NoChart {
            difficulty: "Challenge".into()
        }]
    );
    assert_eq!(output.chart.song.notes, vec![]);
}

#[test]
fn test_unmatched_hold_end() {
    let source = "#BPMS:0=60;\n#NOTES:dance-single::Challenge:1::\n0030\n0000\n;";
    let output = sm_to_fnf(&parse_sm(source).simfile, &SmToFnfOptions::default())
        .expect("must be converted");
    assert_eq!(output.chart.song.title, "Simfile");
    assert_eq!(output.chart.song.notes[0].section_notes, vec![]);
    assert_eq!(
        output.warnings,
        vec![ConvertWarning::UnmatchedHoldEnd {
            measure: 0,
            row: 0,
            column: Column::fold(2),
        }]
    );
}

#[test]
fn test_out_of_order_bpms() {
    let source = "#BPMS:0=60,8=120,4=90;\n#NOTES:dance-single::Challenge:1::\n1000\n;";
    let result = sm_to_fnf(&parse_sm(source).simfile, &SmToFnfOptions::default());
    assert_eq!(
        result,
        Err(ConvertError::TempoMap(TempoError::OutOfOrder {
            tick: Tick(192),
            last: Tick(384),
        }))
    );
}

#[test]
fn test_json_output() {
    let source = "#TITLE:Json;\n#BPMS:0=120;\n#NOTES:dance-single::Challenge:1::\n1000\n;";
    let output = sm_to_fnf(&parse_sm(source).simfile, &SmToFnfOptions::default())
        .expect("must be converted");
    let json = output.chart.to_json().expect("must be serialized");
    let value: serde_json::Value = serde_json::from_str(&json).expect("must be JSON");
    assert_eq!(value["song"]["song"], "Json");
    assert_eq!(value["song"]["notes"][0]["changeBPM"], false);
    assert_eq!(value["song"]["notes"][0]["mustHitSection"], true);
    assert_eq!(
        value["song"]["notes"][0]["sectionNotes"],
        serde_json::json!([[0.0, 0, 0.0]])
    );
    assert_eq!(parse_fnf(&json).expect("must be parsed"), output.chart);
}
