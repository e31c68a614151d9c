//! Benchmark for conversion in both directions.

use std::hint::black_box;

use criterion::{Criterion, Throughput};
use fnf_sm::prelude::*;

/// A long chart with tempo changes, triplets and holds on both sides.
fn long_chart() -> DifficultyChart {
    let mut source = String::from(r#"{"song": {"song": "Bench", "bpm": 140, "notes": ["#);
    let mut time = 0.0;
    for section in 0..256 {
        let bpm = if section % 32 < 16 { 140.0 } else { 175.0 };
        let step = 15000.0 / bpm;
        if section > 0 {
            source.push(',');
        }
        source.push_str(&format!(
            r#"{{"lengthInSteps": 16, "bpm": {bpm}, "changeBPM": true, "mustHitSection": {}, "sectionNotes": ["#,
            section % 2 == 0
        ));
        for i in 0..24 {
            if i > 0 {
                source.push(',');
            }
            let hold = if i % 7 == 0 { step * 3.0 } else { 0.0 };
            source.push_str(&format!("[{}, {}, {hold}]", time + step * 16.0 * i as f64 / 24.0, i % 8));
        }
        source.push_str("]}");
        time += step * 16.0;
    }
    source.push_str("]}}");
    let chart = parse_fnf(&source).expect("Failed to parse generated chart");
    DifficultyChart {
        difficulty: Difficulty::Hard,
        song: chart.song,
    }
}

fn bench_convert(c: &mut Criterion) {
    let charts = vec![long_chart()];
    let simfile = fnf_to_sm(&charts, FnfToSmOptions::default())
        .expect("Failed to convert")
        .simfile;
    let source = simfile.unparse();

    let mut group = c.benchmark_group("convert");
    group.bench_function("fnf_to_sm", |b| {
        b.iter(|| fnf_to_sm(black_box(&charts), black_box(FnfToSmOptions::default())));
    });
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("parse_sm", |b| b.iter(|| parse_sm(black_box(&source))));
    let options = SmToFnfOptions {
        difficulty: "Hard".into(),
    };
    group.bench_function("sm_to_fnf", |b| {
        b.iter(|| sm_to_fnf(black_box(&simfile), black_box(&options)));
    });
    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_convert(&mut criterion);
}
