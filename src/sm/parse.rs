//! Building a [`Simfile`] from lexed tags.

use std::{borrow::Cow, ops::Range};

use log::trace;

use super::{
    BpmChange, DANCE_SINGLE, Measure, NoteChart, SmParseOutput, SmWarning, SmWarningWithRange,
    Simfile, WithRange,
    lex::{Tag, lex},
};
use crate::{
    grid::{IDLE_ROW, NoteCell, Row},
    tempo::Bpm,
};

/// Number of colon separated fields of `#NOTES`.
const NOTES_FIELDS: usize = 6;

/// Parses the simfile source. Malformed parts are skipped and reported as warnings.
///
/// ```
/// use fnf_sm::sm::parse_sm;
///
/// let output = parse_sm("#TITLE:Bopeebo;\n#BPMS:0.000=100.000;\n");
/// assert!(output.warnings.is_empty());
/// assert_eq!(output.simfile.title, "Bopeebo");
/// assert_eq!(output.simfile.bpms[0].bpm.as_f64(), 100.0);
/// ```
pub fn parse_sm(source: &str) -> SmParseOutput {
    let lexed = lex(source);
    let mut warnings = lexed.warnings;
    let mut simfile = Simfile::default();

    for tag in &lexed.tags {
        let value = blank_comments(tag.value);
        if tag.is("TITLE") {
            simfile.title = unescape(value.trim());
        } else if tag.is("MUSIC") {
            let music = value.trim();
            simfile.music = (!music.is_empty()).then(|| unescape(music));
        } else if tag.is("OFFSET") {
            match value.trim().parse() {
                Ok(offset) => simfile.offset = offset,
                Err(_) => warnings.push(WithRange::new(
                    SmWarning::InvalidNumber {
                        tag: tag.name.to_owned(),
                        value: value.trim().to_owned(),
                    },
                    tag.value_range.clone(),
                )),
            }
        } else if tag.is("BPMS") {
            simfile
                .bpms
                .extend(parse_bpms(&value, tag.value_range.start, &mut warnings));
        } else if tag.is("NOTES") {
            if let Some(chart) = parse_notes(tag, &value, &mut warnings) {
                simfile.charts.push(chart);
            }
        } else {
            trace!("ignoring tag `{}`", tag.name);
        }
    }

    SmParseOutput { simfile, warnings }
}

/// Resolves `\`-escaped characters of free text.
fn unescape(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => unescaped.extend(chars.next()),
            c => unescaped.push(c),
        }
    }
    unescaped
}

/// Replaces `//` comments with spaces, keeping byte offsets intact.
fn blank_comments(value: &str) -> Cow<'_, str> {
    if !value.contains("//") {
        return Cow::Borrowed(value);
    }
    let blanked = value
        .split_inclusive('\n')
        .map(|line| match line.find("//") {
            Some(comment) => {
                let (code, rest) = line.split_at(comment);
                let newline = if rest.ends_with('\n') { "\n" } else { "" };
                format!("{code}{}{newline}", " ".repeat(rest.len() - newline.len()))
            }
            None => line.to_owned(),
        })
        .collect();
    Cow::Owned(blanked)
}

/// Splits `text` by `separator` into pieces with their byte ranges offset by `base`.
fn split_with_ranges(
    text: &str,
    separator: char,
    base: usize,
) -> impl Iterator<Item = (&str, Range<usize>)> {
    let mut start = base;
    text.split(separator).map(move |piece| {
        let range = start..start + piece.len();
        start = range.end + separator.len_utf8();
        (piece, range)
    })
}

fn parse_bpms(
    value: &str,
    base: usize,
    warnings: &mut Vec<SmWarningWithRange>,
) -> Vec<BpmChange> {
    split_with_ranges(value, ',', base)
        .filter(|(entry, _)| !entry.trim().is_empty())
        .filter_map(|(entry, range)| {
            let parsed = entry.split_once('=').and_then(|(beat, bpm)| {
                let beat: f64 = beat.trim().parse().ok()?;
                let bpm: f64 = bpm.trim().parse().ok()?;
                Some(BpmChange {
                    beat,
                    bpm: Bpm::try_from(bpm).ok()?,
                })
            });
            if parsed.is_none() {
                warnings.push(WithRange::new(
                    SmWarning::InvalidBpmEntry(entry.trim().to_owned()),
                    range,
                ));
            }
            parsed
        })
        .collect()
}

fn parse_notes(
    tag: &Tag<'_>,
    value: &str,
    warnings: &mut Vec<SmWarningWithRange>,
) -> Option<NoteChart> {
    let fields: Vec<&str> = value.splitn(NOTES_FIELDS, ':').collect();
    let &[steps_type, description, difficulty, meter, radar, data] = fields.as_slice() else {
        warnings.push(WithRange::new(
            SmWarning::MalformedNotes(fields.len()),
            tag.range.clone(),
        ));
        return None;
    };

    let steps_type = steps_type.trim();
    if !steps_type.eq_ignore_ascii_case(DANCE_SINGLE) {
        warnings.push(WithRange::new(
            SmWarning::UnsupportedStepsType(steps_type.to_owned()),
            tag.range.clone(),
        ));
        return None;
    }

    let meter = meter.trim();
    let meter: u32 = meter.parse().unwrap_or_else(|_| {
        warnings.push(WithRange::new(
            SmWarning::InvalidNumber {
                tag: tag.name.to_owned(),
                value: meter.to_owned(),
            },
            tag.range.clone(),
        ));
        1
    });

    // the note data is the last field, so it is a suffix of the value
    let data_start = tag.value_range.start + value.len() - data.len();
    let measures = if data.trim().is_empty() {
        Vec::new()
    } else {
        split_with_ranges(data, ',', data_start)
            .map(|(measure, range)| parse_measure(measure, range.start, warnings))
            .collect()
    };

    Some(NoteChart {
        steps_type: steps_type.to_owned(),
        description: description.trim().to_owned(),
        difficulty: difficulty.trim().to_owned(),
        meter,
        radar: radar.trim().to_owned(),
        measures,
    })
}

fn parse_measure(text: &str, base: usize, warnings: &mut Vec<SmWarningWithRange>) -> Measure {
    let rows = split_with_ranges(text, '\n', base)
        .filter(|(line, _)| !line.trim().is_empty())
        .filter_map(|(line, range)| {
            let row = parse_row(line.trim());
            if row.is_none() {
                warnings.push(WithRange::new(
                    SmWarning::InvalidRow(line.trim().to_owned()),
                    range,
                ));
            }
            row
        })
        .collect();
    Measure { rows }
}

fn parse_row(line: &str) -> Option<Row> {
    let mut row = IDLE_ROW;
    let mut chars = line.chars();
    for cell in &mut row {
        *cell = NoteCell::from_char(chars.next()?)?;
    }
    chars.next().is_none().then_some(row)
}
