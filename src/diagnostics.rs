//! Fancy diagnostics support using `ariadne`.
//!
//! Warnings of the simfile reader carry the byte range of the offending text, so `ariadne` can
//! point at the exact lines without any row/column bookkeeping on our side.
//!
//! ```rust
//! use fnf_sm::{diagnostics::emit_sm_warnings, sm::parse_sm};
//!
//! let source = "#TITLE:Test;\n#BPMS:0=120,4=zero;\n";
//! let output = parse_sm(source);
//! emit_sm_warnings("test.sm", source, &output.warnings);
//! ```

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::sm::{SmWarning, SmWarningWithRange};

/// Simple source container that holds the filename and source text.
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting positioned errors to `ariadne::Report`.
pub trait ToAriadne {
    /// Convert error to ariadne Report.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

impl ToAriadne for SmWarningWithRange {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        let filename = src.name().to_string();
        let stage = match self.content {
            SmWarning::StrayText(_)
            | SmWarning::ExpectedColon(_)
            | SmWarning::MissingSemicolon(_) => "lex",
            _ => "parse",
        };
        Report::build(ReportKind::Warning, (filename.clone(), self.range.clone()))
            .with_message(format!("{stage}: {}", self.content))
            .with_label(Label::new((filename, self.range.clone())).with_color(Color::Blue))
            .finish()
    }
}

/// Renders the warnings of a simfile onto stderr.
pub fn emit_sm_warnings<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a SmWarningWithRange>,
) {
    let simple = SimpleSource::new(name, source);
    let ariadne_source = Source::from(simple.text());
    for warning in warnings {
        let report = warning.to_report(&simple);
        let _ = report.eprint((simple.name().to_string(), ariadne_source.clone()));
    }
}

/// Collect `ariadne::Report` instances for the warnings without printing.
#[must_use]
pub fn collect_sm_reports<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a SmWarningWithRange>,
) -> Vec<Report<'a, (String, std::ops::Range<usize>)>> {
    let simple = SimpleSource::new(name, source);
    warnings
        .into_iter()
        .map(|warning| warning.to_report(&simple))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm::parse_sm;

    #[test]
    fn reports_every_warning() {
        let source = "stray\n#TITLE:Test\n#BPMS:0=120,4=zero;\n";
        let output = parse_sm(source);
        assert_eq!(output.warnings.len(), 3);
        let reports = collect_sm_reports("test.sm", source, &output.warnings);
        assert_eq!(reports.len(), 3);

        let mut rendered = Vec::new();
        reports[2]
            .write(
                ("test.sm".to_string(), Source::from(source)),
                &mut rendered,
            )
            .unwrap();
        let rendered = String::from_utf8(rendered).unwrap();
        assert!(rendered.contains("invalid bpm entry `4=zero`"), "{rendered}");
    }
}
