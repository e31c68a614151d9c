//! Writing a [`Simfile`] back into text.

use std::fmt::{self, Display, Formatter, Write};

use itertools::Itertools;

use super::{NoteChart, Simfile};

impl Simfile {
    /// Writes the simfile source.
    ///
    /// ```
    /// use fnf_sm::sm::{BpmChange, Simfile};
    /// use fnf_sm::tempo::Bpm;
    ///
    /// let simfile = Simfile {
    ///     title: "Bopeebo".into(),
    ///     bpms: vec![BpmChange { beat: 0.0, bpm: Bpm::new(100.0).unwrap() }],
    ///     ..Default::default()
    /// };
    /// assert_eq!(simfile.unparse(), "#TITLE:Bopeebo;\n#BPMS:0.000=100.000;\n");
    /// ```
    #[must_use]
    pub fn unparse(&self) -> String {
        self.to_string()
    }
}

/// A number with three decimals, or with all the digits it needs to be read back as is.
struct Decimal(f64);

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let short = format!("{:.3}", self.0);
        if short.parse::<f64>() == Ok(self.0) {
            f.write_str(&short)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Free text of a tag value, with the characters meaningful to the lexer escaped by `\`.
struct Escaped<'a>(&'a str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut prev = None;
        for c in self.0.chars() {
            // `//` would start a comment
            if matches!(c, '\\' | ';' | ':' | '#') || (c == '/' && prev == Some('/')) {
                f.write_char('\\')?;
            }
            f.write_char(c)?;
            prev = Some(c);
        }
        Ok(())
    }
}

impl Display for Simfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "#TITLE:{};", Escaped(&self.title))?;
        if let Some(music) = &self.music {
            writeln!(f, "#MUSIC:{};", Escaped(music))?;
        }
        if self.offset != 0.0 {
            writeln!(f, "#OFFSET:{};", Decimal(self.offset))?;
        }
        writeln!(
            f,
            "#BPMS:{};",
            self.bpms
                .iter()
                .format_with(",", |change, g| g(&format_args!(
                    "{}={}",
                    Decimal(change.beat),
                    Decimal(change.bpm.as_f64())
                )))
        )?;
        self.charts.iter().try_for_each(|chart| write!(f, "{chart}"))
    }
}

impl Display for NoteChart {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "#NOTES:")?;
        for field in [&self.steps_type, &self.description, &self.difficulty] {
            writeln!(f, "    {field}:")?;
        }
        writeln!(f, "    {}:", self.meter)?;
        writeln!(f, "    {}:", self.radar)?;
        for (i, measure) in self.measures.iter().enumerate() {
            if i != 0 {
                writeln!(f, ",")?;
            }
            for row in &measure.rows {
                for cell in row {
                    f.write_char(cell.as_char())?;
                }
                writeln!(f)?;
            }
        }
        writeln!(f, ";")
    }
}
