//! Note entry of a section, stored as a JSON array.

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, IgnoredAny, SeqAccess, Visitor},
};

/// A note of [`super::Section`], `[time, column, hold]` in the file.
///
/// Some engines append more elements such as a note type. They are skipped on reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionNote {
    /// Time of the note in milliseconds from the chart start.
    pub time: f64,
    /// Raw lane number. `0..4` and `4..8` are the lanes of the opposing sides.
    pub column: i64,
    /// Length of the hold in milliseconds. It is a tap note if zero.
    pub hold: f64,
}

impl SectionNote {
    /// Creates a tap note.
    #[must_use]
    pub const fn tap(time: f64, column: i64) -> Self {
        Self {
            time,
            column,
            hold: 0.0,
        }
    }

    /// Whether this note is sustained.
    #[must_use]
    pub fn is_hold(&self) -> bool {
        self.hold > 0.0
    }
}

impl Serialize for SectionNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.time, self.column, self.hold).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SectionNote {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NoteVisitor;

        impl<'de> Visitor<'de> for NoteVisitor {
            type Value = SectionNote;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a note array `[time, column, hold]`")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let time = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let column = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let hold = seq.next_element::<Option<f64>>()?.flatten().unwrap_or(0.0);
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(SectionNote { time, column, hold })
            }
        }

        deserializer.deserialize_seq(NoteVisitor)
    }
}
