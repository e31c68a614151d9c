//! The Friday Night Funkin' chart format, a JSON file keyed by time.
//!
//! A chart is a list of [`Section`]s, each lasting `lengthInSteps` sixteenth notes, and every
//! note is placed by its time in milliseconds. Both sides of the duel share the eight raw lanes:
//! which half belongs to the player depends on the `mustHitSection` flag of the section.
//!
//! ```json
//! {
//!   "song": {
//!     "song": "Bopeebo",
//!     "bpm": 100,
//!     "notes": [
//!       {
//!         "lengthInSteps": 16,
//!         "mustHitSection": true,
//!         "sectionNotes": [[0, 0, 0], [600, 5, 300]]
//!       }
//!     ]
//!   }
//! }
//! ```

pub mod note;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::tempo::Bpm;

pub use self::note::SectionNote;

/// Top-level object of the chart file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnfChart {
    /// The chart.
    pub song: Song,
}

/// Metadata and sections of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Self explanatory title.
    #[serde(rename = "song")]
    pub title: String,
    /// Tempo at the chart start.
    pub bpm: Bpm,
    /// Sections in order.
    pub notes: Vec<Section>,
    /// Whether a separate vocal track is played.
    #[serde(default)]
    pub needs_voices: bool,
    /// Character of the player side.
    #[serde(default = "default_player1")]
    pub player1: String,
    /// Character of the opponent side.
    #[serde(default = "default_player2")]
    pub player2: String,
    /// Scroll speed.
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Legacy section counter.
    #[serde(default)]
    pub sections: u32,
    /// Legacy section lengths.
    #[serde(default)]
    pub section_lengths: Vec<u32>,
}

/// Default player character, boyfriend.
#[must_use]
pub fn default_player1() -> String {
    "bf".into()
}

/// Default opponent character.
#[must_use]
pub fn default_player2() -> String {
    "pico".into()
}

/// Default scroll speed, 2.0.
#[must_use]
pub fn default_speed() -> f64 {
    2.0
}

/// A block of steps with its own tempo and active side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Length in steps, sixteenth notes. It is 16 for one 4/4 measure.
    pub length_in_steps: u32,
    /// Tempo of this section, which is effective only if `change_bpm` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,
    /// Whether this section changes the tempo to `bpm`.
    #[serde(default, rename = "changeBPM", deserialize_with = "bool_or_number")]
    pub change_bpm: bool,
    /// Whether the player side is in focus. It also swaps the halves of the raw lanes.
    pub must_hit_section: bool,
    /// Kind of the section, unused by the conversion.
    #[serde(default)]
    pub type_of_section: u32,
    /// Notes of this section.
    pub section_notes: Vec<SectionNote>,
}

/// Old charts write flags as numbers.
fn bool_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(f64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(flag)) => flag,
        Some(Flag::Number(number)) => number != 0.0,
        None => false,
    })
}

/// Which of the opposing sides is converted into the four lanes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Side {
    /// The player, a.k.a. boyfriend.
    #[default]
    Primary,
    /// The opponent, a.k.a. dad.
    Secondary,
}

/// Error type for `Side::from_str`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown side `{0}`, expected `boyfriend` or `dad`")]
pub struct UnknownSideError(String);

impl std::str::FromStr for Side {
    type Err = UnknownSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "boyfriend" | "bf" | "player" => Ok(Self::Primary),
            "secondary" | "dad" | "opponent" => Ok(Self::Secondary),
            _ => Err(UnknownSideError(s.to_owned())),
        }
    }
}

impl Side {
    /// Parses a side, falling back to [`Side::Primary`] on an unknown or empty input.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Whether the raw lane of a note belongs to this side in a section with the
    /// `must_hit_section` flag.
    #[must_use]
    pub fn owns(self, raw_column: i64, must_hit_section: bool) -> bool {
        let first_half = (0..4).contains(&raw_column);
        let second_half = (4..8).contains(&raw_column);
        match self {
            Self::Primary => (first_half && must_hit_section) || (second_half && !must_hit_section),
            Self::Secondary => {
                (second_half && must_hit_section) || (first_half && !must_hit_section)
            }
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Primary => "boyfriend",
            Self::Secondary => "dad",
        })
    }
}

/// Difficulty label of a chart file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    /// `<name>-easy.json`.
    Easy,
    /// `<name>.json`.
    Medium,
    /// `<name>-hard.json`.
    Hard,
}

impl Difficulty {
    /// Suffix of the file stem for this difficulty.
    #[must_use]
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Self::Easy => "-easy",
            Self::Medium => "",
            Self::Hard => "-hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        })
    }
}

/// A chart labelled with its difficulty.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyChart {
    /// The label.
    pub difficulty: Difficulty,
    /// The chart.
    pub song: Song,
}

/// Candidate paths of all difficulties of the chart at `path`, the given file first as
/// [`Difficulty::Medium`]. Whether the siblings exist is up to the caller.
///
/// ```
/// use std::path::PathBuf;
/// use fnf_sm::fnf::{Difficulty, sibling_difficulty_paths};
///
/// let paths = sibling_difficulty_paths("data/bopeebo/bopeebo.json");
/// assert_eq!(paths[1], (Difficulty::Easy, PathBuf::from("data/bopeebo/bopeebo-easy.json")));
/// ```
#[must_use]
pub fn sibling_difficulty_paths(path: impl AsRef<Path>) -> Vec<(Difficulty, PathBuf)> {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sibling = |difficulty: Difficulty| {
        path.with_file_name(format!("{stem}{}.json", difficulty.file_suffix()))
    };
    vec![
        (Difficulty::Medium, path.to_path_buf()),
        (Difficulty::Easy, sibling(Difficulty::Easy)),
        (Difficulty::Hard, sibling(Difficulty::Hard)),
    ]
}

/// An error occurred when reading a chart file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FnfParseError {
    /// The source is not a JSON document.
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),
    /// A field is missing or has an unexpected type.
    #[error("unexpected chart shape at `{path}`: {message}")]
    Shape {
        /// Path to the offending field, such as `song.notes[3].sectionNotes[0]`.
        path: String,
        /// What was wrong.
        message: String,
    },
}

/// Parses a chart file.
///
/// Trailing NUL bytes, which some editors leave behind, are ignored.
///
/// # Errors
///
/// Returns [`FnfParseError::Json`] if the source is not JSON, or [`FnfParseError::Shape`] if
/// it does not describe a chart.
pub fn parse_fnf(source: &str) -> Result<FnfChart, FnfParseError> {
    let source = source.trim_matches('\0');
    let mut deserializer = serde_json::Deserializer::from_str(source);
    let chart: FnfChart = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        if inner.is_data() {
            FnfParseError::Shape {
                path,
                message: inner.to_string(),
            }
        } else {
            FnfParseError::Json(inner)
        }
    })?;
    deserializer.end().map_err(FnfParseError::Json)?;
    Ok(chart)
}

impl FnfChart {
    /// Writes the chart as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_ownership() {
        assert!(Side::Primary.owns(0, true));
        assert!(Side::Primary.owns(5, false));
        assert!(!Side::Primary.owns(5, true));
        assert!(!Side::Primary.owns(2, false));
        assert!(Side::Secondary.owns(5, true));
        assert!(Side::Secondary.owns(1, false));
        assert!(!Side::Secondary.owns(1, true));
        assert!(!Side::Primary.owns(8, false));
        assert!(!Side::Secondary.owns(-1, false));
    }

    #[test]
    fn side_parsing() {
        assert_eq!("dad".parse(), Ok(Side::Secondary));
        assert_eq!(" Boyfriend\n".parse(), Ok(Side::Primary));
        assert!("gf".parse::<Side>().is_err());
        assert_eq!(Side::from_str_lossy(""), Side::Primary);
        assert_eq!(Side::from_str_lossy("opponent"), Side::Secondary);
    }

    #[test]
    fn change_bpm_accepts_numbers() {
        let section: Section = serde_json::from_str(
            r#"{"lengthInSteps": 16, "bpm": 150, "changeBPM": 1, "mustHitSection": false, "sectionNotes": []}"#,
        )
        .unwrap();
        assert!(section.change_bpm);
        assert_eq!(section.bpm, Some(150.0));
        let section: Section = serde_json::from_str(
            r#"{"lengthInSteps": 16, "changeBPM": null, "mustHitSection": true, "sectionNotes": []}"#,
        )
        .unwrap();
        assert!(!section.change_bpm);
    }
}
