//! Tempo value definition.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Beats per minute of a chart. It is always finite and greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
#[repr(transparent)]
pub struct Bpm(f64);

impl Eq for Bpm {}
impl PartialOrd for Bpm {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Bpm {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<Bpm> for f64 {
    fn from(value: Bpm) -> Self {
        value.as_f64()
    }
}

/// Error type for `Bpm::try_from`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("positive finite bpm expected: {0}")]
pub struct InvalidBpmError(pub(crate) f64);

impl TryFrom<f64> for Bpm {
    type Error = InvalidBpmError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        (value.is_finite() && value > 0.0)
            .then_some(Self(value))
            .ok_or(InvalidBpmError(value))
    }
}

impl std::fmt::Display for Bpm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Bpm {
    /// Creates a new `Bpm` if `bpm` is finite and positive, otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn new(bpm: f64) -> Option<Self> {
        Self::try_from(bpm).ok()
    }

    /// Gets the internal value.
    #[inline]
    #[must_use]
    pub const fn as_f64(self) -> f64 {
        self.0
    }
}
