//! Zip-code priority list shown on the map legend.

use serde::Serialize;

/// Dummy `(zipcode, score)` pairs served until a real scorer exists.
pub const DUMMY_PRIORITIES: [(u32, f64); 3] = [(1430, 0.9), (2020, 0.7), (3200, 0.4)];

/// Four-bucket colour classification of a priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityColor {
    /// Score above 0.8.
    Red,
    /// Score above 0.5, up to and including 0.8.
    Orange,
    /// Score above 0.2, up to and including 0.5.
    Yellow,
    /// Everything else.
    White,
}

impl PriorityColor {
    /// Bucket a score using strict lower bounds.
    ///
    /// # Examples
    /// ```
    /// use zonefeed_core::PriorityColor;
    ///
    /// assert_eq!(PriorityColor::for_score(0.9), PriorityColor::Red);
    /// assert_eq!(PriorityColor::for_score(0.8), PriorityColor::Orange);
    /// ```
    #[must_use]
    pub const fn for_score(score: f64) -> Self {
        if score > 0.8 {
            Self::Red
        } else if score > 0.5 {
            Self::Orange
        } else if score > 0.2 {
            Self::Yellow
        } else {
            Self::White
        }
    }

    /// Lowercase colour name as served to the frontend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::White => "white",
        }
    }
}

/// A zip code with its priority score and derived colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriorityEntry {
    /// Postal code.
    pub zipcode: u32,
    /// Score in `[0, 1]`.
    pub score: f64,
    /// Colour bucket derived from `score`.
    pub color: PriorityColor,
}

impl PriorityEntry {
    /// Build an entry, deriving its colour from the score.
    #[must_use]
    pub const fn new(zipcode: u32, score: f64) -> Self {
        Self {
            zipcode,
            score,
            color: PriorityColor::for_score(score),
        }
    }
}

/// Build the dummy priority list.
///
/// The list is rebuilt on every call; nothing is cached.
#[must_use]
pub fn dummy_priority_list() -> Vec<PriorityEntry> {
    DUMMY_PRIORITIES
        .iter()
        .map(|&(zipcode, score)| PriorityEntry::new(zipcode, score))
        .collect()
}
