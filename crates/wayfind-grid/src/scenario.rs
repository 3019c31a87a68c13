//! Scenario descriptions consumed by [`Grid`](crate::Grid).
//!
//! A scenario is a value object: title, author, creation timestamp, and a
//! rectangular character matrix. File formats and parsing live outside this
//! crate; whoever loads a scenario hands it over already decoded.

use std::fmt;

use wayfind_core::Point;

/// Traversable empty cell.
pub const EMPTY: char = '.';
/// Non-traversable wall cell.
pub const WALL: char = '#';
/// The unique start cell (traversable).
pub const START: char = 'S';
/// The unique target cell (traversable).
pub const TARGET: char = 'T';

/// An already-decoded scenario description.
///
/// `rows` must be equal-length strings over the `.` `#` `S` `T` alphabet with
/// exactly one start and one target; [`Grid::from_scenario`](crate::Grid::from_scenario)
/// enforces this and fails with [`ScenarioError`] otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    pub title: String,
    pub author: String,
    /// Creation timestamp, kept opaque: the engine never interprets it.
    pub created: String,
    pub rows: Vec<String>,
}

impl Scenario {
    /// Create a new scenario from its parts.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        created: impl Into<String>,
        rows: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            created: created.into(),
            rows,
        }
    }

    /// Nominal (width, height) from the first row and the row count.
    /// Rectangularity is only checked at materialization.
    pub fn size(&self) -> Point {
        let w = self.rows.first().map_or(0, |r| r.chars().count());
        Point::new(w as i32, self.rows.len() as i32)
    }
}

/// Errors raised while materializing a scenario into a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    /// A row's width differs from the first row's.
    InconsistentWidth { row: usize },
    /// A character outside the `.` `#` `S` `T` alphabet.
    UnknownSymbol { ch: char, pos: Point },
    /// No start cell in the whole matrix.
    MissingStart,
    /// No target cell in the whole matrix.
    MissingTarget,
    /// A second start cell was found at this position.
    DuplicateStart(Point),
    /// A second target cell was found at this position.
    DuplicateTarget(Point),
    /// Fewer cells than start + target + one traversable cell.
    TooSmall { width: i32, height: i32 },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentWidth { row } => {
                write!(f, "scenario row {row} has a different width than row 0")
            }
            Self::UnknownSymbol { ch, pos } => {
                write!(
                    f,
                    "scenario contains unknown symbol \u{201c}{ch}\u{201d} at ({}, {})",
                    pos.x, pos.y
                )
            }
            Self::MissingStart => write!(f, "scenario does not include a start position"),
            Self::MissingTarget => write!(f, "scenario does not include a target position"),
            Self::DuplicateStart(p) => {
                write!(f, "scenario has a second start position at ({}, {})", p.x, p.y)
            }
            Self::DuplicateTarget(p) => {
                write!(f, "scenario has a second target position at ({}, {})", p.x, p.y)
            }
            Self::TooSmall { width, height } => {
                write!(f, "scenario is too small to be searchable ({width}x{height})")
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_from_rows() {
        let s = Scenario::new("t", "a", "2024-01-01", vec!["S.T".into(), "...".into()]);
        assert_eq!(s.size(), Point::new(3, 2));
    }

    #[test]
    fn size_of_empty() {
        let s = Scenario::new("t", "a", "", Vec::new());
        assert_eq!(s.size(), Point::new(0, 0));
    }
}
