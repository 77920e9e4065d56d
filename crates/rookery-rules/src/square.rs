//! Board coordinates and algebraic notation.
//!
//! Storage is top-down: row 0 is rank 8, row 7 is rank 1. Columns run
//! A (0) to H (7). So `"E2"` is `(row 6, col 4)`.

use std::fmt;
use std::str::FromStr;

use crate::RuleError;

/// A square on the 8×8 board. Always in bounds once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Returns `None` if either coordinate is outside 0..8.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        (row < 8 && col < 8).then_some(Self { row, col })
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// Shifts the square by a row/column delta, or `None` if that walks
    /// off the board.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = i16::from(self.row) + i16::from(d_row);
        let col = i16::from(self.col) + i16::from(d_col);
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// All 64 squares, row by row from A8 to H1.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square { row, col }))
    }

    /// File letter, `'A'..='H'`.
    pub fn file_char(self) -> char {
        (b'A' + self.col) as char
    }

    /// Rank digit, `'1'..='8'`.
    pub fn rank_char(self) -> char {
        (b'8' - self.row) as char
    }
}

/// Parses two-character algebraic notation (`"E2"`, `"h7"`).
///
/// The file letter is case-insensitive. Anything that is not exactly one
/// file letter A–H followed by one rank digit 1–8 is rejected.
pub fn parse_square(notation: &str) -> Result<Square, RuleError> {
    let bad = || RuleError::BadNotation(notation.to_string());

    let &[file, rank] = notation.as_bytes() else {
        return Err(bad());
    };
    let file = file.to_ascii_uppercase();
    if !(b'A'..=b'H').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(bad());
    }

    Ok(Square {
        row: 8 - (rank - b'0'),
        col: file - b'A',
    })
}

impl FromStr for Square {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_square(s)
    }
}

/// Renders as upper-case notation, e.g. `E2`.
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}
