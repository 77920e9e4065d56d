//! The 8×8 board.

use std::fmt;

use crate::{Color, Piece, PieceKind, RuleError, Square};

/// Back-rank order, file A to H, identical for both colours.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An 8×8 grid of optional pieces.
///
/// `Board` is `Copy` (64 two-byte cells). Trial moves for check testing
/// are made on a copy via [`with_move`](Self::with_move) and thrown away,
/// so a board that someone else can observe is never half-mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Self {
        Self {
            cells: [[None; 8]; 8],
        }
    }

    /// The standard starting position.
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            let home = usize::from(color.home_row());
            let pawns = usize::from(color.pawn_start_row());
            for (col, kind) in BACK_RANK.into_iter().enumerate() {
                board.cells[home][col] = Some(Piece::new(color, kind));
                board.cells[pawns][col] =
                    Some(Piece::new(color, PieceKind::Pawn));
            }
        }
        board
    }

    /// Builds a board from eight rows of text, rank 8 first.
    ///
    /// Each row is eight characters: `.` for empty, upper-case letters for
    /// White pieces and lower-case for Black (`KQRBNP` / `kqrbnp`).
    pub fn from_rows(rows: [&str; 8]) -> Result<Self, RuleError> {
        let mut board = Self::empty();
        for (row, text) in rows.iter().enumerate() {
            let symbols: Vec<char> = text.chars().collect();
            if symbols.len() != 8 {
                return Err(RuleError::BadLayout(format!(
                    "row {row} has {} cells, expected 8",
                    symbols.len()
                )));
            }
            for (col, symbol) in symbols.into_iter().enumerate() {
                if symbol == '.' {
                    continue;
                }
                let piece = Piece::from_symbol(symbol).ok_or_else(|| {
                    RuleError::BadLayout(format!("unknown piece {symbol:?}"))
                })?;
                board.cells[row][col] = Some(piece);
            }
        }
        Ok(board)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[usize::from(square.row())][usize::from(square.col())]
    }

    /// Puts `piece` on `square`, replacing whatever was there.
    pub fn place(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[usize::from(square.row())][usize::from(square.col())] =
            piece;
    }

    /// Moves whatever stands on `from` to `to` and returns the captured
    /// piece, if any. No legality checks.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Option<Piece> {
        let moving = self.piece_at(from);
        let captured = self.piece_at(to);
        self.place(to, moving);
        self.place(from, None);
        captured
    }

    /// A copy of this board with the move applied.
    pub fn with_move(&self, from: Square, to: Square) -> Self {
        let mut trial = *self;
        trial.apply_move(from, to);
        trial
    }

    /// Where `color`'s king stands, if it is on the board.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        self.pieces()
            .find(|(_, piece)| *piece == king)
            .map(|(square, _)| square)
    }

    /// Every occupied square, A8 to H1.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|square| {
            self.piece_at(square).map(|piece| (square, piece))
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

/// Eight lines of eight symbols, rank 8 first, same format as
/// [`Board::from_rows`].
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let symbol = cell.map_or('.', Piece::symbol);
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}
