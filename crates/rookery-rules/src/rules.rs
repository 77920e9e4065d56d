//! Move legality, attack detection, and the terminal-state predicates.
//!
//! Two levels of legality exist:
//!
//! - [`is_legal_move`] — the piece may move like that: right colour,
//!   geometry, blocking, capture rules, and a king may not step onto an
//!   attacked square.
//! - [`is_fully_legal`] — additionally, the mover's own king is not in
//!   check afterwards. This is what the match layer enforces, and what
//!   [`has_any_legal_move`] enumerates.
//!
//! Because every accepted move leaves the mover's king safe, the side to
//! move never has a king capture available. [`is_legal_move`] still
//! refuses to capture a king outright, so the guarantee does not depend on
//! callers picking the right function.

use crate::{Board, Color, Piece, PieceKind, Square};

/// Checks piece geometry and capture rules for `side` moving `from → to`.
pub fn is_legal_move(
    board: &Board,
    from: Square,
    to: Square,
    side: Color,
) -> bool {
    if from == to {
        return false;
    }
    let Some(piece) = board.piece_at(from) else {
        return false;
    };
    if piece.color != side {
        return false;
    }

    let target = board.piece_at(to);
    if let Some(target) = target {
        if target.color == side || target.kind == PieceKind::King {
            return false;
        }
    }

    let (d_row, d_col) = delta(from, to);
    match piece.kind {
        PieceKind::Pawn => {
            pawn_move_ok(board, from, side, d_row, d_col, target.is_some())
        }
        PieceKind::King => {
            is_king_step(d_row, d_col)
                && !is_square_attacked(
                    &board.with_move(from, to),
                    to,
                    side.opponent(),
                )
        }
        _ => reaches(board, from, to, piece),
    }
}

/// `true` if any `by` piece could capture on `square`.
///
/// Pawns count only their diagonal captures; sliders are stopped by the
/// first occupied square. Whatever stands on `square` itself is ignored.
pub fn is_square_attacked(board: &Board, square: Square, by: Color) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.color == by)
        .any(|(from, piece)| attacks(board, from, piece, square))
}

/// `true` if `color`'s king is attacked. A board without that king is
/// never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opponent()))
}

/// `true` if playing `from → to` would not leave `color`'s king attacked.
pub fn leaves_king_safe(
    board: &Board,
    from: Square,
    to: Square,
    color: Color,
) -> bool {
    !is_in_check(&board.with_move(from, to), color)
}

/// [`is_legal_move`] plus own-king safety.
pub fn is_fully_legal(
    board: &Board,
    from: Square,
    to: Square,
    side: Color,
) -> bool {
    is_legal_move(board, from, to, side)
        && leaves_king_safe(board, from, to, side)
}

/// `true` as soon as one fully legal move for `color` is found.
///
/// Brute force over every (from, to) pair; at most 64×64 candidates, each
/// with a 64-square attack scan. Runs once per accepted move.
pub fn has_any_legal_move(board: &Board, color: Color) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.color == color)
        .any(|(from, _)| {
            Square::all().any(|to| is_fully_legal(board, from, to, color))
        })
}

#[derive(Debug, Default)]
struct MinorCount {
    bishops: u8,
    knights: u8,
}

impl MinorCount {
    fn total(&self) -> u8 {
        self.bishops + self.knights
    }
}

/// Simplified dead-position table.
///
/// Drawn when no queen, rook or pawn remains and the minors are one of:
/// king vs king, king + one minor vs king, king + bishop vs king + bishop.
/// Bishop square colours are not compared.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut white = MinorCount::default();
    let mut black = MinorCount::default();

    for (_, piece) in board.pieces() {
        let side = match piece.color {
            Color::White => &mut white,
            Color::Black => &mut black,
        };
        match piece.kind {
            PieceKind::Queen | PieceKind::Rook | PieceKind::Pawn => {
                return false;
            }
            PieceKind::Bishop => side.bishops += 1,
            PieceKind::Knight => side.knights += 1,
            PieceKind::King => {}
        }
    }

    match (white.total(), black.total()) {
        (0, 0) | (1, 0) | (0, 1) => true,
        (1, 1) => white.bishops == 1 && black.bishops == 1,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------------

fn delta(from: Square, to: Square) -> (i8, i8) {
    (
        to.row() as i8 - from.row() as i8,
        to.col() as i8 - from.col() as i8,
    )
}

fn is_knight_jump(d_row: i8, d_col: i8) -> bool {
    matches!((d_row.abs(), d_col.abs()), (2, 1) | (1, 2))
}

fn is_king_step(d_row: i8, d_col: i8) -> bool {
    d_row.abs() <= 1 && d_col.abs() <= 1 && (d_row, d_col) != (0, 0)
}

/// Single push onto an empty square, double push from the start row
/// through an empty square, or a diagonal step onto an enemy piece.
fn pawn_move_ok(
    board: &Board,
    from: Square,
    side: Color,
    d_row: i8,
    d_col: i8,
    capturing: bool,
) -> bool {
    let dir = side.pawn_direction();
    if d_col == 0 && !capturing {
        if d_row == dir {
            return true;
        }
        if from.row() == side.pawn_start_row() && d_row == 2 * dir {
            return from
                .offset(dir, 0)
                .is_some_and(|mid| board.piece_at(mid).is_none());
        }
        return false;
    }
    capturing && d_row == dir && d_col.abs() == 1
}

/// Non-pawn movement pattern, including blocking for sliders. Used both
/// for ordinary moves and for attacks.
fn reaches(board: &Board, from: Square, to: Square, piece: Piece) -> bool {
    let (d_row, d_col) = delta(from, to);
    let straight = d_row == 0 || d_col == 0;
    let diagonal = d_row.abs() == d_col.abs();
    match piece.kind {
        PieceKind::Knight => is_knight_jump(d_row, d_col),
        PieceKind::King => is_king_step(d_row, d_col),
        PieceKind::Bishop => diagonal && path_clear(board, from, to),
        PieceKind::Rook => straight && path_clear(board, from, to),
        PieceKind::Queen => {
            (straight || diagonal) && path_clear(board, from, to)
        }
        PieceKind::Pawn => false,
    }
}

fn attacks(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
    if from == target {
        return false;
    }
    if piece.kind == PieceKind::Pawn {
        let (d_row, d_col) = delta(from, target);
        return d_row == piece.color.pawn_direction() && d_col.abs() == 1;
    }
    reaches(board, from, target, piece)
}

/// Walks unit steps from `from` toward `to`; `true` if every square in
/// between is empty. Callers guarantee the two squares share a line.
fn path_clear(board: &Board, from: Square, to: Square) -> bool {
    let (d_row, d_col) = delta(from, to);
    let (step_row, step_col) = (d_row.signum(), d_col.signum());
    let mut current = from;
    loop {
        current = match current.offset(step_row, step_col) {
            Some(next) => next,
            None => return false,
        };
        if current == to {
            return true;
        }
        if board.piece_at(current).is_some() {
            return false;
        }
    }
}
