//! Chess rule engine for Rookery.
//!
//! Everything in this crate is pure board logic: no locks, no I/O, no
//! shared state. The match layer owns the boards and asks this crate for
//! verdicts.
//!
//! - **Notation** ([`parse_square`], [`Square`]) — `"E2"` ↔ `(row, col)`
//! - **Legality** ([`is_legal_move`], [`is_fully_legal`]) — per-piece
//!   geometry, blocking, king safety
//! - **Attacks** ([`is_square_attacked`], [`is_in_check`])
//! - **Terminal states** ([`evaluate_terminal`]) — checkmate, stalemate,
//!   insufficient material
//!
//! # Board orientation
//!
//! ```text
//!        A  B  C  D  E  F  G  H
//! row 0  r  n  b  q  k  b  n  r   ← rank 8 (Black)
//! row 1  p  p  p  p  p  p  p  p
//!  ...
//! row 6  P  P  P  P  P  P  P  P
//! row 7  R  N  B  Q  K  B  N  R   ← rank 1 (White)
//! ```
//!
//! Castling, en passant, promotion and the repetition/fifty-move draws are
//! not part of this rule set.

mod board;
mod error;
mod outcome;
mod piece;
mod rules;
mod square;

pub use board::Board;
pub use error::RuleError;
pub use outcome::{EndReason, Outcome, Winner, evaluate_terminal};
pub use piece::{Color, Piece, PieceKind};
pub use rules::{
    has_any_legal_move, is_fully_legal, is_in_check,
    is_insufficient_material, is_legal_move, is_square_attacked,
    leaves_king_safe,
};
pub use square::{Square, parse_square};
