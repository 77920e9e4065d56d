//! Error types for the rule engine.

/// Errors produced while turning text into board values.
///
/// Move legality is not an error here: [`is_legal_move`](crate::is_legal_move)
/// answers with a plain `bool`. These variants only cover input that cannot
/// be interpreted at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The square notation is not a file letter A–H followed by a rank 1–8.
    #[error("invalid notation: {0:?}")]
    BadNotation(String),

    /// A textual board layout could not be read (wrong row length,
    /// unknown piece symbol).
    #[error("invalid board layout: {0}")]
    BadLayout(String),
}
