//! Match table configuration.

/// Limits for the match registry.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Matches in progress at once. Default: 50.
    pub max_matches: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { max_matches: 50 }
    }
}
