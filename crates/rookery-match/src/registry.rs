//! The table of active matches.
//!
//! # Locking
//!
//! The table itself is one `Mutex<HashMap<MatchId, Slot>>`, held only long
//! enough to find, insert or remove a slot. Each slot is an
//! `Arc<Mutex<Match>>`, so two different matches never wait on each other
//! and moves within one match run one at a time.
//!
//! Creating and removing matches also changes two players' presence, so
//! both happen inside the player registry's
//! [`claim_pair`](PlayerRegistry::claim_pair) /
//! [`release_pair`](PlayerRegistry::release_pair). The resulting order is
//! always: session table → match table → match slot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use rookery_protocol::{MatchId, SessionId};
use rookery_rules::{Outcome, Square};
use rookery_session::{Player, PlayerRegistry};

use crate::{Match, MatchConfig, MatchError};

type Slot = Arc<Mutex<Match>>;

const MATCH_ID_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const MATCH_ID_LEN: usize = 8;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What [`MatchRegistry::allocate`] created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchStart {
    pub match_id: MatchId,
    pub white: Player,
    pub black: Player,
}

/// Shared table of active matches.
pub struct MatchRegistry {
    config: MatchConfig,
    players: Arc<PlayerRegistry>,
    matches: Mutex<HashMap<MatchId, Slot>>,
}

impl MatchRegistry {
    pub fn new(config: MatchConfig, players: Arc<PlayerRegistry>) -> Self {
        Self {
            config,
            players,
            matches: Mutex::new(HashMap::new()),
        }
    }

    pub fn players(&self) -> &Arc<PlayerRegistry> {
        &self.players
    }

    /// Starts a match between two sessions.
    ///
    /// Both must be distinct, logged in and available. Colours are decided
    /// by a coin flip; both players end up `InMatch`. On any error nothing
    /// has changed: no slot is taken and both presences are as they were.
    ///
    /// # Errors
    /// - [`MatchError::Capacity`] if `max_matches` matches are running.
    /// - [`MatchError::Session`] if either player cannot be claimed.
    pub fn allocate(
        &self,
        a: SessionId,
        b: SessionId,
    ) -> Result<MatchStart, MatchError> {
        let start = self.players.claim_pair(a, b, |first, second| {
            let mut table = lock(&self.matches);
            if table.len() >= self.config.max_matches {
                return Err(MatchError::Capacity);
            }

            let mut rng = rand::rng();
            let match_id = loop {
                let candidate = generate_match_id(&mut rng);
                if !table.contains_key(&candidate) {
                    break candidate;
                }
            };
            let (white, black) = if rng.random::<bool>() {
                (first.clone(), second.clone())
            } else {
                (second.clone(), first.clone())
            };

            let game = Match::new(match_id.clone(), white.clone(), black.clone());
            table.insert(match_id.clone(), Arc::new(Mutex::new(game)));
            Ok(MatchStart {
                match_id,
                white,
                black,
            })
        })?;

        tracing::info!(
            match_id = %start.match_id,
            white = %start.white.username,
            black = %start.black.username,
            "match created"
        );
        Ok(start)
    }

    /// The lockable slot for an entry in the table, active or not.
    pub(crate) fn slot(&self, match_id: &MatchId) -> Option<Slot> {
        lock(&self.matches).get(match_id).cloned()
    }

    /// A copy of an active match.
    pub fn lookup(&self, match_id: &MatchId) -> Result<Match, MatchError> {
        let not_found = || MatchError::NotFound(match_id.clone());
        let slot = self.slot(match_id).ok_or_else(not_found)?;
        let game = lock(&slot);
        if !game.is_active() {
            return Err(not_found());
        }
        Ok(game.clone())
    }

    /// Applies an already-validated move and flips the turn.
    pub fn apply_move(
        &self,
        match_id: &MatchId,
        from: Square,
        to: Square,
    ) -> Result<(), MatchError> {
        let slot = self
            .slot(match_id)
            .ok_or_else(|| MatchError::NotFound(match_id.clone()))?;
        let mut game = lock(&slot);
        if !game.is_active() {
            return Err(MatchError::NotFound(match_id.clone()));
        }
        game.apply_move(from, to);
        Ok(())
    }

    /// Ends a match: frees its slot and returns both players, if still
    /// connected, to `Available`. Returns `false` if there was no such
    /// match.
    pub fn deactivate(&self, match_id: &MatchId, outcome: &Outcome) -> bool {
        let Some(slot) = self.slot(match_id) else {
            return false;
        };
        let (white, black) = {
            let mut game = lock(&slot);
            game.finish();
            (game.white().session_id, game.black().session_id)
        };

        let removed = self.players.release_pair(white, black, || {
            lock(&self.matches).remove(match_id).is_some()
        });
        if removed {
            tracing::info!(
                %match_id,
                winner = %outcome.winner,
                reason = %outcome.reason,
                "match ended"
            );
        }
        removed
    }

    /// Matches currently in the table.
    pub fn active_count(&self) -> usize {
        lock(&self.matches).len()
    }

    /// The active match `session` is playing in, if any.
    pub fn match_of(&self, session: SessionId) -> Option<MatchId> {
        let table = lock(&self.matches);
        table.iter().find_map(|(id, slot)| {
            let game = lock(slot);
            (game.is_active() && game.color_of(session).is_some())
                .then(|| id.clone())
        })
    }
}

/// `M` followed by eight characters from `0-9A-Z`.
fn generate_match_id(rng: &mut impl Rng) -> MatchId {
    let suffix: String = (0..MATCH_ID_LEN)
        .map(|_| {
            let i = rng.random_range(0..MATCH_ID_CHARSET.len());
            char::from(MATCH_ID_CHARSET[i])
        })
        .collect();
    MatchId::new(format!("M{suffix}"))
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rookery_rules::{Color, EndReason, parse_square};
    use rookery_session::{MemoryStore, Presence, RegistryConfig, SessionError};

    use super::*;

    // -- Helpers ----------------------------------------------------------

    fn setup(max_matches: usize) -> (Arc<PlayerRegistry>, MatchRegistry) {
        let players = Arc::new(
            PlayerRegistry::new(RegistryConfig::default(), MemoryStore::new())
                .unwrap(),
        );
        let matches =
            MatchRegistry::new(MatchConfig { max_matches }, Arc::clone(&players));
        (players, matches)
    }

    fn online(players: &PlayerRegistry, name: &str) -> SessionId {
        players.register(name, "pw").unwrap();
        let id = players.connect().unwrap();
        players.login(id, name, "pw").unwrap();
        id
    }

    fn draw() -> Outcome {
        Outcome::draw(EndReason::Stalemate)
    }

    // =====================================================================
    // allocate()
    // =====================================================================

    #[test]
    fn test_allocate_creates_match_and_marks_players() {
        let (players, matches) = setup(50);
        let a = online(&players, "ana");
        let b = online(&players, "ben");

        let start = matches.allocate(a, b).unwrap();

        let mut seats = [start.white.session_id, start.black.session_id];
        seats.sort();
        assert_eq!(seats, [a, b]);
        assert_eq!(players.presence_of(a), Some(Presence::InMatch));
        assert_eq!(players.presence_of(b), Some(Presence::InMatch));
        assert_eq!(matches.active_count(), 1);

        let game = matches.lookup(&start.match_id).unwrap();
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.white(), &start.white);
    }

    #[test]
    fn test_allocate_match_id_format() {
        let (players, matches) = setup(50);
        let a = online(&players, "ana");
        let b = online(&players, "ben");

        let id = matches.allocate(a, b).unwrap().match_id;

        let s = id.as_str();
        assert_eq!(s.len(), 9);
        assert!(s.starts_with('M'));
        assert!(
            s[1..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_allocate_at_capacity_changes_nothing() {
        let (players, matches) = setup(1);
        let a = online(&players, "ana");
        let b = online(&players, "ben");
        let c = online(&players, "cat");
        let d = online(&players, "dan");
        matches.allocate(a, b).unwrap();

        let result = matches.allocate(c, d);

        assert!(matches!(result, Err(MatchError::Capacity)));
        assert_eq!(players.presence_of(c), Some(Presence::Available));
        assert_eq!(players.presence_of(d), Some(Presence::Available));
        assert_eq!(matches.active_count(), 1);
    }

    #[test]
    fn test_allocate_player_in_match_rejected() {
        let (players, matches) = setup(50);
        let a = online(&players, "ana");
        let b = online(&players, "ben");
        let c = online(&players, "cat");
        matches.allocate(a, b).unwrap();

        let result = matches.allocate(c, a);

        assert!(matches!(
            result,
            Err(MatchError::Session(SessionError::Unavailable(_)))
        ));
        assert_eq!(players.presence_of(c), Some(Presence::Available));
        assert_eq!(matches.active_count(), 1);
    }

    #[test]
    fn test_allocate_colours_are_not_fixed() {
        let (players, matches) = setup(40);
        let mut white_names = HashSet::new();
        for i in 0..40 {
            let a = online(&players, &format!("a{i}"));
            let b = online(&players, &format!("b{i}"));
            let start = matches.allocate(a, b).unwrap();
            white_names.insert(start.white.username.starts_with('a'));
        }
        assert_eq!(white_names.len(), 2, "both seatings should occur");
    }

    // =====================================================================
    // lookup() / apply_move()
    // =====================================================================

    #[test]
    fn test_lookup_unknown_match_not_found() {
        let (_, matches) = setup(50);
        assert!(matches!(
            matches.lookup(&MatchId::new("MNOPE0000")),
            Err(MatchError::NotFound(_))
        ));
    }

    #[test]
    fn test_apply_move_flips_turn() {
        let (players, matches) = setup(50);
        let a = online(&players, "ana");
        let b = online(&players, "ben");
        let id = matches.allocate(a, b).unwrap().match_id;

        matches
            .apply_move(
                &id,
                parse_square("E2").unwrap(),
                parse_square("E4").unwrap(),
            )
            .unwrap();

        assert_eq!(matches.lookup(&id).unwrap().turn(), Color::Black);
    }

    // =====================================================================
    // deactivate() / match_of()
    // =====================================================================

    #[test]
    fn test_deactivate_frees_slot_and_players() {
        let (players, matches) = setup(50);
        let a = online(&players, "ana");
        let b = online(&players, "ben");
        let id = matches.allocate(a, b).unwrap().match_id;
        assert_eq!(matches.match_of(a), Some(id.clone()));

        assert!(matches.deactivate(&id, &draw()));

        assert_eq!(matches.active_count(), 0);
        assert!(matches.lookup(&id).is_err());
        assert_eq!(matches.match_of(a), None);
        assert_eq!(players.presence_of(a), Some(Presence::Available));
        assert_eq!(players.presence_of(b), Some(Presence::Available));
        assert!(!matches.deactivate(&id, &draw()), "second call is a no-op");
    }

    #[test]
    fn test_deactivate_after_disconnect_keeps_slot_accounting() {
        let (players, matches) = setup(1);
        let a = online(&players, "ana");
        let b = online(&players, "ben");
        let id = matches.allocate(a, b).unwrap().match_id;
        players.disconnect(b);

        assert!(matches.deactivate(&id, &draw()));

        let c = online(&players, "cat");
        assert!(matches.allocate(a, c).is_ok(), "slot should be free again");
    }
}
