use std::collections::{HashSet, VecDeque};
use std::time::SystemTime;

use indexmap::IndexMap;
use uuid::Uuid;

use crate::dao::models::{GameEntity, PlayerEntity};
use crate::state::machine::{FinishReason, SessionMachine, SessionPhase};

/// One roster entry kept in memory for matching and display.
#[derive(Debug, Clone)]
pub struct RosterPlayer {
    /// Full player name, matched against guesses.
    pub name: String,
    /// Rank position inside the roster (1 is the top spot).
    pub rank: u8,
    /// Career point total shown once revealed.
    pub points: i64,
    /// Tenure descriptor, e.g. "2003-2023".
    pub tenure: String,
}

/// How a normalized guess resolved against the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessResolution {
    /// Matched an unguessed roster player.
    Correct {
        /// The matched player.
        player_id: Uuid,
    },
    /// Matched a player that was already guessed; counts incorrect.
    AlreadyGuessed {
        /// The previously guessed player.
        player_id: Uuid,
    },
    /// The suffix matched more than one roster name; counts incorrect and
    /// resolves to no player.
    Ambiguous {
        /// Every roster player sharing the suffix, in rank order.
        candidates: Vec<Uuid>,
    },
    /// Matched nobody.
    Miss,
}

impl GuessResolution {
    /// Whether the resolution is counted as a correct guess.
    pub fn is_correct(&self) -> bool {
        matches!(self, GuessResolution::Correct { .. })
    }

    /// The player the guess record should reference, if any. Ambiguous
    /// guesses deliberately reference nobody.
    pub fn matched_player(&self) -> Option<Uuid> {
        match self {
            GuessResolution::Correct { player_id }
            | GuessResolution::AlreadyGuessed { player_id } => Some(*player_id),
            GuessResolution::Ambiguous { .. } | GuessResolution::Miss => None,
        }
    }
}

/// One entry of the bounded recent-guess feed shown next to the board.
#[derive(Debug, Clone)]
pub struct RecentGuess {
    /// Trimmed guess text as submitted.
    pub guess: String,
    /// Whether it was counted correct.
    pub correct: bool,
    /// Name of the matched player, when there was one.
    pub player_name: Option<String>,
}

/// Explicitly owned state of one running session. Every mutation happens
/// under the session's lock, which is the ordering policy between guesses,
/// ticks, and finalization.
#[derive(Debug)]
pub struct ActiveSession {
    /// Primary key of the remote session row.
    pub id: Uuid,
    /// Category picked for the session.
    pub category_id: Uuid,
    /// Team whose roster is being guessed.
    pub team_id: Uuid,
    /// Optional leaderboard user the session belongs to.
    pub user_id: Option<Uuid>,
    /// Allotted time in seconds.
    pub time_limit_secs: u32,
    /// When the countdown started.
    pub started_at: SystemTime,
    /// Seconds left on the clock.
    pub remaining_secs: u32,
    /// Roster in rank order, keyed by player id.
    pub roster: IndexMap<Uuid, RosterPlayer>,
    /// Players guessed correctly so far.
    pub guessed: HashSet<Uuid>,
    /// Recent guesses, newest first, bounded.
    pub recent: VecDeque<RecentGuess>,
    /// Correct guesses counted so far.
    pub correct_count: u32,
    /// Incorrect guesses counted so far.
    pub incorrect_count: u32,
    /// Lifecycle machine; finalization goes through plan/apply.
    pub machine: SessionMachine,
    /// Why the session finished, set at finalization.
    pub finish_reason: Option<FinishReason>,
    /// Whether a champions-wall row was recorded, set at finalization.
    pub champion_recorded: bool,
    recent_capacity: usize,
}

/// Normalize raw guess input the way the matcher expects it.
pub fn normalize_guess(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl ActiveSession {
    /// Build the in-memory session from its freshly inserted remote row and
    /// the team roster (already ordered by rank).
    pub fn new(game: &GameEntity, roster: Vec<PlayerEntity>, recent_capacity: usize) -> Self {
        let roster = roster
            .into_iter()
            .map(|player| {
                (
                    player.id,
                    RosterPlayer {
                        name: player.name,
                        rank: player.rank,
                        points: player.points,
                        tenure: player.tenure,
                    },
                )
            })
            .collect::<IndexMap<_, _>>();

        Self {
            id: game.id,
            category_id: game.category_id,
            team_id: game.team_id,
            user_id: game.user_id,
            time_limit_secs: game.time_limit_secs,
            started_at: game.started_at,
            remaining_secs: game.time_limit_secs,
            roster,
            guessed: HashSet::new(),
            recent: VecDeque::with_capacity(recent_capacity),
            correct_count: 0,
            incorrect_count: 0,
            machine: SessionMachine::new(),
            finish_reason: None,
            champion_recorded: false,
            recent_capacity,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.machine.phase()
    }

    /// Running score: correct minus incorrect.
    pub fn score(&self) -> i64 {
        i64::from(self.correct_count) - i64::from(self.incorrect_count)
    }

    /// Whether every roster player has been guessed.
    pub fn roster_complete(&self) -> bool {
        self.guessed.len() == self.roster.len()
    }

    /// Seconds spent on the session so far.
    pub fn elapsed_secs(&self) -> u32 {
        self.time_limit_secs.saturating_sub(self.remaining_secs)
    }

    /// Total guesses counted so far.
    pub fn total_guesses(&self) -> u32 {
        self.correct_count + self.incorrect_count
    }

    /// Decrement the clock by one second, saturating at zero, and return the
    /// remaining time.
    pub fn tick(&mut self) -> u32 {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.remaining_secs
    }

    /// Resolve a normalized guess against the roster without mutating
    /// anything. An exact full-name match wins immediately; otherwise the
    /// guess must be the suffix of exactly one roster name.
    pub fn resolve_guess(&self, normalized: &str) -> GuessResolution {
        if let Some((id, _)) = self
            .roster
            .iter()
            .find(|(_, player)| player.name.to_lowercase() == normalized)
        {
            return self.resolve_candidate(*id);
        }

        let candidates = self
            .roster
            .iter()
            .filter(|(_, player)| player.name.to_lowercase().ends_with(normalized))
            .map(|(id, _)| *id)
            .collect::<Vec<_>>();

        match candidates.len() {
            0 => GuessResolution::Miss,
            1 => self.resolve_candidate(candidates[0]),
            _ => GuessResolution::Ambiguous { candidates },
        }
    }

    /// Commit a resolved guess: update counts, the guessed set, and the
    /// recent feed. Call only after the guess record was persisted.
    pub fn commit_guess(&mut self, submitted: &str, resolution: &GuessResolution) {
        let player_name = resolution
            .matched_player()
            .and_then(|id| self.roster.get(&id))
            .map(|player| player.name.clone());

        match resolution {
            GuessResolution::Correct { player_id } => {
                self.guessed.insert(*player_id);
                self.correct_count += 1;
            }
            _ => {
                self.incorrect_count += 1;
            }
        }

        while self.recent.len() >= self.recent_capacity.max(1) {
            self.recent.pop_back();
        }
        self.recent.push_front(RecentGuess {
            guess: submitted.trim().to_string(),
            correct: resolution.is_correct(),
            player_name,
        });
    }

    fn resolve_candidate(&self, player_id: Uuid) -> GuessResolution {
        if self.guessed.contains(&player_id) {
            GuessResolution::AlreadyGuessed { player_id }
        } else {
            GuessResolution::Correct { player_id }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::GameStatus;

    fn roster(names: &[&str]) -> Vec<PlayerEntity> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| PlayerEntity {
                id: Uuid::new_v4(),
                name: (*name).to_string(),
                team_id: Uuid::new_v4(),
                rank: (index + 1) as u8,
                points: 1_000,
                tenure: "2003-2023".into(),
            })
            .collect()
    }

    fn session_with(names: &[&str]) -> ActiveSession {
        let game = GameEntity {
            id: Uuid::new_v4(),
            user_id: None,
            category_id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            time_limit_secs: 60,
            started_at: SystemTime::now(),
            ended_at: None,
            score: 0,
            correct_guesses: 0,
            incorrect_guesses: 0,
            status: GameStatus::InProgress,
        };
        ActiveSession::new(&game, roster(names), 5)
    }

    fn submit(session: &mut ActiveSession, raw: &str) -> GuessResolution {
        let resolution = session.resolve_guess(&normalize_guess(raw));
        session.commit_guess(raw, &resolution);
        resolution
    }

    #[test]
    fn suffix_matching_follows_the_reference_cases() {
        let mut session = session_with(&["LeBron James", "Stephen Curry"]);

        assert!(submit(&mut session, "james").is_correct());
        assert!(submit(&mut session, "curry").is_correct());
        // "lebron" is a prefix, not a suffix.
        assert_eq!(submit(&mut session, "lebron"), GuessResolution::Miss);

        assert_eq!(session.correct_count, 2);
        assert_eq!(session.incorrect_count, 1);
    }

    #[test]
    fn exact_full_name_match_is_case_insensitive() {
        let mut session = session_with(&["LeBron James"]);
        assert!(submit(&mut session, "  LEBRON JAMES ").is_correct());
    }

    #[test]
    fn repeated_correct_guess_is_not_counted_twice() {
        let mut session = session_with(&["LeBron James", "Stephen Curry"]);

        assert!(submit(&mut session, "james").is_correct());
        let repeat = submit(&mut session, "james");
        assert!(matches!(repeat, GuessResolution::AlreadyGuessed { .. }));

        assert_eq!(session.correct_count, 1);
        assert_eq!(session.incorrect_count, 1);
        assert_eq!(session.guessed.len(), 1);
    }

    #[test]
    fn shared_suffix_is_rejected_as_ambiguous() {
        let mut session = session_with(&["LeBron James", "Mike James"]);

        let resolution = submit(&mut session, "james");
        match &resolution {
            GuessResolution::Ambiguous { candidates } => assert_eq!(candidates.len(), 2),
            other => panic!("expected ambiguous, got {other:?}"),
        }
        assert_eq!(resolution.matched_player(), None);
        assert_eq!(session.incorrect_count, 1);
        assert!(session.guessed.is_empty());
    }

    #[test]
    fn exact_match_bypasses_a_shared_suffix() {
        let mut session = session_with(&["LeBron James", "Mike James"]);
        assert!(submit(&mut session, "Mike James").is_correct());
    }

    #[test]
    fn counts_and_score_stay_consistent() {
        let mut session = session_with(&["LeBron James", "Stephen Curry"]);
        let guesses = ["james", "nobody", "curry", "curry", "wrong again"];

        for raw in guesses {
            submit(&mut session, raw);
        }

        assert_eq!(
            session.correct_count + session.incorrect_count,
            guesses.len() as u32
        );
        assert_eq!(
            session.score(),
            i64::from(session.correct_count) - i64::from(session.incorrect_count)
        );
        assert_eq!(session.total_guesses(), guesses.len() as u32);
    }

    #[test]
    fn recent_feed_is_bounded_and_newest_first() {
        let mut session = session_with(&["LeBron James", "Stephen Curry"]);

        for raw in ["a", "b", "c", "d", "e", "curry"] {
            submit(&mut session, raw);
        }

        assert_eq!(session.recent.len(), 5);
        assert_eq!(session.recent.front().unwrap().guess, "curry");
        assert_eq!(
            session.recent.front().unwrap().player_name.as_deref(),
            Some("Stephen Curry")
        );
        // The oldest entry fell off.
        assert!(session.recent.iter().all(|entry| entry.guess != "a"));
    }

    #[test]
    fn sixty_ticks_reach_zero_and_stay_there() {
        let mut session = session_with(&["LeBron James"]);

        for expected in (0u32..60).rev() {
            assert_eq!(session.tick(), expected);
        }
        assert_eq!(session.remaining_secs, 0);
        assert_eq!(session.tick(), 0);
        assert_eq!(session.elapsed_secs(), 60);
    }

    #[test]
    fn roster_completion_is_detected() {
        let mut session = session_with(&["LeBron James", "Stephen Curry"]);
        assert!(!session.roster_complete());

        submit(&mut session, "james");
        submit(&mut session, "curry");
        assert!(session.roster_complete());
    }
}
