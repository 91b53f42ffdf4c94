/// Arcade: the app-level world state and the control surface a host UI drives.
///
/// ## Phases
///
///   Title ── start ──▶ Playing ── timer / end ──▶ GameOver ── start ──▶ Playing
///
/// Pausing is a session state, not a phase: a paused session is still Playing.
///
/// Best scores live here (one per difficulty) for the lifetime of the
/// process only. Nothing is written to disk.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::domain::cell::Cell;
use crate::domain::difficulty::Difficulty;
use super::event::GameEvent;
use super::session::Session;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    GameOver,
}

#[derive(Debug)]
pub struct Arcade {
    pub phase: Phase,
    pub difficulty: Difficulty,
    session: Option<Session<StdRng>>,
    best: [u32; Difficulty::ALL.len()],
    /// Seeds each new session's scheduler.
    rng: StdRng,
    /// True when the last finished session set a new best.
    pub last_was_best: bool,
}

impl Arcade {
    pub fn new(difficulty: Difficulty) -> Self {
        Arcade::with_rng(difficulty, StdRng::from_os_rng())
    }

    /// Deterministic arcade for tests and replays.
    #[allow(dead_code)]
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Arcade::with_rng(difficulty, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: Difficulty, rng: StdRng) -> Self {
        Arcade {
            phase: Phase::Title,
            difficulty,
            session: None,
            best: [0; Difficulty::ALL.len()],
            rng,
            last_was_best: false,
        }
    }

    // ── Queries ──

    pub fn session(&self) -> Option<&Session<StdRng>> {
        self.session.as_ref()
    }

    pub fn best_score(&self) -> u32 {
        self.best[self.difficulty.index()]
    }

    pub fn is_paused(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_paused())
    }

    // ── Control surface ──

    /// Throw away any current session and start a new one.
    pub fn start_new_session(&mut self) -> Vec<GameEvent> {
        let rng = StdRng::from_rng(&mut self.rng);
        let session = Session::new(rng, self.difficulty.mole_interval());
        let first = session.active_mole();
        self.session = Some(session);
        self.phase = Phase::Playing;
        self.last_was_best = false;
        info!(difficulty = self.difficulty.label(), "session started");

        let mut events = vec![GameEvent::SessionStarted { difficulty: self.difficulty }];
        if let Some(to) = first {
            events.push(GameEvent::MoleMoved { from: None, to });
        }
        events
    }

    pub fn pause_session(&mut self) -> Vec<GameEvent> {
        self.with_live_session(|s| s.pause())
    }

    pub fn resume_session(&mut self) -> Vec<GameEvent> {
        self.with_live_session(|s| s.resume())
    }

    pub fn toggle_pause(&mut self) -> Vec<GameEvent> {
        if self.is_paused() {
            self.resume_session()
        } else {
            self.pause_session()
        }
    }

    /// Manual abort of the running session.
    pub fn end_session(&mut self) -> Vec<GameEvent> {
        self.with_live_session(|s| s.end())
    }

    pub fn advance(&mut self, delta: Duration) -> Vec<GameEvent> {
        self.with_live_session(|s| s.advance(delta))
    }

    pub fn click(&mut self, cell: Cell) -> Vec<GameEvent> {
        self.with_live_session(|s| s.click(cell))
    }

    /// Difficulty only changes between sessions.
    pub fn cycle_difficulty(&mut self) -> bool {
        if self.phase == Phase::Playing {
            return false;
        }
        self.difficulty = self.difficulty.next();
        true
    }

    // ── Internal ──

    fn with_live_session<F>(&mut self, f: F) -> Vec<GameEvent>
    where
        F: FnOnce(&mut Session<StdRng>) -> Vec<GameEvent>,
    {
        if self.phase != Phase::Playing {
            return vec![];
        }
        let mut events = match self.session.as_mut() {
            Some(s) if !s.is_ended() => f(s),
            _ => return vec![],
        };
        for event in events.iter_mut() {
            if let GameEvent::SessionEnded { score, new_best } = event {
                *new_best = self.record_result(*score);
            }
        }
        events
    }

    /// Finish bookkeeping for an ended session. Returns true on a new best.
    fn record_result(&mut self, score: u32) -> bool {
        self.phase = Phase::GameOver;
        let slot = &mut self.best[self.difficulty.index()];
        let new_best = score > *slot;
        if new_best {
            *slot = score;
        }
        self.last_was_best = new_best;
        info!(score, new_best, difficulty = self.difficulty.label(), "session ended");
        new_best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_current_mole(a: &mut Arcade) -> Vec<GameEvent> {
        let cell = a.session().and_then(|s| s.active_mole()).unwrap();
        a.click(cell)
    }

    fn run_out(a: &mut Arcade) -> Vec<GameEvent> {
        a.advance(Duration::from_secs(31))
    }

    #[test]
    fn title_ignores_controls() {
        let mut a = Arcade::with_seed(Difficulty::Medium, 1);
        assert_eq!(a.phase, Phase::Title);
        assert!(a.pause_session().is_empty());
        assert!(a.end_session().is_empty());
        assert!(a.advance(Duration::from_secs(5)).is_empty());
        assert!(a.session().is_none());
    }

    #[test]
    fn start_emits_started_and_first_mole() {
        let mut a = Arcade::with_seed(Difficulty::Hard, 2);
        let ev = a.start_new_session();
        assert_eq!(ev[0], GameEvent::SessionStarted { difficulty: Difficulty::Hard });
        assert!(matches!(ev[1], GameEvent::MoleMoved { from: None, .. }));
        assert_eq!(a.phase, Phase::Playing);
        let s = a.session().unwrap();
        assert_eq!(s.score(), 0);
        assert_eq!(s.remaining_secs(), 30);
    }

    #[test]
    fn timeout_moves_to_game_over_and_records_best() {
        let mut a = Arcade::with_seed(Difficulty::Medium, 3);
        a.start_new_session();
        hit_current_mole(&mut a);
        hit_current_mole(&mut a);

        let ev = run_out(&mut a);
        assert!(ev.contains(&GameEvent::SessionEnded { score: 2, new_best: true }));
        assert_eq!(a.phase, Phase::GameOver);
        assert_eq!(a.best_score(), 2);
        assert!(a.last_was_best);

        // Lower score: no new best
        a.start_new_session();
        hit_current_mole(&mut a);
        let ev = run_out(&mut a);
        assert!(ev.contains(&GameEvent::SessionEnded { score: 1, new_best: false }));
        assert_eq!(a.best_score(), 2);
        assert!(!a.last_was_best);
    }

    #[test]
    fn zero_score_is_never_a_best() {
        let mut a = Arcade::with_seed(Difficulty::Easy, 4);
        a.start_new_session();
        let ev = a.end_session();
        assert_eq!(ev, vec![GameEvent::SessionEnded { score: 0, new_best: false }]);
        assert_eq!(a.phase, Phase::GameOver);
    }

    #[test]
    fn best_scores_are_per_difficulty() {
        let mut a = Arcade::with_seed(Difficulty::Medium, 5);
        a.start_new_session();
        hit_current_mole(&mut a);
        a.end_session();
        assert_eq!(a.best_score(), 1);

        assert!(a.cycle_difficulty());
        assert_eq!(a.difficulty, Difficulty::Hard);
        assert_eq!(a.best_score(), 0);
    }

    #[test]
    fn difficulty_locked_while_playing() {
        let mut a = Arcade::with_seed(Difficulty::Medium, 6);
        a.start_new_session();
        assert!(!a.cycle_difficulty());
        a.pause_session();
        assert!(!a.cycle_difficulty());
        assert_eq!(a.difficulty, Difficulty::Medium);
    }

    #[test]
    fn toggle_pause_round_trip() {
        let mut a = Arcade::with_seed(Difficulty::Medium, 7);
        a.start_new_session();
        assert_eq!(a.toggle_pause(), vec![GameEvent::PauseChanged { paused: true }]);
        assert!(a.is_paused());
        assert_eq!(a.phase, Phase::Playing);
        assert_eq!(a.toggle_pause(), vec![GameEvent::PauseChanged { paused: false }]);
        assert!(!a.is_paused());
    }

    #[test]
    fn restart_resets_everything() {
        let mut a = Arcade::with_seed(Difficulty::Medium, 8);
        a.start_new_session();
        hit_current_mole(&mut a);
        a.advance(Duration::from_secs(3));
        a.pause_session();

        a.start_new_session();
        let s = a.session().unwrap();
        assert_eq!(s.score(), 0);
        assert_eq!(s.remaining_secs(), 30);
        assert!(!s.is_paused());
        assert!(s.active_mole().is_some());
    }

    #[test]
    fn game_over_ignores_clicks() {
        let mut a = Arcade::with_seed(Difficulty::Medium, 9);
        a.start_new_session();
        run_out(&mut a);
        let cell = a.session().and_then(|s| s.active_mole()).unwrap();
        assert!(a.click(cell).is_empty());
        assert_eq!(a.session().unwrap().score(), 0);
    }
}
