/// Session: one 30-second play-through.
///
/// Owns the four rule components and drives them from two clocks:
///   - the countdown clock: one `tick()` per full second
///   - the mole clock: one `relocate_mole()` per mole interval
///
/// Both clocks only accumulate while the timer is Running, so pausing
/// freezes time and mole position together. Once the timer ends, nothing
/// mutates score or mole again.
///
/// Processing order inside `advance`:
///   1. Countdown ticks (may end the session)
///   2. Mole relocations (skipped if step 1 ended it)

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::domain::cell::Cell;
use crate::domain::grid::GridModel;
use crate::domain::scheduler::MoleScheduler;
use crate::domain::score::ScoreKeeper;
use crate::domain::timer::{SessionTimer, TimerState};
use super::event::GameEvent;

const SECOND: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Session<R> {
    grid: GridModel,
    timer: SessionTimer,
    scheduler: MoleScheduler<R>,
    keeper: ScoreKeeper,
    mole_interval: Duration,
    second_elapsed: Duration,
    mole_elapsed: Duration,
}

impl<R: Rng> Session<R> {
    /// A fresh, running session with the first mole already placed.
    pub fn new(rng: R, mole_interval: Duration) -> Self {
        let mut session = Session {
            grid: GridModel::new(),
            timer: SessionTimer::new(),
            scheduler: MoleScheduler::new(rng),
            keeper: ScoreKeeper::new(),
            // A zero interval would spin forever in `advance`.
            mole_interval: mole_interval.max(Duration::from_millis(1)),
            second_elapsed: Duration::ZERO,
            mole_elapsed: Duration::ZERO,
        };
        session.scheduler.on_tick(&mut session.grid);
        session
    }

    // ── Queries ──

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn active_mole(&self) -> Option<Cell> {
        self.grid.active_mole()
    }

    pub fn score(&self) -> u32 {
        self.keeper.score()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.timer.remaining_secs()
    }

    pub fn state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn is_paused(&self) -> bool {
        self.timer.is_paused()
    }

    pub fn is_ended(&self) -> bool {
        self.timer.is_ended()
    }

    // ── Host loop entry ──

    /// Feed real elapsed time from the host loop.
    pub fn advance(&mut self, delta: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.timer.is_running() {
            return events;
        }

        self.second_elapsed += delta;
        self.mole_elapsed += delta;

        while self.second_elapsed >= SECOND && self.timer.is_running() {
            self.second_elapsed -= SECOND;
            events.extend(self.tick());
        }

        while self.mole_elapsed >= self.mole_interval && self.timer.is_running() {
            self.mole_elapsed -= self.mole_interval;
            events.extend(self.relocate_mole());
        }

        events
    }

    /// One countdown second.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.timer.tick() {
            return events;
        }
        events.push(GameEvent::TimeChanged { remaining: self.timer.remaining_secs() });
        if self.timer.is_ended() {
            debug!(score = self.score(), "session timer expired");
            events.push(GameEvent::SessionEnded { score: self.score(), new_best: false });
        }
        events
    }

    /// Move the mole somewhere else. Ignored unless running.
    pub fn relocate_mole(&mut self) -> Option<GameEvent> {
        if !self.timer.is_running() {
            return None;
        }
        let from = self.grid.active_mole();
        let to = self.scheduler.on_tick(&mut self.grid);
        Some(GameEvent::MoleMoved { from, to })
    }

    // ── Player input ──

    pub fn click(&mut self, cell: Cell) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.keeper.on_cell_clicked(cell, &mut self.grid, &self.timer) {
            return events;
        }
        debug!(row = cell.row(), col = cell.col(), score = self.score(), "mole whacked");
        events.push(GameEvent::MoleWhacked { cell, score: self.score() });

        // Replacement mole gets a full interval.
        let to = self.scheduler.relocate_from(&mut self.grid, Some(cell));
        self.mole_elapsed = Duration::ZERO;
        events.push(GameEvent::MoleMoved { from: None, to });
        events
    }

    // ── Control ──

    pub fn pause(&mut self) -> Vec<GameEvent> {
        if self.timer.pause() {
            vec![GameEvent::PauseChanged { paused: true }]
        } else {
            vec![]
        }
    }

    pub fn resume(&mut self) -> Vec<GameEvent> {
        if self.timer.resume() {
            vec![GameEvent::PauseChanged { paused: false }]
        } else {
            vec![]
        }
    }

    /// Manual abort.
    pub fn end(&mut self) -> Vec<GameEvent> {
        if self.timer.end() {
            vec![GameEvent::SessionEnded { score: self.score(), new_best: false }]
        } else {
            vec![]
        }
    }
}
