/// Presentation-only state: cursor, hit flash, status message.
/// None of this affects scoring.

use std::time::{Duration, Instant};

use crate::domain::cell::Cell;
use crate::sim::event::GameEvent;

/// How long a whacked cell shows the hit sprite.
const FLASH_TIME: Duration = Duration::from_millis(250);

/// Default lifetime of a status message.
pub const MESSAGE_TIME: Duration = Duration::from_millis(2500);

#[derive(Clone, Debug)]
pub struct ViewState {
    /// Keyboard / gamepad cursor.
    pub cursor: Cell,
    /// Cursor is only drawn once the player has used it.
    pub cursor_visible: bool,
    flash: Option<(Cell, Instant)>,
    pub message: String,
    message_until: Option<Instant>,
}

impl ViewState {
    pub fn new() -> Self {
        ViewState {
            cursor: Cell::center(),
            cursor_visible: false,
            flash: None,
            message: String::new(),
            message_until: None,
        }
    }

    pub fn move_cursor(&mut self, d_row: i32, d_col: i32) {
        if self.cursor_visible {
            self.cursor = self.cursor.step(d_row, d_col);
        }
        self.cursor_visible = true;
    }

    pub fn set_message(&mut self, msg: &str, ttl: Duration, now: Instant) {
        self.message = msg.to_string();
        self.message_until = Some(now + ttl);
    }

    /// Show a message until replaced.
    pub fn set_sticky_message(&mut self, msg: &str) {
        self.message = msg.to_string();
        self.message_until = None;
    }

    pub fn clear_message(&mut self) {
        self.message.clear();
        self.message_until = None;
    }

    /// The cell currently showing a hit, if any.
    pub fn flash_cell(&self, now: Instant) -> Option<Cell> {
        match self.flash {
            Some((cell, until)) if now < until => Some(cell),
            _ => None,
        }
    }

    /// Drop expired flash and message.
    pub fn expire(&mut self, now: Instant) {
        if matches!(self.flash, Some((_, until)) if now >= until) {
            self.flash = None;
        }
        if matches!(self.message_until, Some(until) if now >= until) {
            self.clear_message();
        }
    }

    /// React to game events: hit flash and status lines.
    pub fn apply_events(&mut self, events: &[GameEvent], now: Instant) {
        for event in events {
            match event {
                GameEvent::MoleWhacked { cell, .. } => {
                    self.flash = Some((*cell, now + FLASH_TIME));
                }
                GameEvent::SessionStarted { difficulty } => {
                    self.flash = None;
                    let msg = format!("Go! {} mode", difficulty.label());
                    self.set_message(&msg, MESSAGE_TIME, now);
                }
                GameEvent::PauseChanged { paused: true } => {
                    self.set_sticky_message("PAUSED  [P] Resume");
                }
                GameEvent::PauseChanged { paused: false } => {
                    self.clear_message();
                }
                GameEvent::SessionEnded { new_best: true, .. } => {
                    self.set_sticky_message("New best score!");
                }
                GameEvent::SessionEnded { .. } => {
                    self.set_sticky_message("Game over!");
                }
                _ => {}
            }
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::difficulty::Difficulty;

    #[test]
    fn first_cursor_move_only_reveals() {
        let mut v = ViewState::new();
        v.move_cursor(0, 1);
        assert!(v.cursor_visible);
        assert_eq!(v.cursor, Cell::center());
        v.move_cursor(0, 1);
        assert_eq!(v.cursor, Cell::new(1, 2).unwrap());
        v.move_cursor(0, 1);
        assert_eq!(v.cursor, Cell::new(1, 2).unwrap());
    }

    #[test]
    fn hit_flash_expires() {
        let mut v = ViewState::new();
        let t0 = Instant::now();
        let cell = Cell::new(0, 0).unwrap();
        v.apply_events(&[GameEvent::MoleWhacked { cell, score: 1 }], t0);
        assert_eq!(v.flash_cell(t0), Some(cell));
        let later = t0 + Duration::from_secs(1);
        assert_eq!(v.flash_cell(later), None);
        v.expire(later);
        assert!(v.flash.is_none());
    }

    #[test]
    fn timed_message_expires_sticky_does_not() {
        let mut v = ViewState::new();
        let t0 = Instant::now();
        v.apply_events(&[GameEvent::SessionStarted { difficulty: Difficulty::Hard }], t0);
        assert_eq!(v.message, "Go! Hard mode");
        v.expire(t0 + MESSAGE_TIME);
        assert!(v.message.is_empty());

        v.apply_events(&[GameEvent::PauseChanged { paused: true }], t0);
        v.expire(t0 + Duration::from_secs(60));
        assert!(v.message.starts_with("PAUSED"));

        v.apply_events(&[GameEvent::PauseChanged { paused: false }], t0);
        assert!(v.message.is_empty());
    }

    #[test]
    fn end_message_reflects_best() {
        let mut v = ViewState::new();
        let now = Instant::now();
        v.apply_events(&[GameEvent::SessionEnded { score: 4, new_best: true }], now);
        assert_eq!(v.message, "New best score!");
        v.apply_events(&[GameEvent::SessionEnded { score: 2, new_best: false }], now);
        assert_eq!(v.message, "Game over!");
    }
}
