/// Input state tracker for keyboard and mouse.
///
/// Collects, per frame:
///   - key presses (edge-triggered; auto-repeat is ignored so holding a
///     cell key doesn't machine-gun the mole)
///   - left-button mouse clicks, as raw terminal coordinates
///
/// Turning a click position into a grid cell is the renderer's job,
/// since only it knows where the cells were drawn.

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::domain::cell::Cell;

#[derive(Debug, Default)]
pub struct InputState {
    /// Keys pressed since the last drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier handling.
    raw_events: Vec<KeyEvent>,

    /// Left-button presses as (column, row) terminal coordinates.
    clicks: Vec<(u16, u16)>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            clicks: Vec::with_capacity(4),
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before advancing the game.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.clicks.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(ev) => self.push_event(ev),
                Err(_) => break,
            }
        }
    }

    fn push_event(&mut self, ev: Event) {
        match ev {
            Event::Key(key) => {
                self.raw_events.push(key);
                if key.kind == KeyEventKind::Press {
                    self.fresh_presses.push(key.code);
                }
            }
            Event::Mouse(m) => {
                if m.kind == MouseEventKind::Down(MouseButton::Left) {
                    self.clicks.push((m.column, m.row));
                }
            }
            _ => {}
        }
    }

    /// Was this key pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Cells chosen from the keyboard this frame, in press order.
    pub fn pressed_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.fresh_presses.iter().filter_map(|c| key_cell(*c))
    }

    pub fn clicks(&self) -> &[(u16, u16)] {
        &self.clicks
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

/// Direct cell keys.
///
///   numpad        letters
///   7 8 9         Q W E
///   4 5 6         A S D
///   1 2 3         Z X C
pub fn key_cell(code: KeyCode) -> Option<Cell> {
    let KeyCode::Char(ch) = code else {
        return None;
    };
    let (row, col) = match ch.to_ascii_lowercase() {
        '7' | 'q' => (0, 0),
        '8' | 'w' => (0, 1),
        '9' | 'e' => (0, 2),
        '4' | 'a' => (1, 0),
        '5' | 's' => (1, 1),
        '6' | 'd' => (1, 2),
        '1' | 'z' => (2, 0),
        '2' | 'x' => (2, 1),
        '3' | 'c' => (2, 2),
        _ => return None,
    };
    Cell::new(row, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
    }

    #[test]
    fn numpad_and_letter_layouts_agree() {
        let pairs = [
            ('7', 'q'), ('8', 'w'), ('9', 'e'),
            ('4', 'a'), ('5', 's'), ('6', 'd'),
            ('1', 'z'), ('2', 'x'), ('3', 'c'),
        ];
        for (i, (digit, letter)) in pairs.iter().enumerate() {
            let expected = Cell::from_index(i);
            assert_eq!(key_cell(KeyCode::Char(*digit)), expected);
            assert_eq!(key_cell(KeyCode::Char(*letter)), expected);
            assert_eq!(key_cell(KeyCode::Char(letter.to_ascii_uppercase())), expected);
        }
    }

    #[test]
    fn other_keys_are_not_cells() {
        assert_eq!(key_cell(KeyCode::Char('0')), None);
        assert_eq!(key_cell(KeyCode::Char('p')), None);
        assert_eq!(key_cell(KeyCode::Enter), None);
    }

    #[test]
    fn repeats_and_releases_are_not_presses() {
        let mut input = InputState::new();
        input.push_event(key(KeyCode::Char('5'), KeyEventKind::Repeat));
        input.push_event(key(KeyCode::Char('5'), KeyEventKind::Release));
        assert!(!input.was_pressed(KeyCode::Char('5')));
        assert_eq!(input.pressed_cells().count(), 0);

        input.push_event(key(KeyCode::Char('5'), KeyEventKind::Press));
        assert_eq!(input.pressed_cells().collect::<Vec<_>>(), vec![Cell::center()]);
    }

    #[test]
    fn only_left_button_down_is_a_click() {
        let mut input = InputState::new();
        input.push_event(mouse(MouseEventKind::Down(MouseButton::Right), 1, 1));
        input.push_event(mouse(MouseEventKind::Up(MouseButton::Left), 2, 2));
        input.push_event(mouse(MouseEventKind::Moved, 3, 3));
        input.push_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 4));
        assert_eq!(input.clicks(), &[(10, 4)]);
    }

    #[test]
    fn ctrl_c_detected() {
        let mut input = InputState::new();
        input.push_event(Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }));
        assert!(input.ctrl_c_pressed());
    }
}
