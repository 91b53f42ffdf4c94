/// Events emitted by the session and arcade.
/// The presentation layer consumes these for sound and status messages.

use crate::domain::cell::Cell;
use crate::domain::difficulty::Difficulty;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    SessionStarted { difficulty: Difficulty },
    MoleMoved { from: Option<Cell>, to: Cell },
    MoleWhacked { cell: Cell, score: u32 },
    TimeChanged { remaining: u32 },
    PauseChanged { paused: bool },
    /// `new_best` is filled in by the arcade, which owns the best scores.
    SessionEnded { score: u32, new_best: bool },
}
