/// Game rules: pure state machines with no I/O.

pub mod cell;
pub mod difficulty;
pub mod grid;
pub mod scheduler;
pub mod score;
pub mod timer;
