/// SessionTimer: the 30-second countdown.
///
/// State machine:
///   Running ── tick (→0) ──▶ Ended
///   Running ── pause ──▶ Paused ── resume ──▶ Running
///   Running | Paused ── end ──▶ Ended
///
/// Transitions that don't apply to the current state are ignored.
/// Every transition returns `true` only when it actually changed something.

/// Length of one session, in seconds.
pub const SESSION_SECS: u32 = 30;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Running,
    Paused,
    Ended,
}

#[derive(Clone, Debug)]
pub struct SessionTimer {
    state: TimerState,
    remaining: u32,
}

impl SessionTimer {
    pub fn new() -> Self {
        SessionTimer { state: TimerState::Running, remaining: SESSION_SECS }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    pub fn is_ended(&self) -> bool {
        self.state == TimerState::Ended
    }

    /// One second elapsed. Returns true if the timer moved.
    pub fn tick(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Ended;
        }
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != TimerState::Paused {
            return false;
        }
        self.state = TimerState::Running;
        true
    }

    /// Manual abort. Remaining time is left as it was.
    pub fn end(&mut self) -> bool {
        if self.state == TimerState::Ended {
            return false;
        }
        self.state = TimerState::Ended;
        true
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        SessionTimer::new()
    }
}
