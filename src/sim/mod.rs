/// Session orchestration: turns host time and clicks into rule updates and events.

pub mod event;
pub mod session;
pub mod world;
