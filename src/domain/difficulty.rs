/// Difficulty selection: only changes how long a mole stays put.

use std::time::Duration;

use serde::Deserialize;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Time between automatic mole relocations.
    pub fn mole_interval(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(1500),
            Difficulty::Medium => Duration::from_millis(1000),
            Difficulty::Hard => Duration::from_millis(750),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Easy → Medium → Hard → Easy
    pub fn next(self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harder_means_shorter_interval() {
        assert!(Difficulty::Easy.mole_interval() > Difficulty::Medium.mole_interval());
        assert!(Difficulty::Medium.mole_interval() > Difficulty::Hard.mole_interval());
        assert_eq!(Difficulty::Medium.mole_interval(), Duration::from_secs(1));
    }

    #[test]
    fn cycle_visits_every_level() {
        let mut d = Difficulty::Easy;
        for expected in [Difficulty::Medium, Difficulty::Hard, Difficulty::Easy] {
            d = d.next();
            assert_eq!(d, expected);
        }
        for (i, d) in Difficulty::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }
}
