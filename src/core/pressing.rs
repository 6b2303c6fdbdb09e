//! Pressing roadmap streak tracker.
//!
//! A single index into the configured multiplier sequence. Wins walk the
//! sequence with wraparound, anything else snaps back to the start. The
//! index is persisted in the store so a streak survives restarts.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::Outcome;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressingState {
    pub index: usize,
}

impl PressingState {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Advance the streak by one outcome. Neutral leaves it untouched.
    pub fn advance(self, outcome: Outcome, sequence_len: usize) -> Self {
        let index = match outcome {
            Outcome::Win => {
                if self.index + 1 >= sequence_len {
                    0
                } else {
                    self.index + 1
                }
            }
            Outcome::Loss => 0,
            Outcome::Neutral => self.index,
        };
        Self { index }
    }
}

/// Collapse a batch of row outcomes into the single signal that advances the
/// streak. The last conclusive outcome wins, except that any deletion or
/// un-realization in the batch (`force_reset`) is a loss no matter what else
/// happened.
pub fn fold_outcomes(outcomes: &[Outcome], force_reset: bool) -> Outcome {
    if force_reset {
        return Outcome::Loss;
    }
    let mut folded = Outcome::Neutral;
    for o in outcomes {
        if *o != Outcome::Neutral {
            folded = *o;
        }
    }
    folded
}

/// One row of the roadmap view.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapStep {
    pub index: usize,
    pub multiplier: f64,
    pub contracts: f64,
    pub current: bool,
}

pub fn roadmap(cfg: &Config, state: PressingState) -> Vec<RoadmapStep> {
    cfg.pressing_multipliers
        .iter()
        .enumerate()
        .map(|(i, &m)| RoadmapStep {
            index: i,
            multiplier: m,
            contracts: m * cfg.default_size,
            current: i == state.index,
        })
        .collect()
}

/// Contracts suggested for the next trade at the current streak step.
pub fn suggested_size(cfg: &Config, state: PressingState) -> f64 {
    let multiplier = cfg
        .pressing_multipliers
        .get(state.index)
        .copied()
        .unwrap_or(1.0);
    multiplier * cfg.default_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::default_test_config;

    #[test]
    fn wins_walk_the_sequence_and_wrap() {
        let mut state = PressingState::default();
        let mut visited = vec![state.index];
        for _ in 0..4 {
            state = state.advance(Outcome::Win, 4);
            visited.push(state.index);
        }
        assert_eq!(visited, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn loss_resets_from_any_index() {
        for start in 0..4 {
            let state = PressingState::new(start).advance(Outcome::Loss, 4);
            assert_eq!(state.index, 0);
        }
    }

    #[test]
    fn neutral_leaves_the_index_alone() {
        let state = PressingState::new(2).advance(Outcome::Neutral, 4);
        assert_eq!(state.index, 2);
    }

    #[test]
    fn fold_takes_last_conclusive_outcome() {
        let outcomes = [Outcome::Loss, Outcome::Neutral, Outcome::Win, Outcome::Neutral];
        assert_eq!(fold_outcomes(&outcomes, false), Outcome::Win);
        assert_eq!(fold_outcomes(&[Outcome::Neutral], false), Outcome::Neutral);
        assert_eq!(fold_outcomes(&[], false), Outcome::Neutral);
    }

    #[test]
    fn fold_reset_overrides_wins() {
        let outcomes = [Outcome::Win, Outcome::Win];
        assert_eq!(fold_outcomes(&outcomes, true), Outcome::Loss);
    }

    #[test]
    fn suggested_size_follows_the_multiplier() {
        let cfg = default_test_config();
        assert_eq!(suggested_size(&cfg, PressingState::new(0)), 5.0);
        assert_eq!(suggested_size(&cfg, PressingState::new(1)), 10.0);
        assert_eq!(suggested_size(&cfg, PressingState::new(2)), 7.5);
        assert_eq!(suggested_size(&cfg, PressingState::new(3)), 15.0);
    }

    #[test]
    fn roadmap_marks_the_current_step() {
        let cfg = default_test_config();
        let steps = roadmap(&cfg, PressingState::new(1));
        assert_eq!(steps.len(), 4);
        assert!(steps[1].current);
        assert_eq!(steps.iter().filter(|s| s.current).count(), 1);
        assert_eq!(steps[3].contracts, 15.0);
    }
}
