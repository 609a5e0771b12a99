use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::ConfigError;
use crate::utils::argmax;

/// Epsilon-greedy exploration with linear decay towards a floor. Carries its
/// own seeded generator so runs are reproducible.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    exploration_decider: Uniform<f64>,
    rand_action_selecter: Uniform<usize>,
    initial_epsilon: f64,
    epsilon: f64,
    epsilon_decay: f64,
    final_epsilon: f64,
    rng: StdRng,
}

impl EpsilonGreedy {
    pub fn new(
        initial_epsilon: f64,
        epsilon_decay: f64,
        final_epsilon: f64,
        num_of_action: usize,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if num_of_action == 0 {
            return Err(ConfigError::NoActions);
        }
        if !(0.0..=1.0).contains(&initial_epsilon)
            || !(0.0..=initial_epsilon).contains(&final_epsilon)
        {
            return Err(ConfigError::EpsilonRange {
                initial_epsilon,
                final_epsilon,
            });
        }
        if !epsilon_decay.is_finite() || epsilon_decay < 0.0 {
            return Err(ConfigError::EpsilonDecay(epsilon_decay));
        }
        Ok(Self {
            exploration_decider: Uniform::from(0.0..1.0),
            rand_action_selecter: Uniform::from(0..num_of_action),
            initial_epsilon,
            epsilon: initial_epsilon,
            epsilon_decay,
            final_epsilon,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn should_explore(&mut self) -> bool {
        self.epsilon != 0.0 && self.exploration_decider.sample(&mut self.rng) < self.epsilon
    }

    /// Picks an action for one row of values: random with probability
    /// epsilon, otherwise the greedy one. Ties go to the lowest index.
    pub fn select_action(&mut self, values: &[f64]) -> usize {
        if self.should_explore() {
            self.rand_action_selecter.sample(&mut self.rng)
        } else {
            argmax(values)
        }
    }

    pub fn decay_epsilon(&mut self) {
        let new_epsilon: f64 = self.epsilon - self.epsilon_decay;
        self.epsilon = new_epsilon.max(self.final_epsilon);
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn reset(&mut self) {
        self.epsilon = self.initial_epsilon;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_epsilon_is_deterministic_greedy() {
        let mut selection = EpsilonGreedy::new(0.0, 0.0, 0.0, 3, 42).unwrap();
        for _ in 0..100 {
            assert_eq!(selection.select_action(&[0.1, 0.7, 0.7]), 1);
        }
        // all-zero row: lowest index wins
        assert_eq!(selection.select_action(&[0.0, 0.0, 0.0]), 0);
    }

    #[test]
    fn full_epsilon_covers_every_action() {
        let mut selection = EpsilonGreedy::new(1.0, 0.0, 1.0, 4, 42).unwrap();
        let mut counts = [0usize; 4];
        for _ in 0..8000 {
            counts[selection.select_action(&[0.0, 0.0, 0.0, 9.0])] += 1;
        }
        for count in counts {
            assert!((1600..=2400).contains(&count), "skewed counts: {counts:?}");
        }
    }

    #[test]
    fn decay_never_drops_below_the_floor() {
        let mut selection = EpsilonGreedy::new(0.5, 0.2, 0.2, 2, 0).unwrap();
        selection.decay_epsilon();
        assert!((selection.epsilon() - 0.3).abs() < 1e-12);
        for _ in 0..50 {
            selection.decay_epsilon();
        }
        assert_eq!(selection.epsilon(), 0.2);
    }

    #[test]
    fn reset_restores_the_initial_epsilon() {
        let mut selection = EpsilonGreedy::new(0.9, 0.3, 0.0, 2, 0).unwrap();
        selection.decay_epsilon();
        selection.reset();
        assert_eq!(selection.epsilon(), 0.9);
    }

    #[test]
    fn bad_epsilon_configuration_is_rejected() {
        assert_eq!(
            EpsilonGreedy::new(0.5, 0.1, 0.8, 2, 0).unwrap_err(),
            ConfigError::EpsilonRange {
                initial_epsilon: 0.5,
                final_epsilon: 0.8
            }
        );
        assert_eq!(
            EpsilonGreedy::new(1.5, 0.1, 0.0, 2, 0).unwrap_err(),
            ConfigError::EpsilonRange {
                initial_epsilon: 1.5,
                final_epsilon: 0.0
            }
        );
        assert_eq!(
            EpsilonGreedy::new(1.0, -0.1, 0.0, 2, 0).unwrap_err(),
            ConfigError::EpsilonDecay(-0.1)
        );
        assert_eq!(
            EpsilonGreedy::new(1.0, 0.1, 0.0, 0, 0).unwrap_err(),
            ConfigError::NoActions
        );
    }
}
