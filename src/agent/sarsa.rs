use ndarray::Array1;

use super::{Agent, AgentConfig};
use crate::action_selection::EpsilonGreedy;
use crate::discretizer::{DiscreteState, StateDiscretizer};
use crate::env::ActionSpace;
use crate::error::{ConfigError, InputError};
use crate::utils::argmax;
use crate::value_table::ValueTable;

/// On-policy one-step temporal-difference control. The bootstrap target is
/// the value of the action actually selected for the next state, masked at
/// terminal transitions.
#[derive(Debug)]
pub struct Sarsa {
    discretizer: StateDiscretizer,
    action_space: ActionSpace,
    selection: EpsilonGreedy,
    table: ValueTable,
    learning_rate: f64,
    discount_factor: f64,
    training_error: Vec<f64>,
}

impl Sarsa {
    pub fn new(config: &AgentConfig) -> Result<Self, ConfigError> {
        config.check_rates()?;
        Ok(Self {
            discretizer: config.discretizer()?,
            action_space: config.action_space()?,
            selection: config.selection()?,
            table: ValueTable::new(config.num_of_action),
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            training_error: vec![],
        })
    }
}

impl Agent for Sarsa {
    fn select_action(&mut self, obs: &Array1<f64>) -> Result<usize, InputError> {
        let state: DiscreteState = self.discretizer.discretize(obs)?;
        Ok(self.selection.select_action(self.table.get(&state)))
    }

    fn best_action(&mut self, obs: &Array1<f64>) -> Result<usize, InputError> {
        let state: DiscreteState = self.discretizer.discretize(obs)?;
        Ok(argmax(self.table.get(&state)))
    }

    fn update(
        &mut self,
        curr_obs: &Array1<f64>,
        curr_action: usize,
        reward: f64,
        terminated: bool,
        next_obs: &Array1<f64>,
        next_action: usize,
    ) -> Result<(), InputError> {
        let state: DiscreteState = self.discretizer.discretize(curr_obs)?;
        let next_state: DiscreteState = self.discretizer.discretize(next_obs)?;
        self.action_space.check_action(curr_action)?;
        self.action_space.check_action(next_action)?;

        let future_q_value: f64 = if terminated {
            0.0
        } else {
            self.table.get(&next_state)[next_action]
        };
        let values = self.table.get_mut(&state);
        let temporal_difference: f64 =
            reward + self.discount_factor * future_q_value - values[curr_action];
        values[curr_action] += self.learning_rate * temporal_difference;
        self.training_error.push(temporal_difference);
        if terminated {
            self.selection.decay_epsilon();
        }
        Ok(())
    }

    fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }

    fn epsilon(&self) -> f64 {
        self.selection.epsilon()
    }

    fn values(&self) -> &ValueTable {
        &self.table
    }

    fn restore(&mut self, mut tables: Vec<ValueTable>) -> Result<(), InputError> {
        if tables.len() != 1 {
            return Err(InputError::TableCount {
                expected: 1,
                got: tables.len(),
            });
        }
        let table = tables.remove(0);
        if table.num_of_action() != self.action_space.size {
            return Err(InputError::TableWidth {
                expected: self.action_space.size,
                got: table.num_of_action(),
            });
        }
        self.table = table;
        Ok(())
    }

    fn get_training_error(&self) -> &[f64] {
        &self.training_error
    }

    fn reset(&mut self) {
        self.table = ValueTable::new(self.action_space.size);
        self.training_error.clear();
        self.selection.reset();
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn config() -> AgentConfig {
        AgentConfig {
            num_of_action: 2,
            action_range: (-1.0, 1.0),
            discretize_state_weight: vec![1.0],
            bucket_bound: 100,
            learning_rate: 0.5,
            initial_epsilon: 0.0,
            epsilon_decay: 0.0,
            final_epsilon: 0.0,
            discount_factor: 0.9,
            seed: 42,
        }
    }

    #[test]
    fn update_moves_towards_the_sarsa_target() {
        let mut agent = Sarsa::new(&config()).unwrap();
        agent.table.get_mut(&vec![1])[1] = 2.0;

        agent
            .update(&array![0.0], 0, 1.0, false, &array![1.0], 1)
            .unwrap();

        // target = 1 + 0.9 * 2 = 2.8, so Q(s,0) = 0 + 0.5 * 2.8
        assert!((agent.table.get(&vec![0])[0] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn update_is_a_no_op_at_the_fixed_point() {
        let mut agent = Sarsa::new(&config()).unwrap();
        agent.table.get_mut(&vec![1])[1] = 2.0;
        agent.table.get_mut(&vec![0])[0] = 1.0 + 0.9 * 2.0;

        agent
            .update(&array![0.0], 0, 1.0, false, &array![1.0], 1)
            .unwrap();

        assert!((agent.table.get(&vec![0])[0] - 2.8).abs() < 1e-12);
        assert_eq!(*agent.get_training_error().last().unwrap(), 0.0);
    }

    #[test]
    fn terminal_transitions_mask_the_bootstrap_term() {
        let mut agent = Sarsa::new(&config()).unwrap();
        agent.table.get_mut(&vec![1])[1] = 100.0;

        agent
            .update(&array![0.0], 0, 1.0, true, &array![1.0], 1)
            .unwrap();

        // target collapses to the reward alone
        assert!((agent.table.get(&vec![0])[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn terminal_update_decays_epsilon() {
        let mut cfg = config();
        cfg.initial_epsilon = 1.0;
        cfg.epsilon_decay = 0.25;
        let mut agent = Sarsa::new(&cfg).unwrap();

        agent
            .update(&array![0.0], 0, 1.0, false, &array![1.0], 0)
            .unwrap();
        assert_eq!(agent.epsilon(), 1.0);
        agent
            .update(&array![0.0], 0, 1.0, true, &array![1.0], 0)
            .unwrap();
        assert_eq!(agent.epsilon(), 0.75);
    }

    #[test]
    fn failed_update_leaves_the_table_unmodified() {
        let mut agent = Sarsa::new(&config()).unwrap();
        agent.table.get_mut(&vec![0])[0] = 1.0;
        let before = agent.table.entries();

        let err = agent
            .update(&array![0.0], 0, 1.0, false, &array![1.0, 2.0], 1)
            .unwrap_err();
        assert_eq!(
            err,
            InputError::DimensionMismatch {
                expected: 1,
                got: 2
            }
        );
        assert_eq!(agent.table.entries(), before);

        let err = agent
            .update(&array![0.0], 5, 1.0, false, &array![1.0], 1)
            .unwrap_err();
        assert_eq!(err, InputError::ActionOutOfRange { action: 5, size: 2 });
        assert_eq!(agent.table.entries(), before);
    }

    #[test]
    fn select_action_is_greedy_at_zero_epsilon() {
        let mut agent = Sarsa::new(&config()).unwrap();
        agent.table.get_mut(&vec![0])[1] = 1.0;
        assert_eq!(agent.select_action(&array![0.2]).unwrap(), 1);
        // unseen state: all-zero row, lowest index wins
        assert_eq!(agent.select_action(&array![7.0]).unwrap(), 0);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut cfg = config();
        cfg.num_of_action = 0;
        assert_eq!(Sarsa::new(&cfg).unwrap_err(), ConfigError::NoActions);

        let mut cfg = config();
        cfg.learning_rate = 0.0;
        assert_eq!(Sarsa::new(&cfg).unwrap_err(), ConfigError::LearningRate(0.0));

        let mut cfg = config();
        cfg.discount_factor = 1.5;
        assert_eq!(
            Sarsa::new(&cfg).unwrap_err(),
            ConfigError::DiscountFactor(1.5)
        );

        let mut cfg = config();
        cfg.initial_epsilon = 0.1;
        cfg.final_epsilon = 0.2;
        assert_eq!(
            Sarsa::new(&cfg).unwrap_err(),
            ConfigError::EpsilonRange {
                initial_epsilon: 0.1,
                final_epsilon: 0.2
            }
        );
    }
}
