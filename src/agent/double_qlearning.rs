use ndarray::Array1;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{Agent, AgentConfig};
use crate::action_selection::EpsilonGreedy;
use crate::discretizer::{DiscreteState, StateDiscretizer};
use crate::env::ActionSpace;
use crate::error::{ConfigError, InputError};
use crate::utils::argmax;
use crate::value_table::ValueTable;

/// Off-policy control with two value tables. A fair coin picks which table
/// learns on each step; the learner chooses the best next action while the
/// other table evaluates it, which keeps the maximization bias of
/// single-table Q-learning out of the target. Behavior actions are scored
/// by the sum of both tables.
pub struct DoubleQLearning {
    discretizer: StateDiscretizer,
    action_space: ActionSpace,
    selection: EpsilonGreedy,
    qa: ValueTable,
    qb: ValueTable,
    learning_rate: f64,
    discount_factor: f64,
    coin: Uniform<f64>,
    rng: StdRng,
    training_error: Vec<f64>,
}

impl DoubleQLearning {
    pub fn new(config: &AgentConfig) -> Result<Self, ConfigError> {
        config.check_rates()?;
        Ok(Self {
            discretizer: config.discretizer()?,
            action_space: config.action_space()?,
            selection: config.selection()?,
            qa: ValueTable::new(config.num_of_action),
            qb: ValueTable::new(config.num_of_action),
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            coin: Uniform::from(0.0..1.0),
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(1)),
            training_error: vec![],
        })
    }

    fn summed_values(&self, state: &DiscreteState) -> Vec<f64> {
        self.qa
            .get(state)
            .iter()
            .zip(self.qb.get(state))
            .map(|(a, b)| a + b)
            .collect()
    }
}

impl Agent for DoubleQLearning {
    fn select_action(&mut self, obs: &Array1<f64>) -> Result<usize, InputError> {
        let state: DiscreteState = self.discretizer.discretize(obs)?;
        let values = self.summed_values(&state);
        Ok(self.selection.select_action(&values))
    }

    fn best_action(&mut self, obs: &Array1<f64>) -> Result<usize, InputError> {
        let state: DiscreteState = self.discretizer.discretize(obs)?;
        Ok(argmax(&self.summed_values(&state)))
    }

    fn update(
        &mut self,
        curr_obs: &Array1<f64>,
        curr_action: usize,
        reward: f64,
        terminated: bool,
        next_obs: &Array1<f64>,
        _next_action: usize,
    ) -> Result<(), InputError> {
        let state: DiscreteState = self.discretizer.discretize(curr_obs)?;
        let next_state: DiscreteState = self.discretizer.discretize(next_obs)?;
        self.action_space.check_action(curr_action)?;

        let (learner, evaluator) = if self.coin.sample(&mut self.rng) < 0.5 {
            (&mut self.qa, &self.qb)
        } else {
            (&mut self.qb, &self.qa)
        };

        let best: usize = argmax(learner.get(&next_state));
        let future_q_value: f64 = if terminated {
            0.0
        } else {
            evaluator.get(&next_state)[best]
        };
        let values = learner.get_mut(&state);
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
        &self.qa
    }

    fn secondary_values(&self) -> Option<&ValueTable> {
        Some(&self.qb)
    }

    fn restore(&mut self, mut tables: Vec<ValueTable>) -> Result<(), InputError> {
        if tables.len() != 2 {
            return Err(InputError::TableCount {
                expected: 2,
                got: tables.len(),
            });
        }
        for table in &tables {
            if table.num_of_action() != self.action_space.size {
                return Err(InputError::TableWidth {
                    expected: self.action_space.size,
                    got: table.num_of_action(),
                });
            }
        }
        self.qb = tables.remove(1);
        self.qa = tables.remove(0);
        Ok(())
    }

    fn get_training_error(&self) -> &[f64] {
        &self.training_error
    }

    fn reset(&mut self) {
        self.qa = ValueTable::new(self.action_space.size);
        self.qb = ValueTable::new(self.action_space.size);
        self.training_error.clear();
        self.selection.reset();
    }
}
