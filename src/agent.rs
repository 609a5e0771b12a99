mod double_qlearning;
mod monte_carlo;
mod sarsa;

pub use double_qlearning::DoubleQLearning;
pub use monte_carlo::MonteCarlo;
pub use sarsa::Sarsa;

use enum_dispatch::enum_dispatch;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::action_selection::EpsilonGreedy;
use crate::discretizer::StateDiscretizer;
use crate::env::ActionSpace;
use crate::error::{ConfigError, InputError};
use crate::value_table::ValueTable;

/// Constructor parameters shared by every tabular control algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub num_of_action: usize,
    pub action_range: (f64, f64),
    pub discretize_state_weight: Vec<f64>,
    pub bucket_bound: i32,
    pub learning_rate: f64,
    pub initial_epsilon: f64,
    pub epsilon_decay: f64,
    pub final_epsilon: f64,
    pub discount_factor: f64,
    pub seed: u64,
}

impl AgentConfig {
    /// Checks every bound of the constructor contract without building
    /// anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_rates()?;
        self.action_space()?;
        self.discretizer()?;
        self.selection()?;
        Ok(())
    }

    pub(crate) fn check_rates(&self) -> Result<(), ConfigError> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 || self.learning_rate > 1.0
        {
            return Err(ConfigError::LearningRate(self.learning_rate));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(ConfigError::DiscountFactor(self.discount_factor));
        }
        Ok(())
    }

    pub(crate) fn action_space(&self) -> Result<ActionSpace, ConfigError> {
        ActionSpace::new(self.num_of_action, self.action_range)
    }

    pub(crate) fn discretizer(&self) -> Result<StateDiscretizer, ConfigError> {
        StateDiscretizer::new(&self.discretize_state_weight, self.bucket_bound)
    }

    pub(crate) fn selection(&self) -> Result<EpsilonGreedy, ConfigError> {
        EpsilonGreedy::new(
            self.initial_epsilon,
            self.epsilon_decay,
            self.final_epsilon,
            self.num_of_action,
            self.seed,
        )
    }
}

/// Capability surface every tabular control algorithm offers the training
/// loop: pick actions with the current tables and epsilon, absorb one
/// transition, expose the tables for checkpointing.
#[enum_dispatch]
pub trait Agent {
    /// Epsilon-greedy action for an observation.
    fn select_action(&mut self, obs: &Array1<f64>) -> Result<usize, InputError>;

    /// Greedy action for an observation, exploration disabled.
    fn best_action(&mut self, obs: &Array1<f64>) -> Result<usize, InputError>;

    /// Absorbs one transition. `next_action` must be the action actually
    /// selected for `next_obs` (possibly exploratory), not the greedy one.
    /// A failed call leaves the tables untouched.
    fn update(
        &mut self,
        curr_obs: &Array1<f64>,
        curr_action: usize,
        reward: f64,
        terminated: bool,
        next_obs: &Array1<f64>,
        next_action: usize,
    ) -> Result<(), InputError>;

    fn action_space(&self) -> &ActionSpace;

    fn epsilon(&self) -> f64;

    /// Primary value table (the `qa` table for Double Q-Learning).
    fn values(&self) -> &ValueTable;

    /// Second table for algorithms that keep one.
    fn secondary_values(&self) -> Option<&ValueTable> {
        None
    }

    /// Replaces the value tables with checkpointed ones.
    fn restore(&mut self, tables: Vec<ValueTable>) -> Result<(), InputError>;

    fn get_training_error(&self) -> &[f64];

    /// Puts the instance back in its just-constructed shape for a fresh
    /// independent run.
    fn reset(&mut self);
}

#[enum_dispatch(Agent)]
pub enum TabularAgent {
    Sarsa,
    MonteCarlo,
    DoubleQLearning,
}
