use fxhash::FxHashSet;
use ndarray::Array1;

use super::{Agent, AgentConfig};
use crate::action_selection::EpsilonGreedy;
use crate::discretizer::{DiscreteState, StateDiscretizer};
use crate::env::ActionSpace;
use crate::error::{ConfigError, InputError};
use crate::utils::argmax;
use crate::value_table::{ValueTable, VisitCountTable};

/// First-visit Monte-Carlo control. Transitions are buffered until the
/// episode ends, then every state-action pair is pulled towards its
/// discounted return by an incremental running mean over visit counts.
pub struct MonteCarlo {
    discretizer: StateDiscretizer,
    action_space: ActionSpace,
    selection: EpsilonGreedy,
    table: ValueTable,
    visit_counts: VisitCountTable,
    discount_factor: f64,
    obs_hist: Vec<DiscreteState>,
    action_hist: Vec<usize>,
    reward_hist: Vec<f64>,
    training_error: Vec<f64>,
}

impl MonteCarlo {
    pub fn new(config: &AgentConfig) -> Result<Self, ConfigError> {
        config.check_rates()?;
        Ok(Self {
            discretizer: config.discretizer()?,
            action_space: config.action_space()?,
            selection: config.selection()?,
            table: ValueTable::new(config.num_of_action),
            visit_counts: VisitCountTable::new(config.num_of_action),
            discount_factor: config.discount_factor,
            obs_hist: vec![],
            action_hist: vec![],
            reward_hist: vec![],
            training_error: vec![],
        })
    }

    fn apply_episode(&mut self) {
        let mut g: f64 = 0.0;
        let mut returns: Vec<f64> = vec![0.0; self.reward_hist.len()];
        for i in (0..self.reward_hist.len()).rev() {
            g = self.discount_factor * g + self.reward_hist[i];
            returns[i] = g;
        }

        let mut visited: FxHashSet<(DiscreteState, usize)> = FxHashSet::default();
        for t in 0..self.obs_hist.len() {
            let state = &self.obs_hist[t];
            let action = self.action_hist[t];
            if !visited.insert((state.clone(), action)) {
                continue;
            }
            let count = self.visit_counts.increment(state, action);
            let row = self.table.get_mut(state);
            let correction: f64 = (returns[t] - row[action]) / count as f64;
            row[action] += correction;
            self.training_error.push(correction);
        }

        self.obs_hist.clear();
        self.action_hist.clear();
        self.reward_hist.clear();
    }
}

impl Agent for MonteCarlo {
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
        _next_obs: &Array1<f64>,
        _next_action: usize,
    ) -> Result<(), InputError> {
        let state: DiscreteState = self.discretizer.discretize(curr_obs)?;
        self.action_space.check_action(curr_action)?;

        if !terminated {
            self.obs_hist.push(state);
            self.action_hist.push(curr_action);
            self.reward_hist.push(reward);
            return Ok(());
        }

        // a terminal call before any step is a no-op
        if !self.obs_hist.is_empty() {
            self.apply_episode();
        }
        self.selection.decay_epsilon();
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
        self.visit_counts = VisitCountTable::new(self.action_space.size);
        self.obs_hist.clear();
        self.action_hist.clear();
        self.reward_hist.clear();
        self.training_error.clear();
        self.selection.reset();
    }
}
