mod line_world;

pub use line_world::LineWorldEnv;

use ndarray::Array1;
use thiserror::Error;

use crate::error::{ConfigError, InputError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    #[error("environment is not ready to receive actions")]
    NotReady,
}

/// Discrete action indices spread evenly over a continuous actuation range.
#[derive(Debug, Clone)]
pub struct ActionSpace {
    pub size: usize,
    low: f64,
    high: f64,
}

impl ActionSpace {
    pub fn new(size: usize, action_range: (f64, f64)) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::NoActions);
        }
        let (low, high) = action_range;
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(ConfigError::ActionRange { low, high });
        }
        Ok(Self { size, low, high })
    }

    pub fn range(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    pub fn check_action(&self, action: usize) -> Result<(), InputError> {
        if action >= self.size {
            return Err(InputError::ActionOutOfRange {
                action,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Linear map from an action index to its continuous actuation value.
    /// A single action lands on the middle of the range.
    pub fn to_continuous(&self, action: usize) -> f64 {
        if self.size == 1 {
            return (self.low + self.high) / 2.0;
        }
        self.low + (self.high - self.low) * action as f64 / (self.size - 1) as f64
    }
}

/// Seam towards the environment simulator: continuous observations and
/// rewards come in, continuous actuation values go out.
pub trait Env {
    fn reset(&mut self) -> Array1<f64>;
    fn step(&mut self, action: f64) -> Result<(Array1<f64>, f64, bool), EnvError>;
    fn render(&self) -> String;
}
