use thiserror::Error;

/// Rejected constructor parameters. Fatal to the instance being built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("num_of_action must be greater than zero")]
    NoActions,
    #[error("action_range lower bound {low} is not below upper bound {high}")]
    ActionRange { low: f64, high: f64 },
    #[error("discretize_state_weight must have at least one entry")]
    NoStateWeights,
    #[error("discretize_state_weight entries must be positive and finite, got {0}")]
    BadStateWeight(f64),
    #[error("bucket_bound must be greater than zero, got {0}")]
    BucketBound(i32),
    #[error("learning_rate must be within (0, 1], got {0}")]
    LearningRate(f64),
    #[error("discount_factor must be within [0, 1], got {0}")]
    DiscountFactor(f64),
    #[error("epsilon bounds must satisfy 0 <= final ({final_epsilon}) <= initial ({initial_epsilon}) <= 1")]
    EpsilonRange {
        initial_epsilon: f64,
        final_epsilon: f64,
    },
    #[error("epsilon_decay must be non-negative, got {0}")]
    EpsilonDecay(f64),
}

/// Rejected per-call input. The caller may skip the step or abort the
/// episode; the tables are left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("observation has {got} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("action index {action} is outside the action space of size {size}")]
    ActionOutOfRange { action: usize, size: usize },
    #[error("checkpoint holds {got} value tables, agent expects {expected}")]
    TableCount { expected: usize, got: usize },
    #[error("table rows hold {got} actions, expected {expected}")]
    TableWidth { expected: usize, got: usize },
}
