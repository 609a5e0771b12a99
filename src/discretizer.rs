use ndarray::Array1;

use crate::error::{ConfigError, InputError};

/// Discrete key for one observation: one bucket index per dimension. Two
/// observations share a key iff they fall in the same bucket on every
/// dimension.
pub type DiscreteState = Vec<i32>;

/// Maps continuous observations to bucket tuples by fixed-width binning,
/// one bin width per observation dimension.
#[derive(Debug, Clone)]
pub struct StateDiscretizer {
    bin_widths: Array1<f64>,
    bucket_bound: i32,
}

impl StateDiscretizer {
    pub fn new(bin_widths: &[f64], bucket_bound: i32) -> Result<Self, ConfigError> {
        if bin_widths.is_empty() {
            return Err(ConfigError::NoStateWeights);
        }
        for width in bin_widths {
            if !width.is_finite() || *width <= 0.0 {
                return Err(ConfigError::BadStateWeight(*width));
            }
        }
        if bucket_bound <= 0 {
            return Err(ConfigError::BucketBound(bucket_bound));
        }
        Ok(Self {
            bin_widths: Array1::from_vec(bin_widths.to_vec()),
            bucket_bound,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.bin_widths.len()
    }

    /// Bucket indices saturate at ±bucket_bound so unbounded observation
    /// magnitudes keep the state space finite.
    pub fn discretize(&self, obs: &Array1<f64>) -> Result<DiscreteState, InputError> {
        if obs.len() != self.bin_widths.len() {
            return Err(InputError::DimensionMismatch {
                expected: self.bin_widths.len(),
                got: obs.len(),
            });
        }
        let bound = self.bucket_bound as f64;
        let mut state: DiscreteState = Vec::with_capacity(obs.len());
        for (value, width) in obs.iter().zip(self.bin_widths.iter()) {
            let bucket: f64 = (value / width).floor();
            state.push(bucket.clamp(-bound, bound) as i32);
        }
        Ok(state)
    }
}
