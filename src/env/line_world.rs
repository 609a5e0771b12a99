use ndarray::{array, Array1};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{Env, EnvError};

/// Toy drift-correction task for exercising the training loop: a point
/// slides away from the origin a little each step and the agent pushes it
/// back with a bounded continuous action. Reward is 1 per step spent inside
/// the track; the episode ends when the point leaves the track or the step
/// budget runs out.
pub struct LineWorldEnv {
    position: f64,
    last_delta: f64,
    ready: bool,
    curr_step: u128,
    max_steps: u128,
    start_jitter: Uniform<f64>,
    rng: StdRng,
}

impl LineWorldEnv {
    pub const TRACK_LIMIT: f64 = 1.0;
    const DRIFT: f64 = 0.02;
    const PUSH: f64 = 0.1;

    pub fn new(max_steps: u128, seed: u64) -> Self {
        Self {
            position: 0.0,
            last_delta: 0.0,
            ready: false,
            curr_step: 0,
            max_steps,
            start_jitter: Uniform::from(-0.05..0.05),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn observation(&self) -> Array1<f64> {
        array![self.position, self.last_delta]
    }
}

impl Env for LineWorldEnv {
    fn reset(&mut self) -> Array1<f64> {
        self.position = self.start_jitter.sample(&mut self.rng);
        self.last_delta = 0.0;
        self.curr_step = 0;
        self.ready = true;
        self.observation()
    }

    fn step(&mut self, action: f64) -> Result<(Array1<f64>, f64, bool), EnvError> {
        if !self.ready {
            return Err(EnvError::NotReady);
        }
        self.curr_step += 1;
        let drift = if self.position >= 0.0 {
            Self::DRIFT
        } else {
            -Self::DRIFT
        };
        let delta = Self::PUSH * action + drift;
        self.position += delta;
        self.last_delta = delta;
        let out_of_track = self.position.abs() > Self::TRACK_LIMIT;
        let terminated = out_of_track || self.curr_step >= self.max_steps;
        if terminated {
            self.ready = false;
        }
        let reward = if out_of_track { 0.0 } else { 1.0 };
        Ok((self.observation(), reward, terminated))
    }

    fn render(&self) -> String {
        let cells = 21usize;
        let scaled = (self.position + Self::TRACK_LIMIT) / (2.0 * Self::TRACK_LIMIT);
        let idx = (scaled * (cells - 1) as f64)
            .round()
            .clamp(0.0, (cells - 1) as f64) as usize;
        let mut strip: Vec<char> = vec!['-'; cells];
        strip[idx] = 'o';
        format!(
            "|{}| pos {:+.3} step {}",
            strip.iter().collect::<String>(),
            self.position,
            self.curr_step
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_before_reset_is_rejected() {
        let mut env = LineWorldEnv::new(10, 0);
        assert_eq!(env.step(0.0).unwrap_err(), EnvError::NotReady);
    }

    #[test]
    fn reset_starts_near_the_origin() {
        let mut env = LineWorldEnv::new(10, 0);
        let obs = env.reset();
        assert!(obs[0].abs() <= 0.05);
        assert_eq!(obs[1], 0.0);
    }

    #[test]
    fn strong_pushes_leave_the_track() {
        let mut env = LineWorldEnv::new(1000, 0);
        env.reset();
        let mut terminated = false;
        for _ in 0..30 {
            let (_, reward, done) = env.step(1.0).unwrap();
            if done {
                assert_eq!(reward, 0.0);
                terminated = true;
                break;
            }
        }
        assert!(terminated);
    }

    #[test]
    fn surviving_the_step_budget_ends_the_episode() {
        let mut env = LineWorldEnv::new(3, 0);
        env.reset();
        let (_, reward, done) = env.step(0.0).unwrap();
        assert!(!done);
        assert_eq!(reward, 1.0);
        let (_, _, done) = env.step(0.0).unwrap();
        assert!(!done);
        let (_, reward, done) = env.step(0.0).unwrap();
        assert!(done);
        assert_eq!(reward, 1.0);
    }
}
