use std::path::PathBuf;
use std::time::Instant;

use log::info;
use structopt::StructOpt;

use tabular_rl::agent::{AgentConfig, DoubleQLearning, MonteCarlo, Sarsa, TabularAgent};
use tabular_rl::checkpoint;
use tabular_rl::env::LineWorldEnv;
use tabular_rl::trainer;
use tabular_rl::utils::moving_average;

/// Train the three tabular control agents on the line-world balancing task
#[derive(StructOpt, Debug)]
#[structopt(name = "line_world")]
struct Cli {
    /// Show example of episode after training
    #[structopt(long = "show_example")]
    show_example: bool,

    /// Number of episodes for the training
    #[structopt(long = "n_episodes", short = "n", default_value = "2000")]
    n_episodes: u128,

    /// Maximum number of steps per episode
    #[structopt(long = "max_steps", default_value = "500")]
    max_steps: u128,

    /// Number of discrete actions spread over the action range
    #[structopt(long = "num_of_action", default_value = "5")]
    num_of_action: usize,

    /// Lower bound of the continuous action range
    #[structopt(long = "action_low", default_value = "-1.0", allow_hyphen_values = true)]
    action_low: f64,

    /// Upper bound of the continuous action range
    #[structopt(long = "action_high", default_value = "1.0", allow_hyphen_values = true)]
    action_high: f64,

    /// Bin width per observation dimension for the state discretization
    #[structopt(long = "state_weights", use_delimiter = true, default_value = "0.1,0.05")]
    state_weights: Vec<f64>,

    /// Saturation bound for discretized bucket indices
    #[structopt(long = "bucket_bound", default_value = "100")]
    bucket_bound: i32,

    /// Learning rate of the RL agent
    #[structopt(long = "learning_rate", default_value = "0.05")]
    learning_rate: f64,

    /// Initial value for the exploration ratio
    #[structopt(long = "initial_epsilon", default_value = "1.0")]
    initial_epsilon: f64,

    /// Value to decrease of the exploration ratio at each episode, defaults to initial_epsilon / (n_episodes / 2)
    #[structopt(long = "epsilon_decay", default_value = "NAN")]
    epsilon_decay: f64,

    /// Final value for the exploration ratio
    #[structopt(long = "final_epsilon", default_value = "0.05")]
    final_epsilon: f64,

    /// Discount factor to be used on the temporal difference calculation
    #[structopt(long = "discount_factor", default_value = "0.95")]
    discount_factor: f64,

    /// Evaluate the greedy policy every eval_at episodes
    #[structopt(long = "eval_at", default_value = "100")]
    eval_at: u128,

    /// Number of greedy episodes per evaluation
    #[structopt(long = "eval_for", default_value = "10")]
    eval_for: u128,

    /// Moving average window to be used on the reporting of results
    #[structopt(long = "moving_average_window", default_value = "100")]
    moving_average_window: usize,

    /// Directory where value-table checkpoints are written
    #[structopt(long = "save_dir", parse(from_os_str))]
    save_dir: Option<PathBuf>,

    /// Seed for reproducibility
    #[structopt(long = "seed", default_value = "42")]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli: Cli = Cli::from_args();

    let epsilon_decay: f64 = if cli.epsilon_decay.is_nan() {
        cli.initial_epsilon / (cli.n_episodes as f64 / 2.0)
    } else {
        cli.epsilon_decay
    };

    let config = AgentConfig {
        num_of_action: cli.num_of_action,
        action_range: (cli.action_low, cli.action_high),
        discretize_state_weight: cli.state_weights.clone(),
        bucket_bound: cli.bucket_bound,
        learning_rate: cli.learning_rate,
        initial_epsilon: cli.initial_epsilon,
        epsilon_decay,
        final_epsilon: cli.final_epsilon,
        discount_factor: cli.discount_factor,
        seed: cli.seed,
    };
    config.validate()?;

    let mut env = LineWorldEnv::new(cli.max_steps, cli.seed);

    let mut agents: Vec<(&str, TabularAgent)> = vec![
        ("sarsa", Sarsa::new(&config)?.into()),
        ("monte_carlo", MonteCarlo::new(&config)?.into()),
        ("double_qlearning", DoubleQLearning::new(&config)?.into()),
    ];

    for (name, agent) in agents.iter_mut() {
        let now = Instant::now();
        let (reward_history, _lengths, _errors, _eval_rewards, _eval_lengths) =
            trainer::train(agent, &mut env, cli.n_episodes, cli.eval_at, cli.eval_for)?;
        println!("{} trained in {:.2?}", name, now.elapsed());

        let window: usize = (cli.n_episodes as usize / cli.moving_average_window).max(1);
        let averaged = moving_average(window, &reward_history);
        if let Some(last) = averaged.last() {
            info!("{name}: final moving-average reward {last:.3}");
        }

        if let Some(dir) = &cli.save_dir {
            std::fs::create_dir_all(dir)?;
            checkpoint::save(&dir.join(format!("{name}.json")), agent)?;
        }

        if cli.show_example {
            trainer::example(agent, &mut env)?;
        }
    }

    Ok(())
}
