use anyhow::Result;
use kdam::{tqdm, BarExt};
use log::info;

use crate::agent::Agent;
use crate::env::Env;

pub type TrainResults = (Vec<f64>, Vec<u128>, Vec<f64>, Vec<f64>, Vec<f64>);

/// Runs `n_episodes` of training, evaluating the greedy policy for
/// `eval_for` episodes every `eval_at` episodes (skipped when either is
/// zero). Actions selected for the next observation are fed back into the
/// update, so on-policy algorithms see the action that is actually taken.
pub fn train(
    agent: &mut impl Agent,
    env: &mut dyn Env,
    n_episodes: u128,
    eval_at: u128,
    eval_for: u128,
) -> Result<TrainResults> {
    let mut training_reward: Vec<f64> = vec![];
    let mut training_length: Vec<u128> = vec![];
    let mut evaluation_reward: Vec<f64> = vec![];
    let mut evaluation_length: Vec<f64> = vec![];

    let mut pb = tqdm!(total = n_episodes as usize);
    for episode in 0..n_episodes {
        let mut action_counter: u128 = 0;
        let mut epi_reward: f64 = 0.0;
        let mut curr_obs = env.reset();
        let mut curr_action: usize = agent.select_action(&curr_obs)?;

        loop {
            action_counter += 1;
            let action_value: f64 = agent.action_space().to_continuous(curr_action);
            let (next_obs, reward, terminated) = env.step(action_value)?;
            let next_action: usize = agent.select_action(&next_obs)?;
            agent.update(
                &curr_obs,
                curr_action,
                reward,
                terminated,
                &next_obs,
                next_action,
            )?;
            curr_obs = next_obs;
            curr_action = next_action;
            epi_reward += reward;
            if terminated {
                training_reward.push(epi_reward);
                break;
            }
        }

        if eval_at > 0 && eval_for > 0 && episode % eval_at == 0 {
            let (rewards, lengths) = evaluate(agent, env, eval_for)?;
            let mean_reward: f64 = rewards.iter().sum::<f64>() / rewards.len() as f64;
            let mean_length: f64 = lengths.iter().sum::<u128>() as f64 / lengths.len() as f64;
            pb.set_postfix(format!(
                "eval reward={mean_reward:.1}, eval ep len={mean_length:.1}"
            ));
            info!(
                "episode {episode}: eval reward {mean_reward:.3}, eval length {mean_length:.3}"
            );
            evaluation_reward.push(mean_reward);
            evaluation_length.push(mean_length);
        }
        pb.update(1)?;
        training_length.push(action_counter);
    }

    Ok((
        training_reward,
        training_length,
        agent.get_training_error().to_vec(),
        evaluation_reward,
        evaluation_length,
    ))
}

/// Greedy rollouts with exploration disabled; the tables are not updated.
pub fn evaluate(
    agent: &mut impl Agent,
    env: &mut dyn Env,
    n_episodes: u128,
) -> Result<(Vec<f64>, Vec<u128>)> {
    let mut reward_history: Vec<f64> = vec![];
    let mut episode_length: Vec<u128> = vec![];
    for _episode in 0..n_episodes {
        let mut action_counter: u128 = 0;
        let mut epi_reward: f64 = 0.0;
        let mut curr_action: usize = agent.best_action(&env.reset())?;
        loop {
            action_counter += 1;
            let action_value: f64 = agent.action_space().to_continuous(curr_action);
            let (obs, reward, terminated) = env.step(action_value)?;
            curr_action = agent.best_action(&obs)?;
            epi_reward += reward;
            if terminated {
                reward_history.push(epi_reward);
                break;
            }
        }
        episode_length.push(action_counter);
    }
    Ok((reward_history, episode_length))
}

/// Plays one greedy episode, printing the rendered environment at each step.
pub fn example(agent: &mut impl Agent, env: &mut dyn Env) -> Result<()> {
    let mut epi_reward: f64 = 0.0;
    let mut curr_action: usize = agent.best_action(&env.reset())?;
    let mut steps: i32 = 0;
    loop {
        steps += 1;
        println!("{}", env.render());
        let action_value: f64 = agent.action_space().to_continuous(curr_action);
        let (next_obs, reward, terminated) = env.step(action_value)?;
        curr_action = agent.best_action(&next_obs)?;
        epi_reward += reward;
        if terminated {
            println!("{}", env.render());
            println!("episode reward {:?}", epi_reward);
            println!("terminated with {:?} steps", steps);
            break Ok(());
        }
    }
}
