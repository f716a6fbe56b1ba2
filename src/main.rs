use std::{error::Error, path::PathBuf};

use burn::{
    backend::{ndarray::NdArrayDevice, NdArray},
    config::Config,
};
use clap::Parser;
use linear_sarsa::{
    algo::{LinearSarsaAgent, LinearSarsaConfig},
    env::DiscreteActionSpace,
    gym::{GridFeatures, GridWorld},
    viz,
};
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::EnvFilter;

type TrainBackend = NdArray;

/// Train a linear SARSA agent on the 3x4 grid world and print what it learned
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file with a saved training configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the effective configuration to this JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,
    #[arg(long)]
    episodes: Option<usize>,
    #[arg(long)]
    gamma: Option<f32>,
    #[arg(long)]
    learning_rate: Option<f32>,
    /// Exploration rate of every step after the first, divided by the temperature
    #[arg(long)]
    epsilon: Option<f32>,
    /// Exploration rate of the first step of each episode
    #[arg(long)]
    start_epsilon: Option<f32>,
    /// Reward for entering any non-terminal cell
    #[arg(long, default_value_t = -0.1, allow_negative_numbers = true)]
    step_cost: f32,
    /// Seed for weight initialization and exploration
    #[arg(long)]
    seed: Option<u64>,
    /// Write per-episode steps and return to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl Args {
    fn training_config(&self) -> Result<LinearSarsaConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => LinearSarsaConfig::load(path)?,
            None => LinearSarsaConfig::new(),
        };
        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(gamma) = self.gamma {
            config.gamma = gamma;
        }
        if let Some(learning_rate) = self.learning_rate {
            config.learning_rate = learning_rate;
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(start_epsilon) = self.start_epsilon {
            config.start_epsilon = start_epsilon;
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.training_config()?;
    if let Some(path) = &args.save_config {
        config.save(path)?;
    }

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let device = NdArrayDevice::default();

    let mut env = GridWorld::negative(args.step_cost);
    let mut agent = LinearSarsaAgent::<TrainBackend, GridFeatures, GridWorld>::new(
        GridFeatures::default(),
        &config,
        rng,
        &device,
    );

    let mut wtr = args.csv.as_ref().map(csv::Writer::from_path).transpose()?;
    if let Some(wtr) = wtr.as_mut() {
        wtr.write_record(["episode", "steps", "reward"])?;
    }

    info!(
        "training for {} episodes on a {}x{} grid with step cost {}",
        config.episodes,
        env.rows(),
        env.cols(),
        args.step_cost
    );
    for i in 0..config.episodes {
        agent.go(&mut env);
        let report = env.report.take();
        if let Some(wtr) = wtr.as_mut() {
            wtr.write_record(&[
                i.to_string(),
                report["steps"].to_string(),
                report["reward"].to_string(),
            ])?;
        }
    }
    if let Some(mut wtr) = wtr {
        wtr.flush()?;
    }

    let actions = env.actions();
    for s in env.active_states() {
        debug!("{s:?} {:?}", agent.model().q_values(&s, &actions));
    }

    let tables = viz::greedy_tables(agent.model(), &env);
    println!("Final Values:");
    print!("{}", viz::render_values(&tables.values, env.rows(), env.cols()));
    println!("Final Policy");
    print!("{}", viz::render_policy(&tables.policy, env.rows(), env.cols()));

    Ok(())
}
