use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Model checker for Markov chains and Markov decision processes.
#[derive(Parser)]
#[command(
    name = "mdpcheck",
    version,
    about = "Model checking and policy synthesis for Markov chains and MDPs"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file (default: mdpcheck.toml if present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the normalized model.
    Show(ModelArgs),
    /// Simulate one run and print the visited states.
    Simulate(SimulateArgs),
    /// Exact reachability probability for a Markov chain.
    Reach(ReachArgs),
    /// Discounted expected reward per state for a Markov chain.
    Reward(RewardArgs),
    /// Maximal reachability probability per state for an MDP.
    MaxReach(TargetArgs),
    /// Minimal reachability probability per state for an MDP.
    MinReach(TargetArgs),
    /// Monte-Carlo estimate of bounded reachability.
    Estimate(EstimateArgs),
    /// Sequential probability ratio test against a threshold.
    Sprt(SprtArgs),
    /// Optimal policy by value iteration.
    ValueIteration(ValueIterationArgs),
    /// Learned policy by Q-learning.
    QLearning(QLearningArgs),
}

/// Model file and build options shared by every subcommand.
#[derive(clap::Args)]
pub struct ModelArgs {
    /// Path to the model description.
    pub model: PathBuf,

    /// Override the initial state label from config.
    #[arg(long)]
    pub initial: Option<String>,

    /// Fail on states without outgoing transitions instead of adding a self-loop.
    #[arg(long)]
    pub reject_deadlocks: bool,
}

/// Model plus a target state.
#[derive(clap::Args)]
pub struct TargetArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Label of the state to reach.
    #[arg(short, long)]
    pub target: String,
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Number of steps.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub steps: usize,

    /// Ask on stdin which action to take when several are enabled.
    #[arg(short, long)]
    pub interactive: bool,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for the `reach` subcommand.
#[derive(clap::Args)]
pub struct ReachArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Step bound; 0 means unbounded.
    #[arg(short = 'n', long, default_value_t = 0)]
    pub steps: usize,

    /// Print the probability from every state, not only the initial one.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the `reward` subcommand.
#[derive(clap::Args)]
pub struct RewardArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Override the discount factor from config.
    #[arg(short, long)]
    pub gamma: Option<f64>,

    /// Override the step bound from config; 0 means unbounded.
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,
}

/// Arguments for the `estimate` subcommand.
#[derive(clap::Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Override the path length from config.
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,

    /// Override the precision from config.
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Override the error rate from config.
    #[arg(long)]
    pub delta: Option<f64>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for the `sprt` subcommand.
#[derive(clap::Args)]
pub struct SprtArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Override the probability threshold from config.
    #[arg(long)]
    pub theta: Option<f64>,

    /// Override the path length from config.
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,

    /// Override the indifference half-width from config.
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Override the type I error bound from config.
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Override the type II error bound from config.
    #[arg(long)]
    pub beta: Option<f64>,

    /// Override the draw budget from config.
    #[arg(long)]
    pub max_iters: Option<usize>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for the `value-iteration` subcommand.
#[derive(clap::Args)]
pub struct ValueIterationArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Override the discount factor from config.
    #[arg(short, long)]
    pub gamma: Option<f64>,

    /// Override the convergence threshold from config.
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Override the iteration cap from config.
    #[arg(long)]
    pub max_iters: Option<usize>,
}

/// Arguments for the `q-learning` subcommand.
#[derive(clap::Args)]
pub struct QLearningArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Override the discount factor from config.
    #[arg(short, long)]
    pub gamma: Option<f64>,

    /// Override the number of updates from config.
    #[arg(long)]
    pub max_iters: Option<usize>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}
