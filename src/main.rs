mod cli;
mod common;
mod config;
mod convert;
mod exact_cmd;
mod interactive;
mod logging;
mod reader;
mod rl_cmd;
mod show_cmd;
mod simulate_cmd;
mod smc_cmd;

use std::io::{self, Write};
use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::MdpcheckConfig;
use crate::exact_cmd::Bound;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = MdpcheckConfig::load(cli.config.as_deref())
        .and_then(|config| run(cli.command, &config, &mut io::stdout().lock()));
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command, config: &MdpcheckConfig, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Show(args) => show_cmd::run(args, config, out),
        Command::Simulate(args) => simulate_cmd::run(args, config, out),
        Command::Reach(args) => exact_cmd::reach(args, config, out),
        Command::Reward(args) => exact_cmd::reward(args, config, out),
        Command::MaxReach(args) => exact_cmd::bound(args, Bound::Max, config, out),
        Command::MinReach(args) => exact_cmd::bound(args, Bound::Min, config, out),
        Command::Estimate(args) => smc_cmd::estimate(args, config, out),
        Command::Sprt(args) => smc_cmd::sprt(args, config, out),
        Command::ValueIteration(args) => rl_cmd::value_iter(args, config, out),
        Command::QLearning(args) => rl_cmd::q_learn(args, config, out),
    }
}
