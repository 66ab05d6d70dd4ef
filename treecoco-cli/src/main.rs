// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::{Parser, Subcommand};
use treecoco_cli::{run, stage};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Run(run::RunArgs),
    Stage(stage::StageArgs),
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Run(run_args)) => run::run(run_args),
        Some(Commands::Stage(stage_args)) => stage::stage(stage_args),
        None => {}
    }
}
