#![allow(clippy::all)]
use clap::{Parser, Subcommand};
use clap_markdown;

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
    clap_markdown::print_help_markdown::<Cli>();
}
