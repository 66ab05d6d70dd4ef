// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::{Args, Subcommand};

mod align;
mod annotate;
mod composite;
mod validate;

use align::{StageAlignArgs, stage_align};
use annotate::{StageAnnotateArgs, stage_annotate};
use composite::{StageCompositeArgs, stage_composite};
use validate::{StageValidateArgs, stage_validate};

#[derive(Debug, Args)]
#[command(about = "Run a single pipeline stage on a dataset root.")]
#[command(args_conflicts_with_subcommands = true)]
#[command(arg_required_else_help = true)]
#[command(flatten_help = true)]
pub struct StageArgs {
    #[command(subcommand)]
    command: Option<StageCommands>,
}

#[derive(Debug, Subcommand)]
enum StageCommands {
    Validate(StageValidateArgs),
    Align(StageAlignArgs),
    Composite(StageCompositeArgs),
    Annotate(StageAnnotateArgs),
}

pub fn stage(args: &StageArgs) {
    match args.command.as_ref() {
        Some(StageCommands::Validate(validate)) => stage_validate(validate),
        Some(StageCommands::Align(align)) => stage_align(align),
        Some(StageCommands::Composite(composite)) => stage_composite(composite),
        Some(StageCommands::Annotate(annotate)) => stage_annotate(annotate),
        None => {}
    }
}
