// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::Args;

use treecoco_core::ut;

use crate::dataset::{CliObserver, DatasetArgs, exit_with, open_pipeline};

#[derive(Debug, Args)]
#[command(about = "Rebuild NewMasks with one combined mask per frame in Images.")]
pub struct StageCompositeArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

pub fn stage_composite(args: &StageCompositeArgs) {
    let pipeline = open_pipeline(&args.dataset);

    let keys = pipeline.frame_keys().unwrap_or_else(|err| exit_with(err));

    let combined = pipeline
        .composite(&keys, &mut CliObserver::new(args.dataset.verbose))
        .unwrap_or_else(|err| exit_with(err));

    ut::track::progress_log(
        &format!(
            "Complete. {} combined masks written to {}.",
            ut::track::thousands_format(combined.len()),
            pipeline.layout().combined_masks().display()
        ),
        args.dataset.verbose,
    );
}
