// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::Args;

use treecoco_core::ut;

use crate::dataset::{CliObserver, DatasetArgs, exit_with, open_pipeline};

#[derive(Debug, Args)]
#[command(about = "Delete images, depth maps, and single tree masks of incomplete frames.")]
pub struct StageAlignArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

pub fn stage_align(args: &StageAlignArgs) {
    let pipeline = open_pipeline(&args.dataset);

    let keys = pipeline
        .align(&mut CliObserver::new(args.dataset.verbose))
        .unwrap_or_else(|err| exit_with(err));

    ut::track::progress_log(
        &format!(
            "Complete. {} frames aligned.",
            ut::track::thousands_format(keys.len())
        ),
        args.dataset.verbose,
    );
}
