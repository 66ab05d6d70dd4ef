// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::Args;

use treecoco_core::ut;

use crate::dataset::{CliObserver, DatasetArgs, exit_with, open_pipeline};

#[derive(Debug, Args)]
#[command(about = "Validate, align, and combine masks, then write coco.json to the dataset root.")]
pub struct RunArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

pub fn run(args: &RunArgs) {
    let verbose = args.dataset.verbose;
    let pipeline = open_pipeline(&args.dataset);

    let mut observer = CliObserver::new(verbose);
    let summary = pipeline
        .run(&mut observer)
        .unwrap_or_else(|err| exit_with(err));

    ut::track::progress_log(
        &format!(
            "Removed {} single tree masks. Aligned {} frames.",
            ut::track::thousands_format(summary.removed_masks),
            ut::track::thousands_format(summary.frames),
        ),
        verbose,
    );

    if summary.empty_masks + summary.fragmented_masks + summary.skipped_masks > 0 {
        ut::track::progress_log(
            &format!(
                "{} masks without trees, {} masks with split trees, {} masks skipped.",
                ut::track::thousands_format(summary.empty_masks),
                ut::track::thousands_format(summary.fragmented_masks),
                ut::track::thousands_format(summary.skipped_masks),
            ),
            verbose,
        );
    }

    ut::track::progress_log(
        &format!(
            "Complete. {} annotations across {} images written to {}.",
            ut::track::thousands_format(summary.annotations),
            ut::track::thousands_format(summary.images),
            summary.output.display()
        ),
        verbose,
    );
}
