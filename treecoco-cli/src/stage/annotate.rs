// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::Args;

use treecoco_core::ut;

use crate::dataset::{CliObserver, DatasetArgs, exit_with, open_pipeline};

#[derive(Debug, Args)]
#[command(about = "Write coco.json from the combined and single tree masks.")]
pub struct StageAnnotateArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

pub fn stage_annotate(args: &StageAnnotateArgs) {
    let pipeline = open_pipeline(&args.dataset);
    let mut observer = CliObserver::new(args.dataset.verbose);

    let (document, _) = pipeline
        .annotate(&mut observer)
        .unwrap_or_else(|err| exit_with(err));

    let output = pipeline
        .write(&document, &mut observer)
        .unwrap_or_else(|err| exit_with(err));

    ut::track::progress_log(
        &format!(
            "Complete. {} annotations across {} images written to {}.",
            ut::track::thousands_format(document.annotations.len()),
            ut::track::thousands_format(document.images.len()),
            output.display()
        ),
        args.dataset.verbose,
    );
}
