// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::Args;

use treecoco_core::ut;

use crate::dataset::{CliObserver, DatasetArgs, exit_with, open_pipeline};

#[derive(Debug, Args)]
#[command(about = "Delete single tree masks with too little or too much background.")]
pub struct StageValidateArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

pub fn stage_validate(args: &StageValidateArgs) {
    let pipeline = open_pipeline(&args.dataset);

    let removed = pipeline
        .validate(&mut CliObserver::new(args.dataset.verbose))
        .unwrap_or_else(|err| exit_with(err));

    ut::track::progress_log(
        &format!(
            "Complete. {} single tree masks removed.",
            ut::track::thousands_format(removed)
        ),
        args.dataset.verbose,
    );
}
