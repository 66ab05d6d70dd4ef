// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::PathBuf;

use clap::Args;

use treecoco_core::config::PipelineConfig;
use treecoco_core::error::TreeCocoError;
use treecoco_core::pipeline::{Extraction, Observer, Pipeline, Stage};
use treecoco_core::ut;
use treecoco_core::ut::track::{Progress, ProgressBar};

/// Dataset and settings shared by every command
#[derive(Debug, Args)]
pub struct DatasetArgs {
    #[arg(short = 'i', long, help = "Absolute path to the dataset root.", required = true)]
    pub input: PathBuf,

    #[arg(short = 'c', long, help = "JSON configuration file.")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Pixel count of every dataset image (width * height).")]
    pub total_pixels: Option<u64>,

    #[arg(long, help = "Channel values at or below this are background noise.")]
    pub noise_threshold: Option<u8>,

    #[arg(long, help = "Description written to the COCO info block.")]
    pub description: Option<String>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

impl DatasetArgs {
    /// Configuration file settings with command line overrides applied
    pub fn pipeline_config(&self) -> Result<PipelineConfig, TreeCocoError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::open(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(total_pixels) = self.total_pixels {
            config.total_pixels = total_pixels;
        }

        if let Some(noise_threshold) = self.noise_threshold {
            config.noise_threshold = noise_threshold;
        }

        if let Some(description) = &self.description {
            config.description = description.clone();
        }

        config.check()?;
        Ok(config)
    }
}

/// Build a pipeline over a checked dataset root or exit
pub fn open_pipeline(args: &DatasetArgs) -> Pipeline {
    let config = args.pipeline_config().unwrap_or_else(|err| exit_with(err));
    let pipeline = Pipeline::new(&args.input, config);

    pipeline.check().unwrap_or_else(|err| exit_with(err));

    ut::track::progress_log(
        &format!("Dataset root {}.", pipeline.layout().root().display()),
        args.verbose,
    );

    pipeline
}

/// Print an error and exit with a failure status
pub fn exit_with(err: TreeCocoError) -> ! {
    eprintln!("{}", err);
    std::process::exit(1);
}

/// Logs stage transitions and draws one progress bar per stage
pub struct CliObserver {
    verbose: bool,
    bar: Option<ProgressBar>,
}

impl CliObserver {
    pub fn new(verbose: bool) -> Self {
        CliObserver { verbose, bar: None }
    }
}

impl Observer for CliObserver {
    fn stage(&mut self, stage: Stage) {
        self.bar = Some(ProgressBar::new(&stage.to_string(), self.verbose));
    }

    fn progress(&mut self, _stage: Stage, completed: usize, total: usize) {
        if let Some(bar) = self.bar.as_mut() {
            bar.update(completed, total);
        }
    }

    fn extraction(&mut self, extraction: &Extraction) {
        for name in extraction.empty.iter() {
            ut::track::progress_log(&format!("No tree pixels in {}.", name), self.verbose);
        }

        for name in extraction.fragmented.iter() {
            ut::track::progress_log(
                &format!("Tree in {} is split into several regions.", name),
                self.verbose,
            );
        }
    }
}
