// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

mod align;
mod annotate;
mod composite;
mod validate;
mod worker;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

pub use align::{align, frame_keys};
pub use annotate::{
    Extraction, FrameGroup, Segment, extract, extract_all, group_object_masks, list_images,
    segment,
};
pub use composite::{composite, composite_frame};
pub use validate::validate;
pub use worker::{PipelineEvent, PipelineHandle};

use crate::config::PipelineConfig;
use crate::ds::{DatasetLayout, FrameKey};
use crate::error::TreeCocoError;
use crate::io::{CocoDocument, CocoInfo};
use crate::ut;
use crate::ut::track::Progress;

/// Units of work reported to an [`Observer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Align,
    Composite,
    ListImages,
    Group,
    Extract,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Stage::Validate => "Validating single tree masks",
            Stage::Align => "Aligning frames",
            Stage::Composite => "Combining masks",
            Stage::ListImages => "Listing combined masks",
            Stage::Group => "Grouping single tree masks",
            Stage::Extract => "Extracting annotations",
            Stage::Write => "Writing COCO document",
        };

        write!(f, "{}", name)
    }
}

/// Receives stage transitions and progress from a running pipeline
pub trait Observer {
    fn stage(&mut self, _stage: Stage) {}

    fn progress(&mut self, _stage: Stage, _completed: usize, _total: usize) {}

    /// Called once per run with the masks that yielded no annotation
    fn extraction(&mut self, _extraction: &Extraction) {}
}

/// An observer that ignores every event
pub struct Quiet;

impl Observer for Quiet {}

// Forwards stage-local progress to an observer
struct StageProgress<'a, O: Observer> {
    observer: &'a mut O,
    stage: Stage,
}

impl<'a, O: Observer> StageProgress<'a, O> {
    fn start(observer: &'a mut O, stage: Stage) -> Self {
        observer.stage(stage);
        StageProgress { observer, stage }
    }
}

impl<O: Observer> Progress for StageProgress<'_, O> {
    fn update(&mut self, completed: usize, total: usize) {
        self.observer.progress(self.stage, completed, total);
    }
}

/// Counts describing a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub removed_masks: usize,
    pub frames: usize,
    pub images: usize,
    pub annotations: usize,
    pub empty_masks: usize,
    pub fragmented_masks: usize,
    pub skipped_masks: usize,
    pub output: PathBuf,
}

/// Converts a simulated dataset into a COCO document
///
/// # Examples
///
/// ```no_run
/// use treecoco_core::config::PipelineConfig;
/// use treecoco_core::pipeline::{Pipeline, Quiet};
///
/// let pipeline = Pipeline::new("/data/forest", PipelineConfig::default());
/// let summary = pipeline.run(&mut Quiet).unwrap();
///
/// println!("{} annotations written to {}", summary.annotations, summary.output.display());
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    layout: DatasetLayout,
    config: PipelineConfig,
}

impl Pipeline {
    /// Initialize a pipeline over a dataset root
    ///
    /// # Arguments
    ///
    /// * `root` - Absolute path to the dataset root
    /// * `config` - Pipeline settings
    pub fn new<P: Into<PathBuf>>(root: P, config: PipelineConfig) -> Self {
        Pipeline {
            layout: DatasetLayout::new(root),
            config,
        }
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    /// Verify the settings and the dataset root before touching any file
    pub fn check(&self) -> Result<(), TreeCocoError> {
        self.config.check()?;
        self.layout.check()
    }

    /// Delete degenerate single tree masks and return how many were removed
    pub fn validate<O: Observer>(&self, observer: &mut O) -> Result<usize, TreeCocoError> {
        let mut progress = StageProgress::start(observer, Stage::Validate);
        validate(&self.layout.single_trees(), &self.config, &mut progress)
    }

    /// Delete files of frames missing from any per-frame directory
    pub fn align<O: Observer>(&self, observer: &mut O) -> Result<BTreeSet<FrameKey>, TreeCocoError> {
        let mut progress = StageProgress::start(observer, Stage::Align);

        let keys = align(
            &self.layout.images(),
            &self.layout.depth(),
            &self.layout.single_trees(),
            &mut progress,
        )?;

        if keys.is_empty() {
            ut::track::progress_warn("No frame is present in Images, Depth, and SingleTrees.");
        }

        Ok(keys)
    }

    /// Keys of the frames currently in the image directory
    pub fn frame_keys(&self) -> Result<BTreeSet<FrameKey>, TreeCocoError> {
        frame_keys(&self.layout.images())
    }

    /// Rebuild the combined mask of every frame
    pub fn composite<O: Observer>(
        &self,
        frame_keys: &BTreeSet<FrameKey>,
        observer: &mut O,
    ) -> Result<BTreeMap<FrameKey, PathBuf>, TreeCocoError> {
        let mut progress = StageProgress::start(observer, Stage::Composite);

        composite(
            frame_keys,
            &self.layout.single_trees(),
            &self.layout.combined_masks(),
            &mut progress,
        )
    }

    /// Build a COCO document from the combined and single tree masks on disk
    pub fn annotate<O: Observer>(
        &self,
        observer: &mut O,
    ) -> Result<(CocoDocument, Extraction), TreeCocoError> {
        let single_trees = self.layout.single_trees();

        let images = list_images(
            &self.layout.combined_masks(),
            &mut StageProgress::start(observer, Stage::ListImages),
        )?;

        let groups = group_object_masks(
            &images,
            &single_trees,
            &mut StageProgress::start(observer, Stage::Group),
        )?;

        let mut extraction = extract_all(
            &groups,
            &single_trees,
            &self.config,
            &mut StageProgress::start(observer, Stage::Extract),
        );

        observer.extraction(&extraction);

        let annotations = std::mem::take(&mut extraction.annotations);

        let document = CocoDocument::new(
            CocoInfo::now(&self.config.description),
            images,
            vec![self.config.category.clone()],
            annotations,
        );

        Ok((document, extraction))
    }

    /// Write a COCO document to the dataset root and return its path
    pub fn write<O: Observer>(
        &self,
        document: &CocoDocument,
        observer: &mut O,
    ) -> Result<PathBuf, TreeCocoError> {
        let mut progress = StageProgress::start(observer, Stage::Write);

        let path = self.layout.coco();
        document.save(&path)?;
        progress.update(1, 1);

        Ok(path)
    }

    /// Run every stage in order
    ///
    /// Stops at the first error. Files removed or written by earlier stages
    /// stay removed or written.
    pub fn run<O: Observer>(&self, observer: &mut O) -> Result<RunSummary, TreeCocoError> {
        self.check()?;

        let removed_masks = self.validate(observer)?;
        let keys = self.align(observer)?;
        self.composite(&keys, observer)?;

        let (document, extraction) = self.annotate(observer)?;
        let output = self.write(&document, observer)?;

        Ok(RunSummary {
            removed_masks,
            frames: keys.len(),
            images: document.images.len(),
            annotations: document.annotations.len(),
            empty_masks: extraction.empty.len(),
            fragmented_masks: extraction.fragmented.len(),
            skipped_masks: extraction.skipped.len(),
            output,
        })
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[derive(Default)]
    struct Recorder {
        stages: Vec<Stage>,
    }

    impl Observer for Recorder {
        fn stage(&mut self, stage: Stage) {
            self.stages.push(stage);
        }
    }

    fn dataset() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        for name in crate::constant::REQUIRED_DIRS {
            std::fs::create_dir(root.path().join(name)).unwrap();
        }
        root
    }

    #[test]
    fn test_check_missing_directory() {
        let root = dataset();
        std::fs::remove_dir(root.path().join("Masks")).unwrap();

        let pipeline = Pipeline::new(root.path(), PipelineConfig::default());

        assert_eq!(
            pipeline.check(),
            Err(TreeCocoError::MissingDirectory("Masks".to_string()))
        );
    }

    #[test]
    fn test_run_empty_dataset() {
        let root = dataset();
        let pipeline = Pipeline::new(root.path(), PipelineConfig::default());

        let mut recorder = Recorder::default();
        let summary = pipeline.run(&mut recorder).unwrap();

        assert_eq!(
            recorder.stages,
            vec![
                Stage::Validate,
                Stage::Align,
                Stage::Composite,
                Stage::ListImages,
                Stage::Group,
                Stage::Extract,
                Stage::Write
            ]
        );
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.annotations, 0);
        assert_eq!(summary.output, root.path().join("coco.json"));

        let document = CocoDocument::open(&summary.output).unwrap();
        assert!(document.images.is_empty());
        assert_eq!(document.categories.len(), 1);
    }
}
