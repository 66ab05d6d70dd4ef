// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::sync::mpsc::{self, Receiver, Sender, TryIter};
use std::thread::{self, JoinHandle};

use crate::error::TreeCocoError;
use crate::pipeline::{Observer, Pipeline, RunSummary, Stage};

/// Events sent by a pipeline running on a background thread
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Stage(Stage),
    Progress {
        stage: Stage,
        completed: usize,
        total: usize,
    },
    Finished(RunSummary),
    Failed(String),
}

struct ChannelObserver {
    sender: Sender<PipelineEvent>,
}

impl ChannelObserver {
    // A dropped receiver only means nobody is listening
    fn send(&self, event: PipelineEvent) {
        let _ = self.sender.send(event);
    }
}

impl Observer for ChannelObserver {
    fn stage(&mut self, stage: Stage) {
        self.send(PipelineEvent::Stage(stage));
    }

    fn progress(&mut self, stage: Stage, completed: usize, total: usize) {
        self.send(PipelineEvent::Progress {
            stage,
            completed,
            total,
        });
    }
}

/// A pipeline running on a background thread
///
/// Events arrive in the order they were produced and end with either
/// [`PipelineEvent::Finished`] or [`PipelineEvent::Failed`].
pub struct PipelineHandle {
    events: Receiver<PipelineEvent>,
    handle: JoinHandle<Result<RunSummary, TreeCocoError>>,
}

impl PipelineHandle {
    /// Receiver of every event sent by the run
    pub fn events(&self) -> &Receiver<PipelineEvent> {
        &self.events
    }

    /// Events already sent, without blocking
    pub fn try_events(&self) -> TryIter<'_, PipelineEvent> {
        self.events.try_iter()
    }

    /// Whether the run has returned
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run to return
    pub fn join(self) -> Result<RunSummary, TreeCocoError> {
        self.handle
            .join()
            .map_err(|_| TreeCocoError::WorkerError("pipeline thread panicked".to_string()))?
    }
}

impl Pipeline {
    /// Run every stage on a background thread
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use treecoco_core::config::PipelineConfig;
    /// use treecoco_core::pipeline::{Pipeline, PipelineEvent};
    ///
    /// let handle = Pipeline::new("/data/forest", PipelineConfig::default()).spawn();
    ///
    /// for event in handle.events().iter() {
    ///     if let PipelineEvent::Progress { stage, completed, total } = event {
    ///         println!("{}: {}/{}", stage, completed, total);
    ///     }
    /// }
    ///
    /// let summary = handle.join();
    /// ```
    pub fn spawn(self) -> PipelineHandle {
        let (sender, events) = mpsc::channel();

        let handle = thread::spawn(move || {
            let mut observer = ChannelObserver { sender };
            let result = self.run(&mut observer);

            match &result {
                Ok(summary) => observer.send(PipelineEvent::Finished(summary.clone())),
                Err(err) => observer.send(PipelineEvent::Failed(err.to_string())),
            }

            result
        });

        PipelineHandle { events, handle }
    }
}
