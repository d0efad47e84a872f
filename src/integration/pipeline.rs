//! TrackerPipeline for driving a detection source through the tracker.

use thiserror::Error;
use tracing::{info, warn};

use crate::config::TrackingConfig;
use crate::error::TrackError;
use crate::tracker::{Annotation, Label, MaskTracker, Tube, TubeCollector};

use super::DetectionSource;

#[derive(Debug, Error)]
pub enum PipelineError<E> {
    #[error("detection source failed: {0}")]
    Source(E),
    #[error(transparent)]
    Track(#[from] TrackError),
}

/// Per-frame output for an overlay renderer.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub frame_number: u32,
    /// Instances live in this frame
    pub annotations: Vec<Annotation>,
    /// Number of instances that lapsed in this frame
    pub evicted: usize,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub frame_count: usize,
    pub export_enabled: bool,
    /// Tubes that passed the minimum-duration filter, in eviction order
    pub tubes: Vec<Tube>,
}

/// Combines a `DetectionSource` with the `MaskTracker` and tube collection.
pub struct TrackerPipeline<D: DetectionSource> {
    source: D,
    tracker: MaskTracker,
    labels: Vec<Label>,
    tubes: TubeCollector,
    frame_count: usize,
    next_frame: u32,
}

impl<D: DetectionSource> TrackerPipeline<D> {
    /// Create a new pipeline over `source`.
    ///
    /// At most `stop_after_frame` frames are processed. Tube export is
    /// disabled, with a warning, when that many frames are fewer than the
    /// minimum tube length; tracking still runs.
    pub fn new(source: D, config: &TrackingConfig) -> Self {
        let frame_count = config.frame_limit(source.frame_count());
        let mut tubes = TubeCollector::new(config.min_tube_length, config.export_tubes);
        if tubes.is_enabled() && frame_count < config.min_tube_length as usize {
            warn!(
                frame_count,
                min_tube_length = config.min_tube_length,
                "video is shorter than the minimum tube length, skipping tube export"
            );
            tubes.disable();
        }

        let labels = config.resolve_labels(&source.labels());
        if labels.is_empty() {
            warn!("no labels to track, every frame will be empty");
        }
        info!(frame_count, labels = labels.len(), export = tubes.is_enabled(), "pipeline ready");

        Self {
            source,
            tracker: MaskTracker::new().with_parallel_scoring(config.parallel_scoring),
            labels,
            tubes,
            frame_count,
            next_frame: 0,
        }
    }

    /// Track the next frame. Returns `None` once the stream is exhausted.
    pub fn process_frame(&mut self) -> Result<Option<FrameOutput>, PipelineError<D::Error>> {
        let frame_number = self.next_frame;
        if frame_number as usize >= self.frame_count {
            return Ok(None);
        }

        let mut detections = Vec::new();
        for label in &self.labels {
            let found = self
                .source
                .detect(frame_number, label)
                .map_err(PipelineError::Source)?;
            detections.extend(found);
        }

        let update = self.tracker.update(frame_number, detections)?;
        let annotations = self.tracker.annotations(frame_number)?;
        self.tubes.absorb(&update.evicted);
        self.next_frame += 1;

        Ok(Some(FrameOutput {
            frame_number,
            annotations,
            evicted: update.evicted.len(),
        }))
    }

    /// Process every remaining frame, then finish the run.
    pub fn run(mut self) -> Result<RunSummary, PipelineError<D::Error>> {
        while self.process_frame()?.is_some() {}
        Ok(self.finish())
    }

    /// Force-evict the instances that survived to the last frame and return
    /// the accepted tubes.
    pub fn finish(mut self) -> RunSummary {
        let remaining = self.tracker.finish();
        self.tubes.absorb(&remaining);

        let export_enabled = self.tubes.is_enabled();
        let finalized = self.tubes.pending();
        let tubes = self.tubes.finish();
        info!(
            frames = self.next_frame,
            finalized,
            accepted = tubes.len(),
            "tracking finished"
        );

        RunSummary {
            frame_count: self.frame_count,
            export_enabled,
            tubes,
        }
    }

    /// Number of frames this run will process.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Labels queried each frame, in commit order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get a reference to the underlying detection source.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &MaskTracker {
        &self.tracker
    }
}
