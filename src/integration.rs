//! Integration module for connecting detection providers with the tracker.
//!
//! This module provides the `DetectionSource` trait, a builder for
//! detections, a JSON-backed source and the `TrackerPipeline` that runs a
//! source through tracking and tube extraction.

mod builder;
mod detector;
mod json_source;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::DetectionSource;
pub use json_source::{JsonDetectionSource, SourceError};
pub use pipeline::{FrameOutput, PipelineError, RunSummary, TrackerPipeline};
