//! Mask-overlap instance tracking and tube extraction.
//!
//! Per-frame segmentation detections are linked into instances by greedy
//! pixel-intersection matching against the previous frame. Instances that
//! stop receiving detections are evicted and reduced to [`Tube`]s: the
//! bounding box and frame range an external writer crops a mini-video from.

pub mod config;
pub mod error;
pub mod integration;
pub mod tracker;

pub use config::TrackingConfig;
pub use error::TrackError;
pub use integration::{DetectionBuilder, DetectionSource, JsonDetectionSource, TrackerPipeline};
pub use tracker::{Detection, Instance, InstanceId, InstanceStore, Label, MaskTracker, Quad, Tube};
