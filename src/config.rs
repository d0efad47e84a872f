//! Run configuration, loadable from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tracker::Label;

/// Labels that are produced by the segmentation but never tracked.
pub const DEFAULT_EXCLUDED_LABELS: [&str; 6] = ["Car", "Default", "UI", "Ground", "Water", "Lighting"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for a tracking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Labels queried from the detection source, in processing order.
    /// Empty means every label the source reports.
    pub labels: Vec<String>,
    /// Labels that are skipped even if listed in `labels`.
    pub excluded_labels: Vec<String>,
    pub frame_rate: u32,
    /// Minimum `max_frame - min_frame` for a tube to be exported.
    pub min_tube_length: u32,
    /// Pixels added to each side of a tube crop.
    pub tube_padding: u32,
    pub export_tubes: bool,
    /// Score detections on the rayon pool before committing them in order.
    pub parallel_scoring: bool,
    /// Process at most this many frames.
    pub stop_after_frame: Option<u32>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            excluded_labels: DEFAULT_EXCLUDED_LABELS.iter().map(|s| s.to_string()).collect(),
            frame_rate: 30,
            min_tube_length: 30,
            tube_padding: 50,
            export_tubes: true,
            parallel_scoring: false,
            stop_after_frame: None,
        }
    }
}

impl TrackingConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn is_excluded(&self, label: &Label) -> bool {
        self.excluded_labels.iter().any(|l| l == label.as_str())
    }

    /// Configured labels minus the excluded ones, in configured order.
    /// Repeated labels are kept once, at their first position.
    pub fn tracked_labels(&self) -> Vec<Label> {
        self.resolve_labels(&[])
    }

    /// Like `tracked_labels`, but falls back to `available` when no labels
    /// are configured.
    pub fn resolve_labels(&self, available: &[Label]) -> Vec<Label> {
        let candidates: Vec<Label> = if self.labels.is_empty() {
            available.to_vec()
        } else {
            self.labels.iter().map(Label::new).collect()
        };
        let mut labels: Vec<Label> = Vec::with_capacity(candidates.len());
        for label in candidates {
            if !self.is_excluded(&label) && !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }

    /// Number of frames to process out of `available`.
    pub fn frame_limit(&self, available: usize) -> usize {
        match self.stop_after_frame {
            Some(cap) => available.min(cap as usize),
            None => available,
        }
    }
}
