//! Detection source backed by a pre-extracted JSON detection file.
//!
//! Masks are stored as foreground runs `[row, col_start, len]`. Frame numbers
//! are the positions in the `frames` array.

use std::fs;
use std::path::Path;

use ndarray::s;
use serde::Deserialize;
use thiserror::Error;

use super::DetectionSource;
use crate::tracker::{Detection, Label, Mask, Quad};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read detections: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse detections: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame {frame}: mask run {run:?} lies outside the {width}x{height} frame")]
    RunOutOfBounds {
        frame: usize,
        run: [u32; 3],
        width: u32,
        height: u32,
    },
    #[error("frame {0} is past the end of the stream")]
    FrameOutOfRange(u32),
}

#[derive(Debug, Deserialize)]
struct DetectionFile {
    width: u32,
    height: u32,
    frames: Vec<FrameEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct FrameEntry {
    #[serde(default)]
    detections: Vec<DetectionEntry>,
}

#[derive(Debug, Deserialize)]
struct DetectionEntry {
    label: String,
    axis_bbox: [[i32; 2]; 4],
    rotated_bbox: Option<[[i32; 2]; 4]>,
    mask: Vec<[u32; 3]>,
}

/// In-memory detection stream decoded from JSON.
#[derive(Debug)]
pub struct JsonDetectionSource {
    width: u32,
    height: u32,
    frames: Vec<Vec<Detection>>,
    /// Distinct labels in first-seen order
    labels: Vec<Label>,
}

impl JsonDetectionSource {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, SourceError> {
        let file: DetectionFile = serde_json::from_str(data)?;
        let (width, height) = (file.width, file.height);

        let mut frames = Vec::with_capacity(file.frames.len());
        for (frame, entry) in file.frames.into_iter().enumerate() {
            let detections = entry
                .detections
                .into_iter()
                .map(|d| {
                    let mask = decode_runs(&d.mask, width, height, frame)?;
                    let axis_bbox = Quad::from_points(d.axis_bbox);
                    let rotated_bbox = d.rotated_bbox.map(Quad::from_points).unwrap_or(axis_bbox);
                    Ok(Detection::new(Label::new(&d.label), mask, axis_bbox, rotated_bbox))
                })
                .collect::<Result<Vec<_>, SourceError>>()?;
            frames.push(detections);
        }

        let mut labels: Vec<Label> = Vec::new();
        for det in frames.iter().flatten() {
            if !labels.contains(&det.label) {
                labels.push(det.label.clone());
            }
        }

        Ok(Self {
            width,
            height,
            frames,
            labels,
        })
    }
}

fn decode_runs(runs: &[[u32; 3]], width: u32, height: u32, frame: usize) -> Result<Mask, SourceError> {
    let mut mask = Mask::zeros((height as usize, width as usize));
    for &run in runs {
        let [row, start, len] = run;
        let end = start.checked_add(len).filter(|&e| e <= width);
        let Some(end) = end.filter(|_| row < height) else {
            return Err(SourceError::RunOutOfBounds {
                frame,
                run,
                width,
                height,
            });
        };
        mask.slice_mut(s![row as usize, start as usize..end as usize]).fill(255);
    }
    Ok(mask)
}

impl DetectionSource for JsonDetectionSource {
    type Error = SourceError;

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn labels(&self) -> Vec<Label> {
        self.labels.clone()
    }

    fn detect(&mut self, frame_number: u32, label: &Label) -> Result<Vec<Detection>, Self::Error> {
        let frame = self
            .frames
            .get(frame_number as usize)
            .ok_or(SourceError::FrameOutOfRange(frame_number))?;
        Ok(frame.iter().filter(|d| &d.label == label).cloned().collect())
    }
}
