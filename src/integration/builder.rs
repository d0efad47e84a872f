//! Builder for creating Detection objects from contour-step outputs.

use ndarray::s;

use crate::error::{Result, TrackError};
use crate::tracker::{Detection, Label, Mask, Quad};

/// Builder for creating `Detection` objects.
///
/// The mask can be supplied directly or rasterized from the axis-aligned box
/// with [`DetectionBuilder::fill_bbox`].
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    label: Option<Label>,
    frame_size: Option<(u32, u32)>,
    mask: Option<Mask>,
    axis_bbox: Option<Quad>,
    rotated_bbox: Option<Quad>,
    fill_bbox: bool,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<Label>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the frame dimensions (width, height) used when rasterizing.
    pub fn frame_size(mut self, width: u32, height: u32) -> Self {
        self.frame_size = Some((width, height));
        self
    }

    pub fn mask(mut self, mask: Mask) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Set the axis-aligned box in XYWH format (top-left x, top-left y, width, height).
    pub fn xywh(mut self, x: i32, y: i32, w: i32, h: i32) -> Self {
        self.axis_bbox = Some(Quad::from_xywh(x, y, w, h));
        self
    }

    pub fn axis_bbox(mut self, bbox: Quad) -> Self {
        self.axis_bbox = Some(bbox);
        self
    }

    /// Set the rotated box. Defaults to the axis-aligned box.
    pub fn rotated_bbox(mut self, bbox: Quad) -> Self {
        self.rotated_bbox = Some(bbox);
        self
    }

    /// Use the axis-aligned box, clipped to the frame, as the mask.
    pub fn fill_bbox(mut self) -> Self {
        self.fill_bbox = true;
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Result<Detection> {
        let label = self.label.ok_or(TrackError::IncompleteDetection("label"))?;
        let axis_bbox = self.axis_bbox.ok_or(TrackError::IncompleteDetection("axis_bbox"))?;
        let mask = match (self.mask, self.fill_bbox, self.frame_size) {
            (Some(mask), _, _) => mask,
            (None, true, Some((w, h))) => rasterize(&axis_bbox, w, h),
            (None, true, None) => return Err(TrackError::IncompleteDetection("frame_size")),
            (None, false, _) => return Err(TrackError::IncompleteDetection("mask")),
        };
        let rotated_bbox = self.rotated_bbox.unwrap_or(axis_bbox);
        Ok(Detection::new(label, mask, axis_bbox, rotated_bbox))
    }
}

fn rasterize(bbox: &Quad, width: u32, height: u32) -> Mask {
    let (w, h) = (width as i32, height as i32);
    let [x0, y0, x1, y1] = bbox.extent();
    let (x0, x1) = (x0.clamp(0, w) as usize, x1.clamp(0, w) as usize);
    let (y0, y1) = (y0.clamp(0, h) as usize, y1.clamp(0, h) as usize);
    let mut mask = Mask::zeros((height as usize, width as usize));
    mask.slice_mut(s![y0..y1, x0..x1]).fill(255);
    mask
}
