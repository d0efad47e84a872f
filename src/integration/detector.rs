//! Trait for per-frame detection providers.

use crate::tracker::{Detection, Label};

/// Trait for per-frame, per-label detection providers.
///
/// Implement this trait to feed the output of any segmentation and contour
/// step into the tracker.
///
/// # Example
///
/// ```ignore
/// use tubetrack::{Detection, DetectionSource, Label};
///
/// struct MySegmenter {
///     // Your model here
/// }
///
/// impl DetectionSource for MySegmenter {
///     type Error = std::io::Error;
///
///     fn frame_count(&self) -> usize { 300 }
///     fn frame_size(&self) -> (u32, u32) { (1920, 1080) }
///
///     fn detect(&mut self, frame_number: u32, label: &Label) -> Result<Vec<Detection>, Self::Error> {
///         // Extract connected regions of `label` and return them
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Total number of frames in the stream.
    fn frame_count(&self) -> usize;

    /// Frame dimensions as (width, height).
    fn frame_size(&self) -> (u32, u32);

    /// Labels the source can produce, used when none are configured.
    fn labels(&self) -> Vec<Label> {
        Vec::new()
    }

    /// Detections of `label` in `frame_number`.
    ///
    /// The order must be deterministic for a given input: it decides which
    /// detection gets first claim on a contested identity. Zero-area regions
    /// must already be filtered out.
    fn detect(&mut self, frame_number: u32, label: &Label) -> Result<Vec<Detection>, Self::Error>;
}

impl<S: DetectionSource + ?Sized> DetectionSource for &mut S {
    type Error = S::Error;

    fn frame_count(&self) -> usize {
        (**self).frame_count()
    }

    fn frame_size(&self) -> (u32, u32) {
        (**self).frame_size()
    }

    fn labels(&self) -> Vec<Label> {
        (**self).labels()
    }

    fn detect(&mut self, frame_number: u32, label: &Label) -> Result<Vec<Detection>, Self::Error> {
        (**self).detect(frame_number, label)
    }
}
