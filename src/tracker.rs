mod instance;
mod instance_store;
mod mask_tracker;
mod matching;
mod quad;
mod tube;

pub use instance::{FrameRecord, IdAllocator, Instance, InstanceId};
pub use instance_store::{Annotation, InstanceStore};
pub use mask_tracker::{FrameUpdate, MaskTracker};
pub use matching::{
    Assignment, Candidate, Detection, Label, Mask, assign, best_candidate, intersection_count,
};
pub use quad::Quad;
pub use tube::{CropRegion, Tube, TubeCollector};
