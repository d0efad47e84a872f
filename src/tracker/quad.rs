use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Four-corner box representation.
///
/// Used for both the axis-aligned and the rotated (minimum-area) bounding box
/// of a detection. Corners are integer pixel coordinates:
/// - axis-aligned boxes keep the corner order (x,y), (x,y+h), (x+w,y+h), (x+w,y)
/// - rotated boxes keep whatever order the contour step produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quad {
    pub corners: [Point2<i32>; 4],
}

impl Quad {
    /// Create a Quad from four corner points.
    #[inline]
    pub fn new(corners: [Point2<i32>; 4]) -> Self {
        Self { corners }
    }

    /// Create a Quad from raw `[x, y]` pairs.
    #[inline]
    pub fn from_points(points: [[i32; 2]; 4]) -> Self {
        Self {
            corners: points.map(|[x, y]| Point2::new(x, y)),
        }
    }

    /// Create an axis-aligned Quad from top-left coordinates and dimensions (XYWH format).
    #[inline]
    pub fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::from_points([
            [x, y],
            [x, y + height],
            [x + width, y + height],
            [x + width, y],
        ])
    }

    /// First corner, where overlay captions are anchored.
    #[inline]
    pub fn anchor(&self) -> Point2<i32> {
        self.corners[0]
    }

    /// Tight extent over all corners: (min_x, min_y, max_x, max_y).
    pub fn extent(&self) -> [i32; 4] {
        let mut ext = [i32::MAX, i32::MAX, i32::MIN, i32::MIN];
        for p in &self.corners {
            ext[0] = ext[0].min(p.x);
            ext[1] = ext[1].min(p.y);
            ext[2] = ext[2].max(p.x);
            ext[3] = ext[3].max(p.y);
        }
        ext
    }

    /// Corners as raw `[x, y]` pairs.
    pub fn to_points(&self) -> [[i32; 2]; 4] {
        self.corners.map(|p| [p.x, p.y])
    }
}
