//! Candidate objects found in a scan.

use super::scan::RangeFrame;
use crate::error::{AriesError, Result};

/// Edge indices collected for one object while walking a scan.
///
/// The right edge is where the range drops into the object (lower index), the
/// left edge where it rises back out (higher index).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectSpan {
    pub right_edge_index: Option<usize>,
    pub left_edge_index: Option<usize>,
}

impl ObjectSpan {
    pub fn new(right_edge_index: usize, left_edge_index: usize) -> Self {
        ObjectSpan {
            right_edge_index: Some(right_edge_index),
            left_edge_index: Some(left_edge_index),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.right_edge_index.is_some() && self.left_edge_index.is_some()
    }
}

/// A contiguous run of samples believed to be one physical surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateObject {
    pub right_edge_index: usize,
    pub left_edge_index: usize,
    /// Samples between the two edges
    pub length: usize,
    pub centroid_index: usize,
    /// Bearing of the centroid (rad), measured from sample zero
    pub bearing: f64,
    /// Clamped range at the centroid (m)
    pub range: f64,
}

/// Derives centroid, bearing and range for a finished span
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectDescriptor;

impl ObjectDescriptor {
    pub fn new() -> Self {
        ObjectDescriptor
    }

    /// Describe a span with both edges set.
    ///
    /// The centroid sits `length / 2` samples past the right edge, so odd spans
    /// round toward the right edge. The bearing is
    /// `centroid_index * angle_increment` without the scan's `angle_min`
    /// offset; the localizer's 90° split relies on that frame.
    pub fn describe(&self, span: &ObjectSpan, frame: &RangeFrame) -> Result<CandidateObject> {
        let (right_edge_index, left_edge_index) =
            match (span.right_edge_index, span.left_edge_index) {
                (Some(right), Some(left)) if left > right => (right, left),
                _ => {
                    return Err(AriesError::IncompleteObject {
                        right_edge: span.right_edge_index,
                        left_edge: span.left_edge_index,
                    })
                }
            };

        let length = left_edge_index - right_edge_index;
        let centroid_index = right_edge_index + length / 2;
        let range = frame
            .range(centroid_index)
            .ok_or_else(|| AriesError::IncompleteObject {
                right_edge: span.right_edge_index,
                left_edge: span.left_edge_index,
            })?;

        Ok(CandidateObject {
            right_edge_index,
            left_edge_index,
            length,
            centroid_index,
            bearing: centroid_index as f64 * frame.angle_increment(),
            range,
        })
    }
}
