//! Edge-based object segmentation over a range frame.
//!
//! A single left-to-right pass looks at the change between neighbouring
//! clamped ranges. A drop larger than the edge threshold opens an object at
//! its right edge; a rise larger than the threshold closes it at its left
//! edge. Spans narrower than `min_span_width` samples are treated as noise.

use super::object::{CandidateObject, ObjectDescriptor, ObjectSpan};
use super::scan::RangeFrame;
use crate::config::BeaconConfig;
use crate::error::Result;
use log::{debug, trace};

/// Direction of a range discontinuity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEvent {
    /// Range dropped: a surface starts here (right edge)
    Falling,
    /// Range rose: the surface ends here (left edge)
    Rising,
}

impl EdgeEvent {
    /// Classify the change between two neighbouring ranges
    pub fn classify(change: f64, edge_threshold: f64) -> Option<EdgeEvent> {
        if change.abs() <= edge_threshold {
            None
        } else if change < 0.0 {
            Some(EdgeEvent::Falling)
        } else {
            Some(EdgeEvent::Rising)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmenterState {
    Idle,
    RightEdgeOpen { right_edge_index: usize },
}

/// Splits a range frame into candidate objects
#[derive(Debug, Clone)]
pub struct ObjectSegmenter {
    edge_threshold: f64,
    min_span_width: usize,
    descriptor: ObjectDescriptor,
}

impl ObjectSegmenter {
    /// Create a new segmenter
    pub fn new(edge_threshold: f64, min_span_width: usize) -> Self {
        ObjectSegmenter {
            edge_threshold,
            min_span_width,
            descriptor: ObjectDescriptor::new(),
        }
    }

    pub fn from_config(config: &BeaconConfig) -> Self {
        Self::new(config.edge_threshold, config.min_span_width)
    }

    pub fn edge_threshold(&self) -> f64 {
        self.edge_threshold
    }

    pub fn min_span_width(&self) -> usize {
        self.min_span_width
    }

    /// Walk the frame once and return every finished object in scan order.
    ///
    /// An object still open when the scan ends is dropped.
    pub fn segment(&self, frame: &RangeFrame) -> Result<Vec<CandidateObject>> {
        let ranges = frame.ranges();
        let mut objects = Vec::new();
        let mut state = SegmenterState::Idle;

        let Some(&first) = ranges.first() else {
            return Ok(objects);
        };
        let mut previous = first;

        for (i, &current) in ranges.iter().enumerate().skip(1) {
            let event = EdgeEvent::classify(current - previous, self.edge_threshold);
            previous = current;

            state = match (state, event) {
                (_, None) => state,
                (_, Some(EdgeEvent::Falling)) => {
                    trace!("right edge at {}", i);
                    SegmenterState::RightEdgeOpen {
                        right_edge_index: i,
                    }
                }
                (SegmenterState::Idle, Some(EdgeEvent::Rising)) => {
                    trace!("left edge at {} with no open object, ignored", i);
                    SegmenterState::Idle
                }
                (SegmenterState::RightEdgeOpen { right_edge_index }, Some(EdgeEvent::Rising)) => {
                    if i - right_edge_index < self.min_span_width {
                        trace!("span {}..{} too narrow, discarded", right_edge_index, i);
                    } else {
                        let object = self
                            .descriptor
                            .describe(&ObjectSpan::new(right_edge_index, i), frame)?;
                        debug!(
                            "object: edges {}..{}, centroid {}, bearing {:.2}°, range {:.3}",
                            object.right_edge_index,
                            object.left_edge_index,
                            object.centroid_index,
                            object.bearing.to_degrees(),
                            object.range
                        );
                        objects.push(object);
                    }
                    SegmenterState::Idle
                }
            };
        }

        Ok(objects)
    }
}
