//! Scan-to-pose pipeline: normalize, segment, match, localize.

use super::beacon::{Beacon, BeaconMatcher};
use super::localization::{Localizer, Pose};
use super::object::CandidateObject;
use super::scan::{LaserScan, RangeFrame};
use super::segmentation::ObjectSegmenter;
use crate::config::BeaconConfig;
use crate::error::Result;
use log::{debug, info};

/// Everything learned from one scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    /// Number of samples in the normalized frame
    pub frame_len: usize,
    pub objects: Vec<CandidateObject>,
    pub beacon: Option<Beacon>,
    /// Present exactly when `beacon` is
    pub pose: Option<Pose>,
}

/// Stateless beacon localization pipeline
#[derive(Debug)]
pub struct BeaconPipeline {
    max_trusted_range: f64,
    segmenter: ObjectSegmenter,
    matcher: BeaconMatcher,
    localizer: Localizer,
}

impl BeaconPipeline {
    /// Build a pipeline from a validated configuration
    pub fn new(config: &BeaconConfig) -> Result<Self> {
        config.validate()?;
        Ok(BeaconPipeline {
            max_trusted_range: config.max_trusted_range,
            segmenter: ObjectSegmenter::from_config(config),
            matcher: BeaconMatcher::from_config(config),
            localizer: Localizer::from_config(config),
        })
    }

    /// Replace the matcher, e.g. to use a different pairing policy
    pub fn with_matcher(mut self, matcher: BeaconMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn max_trusted_range(&self) -> f64 {
        self.max_trusted_range
    }

    /// Run one scan through every stage
    pub fn process(&self, scan: &LaserScan) -> Result<ScanOutcome> {
        let frame = RangeFrame::normalize(scan, self.max_trusted_range)?;
        self.process_frame(&frame)
    }

    /// Run an already normalized frame through segmentation onwards
    pub fn process_frame(&self, frame: &RangeFrame) -> Result<ScanOutcome> {
        let objects = self.segmenter.segment(frame)?;
        debug!("{} candidate object(s) in {} samples", objects.len(), frame.len());

        let beacon = self.matcher.find_beacon(&objects);
        let pose = match &beacon {
            Some(beacon) => {
                let pose = self.localizer.localize(beacon);
                info!(
                    "beacon at centroids {} / {} (separation {:.4}, err {:.4}), position ({:.3}, {:.3})",
                    beacon.right_post.centroid_index,
                    beacon.left_post.centroid_index,
                    beacon.measured_separation,
                    beacon.separation_error,
                    pose.x,
                    pose.y
                );
                Some(pose)
            }
            None => {
                debug!("no beacon found");
                None
            }
        };

        Ok(ScanOutcome {
            frame_len: frame.len(),
            objects,
            beacon,
            pose,
        })
    }

    /// Position fix for one scan, `None` when no beacon is visible
    pub fn locate(&self, scan: &LaserScan) -> Result<Option<Pose>> {
        Ok(self.process(scan)?.pose)
    }
}
