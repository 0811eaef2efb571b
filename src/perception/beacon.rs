//! Beacon matching: find the pair of objects spaced like the two posts.

use super::object::CandidateObject;
use crate::config::BeaconConfig;
use log::debug;

/// A matched pair of posts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beacon {
    pub right_post: CandidateObject,
    pub left_post: CandidateObject,
    /// Distance between the two posts as seen in this scan (m)
    pub measured_separation: f64,
    /// `|measured_separation - known_post_separation|` (m)
    pub separation_error: f64,
}

/// Decides which object of a pair is the right post.
///
/// The matcher only scores pairs; swapping in a geometry-aware policy does not
/// touch the scoring.
pub trait PairingPolicy: Send + Sync {
    /// Return `(right_post, left_post)` for two objects, `first` preceding
    /// `second` in scan order
    fn assign<'a>(
        &self,
        first: &'a CandidateObject,
        second: &'a CandidateObject,
    ) -> (&'a CandidateObject, &'a CandidateObject);
}

/// Scan order equals right-to-left physical order.
///
/// Only holds while the sensor faces the beacon.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOrderPairing;

impl PairingPolicy for ScanOrderPairing {
    fn assign<'a>(
        &self,
        first: &'a CandidateObject,
        second: &'a CandidateObject,
    ) -> (&'a CandidateObject, &'a CandidateObject) {
        (first, second)
    }
}

/// Law-of-cosines distance between two polar points
pub fn post_separation(right_range: f64, left_range: f64, bearing_difference: f64) -> f64 {
    let squared = right_range * right_range + left_range * left_range
        - 2.0 * right_range * left_range * bearing_difference.cos();
    // rounding can push coincident points just below zero
    squared.max(0.0).sqrt()
}

/// Scores every object pair against the known post separation
pub struct BeaconMatcher {
    known_post_separation: f64,
    separation_tolerance: f64,
    pairing: Box<dyn PairingPolicy>,
}

impl std::fmt::Debug for BeaconMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeaconMatcher")
            .field("known_post_separation", &self.known_post_separation)
            .field("separation_tolerance", &self.separation_tolerance)
            .finish()
    }
}

impl BeaconMatcher {
    /// Create a matcher that pairs objects in scan order
    pub fn new(known_post_separation: f64, separation_tolerance: f64) -> Self {
        Self::with_pairing(known_post_separation, separation_tolerance, ScanOrderPairing)
    }

    /// Create a matcher with a specific pairing policy
    pub fn with_pairing<P: PairingPolicy + 'static>(
        known_post_separation: f64,
        separation_tolerance: f64,
        pairing: P,
    ) -> Self {
        BeaconMatcher {
            known_post_separation,
            separation_tolerance,
            pairing: Box::new(pairing),
        }
    }

    pub fn from_config(config: &BeaconConfig) -> Self {
        Self::new(config.known_post_separation, config.separation_tolerance)
    }

    /// Inclusive tolerance window around the known separation
    pub fn accepts(&self, separation: f64) -> bool {
        separation >= self.known_post_separation - self.separation_tolerance
            && separation <= self.known_post_separation + self.separation_tolerance
    }

    /// Measure a single pair
    pub fn evaluate(&self, right_post: &CandidateObject, left_post: &CandidateObject) -> Beacon {
        let measured_separation = post_separation(
            right_post.range,
            left_post.range,
            left_post.bearing - right_post.bearing,
        );
        Beacon {
            right_post: *right_post,
            left_post: *left_post,
            measured_separation,
            separation_error: (measured_separation - self.known_post_separation).abs(),
        }
    }

    /// Best accepted pair, or `None` when no pair falls inside the window.
    ///
    /// Ties keep the first pair found (ascending `i`, then `j`).
    pub fn find_beacon(&self, objects: &[CandidateObject]) -> Option<Beacon> {
        let mut best: Option<Beacon> = None;

        for (i, first) in objects.iter().enumerate() {
            for second in &objects[i + 1..] {
                let (right_post, left_post) = self.pairing.assign(first, second);
                let candidate = self.evaluate(right_post, left_post);

                debug!(
                    "pair (centroid {}, {:.2}°) - (centroid {}, {:.2}°): separation {:.4}",
                    right_post.centroid_index,
                    right_post.bearing.to_degrees(),
                    left_post.centroid_index,
                    left_post.bearing.to_degrees(),
                    candidate.measured_separation
                );

                if !self.accepts(candidate.measured_separation) {
                    continue;
                }

                let improves = best
                    .as_ref()
                    .map_or(true, |b| candidate.separation_error < b.separation_error);
                if improves {
                    best = Some(candidate);
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn object(centroid_index: usize, bearing_deg: f64, range: f64) -> CandidateObject {
        CandidateObject {
            right_edge_index: centroid_index - 2,
            left_edge_index: centroid_index + 2,
            length: 4,
            centroid_index,
            bearing: bearing_deg.to_radians(),
            range,
        }
    }

    #[test]
    fn test_post_separation_law_of_cosines() {
        assert_relative_eq!(
            post_separation(3.0, 4.0, std::f64::consts::FRAC_PI_2),
            5.0,
            epsilon = 1e-12
        );
        assert_eq!(post_separation(0.7, 0.7, 0.0), 0.0);
        assert_relative_eq!(
            post_separation(1.0, 2.0, std::f64::consts::PI),
            3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_no_objects_no_beacon() {
        let matcher = BeaconMatcher::new(0.6096, 0.025);
        assert!(matcher.find_beacon(&[]).is_none());
        assert!(matcher.find_beacon(&[object(10, 10.0, 1.0)]).is_none());
    }

    #[test]
    fn test_out_of_tolerance_pair_rejected() {
        let matcher = BeaconMatcher::new(0.6096, 0.025);
        let objects = [object(10, 10.0, 1.0), object(20, 20.0, 1.0)];
        // ~0.174 m apart
        assert!(matcher.find_beacon(&objects).is_none());
    }

    #[test]
    fn test_picks_lowest_error_pair() {
        let separation = 0.6096;
        let matcher = BeaconMatcher::new(separation, 0.05);

        // Place objects so two pairs are accepted with different errors.
        let a = object(30, 30.0, 1.0);
        let b = object(60, 30.0 + 35.0, 1.0); // 2*sin(17.5°) ≈ 0.6014
        let c = object(90, 30.0 + 36.0, 1.0); // 2*sin(18°) ≈ 0.6180
        let objects = [a, b, c];

        let beacon = matcher.find_beacon(&objects).unwrap();

        let err_ab = matcher.evaluate(&a, &b).separation_error;
        let err_ac = matcher.evaluate(&a, &c).separation_error;
        assert!(matcher.accepts(matcher.evaluate(&a, &b).measured_separation));
        assert!(matcher.accepts(matcher.evaluate(&a, &c).measured_separation));
        assert_eq!(beacon.separation_error, err_ab.min(err_ac));
        assert_eq!(beacon.right_post, a);
    }

    #[test]
    fn test_tie_keeps_first_found() {
        let matcher = BeaconMatcher::new(0.6096, 0.025);
        let chord_angle = 2.0 * (0.6096_f64 / 2.0).asin();
        let mut a = object(10, 0.0, 1.0);
        let mut b = object(20, 0.0, 1.0);
        let mut c = object(30, 0.0, 1.0);
        a.bearing = 0.0;
        b.bearing = chord_angle;
        c.bearing = 2.0 * chord_angle;

        let beacon = matcher.find_beacon(&[a, b, c]).unwrap();

        // (a, b) and (b, c) measure the same; (a, b) comes first.
        assert_eq!(
            matcher.evaluate(&a, &b).separation_error,
            matcher.evaluate(&b, &c).separation_error
        );
        assert_eq!(beacon.right_post, a);
        assert_eq!(beacon.left_post, b);
    }

    #[test]
    fn test_tolerance_bounds_are_inclusive() {
        let matcher = BeaconMatcher::new(0.5, 0.25);
        assert!(matcher.accepts(0.75));
        assert!(matcher.accepts(0.25));
        assert!(!matcher.accepts(0.7500001));
        assert!(!matcher.accepts(0.2499999));
    }

    #[test]
    fn test_pair_at_upper_bound_is_accepted() {
        // 3-4-5 triangle gives an exact separation of 5.0 = 4.5 + 0.5
        let matcher = BeaconMatcher::new(4.5, 0.5);
        let right = object(10, 0.0, 3.0);
        let mut left = object(100, 0.0, 4.0);
        left.bearing = std::f64::consts::FRAC_PI_2;

        let beacon = matcher.find_beacon(&[right, left]).unwrap();

        assert_eq!(beacon.measured_separation, 5.0);
        assert_relative_eq!(beacon.separation_error, 0.5);
    }

    #[derive(Debug)]
    struct ReversedPairing;

    impl PairingPolicy for ReversedPairing {
        fn assign<'a>(
            &self,
            first: &'a CandidateObject,
            second: &'a CandidateObject,
        ) -> (&'a CandidateObject, &'a CandidateObject) {
            (second, first)
        }
    }

    #[test]
    fn test_custom_pairing_policy() {
        let chord_angle = (2.0 * (0.6096_f64 / 2.0).asin()).to_degrees();
        let a = object(10, 10.0, 1.0);
        let b = object(20, 10.0 + chord_angle, 1.0);

        let matcher = BeaconMatcher::with_pairing(0.6096, 0.025, ReversedPairing);
        let beacon = matcher.find_beacon(&[a, b]).unwrap();

        assert_eq!(beacon.right_post, b);
        assert_eq!(beacon.left_post, a);
    }
}
