use std::fmt;

use glam::Vec2;

/// Answers "which house is closest to this ground-plane point".
///
/// Implementations must return the first house in slice order among equally
/// near candidates, and only candidates strictly nearer than `max_distance`.
pub trait ProximityIndex: fmt::Debug + Send + Sync {
    fn nearest(&self, sites: &[Vec2], point: Vec2, max_distance: f32) -> Option<usize>;
}

/// Recomputes from scratch on every query. Fine for a handful of houses.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScan;

impl ProximityIndex for LinearScan {
    fn nearest(&self, sites: &[Vec2], point: Vec2, max_distance: f32) -> Option<usize> {
        let mut best = None;
        let mut best_distance = max_distance;
        for (index, site) in sites.iter().enumerate() {
            let distance = site.distance(point);
            if distance < best_distance {
                best = Some(index);
                best_distance = distance;
            }
        }
        best
    }
}
