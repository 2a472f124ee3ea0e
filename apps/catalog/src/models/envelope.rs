//! Geographic envelopes in EPSG:4326 degrees

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box, longitude on x and latitude on y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Whether all coordinates are finite and min <= max on both axes.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|c| c.is_finite())
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
    }

    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    pub fn contains(&self, other: &Envelope) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    pub fn within(&self, other: &Envelope) -> bool {
        other.contains(self)
    }

    /// Interiors intersect and neither envelope contains the other.
    pub fn overlaps(&self, other: &Envelope) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
            && !self.contains(other)
            && !other.contains(self)
    }

    /// Shortest planar distance in degrees, 0 when the envelopes intersect.
    pub fn distance(&self, other: &Envelope) -> f64 {
        let dx = (other.min_x - self.max_x).max(self.min_x - other.max_x).max(0.0);
        let dy = (other.min_y - self.max_y).max(self.min_y - other.max_y).max(0.0);
        dx.hypot(dy)
    }
}
