//! Spatial filters over document envelopes

use crate::index::IndexSnapshot;
use crate::models::Envelope;
use crate::search::ScoredSet;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CRS: &str = "EPSG:4326";

/// Accepted spellings of EPSG:4326 and its CRS:84 alias.
const WGS84_CODES: &[&str] = &[
    "EPSG:4326",
    "CRS:84",
    "urn:ogc:def:crs:EPSG::4326",
    "urn:ogc:def:crs:OGC:1.3:CRS84",
    "http://www.opengis.net/gml/srs/epsg.xml#4326",
];

/// Mean length of one degree of latitude.
const METERS_PER_DEGREE: f64 = 111_320.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "deg")]
    Degrees,
}

impl DistanceUnit {
    pub fn to_degrees(&self, distance: f64) -> f64 {
        match self {
            DistanceUnit::Meters => distance / METERS_PER_DEGREE,
            DistanceUnit::Kilometers => distance * 1000.0 / METERS_PER_DEGREE,
            DistanceUnit::Degrees => distance,
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(DistanceUnit::Meters),
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => {
                Ok(DistanceUnit::Kilometers)
            }
            "deg" | "degree" | "degrees" => Ok(DistanceUnit::Degrees),
            _ => Err(Error::InvalidArgument(format!("Unknown distance unit: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpatialOperator {
    BBox,
    Intersects,
    Within,
    Contains,
    Disjoint,
    Equals,
    Overlaps,
    DWithin { distance: f64, unit: DistanceUnit },
    Beyond { distance: f64, unit: DistanceUnit },
}

impl SpatialOperator {
    pub fn name(&self) -> &'static str {
        match self {
            SpatialOperator::BBox => "BBOX",
            SpatialOperator::Intersects => "Intersects",
            SpatialOperator::Within => "Within",
            SpatialOperator::Contains => "Contains",
            SpatialOperator::Disjoint => "Disjoint",
            SpatialOperator::Equals => "Equals",
            SpatialOperator::Overlaps => "Overlaps",
            SpatialOperator::DWithin { .. } => "DWithin",
            SpatialOperator::Beyond { .. } => "Beyond",
        }
    }
}

impl fmt::Display for SpatialOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A spatial predicate against a query envelope.
///
/// A document matches when any of its envelopes satisfies the predicate
/// (`Disjoint`: when none of them intersects). Documents without envelopes
/// never match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialFilter {
    pub operator: SpatialOperator,
    pub envelope: Envelope,
    pub crs: String,
}

impl SpatialFilter {
    pub fn new(operator: SpatialOperator, envelope: Envelope) -> Self {
        Self {
            operator,
            envelope,
            crs: DEFAULT_CRS.to_string(),
        }
    }

    pub fn bbox(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(
            SpatialOperator::BBox,
            Envelope::new(min_x, min_y, max_x, max_y),
        )
    }

    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = crs.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !WGS84_CODES
            .iter()
            .any(|code| code.eq_ignore_ascii_case(self.crs.trim()))
        {
            return Err(Error::Validation(format!(
                "Unsupported CRS '{}': only EPSG:4326 (CRS:84) is supported",
                self.crs
            )));
        }
        if !self.envelope.is_valid() {
            return Err(Error::Validation(format!(
                "Invalid {} envelope: {:?}",
                self.operator, self.envelope
            )));
        }
        if let SpatialOperator::DWithin { distance, .. } | SpatialOperator::Beyond { distance, .. } =
            self.operator
        {
            if !distance.is_finite() || distance < 0.0 {
                return Err(Error::Validation(format!(
                    "Invalid {} distance: {distance}",
                    self.operator
                )));
            }
        }
        Ok(())
    }

    pub fn matches(&self, envelopes: &[Envelope]) -> bool {
        if envelopes.is_empty() {
            return false;
        }
        let query = &self.envelope;
        match self.operator {
            SpatialOperator::Disjoint => envelopes.iter().all(|e| !e.intersects(query)),
            op => envelopes.iter().any(|e| match op {
                SpatialOperator::BBox | SpatialOperator::Intersects => e.intersects(query),
                SpatialOperator::Within => e.within(query),
                SpatialOperator::Contains => e.contains(query),
                SpatialOperator::Equals => e == query,
                SpatialOperator::Overlaps => e.overlaps(query),
                SpatialOperator::DWithin { distance, unit } => {
                    e.distance(query) <= unit.to_degrees(distance)
                }
                SpatialOperator::Beyond { distance, unit } => {
                    e.distance(query) > unit.to_degrees(distance)
                }
                SpatialOperator::Disjoint => false,
            }),
        }
    }

    /// Every matching document, scored 1.0.
    pub fn evaluate(&self, snapshot: &IndexSnapshot) -> ScoredSet {
        snapshot
            .documents()
            .iter()
            .enumerate()
            .filter(|(_, doc)| self.matches(doc.envelopes()))
            .map(|(ord, _)| (ord, 1.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn north_sea() -> Envelope {
        Envelope::new(-4.0, 51.0, 9.0, 61.0)
    }

    #[test]
    fn bbox_matches_any_intersecting_envelope() {
        let filter = SpatialFilter::bbox(0.0, 50.0, 5.0, 55.0);
        assert!(filter.matches(&[Envelope::new(100.0, 0.0, 101.0, 1.0), north_sea()]));
        assert!(!filter.matches(&[Envelope::new(100.0, 0.0, 101.0, 1.0)]));
        assert!(!filter.matches(&[]));
    }

    #[test]
    fn disjoint_requires_every_envelope_to_miss() {
        let filter = SpatialFilter::new(
            SpatialOperator::Disjoint,
            Envelope::new(100.0, 0.0, 101.0, 1.0),
        );
        assert!(filter.matches(&[north_sea()]));
        assert!(!filter.matches(&[north_sea(), Envelope::new(100.5, 0.5, 102.0, 2.0)]));
        assert!(!filter.matches(&[]));
    }

    #[test]
    fn distance_operators_convert_units() {
        // One degree east of the North Sea box
        let query = Envelope::new(10.0, 55.0, 11.0, 56.0);
        let within_200km = SpatialFilter::new(
            SpatialOperator::DWithin {
                distance: 200.0,
                unit: DistanceUnit::Kilometers,
            },
            query,
        );
        let beyond_50km = SpatialFilter::new(
            SpatialOperator::Beyond {
                distance: 50_000.0,
                unit: DistanceUnit::Meters,
            },
            query,
        );
        assert!(within_200km.matches(&[north_sea()]));
        assert!(beyond_50km.matches(&[north_sea()]));
        assert_eq!("km".parse::<DistanceUnit>().unwrap(), DistanceUnit::Kilometers);
        assert!("furlong".parse::<DistanceUnit>().is_err());
    }

    #[test]
    fn only_wgs84_is_supported() {
        assert!(SpatialFilter::bbox(0.0, 0.0, 1.0, 1.0).validate().is_ok());
        assert!(SpatialFilter::bbox(0.0, 0.0, 1.0, 1.0)
            .with_crs("crs:84")
            .validate()
            .is_ok());
        assert!(matches!(
            SpatialFilter::bbox(0.0, 0.0, 1.0, 1.0)
                .with_crs("EPSG:3857")
                .validate(),
            Err(Error::Validation(_))
        ));
        assert!(SpatialFilter::bbox(1.0, 0.0, 0.0, 1.0).validate().is_err());
    }
}
