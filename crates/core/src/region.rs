//! Axis-aligned bounding regions

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Axis-aligned bounding box `(west, east, south, north)`.
///
/// Coordinates are unitless: the region is expressed in whatever units the
/// observations use (degrees, projected metres, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Region {
    /// Create a region, checking that the bounds are finite and ordered.
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Result<Self> {
        if ![west, east, south, north].iter().all(|v| v.is_finite()) {
            return Err(Error::invalid(
                "region",
                format!("({}, {}, {}, {})", west, east, south, north),
                "region bounds must be finite",
            ));
        }
        if west > east || south > north {
            return Err(Error::invalid(
                "region",
                format!("({}, {}, {}, {})", west, east, south, north),
                "west must be <= east and south must be <= north",
            ));
        }
        Ok(Self { west, east, south, north })
    }

    /// Bounding region of a set of coordinates.
    ///
    /// Fails if there are no coordinates, if the two columns differ in
    /// length, or if any coordinate is not finite.
    pub fn from_coordinates(easting: ArrayView1<f64>, northing: ArrayView1<f64>) -> Result<Self> {
        if easting.len() != northing.len() {
            return Err(Error::invalid(
                "northing",
                format!("length {}", northing.len()),
                format!("expected {} values to match easting", easting.len()),
            ));
        }
        if easting.is_empty() {
            return Err(Error::invalid(
                "coordinates",
                "empty",
                "cannot compute the region of zero coordinates",
            ));
        }

        let mut west = f64::INFINITY;
        let mut east = f64::NEG_INFINITY;
        let mut south = f64::INFINITY;
        let mut north = f64::NEG_INFINITY;

        for (i, (&x, &y)) in easting.iter().zip(northing.iter()).enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(Error::invalid(
                    "coordinates",
                    format!("({}, {}) at index {}", x, y, i),
                    "coordinates must be finite",
                ));
            }
            west = west.min(x);
            east = east.max(x);
            south = south.min(y);
            north = north.max(y);
        }

        Ok(Self { west, east, south, north })
    }

    /// East-west extent
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// South-north extent
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Whether `(x, y)` lies inside the region (edges included)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.west && x <= self.east && y >= self.south && y <= self.north
    }

    /// Grow the region by `amount` on every side.
    pub fn pad(&self, amount: f64) -> Self {
        Self {
            west: self.west - amount,
            east: self.east + amount,
            south: self.south - amount,
            north: self.north + amount,
        }
    }
}
