//! Coordinate-tagged observation sets

use ndarray::{Array1, ArrayView1, Axis};

use crate::error::{Error, Result};
use crate::region::Region;

/// An ordered set of scattered observations.
///
/// Each record `i` is a coordinate `(easting[i], northing[i])` together with
/// one value from every data column. All columns share the same length.
///
/// # Example
///
/// ```ignore
/// use geosplit_core::Observations;
///
/// let obs = Observations::from_vecs(
///     vec![0.0, 1.0, 2.0],
///     vec![5.0, 5.5, 6.0],
///     vec![vec![0.1, 0.2, 0.3]],
/// )?;
/// assert_eq!(obs.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Observations {
    easting: Array1<f64>,
    northing: Array1<f64>,
    data: Vec<Array1<f64>>,
}

impl Observations {
    /// Build an observation set from coordinate and data columns.
    ///
    /// At least one data column is required and every column must have the
    /// same length as `easting`.
    pub fn new(easting: Array1<f64>, northing: Array1<f64>, data: Vec<Array1<f64>>) -> Result<Self> {
        let n = easting.len();
        if northing.len() != n {
            return Err(Error::invalid(
                "northing",
                format!("length {}", northing.len()),
                format!("expected {} values to match easting", n),
            ));
        }
        if data.is_empty() {
            return Err(Error::invalid(
                "values",
                "no data columns",
                "at least one data column is required",
            ));
        }
        for (i, column) in data.iter().enumerate() {
            if column.len() != n {
                return Err(Error::invalid(
                    "values",
                    format!("column {} has length {}", i, column.len()),
                    format!("expected {} values to match coordinates", n),
                ));
            }
        }

        Ok(Self { easting, northing, data })
    }

    /// Convenience constructor from plain vectors.
    pub fn from_vecs(easting: Vec<f64>, northing: Vec<f64>, data: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(
            Array1::from_vec(easting),
            Array1::from_vec(northing),
            data.into_iter().map(Array1::from_vec).collect(),
        )
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.easting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.easting.is_empty()
    }

    /// Number of data columns
    pub fn n_columns(&self) -> usize {
        self.data.len()
    }

    pub fn easting(&self) -> ArrayView1<'_, f64> {
        self.easting.view()
    }

    pub fn northing(&self) -> ArrayView1<'_, f64> {
        self.northing.view()
    }

    /// Data column `index`, if it exists
    pub fn column(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        self.data.get(index).map(|c| c.view())
    }

    /// Iterate over all data columns
    pub fn columns(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.data.iter().map(|c| c.view())
    }

    /// Coordinate of record `index`
    pub fn coordinate(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.easting.get(index)?, *self.northing.get(index)?))
    }

    /// Bounding region of all coordinates
    pub fn region(&self) -> Result<Region> {
        Region::from_coordinates(self.easting.view(), self.northing.view())
    }

    /// Subset of records at `indices`, in the order given.
    ///
    /// Panics if any index is out of bounds, like slice indexing.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            easting: self.easting.select(Axis(0), indices),
            northing: self.northing.select(Axis(0), indices),
            data: self.data.iter().map(|c| c.select(Axis(0), indices)).collect(),
        }
    }
}
