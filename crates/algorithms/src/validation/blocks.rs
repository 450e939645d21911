//! Regular block grids for grouping nearby observations
//!
//! A block grid tiles a region with square cells of a fixed spacing,
//! anchored at the region's south-west corner. Every observation falls in
//! exactly one cell; cells without observations never appear in a
//! [`BlockLabels`] assignment.

use std::collections::BTreeMap;

use geosplit_core::{Error, Observations, Region, Result};

/// Identifier of one grid cell.
///
/// Ordering is row-major (south to north, then west to east), which is the
/// order blocks are listed in before any shuffling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId {
    pub row: usize,
    pub col: usize,
}

/// Square-cell grid laid over a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockGrid {
    region: Region,
    spacing: f64,
    rows: usize,
    cols: usize,
}

impl BlockGrid {
    /// Tile `region` with cells of side `spacing`.
    ///
    /// The number of cells along each axis is `ceil(extent / spacing)`, with
    /// at least one cell for degenerate (zero-extent) axes.
    pub fn new(region: Region, spacing: f64) -> Result<Self> {
        validate_spacing(spacing)?;

        let cols = cell_count(region.width(), spacing);
        let rows = cell_count(region.height(), spacing);

        Ok(Self {
            region,
            spacing,
            rows,
            cols,
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Grid dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Cell containing `(x, y)`.
    ///
    /// Uses floor division from the south-west corner, so a point lying on
    /// an interior cell edge belongs to the cell that edge starts. Points on
    /// the region's east or north edge (and points outside the region) are
    /// clamped into the nearest edge cell.
    pub fn cell_id(&self, x: f64, y: f64) -> CellId {
        CellId {
            row: axis_index(y - self.region.south, self.spacing, self.rows),
            col: axis_index(x - self.region.west, self.spacing, self.cols),
        }
    }

    /// Bounds of a cell. Edge cells may extend past the grid's region.
    pub fn cell_region(&self, cell: CellId) -> Region {
        let west = self.region.west + cell.col as f64 * self.spacing;
        let south = self.region.south + cell.row as f64 * self.spacing;
        Region {
            west,
            east: west + self.spacing,
            south,
            north: south + self.spacing,
        }
    }
}

/// Assignment of every observation to a non-empty block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLabels {
    grid: BlockGrid,
    /// Non-empty cells in row-major order
    cells: Vec<CellId>,
    /// Observation indices per block, ascending
    members: Vec<Vec<usize>>,
    /// Block index (into `cells`) of each observation
    assignment: Vec<usize>,
}

impl BlockLabels {
    pub fn grid(&self) -> &BlockGrid {
        &self.grid
    }

    /// Number of non-empty blocks
    pub fn n_blocks(&self) -> usize {
        self.cells.len()
    }

    /// Cell of block `block`
    pub fn cell(&self, block: usize) -> CellId {
        self.cells[block]
    }

    /// Observation indices inside block `block`
    pub fn members(&self, block: usize) -> &[usize] {
        &self.members[block]
    }

    /// Block index of every observation, in input order
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    /// Cell of every observation, in input order
    pub fn cell_of(&self, observation: usize) -> Option<CellId> {
        self.assignment.get(observation).map(|&b| self.cells[b])
    }

    /// Iterate over `(cell, members)` for each non-empty block
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &[usize])> {
        self.cells
            .iter()
            .copied()
            .zip(self.members.iter().map(|m| m.as_slice()))
    }
}

/// Group observations into blocks of side `spacing` over their own region.
pub fn block_labels(observations: &Observations, spacing: f64) -> Result<BlockLabels> {
    validate_spacing(spacing)?;
    let grid = BlockGrid::new(observations.region()?, spacing)?;
    Ok(label_with_grid(observations, grid))
}

/// Group observations into the cells of an existing grid.
pub fn label_with_grid(observations: &Observations, grid: BlockGrid) -> BlockLabels {
    let mut by_cell: BTreeMap<CellId, Vec<usize>> = BTreeMap::new();
    for (i, (&x, &y)) in observations
        .easting()
        .iter()
        .zip(observations.northing().iter())
        .enumerate()
    {
        by_cell.entry(grid.cell_id(x, y)).or_default().push(i);
    }

    let mut assignment = vec![0; observations.len()];
    let mut cells = Vec::with_capacity(by_cell.len());
    let mut members = Vec::with_capacity(by_cell.len());

    for (block, (cell, indices)) in by_cell.into_iter().enumerate() {
        for &i in &indices {
            assignment[i] = block;
        }
        cells.push(cell);
        members.push(indices);
    }

    tracing::trace!(
        n_blocks = cells.len(),
        rows = grid.rows,
        cols = grid.cols,
        "assigned observations to blocks"
    );

    BlockLabels {
        grid,
        cells,
        members,
        assignment,
    }
}

pub(crate) fn validate_spacing(spacing: f64) -> Result<()> {
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(Error::invalid(
            "spacing",
            spacing,
            "block spacing must be a positive, finite number",
        ));
    }
    Ok(())
}

fn cell_count(extent: f64, spacing: f64) -> usize {
    ((extent / spacing).ceil() as usize).max(1)
}

fn axis_index(offset: f64, spacing: f64, n: usize) -> usize {
    let idx = (offset / spacing).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(n - 1)
    }
}
