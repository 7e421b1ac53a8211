//! Heightmap data model.
//!
//! A [`HeightGrid`] owns the elevation of every cell. Its dimensions are fixed
//! at construction; the values are mutated in place by terrain synthesis and
//! erosion.

use crate::tilemap::{GridError, Tilemap};

/// Elevation every cell starts at in the default generator.
pub const DEFAULT_BASE_ELEVATION: f32 = 10.0;

/// Value used for every cell of the normalized view when the grid is flat.
const FLAT_NORMALIZED_VALUE: f32 = 0.5;

/// Elevation grid of fixed size.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    cells: Tilemap<f32>,
}

impl HeightGrid {
    /// Create a grid with every cell at `initial`.
    pub fn new(width: usize, height: usize, initial: f32) -> Result<Self, GridError> {
        Ok(Self {
            cells: Tilemap::new_with(width, height, initial)?,
        })
    }

    /// Create a grid at [`DEFAULT_BASE_ELEVATION`].
    pub fn flat(width: usize, height: usize) -> Result<Self, GridError> {
        Self::new(width, height, DEFAULT_BASE_ELEVATION)
    }

    pub fn from_tilemap(cells: Tilemap<f32>) -> Self {
        Self { cells }
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }

    pub fn height(&self) -> usize {
        self.cells.height()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.cells.contains(x, y)
    }

    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.cells.is_edge(x, y)
    }

    pub fn get(&self, x: usize, y: usize) -> Result<f32, GridError> {
        self.cells.get(x, y).copied()
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) -> Result<(), GridError> {
        self.cells.set(x, y, value)
    }

    /// Add `delta` to one cell.
    pub fn add(&mut self, x: usize, y: usize, delta: f32) -> Result<(), GridError> {
        *self.cells.get_mut(x, y)? += delta;
        Ok(())
    }

    /// Independent copy with identical values.
    pub fn snapshot(&self) -> HeightGrid {
        self.clone()
    }

    pub fn cells(&self) -> &Tilemap<f32> {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Tilemap<f32> {
        &mut self.cells
    }

    /// Lowest and highest elevation in the grid.
    pub fn elevation_range(&self) -> (f32, f32) {
        let mut min_h = f32::MAX;
        let mut max_h = f32::MIN;
        for &h in self.cells.values() {
            if h < min_h { min_h = h; }
            if h > max_h { max_h = h; }
        }
        (min_h, max_h)
    }

    /// Sum of all elevations.
    pub fn total_mass(&self) -> f64 {
        self.cells.values().iter().map(|&h| h as f64).sum()
    }

    pub fn mean_elevation(&self) -> f64 {
        self.total_mass() / self.cells.values().len() as f64
    }

    /// Min-max normalized copy in `[0, 1]`.
    ///
    /// A flat grid maps to 0.5 everywhere instead of dividing by zero.
    pub fn normalized(&self) -> Tilemap<f32> {
        let (min_h, max_h) = self.elevation_range();
        if max_h == min_h {
            return self.cells.map(|_| FLAT_NORMALIZED_VALUE);
        }
        let range = max_h - min_h;
        self.cells.map(|&h| (h - min_h) / range)
    }
}
