//! Single droplet flow tracing.
//!
//! A droplet starts on a cell and repeatedly steps to the lowest cell of its
//! 3x3 neighbourhood (diagonals included). It stops when it touches the grid
//! boundary ([`FlowState::Edge`]) or when its own cell is already a minimum of
//! the neighbourhood, ties included ([`FlowState::Sink`]).
//!
//! Every move goes strictly downhill, so a trace always terminates.

use tracing::trace;

use crate::heightmap::HeightGrid;
use crate::tilemap::GridError;

/// State of a droplet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowState {
    Flowing,
    Edge,
    Sink,
}

/// How a finished trace ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationOutcome {
    /// Reached the grid boundary; material leaves the terrain
    Edge,
    /// Settled in a local minimum
    Sink,
}

impl TerminationOutcome {
    fn from_state(state: FlowState) -> Option<Self> {
        match state {
            FlowState::Flowing => None,
            FlowState::Edge => Some(Self::Edge),
            FlowState::Sink => Some(Self::Sink),
        }
    }
}

/// Cells visited by one droplet, start to terminal cell inclusive.
///
/// Only built by [`FlowTracer::trace`], which always includes the start cell,
/// so `cells` is never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowPath {
    cells: Vec<(usize, usize)>,
}

impl FlowPath {
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    pub fn start(&self) -> (usize, usize) {
        self.cells[0]
    }

    /// Terminal cell.
    pub fn last(&self) -> (usize, usize) {
        self.cells[self.cells.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true: a path always holds its start cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves made (cells after the start).
    pub fn moves(&self) -> usize {
        self.cells.len() - 1
    }

    /// Elevation of every visited cell on `heightmap`.
    pub fn elevations(&self, heightmap: &HeightGrid) -> Result<Vec<f32>, GridError> {
        self.cells.iter().map(|&(x, y)| heightmap.get(x, y)).collect()
    }
}

/// Traces one droplet over a read-only heightmap.
pub struct FlowTracer<'a> {
    heightmap: &'a HeightGrid,
    x: usize,
    y: usize,
    path: Vec<(usize, usize)>,
    state: FlowState,
}

impl<'a> FlowTracer<'a> {
    /// Drop water on `(x, y)`.
    pub fn new(heightmap: &'a HeightGrid, x: usize, y: usize) -> Result<Self, GridError> {
        if !heightmap.contains(x, y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: heightmap.width(),
                height: heightmap.height(),
            });
        }
        Ok(Self {
            heightmap,
            x,
            y,
            path: vec![(x, y)],
            state: FlowState::Flowing,
        })
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn path(&self) -> &[(usize, usize)] {
        &self.path
    }

    /// Advance by one transition. Does nothing once terminated.
    pub fn step(&mut self) -> Result<FlowState, GridError> {
        if self.state != FlowState::Flowing {
            return Ok(self.state);
        }

        // The boundary check has to come first: the window below only exists
        // for interior cells.
        if self.heightmap.is_edge(self.x, self.y) {
            self.state = FlowState::Edge;
            return Ok(self.state);
        }

        let window = self.heightmap.cells().window_3x3(self.x, self.y)?;
        let centre = window[1][1];
        let min_h = window
            .iter()
            .flatten()
            .fold(f32::INFINITY, |acc, &h| acc.min(h));

        if centre == min_h {
            self.state = FlowState::Sink;
            return Ok(self.state);
        }

        // First minimum in scan order, dx outer and dy inner
        let mut target = None;
        'scan: for (dx, column) in window.iter().enumerate() {
            for (dy, &h) in column.iter().enumerate() {
                if h == min_h {
                    target = Some((dx, dy));
                    break 'scan;
                }
            }
        }

        // A window of NaN has no comparable minimum, so there is nowhere to go.
        let Some(target) = target else {
            self.state = FlowState::Sink;
            return Ok(self.state);
        };

        self.x = self.x + target.0 - 1;
        self.y = self.y + target.1 - 1;
        self.path.push((self.x, self.y));
        trace!(x = self.x, y = self.y, elevation = min_h, "droplet moved");

        Ok(self.state)
    }

    /// Run until the droplet reaches an edge or a sink.
    pub fn trace(mut self) -> Result<(TerminationOutcome, FlowPath), GridError> {
        loop {
            if let Some(outcome) = TerminationOutcome::from_state(self.step()?) {
                return Ok((outcome, FlowPath { cells: self.path }));
            }
        }
    }
}

/// Trace a droplet from `(x, y)` over a snapshot of `heightmap`.
pub fn trace_flow(
    heightmap: &HeightGrid,
    x: usize,
    y: usize,
) -> Result<(TerminationOutcome, FlowPath), GridError> {
    let snapshot = heightmap.snapshot();
    FlowTracer::new(&snapshot, x, y)?.trace()
}
