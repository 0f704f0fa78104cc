// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The dwell field: one cell per pixel of the square grid, shared by
//! every worker of a render.
//!
//! Cells live in a flat arena of atomics addressed by `row * res + col`.
//! No cell is ever locked: workers only touch the cells of the block
//! they own, and blocks handed out concurrently never overlap.  The one
//! place where two workers may meet on a cell is perimeter
//! memoization, which is a compare-and-swap from `Unset` and therefore
//! harmless, since both would store the same dwell.
//!
//! Relaxed ordering is enough for the cells themselves: a child block
//! only ever starts after its parent's probe, and that edge is ordered
//! by the joins and locks of whichever strategy handed the child out.
use std::sync::atomic::{AtomicU32, Ordering};

const UNSET: u32 = u32::MAX;
const BORDER_FILL: u32 = u32::MAX - 1;
const BORDER_COMPUTE: u32 = u32::MAX - 2;

/// The largest dwell a field can hold; everything above it is reserved
/// for the non-computed cell states.
pub const MAX_DWELL: u32 = u32::MAX - 3;

/// The state of one pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// Not computed yet.
    Unset,
    /// The escape-time count of the pixel.
    Computed(u32),
    /// Perimeter of a block resolved by the fill shortcut.  Only present
    /// when border marking is enabled.
    BorderFill,
    /// Perimeter of a block resolved by brute force.  Only present when
    /// border marking is enabled.
    BorderCompute,
}

impl Cell {
    fn encode(self) -> u32 {
        match self {
            Cell::Unset => UNSET,
            Cell::Computed(dwell) => {
                assert!(dwell <= MAX_DWELL, "dwell {} collides with a sentinel", dwell);
                dwell
            }
            Cell::BorderFill => BORDER_FILL,
            Cell::BorderCompute => BORDER_COMPUTE,
        }
    }

    fn decode(raw: u32) -> Cell {
        match raw {
            UNSET => Cell::Unset,
            BORDER_FILL => Cell::BorderFill,
            BORDER_COMPUTE => Cell::BorderCompute,
            dwell => Cell::Computed(dwell),
        }
    }

    /// The dwell of a computed cell.
    pub fn dwell(self) -> Option<u32> {
        match self {
            Cell::Computed(dwell) => Some(dwell),
            _ => None,
        }
    }

    /// True for the two border-marking sentinels.
    pub fn is_marker(self) -> bool {
        self == Cell::BorderFill || self == Cell::BorderCompute
    }
}

/// A `res` x `res` grid of cells, all `Unset` on creation.
#[derive(Debug)]
pub struct DwellField {
    res: usize,
    cells: Vec<AtomicU32>,
}

impl DwellField {
    /// Allocates a field for a grid of side `res`.
    pub fn new(res: usize) -> Self {
        let cells = (0..res * res).map(|_| AtomicU32::new(UNSET)).collect();
        DwellField { res, cells }
    }

    /// The side of the grid.
    pub fn res(&self) -> usize {
        self.res
    }

    #[inline]
    fn slot(&self, row: usize, col: usize) -> &AtomicU32 {
        debug_assert!(row < self.res && col < self.res, "({}, {}) outside the field", row, col);
        &self.cells[row * self.res + col]
    }

    /// The current state of a cell.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        Cell::decode(self.slot(row, col).load(Ordering::Relaxed))
    }

    /// Returns the dwell stored at `row`, `col`, computing and storing it
    /// with `compute` first if the cell is still unset.  A stored dwell
    /// is never replaced.
    pub fn memoize<F>(&self, row: usize, col: usize, compute: F) -> u32
    where
        F: FnOnce() -> u32,
    {
        let slot = self.slot(row, col);
        let current = slot.load(Ordering::Relaxed);
        if current != UNSET {
            return Self::expect_dwell(row, col, current);
        }
        let dwell = Cell::Computed(compute()).encode();
        match slot.compare_exchange(UNSET, dwell, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => dwell,
            Err(raced) => {
                assert_eq!(raced, dwell, "conflicting dwell memoized at ({}, {})", row, col);
                dwell
            }
        }
    }

    fn expect_dwell(row: usize, col: usize, raw: u32) -> u32 {
        match Cell::decode(raw) {
            Cell::Computed(dwell) => dwell,
            other => panic!("probed ({}, {}) after it was marked {:?}", row, col, other),
        }
    }

    /// Stores `dwell` if the cell is unset; computed cells keep their
    /// value.
    #[inline]
    pub fn fill(&self, row: usize, col: usize, dwell: u32) {
        let raw = Cell::Computed(dwell).encode();
        let _ = self
            .slot(row, col)
            .compare_exchange(UNSET, raw, Ordering::Relaxed, Ordering::Relaxed);
    }

    /// Stores a freshly computed dwell.  The cell must be unset or
    /// already hold the same dwell; anything else means two workers were
    /// given overlapping blocks.
    #[inline]
    pub fn store(&self, row: usize, col: usize, dwell: u32) {
        let raw = Cell::Computed(dwell).encode();
        let previous = self.slot(row, col).swap(raw, Ordering::Relaxed);
        assert!(
            previous == UNSET || previous == raw,
            "({}, {}) recomputed as {} but held {:?}",
            row,
            col,
            dwell,
            Cell::decode(previous)
        );
    }

    /// Overwrites a cell with one of the border-marking sentinels.
    pub fn mark(&self, row: usize, col: usize, marker: Cell) {
        assert!(marker.is_marker(), "{:?} is not a border marker", marker);
        self.slot(row, col).store(marker.encode(), Ordering::Relaxed);
    }

    /// A copy of every cell, row by row.
    pub fn snapshot(&self) -> Vec<Cell> {
        self.cells
            .iter()
            .map(|raw| Cell::decode(raw.load(Ordering::Relaxed)))
            .collect()
    }

    /// True once no cell is unset.
    pub fn is_complete(&self) -> bool {
        self.cells
            .iter()
            .all(|raw| raw.load(Ordering::Relaxed) != UNSET)
    }
}
