// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Square blocks of the pixel grid and the rectangles they cover once
//! clipped to the grid.
use itertools::{iproduct, Product};
use std::ops::Range;

/// Rounds the side of the root block up from `res` to the smallest
/// `min_block * factor^k` that covers the whole grid, so that every
/// subdivision splits evenly down to `min_block`.
pub fn root_side(res: usize, min_block: usize, factor: usize) -> usize {
    assert!(min_block > 0 && factor > 1);
    let mut side = min_block;
    while side < res {
        side *= factor;
    }
    side
}

/// A square block of the grid, addressed by its top left pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Row of the top left pixel.
    pub row: usize,
    /// Column of the top left pixel.
    pub col: usize,
    /// Length of a side, in pixels.
    pub side: usize,
}

impl Block {
    /// A block with its top left pixel at `row`, `col`.
    pub fn new(row: usize, col: usize, side: usize) -> Self {
        Block { row, col, side }
    }

    /// The block covering a whole (rounded up) grid.
    pub fn root(side: usize) -> Self {
        Block::new(0, 0, side)
    }

    /// Splits the block into `factor * factor` children, row by row.
    /// Children whose top left pixel lies past a `res` x `res` grid are
    /// never built.
    pub fn split(&self, factor: usize, res: usize) -> Vec<Block> {
        assert!(
            factor > 1 && self.side % factor == 0,
            "side {} does not split by {}",
            self.side,
            factor
        );
        let side = self.side / factor;
        let rows = visible(self.row, side, factor, res);
        let cols = visible(self.col, side, factor, res);
        let children: Vec<Block> = iproduct!(0..rows, 0..cols)
            .map(|(y, x)| Block::new(self.row + y * side, self.col + x * side, side))
            .collect();
        debug_assert!(disjoint(&children), "children of {:?} overlap", self);
        children
    }

    /// True when the two blocks share at least one pixel.
    pub fn overlaps(&self, other: &Block) -> bool {
        self.row < other.row + other.side
            && other.row < self.row + self.side
            && self.col < other.col + other.side
            && other.col < self.col + self.side
    }

    /// The part of the block that lies on a `res` x `res` grid, or
    /// `None` if the block lies wholly in the rounding margin.
    pub fn clip(&self, res: usize) -> Option<Extent> {
        if self.side == 0 || self.row >= res || self.col >= res {
            return None;
        }
        Some(Extent {
            top: self.row,
            left: self.col,
            bottom: (self.row + self.side).min(res),
            right: (self.col + self.side).min(res),
        })
    }
}

// How many of `factor` children of side `side`, laid out from `start`,
// begin inside the grid.
fn visible(start: usize, side: usize, factor: usize, res: usize) -> usize {
    if start >= res {
        return 0;
    }
    ((res - start + side - 1) / side).min(factor)
}

/// True when no two of the blocks overlap.  The blocks must share one
/// side and come in row-major order, as `Block::split` produces them:
/// each block then only has to clear the one before it.
pub fn disjoint(blocks: &[Block]) -> bool {
    blocks.windows(2).all(|pair| {
        let (a, b) = (&pair[0], &pair[1]);
        debug_assert_eq!(a.side, b.side);
        (b.row == a.row && b.col >= a.col + a.side) || b.row >= a.row + a.side
    })
}

/// One side of a rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    /// The first row.
    Top,
    /// The last column.
    Right,
    /// The last row.
    Bottom,
    /// The first column.
    Left,
}

impl Edge {
    /// All four edges, clockwise from the top.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

/// A non-empty rectangle of pixels.  `bottom` and `right` are exclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Extent {
    /// First row.
    pub top: usize,
    /// First column.
    pub left: usize,
    /// One past the last row.
    pub bottom: usize,
    /// One past the last column.
    pub right: usize,
}

impl Extent {
    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        (self.bottom - self.top) * (self.right - self.left)
    }

    /// The (row, col) pixels of one edge.
    pub fn edge(&self, edge: Edge) -> EdgeCells {
        match edge {
            Edge::Top => EdgeCells::row(self.top, self.left..self.right),
            Edge::Bottom => EdgeCells::row(self.bottom - 1, self.left..self.right),
            Edge::Left => EdgeCells::column(self.left, self.top..self.bottom),
            Edge::Right => EdgeCells::column(self.right - 1, self.top..self.bottom),
        }
    }

    /// The (row, col) pixels of all four edges.  Corners, and whole
    /// edges of one pixel wide rectangles, come up more than once.
    pub fn perimeter<'a>(&'a self) -> impl Iterator<Item = (usize, usize)> + 'a {
        (0..Edge::ALL.len()).flat_map(move |i| self.edge(Edge::ALL[i]))
    }

    /// Every (row, col) pixel, row by row.
    pub fn cells(&self) -> Product<Range<usize>, Range<usize>> {
        iproduct!(self.top..self.bottom, self.left..self.right)
    }
}

/// Iterator over the pixels of one edge of an `Extent`.
#[derive(Clone, Debug)]
pub struct EdgeCells {
    fixed: usize,
    span: Range<usize>,
    horizontal: bool,
}

impl EdgeCells {
    fn row(row: usize, span: Range<usize>) -> Self {
        EdgeCells { fixed: row, span, horizontal: true }
    }

    fn column(col: usize, span: Range<usize>) -> Self {
        EdgeCells { fixed: col, span, horizontal: false }
    }
}

impl Iterator for EdgeCells {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        let i = self.span.next()?;
        if self.horizontal {
            Some((self.fixed, i))
        } else {
            Some((i, self.fixed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn root_side_rounds_up() {
        assert_eq!(root_side(64, 16, 4), 64);
        assert_eq!(root_side(65, 16, 4), 256);
        assert_eq!(root_side(1024, 16, 4), 1024);
        assert_eq!(root_side(1000, 16, 2), 1024);
        assert_eq!(root_side(100, 16, 3), 144);
    }

    #[test]
    fn small_grids_still_get_a_full_block() {
        assert_eq!(root_side(1, 16, 4), 16);
        assert_eq!(root_side(10, 16, 4), 16);
    }

    #[test]
    fn split_tiles_the_parent() {
        let parent = Block::new(16, 32, 16);
        let children = parent.split(4, 64);
        assert_eq!(children.len(), 16);
        assert_eq!(children[0], Block::new(16, 32, 4));
        assert_eq!(children[1], Block::new(16, 36, 4));
        assert_eq!(children[4], Block::new(20, 32, 4));
        assert!(disjoint(&children));
        let area: usize = children.iter().map(|c| c.side * c.side).sum();
        assert_eq!(area, 256);
    }

    #[test]
    fn split_skips_children_past_the_grid() {
        let children = Block::root(16 * 100_000).split(100_000, 64);
        assert_eq!(children.len(), 16);
        assert_eq!(children[3], Block::new(0, 48, 16));
        assert_eq!(children[15], Block::new(48, 48, 16));

        // A child poking past the edge is kept, one starting past it is not.
        let children = Block::new(0, 32, 32).split(4, 50);
        assert_eq!(children.len(), 4 * 3);
        assert!(children.iter().all(|c| c.col < 50));
        assert!(disjoint(&children));

        assert!(Block::new(64, 0, 16).split(4, 64).is_empty());
    }

    #[test]
    #[should_panic]
    fn split_rejects_uneven_sides() {
        Block::new(0, 0, 10).split(4, 10);
    }

    #[test]
    fn overlap_detection() {
        let a = Block::new(0, 0, 4);
        assert!(a.overlaps(&Block::new(3, 3, 4)));
        assert!(!a.overlaps(&Block::new(4, 0, 4)));
        assert!(!a.overlaps(&Block::new(0, 4, 4)));
        assert!(!disjoint(&[a, Block::new(2, 2, 4), Block::new(8, 8, 4)]));
        assert!(!disjoint(&[a, Block::new(0, 2, 4)]));
        assert!(disjoint(&[a, Block::new(0, 4, 4), Block::new(4, 0, 4)]));
    }

    #[test]
    fn clip_cuts_the_margin() {
        assert_eq!(
            Block::new(48, 32, 32).clip(50),
            Some(Extent { top: 48, left: 32, bottom: 50, right: 50 })
        );
        assert_eq!(Block::new(0, 50, 16).clip(50), None);
        assert_eq!(Block::new(0, 0, 16).clip(50).map(|e| e.area()), Some(256));
    }

    #[test]
    fn perimeter_visits_exactly_the_border() {
        let extent = Block::new(2, 3, 4).clip(100).unwrap();
        let cells: HashSet<(usize, usize)> = extent.perimeter().collect();
        assert_eq!(cells.len(), 12);
        assert!(cells.contains(&(2, 3)));
        assert!(cells.contains(&(5, 6)));
        assert!(cells.contains(&(2, 6)));
        assert!(!cells.contains(&(3, 4)));
        assert_eq!(extent.perimeter().count(), 16);
    }

    #[test]
    fn edges_run_along_the_right_lines() {
        let extent = Extent { top: 0, left: 0, bottom: 3, right: 2 };
        assert_eq!(extent.edge(Edge::Top).collect::<Vec<_>>(), vec![(0, 0), (0, 1)]);
        assert_eq!(extent.edge(Edge::Bottom).collect::<Vec<_>>(), vec![(2, 0), (2, 1)]);
        assert_eq!(extent.edge(Edge::Left).collect::<Vec<_>>(), vec![(0, 0), (1, 0), (2, 0)]);
        assert_eq!(extent.edge(Edge::Right).collect::<Vec<_>>(), vec![(0, 1), (1, 1), (2, 1)]);
        assert_eq!(extent.cells().count(), 6);
    }
}
