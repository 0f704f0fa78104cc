// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time ("dwell") evaluation for single pixels.
use num::Complex;

use crate::planes::{Pixel, PlaneMapper};

/// Iterates `z = z * z + c`, starting at `z = c`, and counts the
/// iterations until `|z| >= 2` or the count reaches `max_dwell`.
#[inline]
pub fn escape_time(c: Complex<f64>, max_dwell: u32) -> u32 {
    let mut z = c;
    let mut dwell = 0;
    while dwell < max_dwell && z.norm_sqr() < 4.0 {
        z = z * z + c;
        dwell += 1;
    }
    dwell
}

/// Computes the dwell of grid pixels.  Holds no mutable state, so a
/// single evaluator is shared by reference between all workers.
#[derive(Copy, Clone, Debug)]
pub struct Evaluator {
    plane: PlaneMapper,
    max_dwell: u32,
}

impl Evaluator {
    /// Evaluates pixels of `plane` with an iteration cap of `max_dwell`.
    pub fn new(plane: PlaneMapper, max_dwell: u32) -> Self {
        Evaluator { plane, max_dwell }
    }

    /// The iteration cap.
    pub fn max_dwell(&self) -> u32 {
        self.max_dwell
    }

    /// The dwell of the pixel at `row`, `col`.
    #[inline]
    pub fn dwell(&self, row: usize, col: usize) -> u32 {
        escape_time(self.plane.pixel_to_point(&Pixel(col, row)), self.max_dwell)
    }
}
