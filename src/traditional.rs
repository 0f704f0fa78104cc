// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The plain escape-time render: every pixel is computed, no border is
//! probed.  The grid is cut into one band of rows per worker.
use std::panic;

use crate::block::Extent;
use crate::dwell::Evaluator;
use crate::field::{Cell, DwellField};

/// Splits `res` rows into at most `threads` contiguous bands, the first
/// `res % threads` of them one row taller.
pub fn bands(res: usize, threads: usize) -> Vec<Extent> {
    let threads = threads.max(1).min(res.max(1));
    let size = res / threads;
    let extra = res % threads;
    let mut top = 0;
    let mut bands = Vec::with_capacity(threads);
    for i in 0..threads {
        let height = size + if i < extra { 1 } else { 0 };
        if height > 0 {
            bands.push(Extent {
                top,
                left: 0,
                bottom: top + height,
                right: res,
            });
        }
        top += height;
    }
    bands
}

/// Computes every pixel of `field` on `threads` scoped workers.  With
/// `mark_borders`, the outline of the whole image is marked as brute
/// forced afterwards.
pub fn render(field: &DwellField, eval: &Evaluator, threads: usize, mark_borders: bool) {
    let res = field.res();
    let scoped = crossbeam::scope(|spawner| {
        for band in bands(res, threads) {
            spawner.spawn(move |_| {
                for (row, col) in band.cells() {
                    field.store(row, col, eval.dwell(row, col));
                }
            });
        }
    });
    if let Err(cause) = scoped {
        panic::resume_unwind(cause);
    }
    if mark_borders && res > 0 {
        let whole = Extent {
            top: 0,
            left: 0,
            bottom: res,
            right: res,
        };
        for (row, col) in whole.perimeter() {
            field.mark(row, col, Cell::BorderCompute);
        }
    }
}
