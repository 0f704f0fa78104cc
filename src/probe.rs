// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The border probe: walks the perimeter of a block, computing any
//! perimeter pixel the field does not hold yet, and reports whether the
//! whole perimeter shares one dwell.
//!
//! A uniform perimeter is taken to mean a uniform interior.  That is an
//! approximation, not a theorem: thin filaments of the set can cross a
//! block without touching its border and are then painted over by the
//! fill.  It is what makes the algorithm fast, so it stays.
use std::panic;
use std::sync::Mutex;

use crate::block::{Edge, Extent};
use crate::dwell::Evaluator;
use crate::field::DwellField;

/// The outcome of probing a block's perimeter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Every perimeter pixel has this dwell.
    Uniform(u32),
    /// The serial probe found two different dwells.
    Heterogeneous,
    /// The parallel probe found two different dwells and told its edge
    /// workers to stop.  Means the same as `Heterogeneous`.
    Conflict,
}

impl Verdict {
    /// The common dwell, if there is one.
    pub fn uniform(self) -> Option<u32> {
        match self {
            Verdict::Uniform(dwell) => Some(dwell),
            Verdict::Heterogeneous | Verdict::Conflict => None,
        }
    }
}

/// How a perimeter gets walked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Probe {
    /// One edge after the other on the calling thread, stopping at the
    /// first mismatch.
    Serial,
    /// One scoped thread per edge, sharing a locked accumulator.
    Parallel,
}

impl Probe {
    /// Probes the perimeter of `extent`.
    pub fn run(self, field: &DwellField, eval: &Evaluator, extent: &Extent) -> Verdict {
        match self {
            Probe::Serial => serial(field, eval, extent),
            Probe::Parallel => parallel(field, eval, extent),
        }
    }
}

/// Probes the perimeter on the calling thread.
pub fn serial(field: &DwellField, eval: &Evaluator, extent: &Extent) -> Verdict {
    let mut common = None;
    for (row, col) in extent.perimeter() {
        let dwell = field.memoize(row, col, || eval.dwell(row, col));
        match common {
            None => common = Some(dwell),
            Some(seen) if seen != dwell => return Verdict::Heterogeneous,
            Some(_) => {}
        }
    }
    match common {
        Some(dwell) => Verdict::Uniform(dwell),
        None => Verdict::Heterogeneous,
    }
}

// What the edge workers of a parallel probe have agreed on so far.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Accumulator {
    Empty,
    Common(u32),
    Conflict,
}

impl Accumulator {
    fn offer(&mut self, dwell: u32) {
        *self = match *self {
            Accumulator::Empty => Accumulator::Common(dwell),
            Accumulator::Common(seen) if seen == dwell => Accumulator::Common(seen),
            _ => Accumulator::Conflict,
        }
    }
}

fn probe_edge(
    field: &DwellField,
    eval: &Evaluator,
    extent: &Extent,
    edge: Edge,
    accumulator: &Mutex<Accumulator>,
) {
    for (row, col) in extent.edge(edge) {
        if *accumulator.lock().expect("probe accumulator poisoned") == Accumulator::Conflict {
            return;
        }
        let dwell = field.memoize(row, col, || eval.dwell(row, col));
        let mut common = accumulator.lock().expect("probe accumulator poisoned");
        common.offer(dwell);
        if *common == Accumulator::Conflict {
            return;
        }
    }
}

/// Probes the four edges concurrently, one scoped thread each.  Every
/// compare-and-update of the shared accumulator happens under its lock;
/// a worker that sees a conflict stops at its next pixel.
pub fn parallel(field: &DwellField, eval: &Evaluator, extent: &Extent) -> Verdict {
    let accumulator = Mutex::new(Accumulator::Empty);
    let scoped = crossbeam::scope(|spawner| {
        for &edge in Edge::ALL.iter() {
            let accumulator = &accumulator;
            spawner.spawn(move |_| probe_edge(field, eval, extent, edge, accumulator));
        }
    });
    if let Err(cause) = scoped {
        panic::resume_unwind(cause);
    }
    match accumulator.into_inner().expect("probe accumulator poisoned") {
        Accumulator::Common(dwell) => Verdict::Uniform(dwell),
        Accumulator::Conflict => Verdict::Conflict,
        Accumulator::Empty => Verdict::Heterogeneous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::field::Cell;
    use crate::planes::PlaneMapper;
    use num::Complex;

    // Re[-0.4, 0] x Im[-0.2, 0.2] lies inside the main cardioid.
    fn inside(res: usize) -> Evaluator {
        Evaluator::new(
            PlaneMapper::new(res, Complex::new(-0.4, -0.2), Complex::new(0.4, 0.4)),
            50,
        )
    }

    fn straddling(res: usize) -> Evaluator {
        Evaluator::new(PlaneMapper::from_view(res, 0.5, 0.5, 1.0), 50)
    }

    #[test]
    fn uniform_perimeter_inside_the_set() {
        let field = DwellField::new(32);
        let extent = Block::root(32).clip(32).unwrap();
        assert_eq!(serial(&field, &inside(32), &extent), Verdict::Uniform(50));
        // Only the perimeter was touched.
        assert_eq!(field.get(0, 0), Cell::Computed(50));
        assert_eq!(field.get(16, 16), Cell::Unset);
    }

    #[test]
    fn mixed_perimeter_across_the_boundary() {
        let field = DwellField::new(32);
        let extent = Block::root(32).clip(32).unwrap();
        assert_eq!(serial(&field, &straddling(32), &extent), Verdict::Heterogeneous);
        assert_eq!(Verdict::Heterogeneous.uniform(), None);
    }

    #[test]
    fn parallel_probe_agrees_with_serial() {
        let eval = inside(32);
        let field = DwellField::new(32);
        let extent = Block::new(8, 8, 16).clip(32).unwrap();
        assert_eq!(Probe::Parallel.run(&field, &eval, &extent), Verdict::Uniform(50));

        let eval = straddling(32);
        let field = DwellField::new(32);
        let extent = Block::root(32).clip(32).unwrap();
        assert_eq!(Probe::Parallel.run(&field, &eval, &extent), Verdict::Conflict);
        assert_eq!(Verdict::Conflict.uniform(), None);
    }

    #[test]
    fn reprobing_keeps_memoized_values() {
        let eval = straddling(16);
        let field = DwellField::new(16);
        let extent = Block::root(16).clip(16).unwrap();
        for (row, col) in extent.perimeter() {
            field.memoize(row, col, || eval.dwell(row, col));
        }
        let before = field.snapshot();
        serial(&field, &eval, &extent);
        parallel(&field, &eval, &extent);
        assert_eq!(field.snapshot(), before);
    }

    #[test]
    fn accumulator_flips_once() {
        let mut acc = Accumulator::Empty;
        acc.offer(3);
        assert_eq!(acc, Accumulator::Common(3));
        acc.offer(3);
        assert_eq!(acc, Accumulator::Common(3));
        acc.offer(4);
        assert_eq!(acc, Accumulator::Conflict);
        acc.offer(3);
        assert_eq!(acc, Accumulator::Conflict);
    }
}
