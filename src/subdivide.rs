// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-block decision of the Mariani-Silver algorithm: fill the
//! block with its border dwell, brute-force it, or split it.
use log::trace;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::block::{Block, Extent};
use crate::dwell::Evaluator;
use crate::field::{Cell, DwellField};
use crate::probe::Probe;

/// The tunables of the decision.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Policy {
    /// Blocks this size or smaller are brute-forced instead of split.
    pub min_block: usize,
    /// Each split produces `factor * factor` children.
    pub factor: usize,
    /// Paint the perimeter of resolved blocks with marker cells.
    pub mark_borders: bool,
}

/// Counters of what the subdivider did during a run.
#[derive(Debug, Default)]
pub struct Stats {
    probes: AtomicUsize,
    fills: AtomicUsize,
    brute_forces: AtomicUsize,
    subdivisions: AtomicUsize,
}

/// A plain copy of `Stats` taken after a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Border probes run.
    pub probes: usize,
    /// Blocks resolved by the fill shortcut.
    pub fills: usize,
    /// Blocks resolved by computing every pixel.
    pub brute_forces: usize,
    /// Blocks split into children.
    pub subdivisions: usize,
}

impl Stats {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads the counters.  Only meaningful once the workers are done.
    pub fn summary(&self) -> Summary {
        Summary {
            probes: self.probes.load(Ordering::Relaxed),
            fills: self.fills.load(Ordering::Relaxed),
            brute_forces: self.brute_forces.load(Ordering::Relaxed),
            subdivisions: self.subdivisions.load(Ordering::Relaxed),
        }
    }
}

/// What became of a block after one step.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Every pixel of the block now holds a dwell.
    Resolved,
    /// The block was too detailed to resolve; its children still need
    /// a step each.
    Split(Vec<Block>),
}

/// Runs the decision on blocks of one field.  Borrowed by every worker
/// of a render.
pub struct Subdivider<'a> {
    field: &'a DwellField,
    eval: &'a Evaluator,
    policy: Policy,
    stats: &'a Stats,
}

impl<'a> Subdivider<'a> {
    /// A subdivider writing into `field`.
    pub fn new(
        field: &'a DwellField,
        eval: &'a Evaluator,
        policy: Policy,
        stats: &'a Stats,
    ) -> Self {
        Subdivider {
            field,
            eval,
            policy,
            stats,
        }
    }

    /// Probes the border of `block` and then fills, brute-forces or
    /// splits it.  Children are returned, never recursed into, so the
    /// caller decides how they get scheduled.
    pub fn step(&self, block: Block, probe: Probe) -> Step {
        let extent = match block.clip(self.field.res()) {
            Some(extent) => extent,
            None => return Step::Resolved,
        };
        Stats::bump(&self.stats.probes);
        if let Some(dwell) = probe.run(self.field, self.eval, &extent).uniform() {
            self.fill(&extent, dwell);
            Step::Resolved
        } else if block.side <= self.policy.min_block {
            self.brute_force(&extent);
            Step::Resolved
        } else {
            Stats::bump(&self.stats.subdivisions);
            let children = block.split(self.policy.factor, self.field.res());
            trace!("Splitting {:?} into {} children", block, children.len());
            Step::Split(children)
        }
    }

    fn fill(&self, extent: &Extent, dwell: u32) {
        Stats::bump(&self.stats.fills);
        for (row, col) in extent.cells() {
            self.field.fill(row, col, dwell);
        }
        if self.policy.mark_borders {
            self.mark(extent, Cell::BorderFill);
        }
    }

    fn brute_force(&self, extent: &Extent) {
        Stats::bump(&self.stats.brute_forces);
        for (row, col) in extent.cells() {
            self.field.store(row, col, self.eval.dwell(row, col));
        }
        if self.policy.mark_borders {
            self.mark(extent, Cell::BorderCompute);
        }
    }

    fn mark(&self, extent: &Extent, marker: Cell) {
        for (row, col) in extent.perimeter() {
            self.field.mark(row, col, marker);
        }
    }
}
