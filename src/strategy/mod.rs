// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The four ways of driving the subdivider over a grid.  They differ
//! only in scheduling: given the same inputs, every one of them leaves
//! the same dwell field behind.
use std::fmt;
use std::str::FromStr;

use crate::block::Block;
use crate::errors::RenderError;
use crate::subdivide::Subdivider;

pub mod queue;
pub mod sequential;
pub mod tasks;

pub use self::queue::WorkDistributor;

/// A concurrency strategy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Plain recursion on the calling thread.
    Sequential,
    /// One task per child block on a bounded rayon pool, each parent
    /// waiting for its children.
    Tasks,
    /// Plain recursion, with every border probe split over four threads.
    ParallelProbe,
    /// Children go onto a shared queue drained by a fixed set of
    /// workers.
    Queue,
}

impl Strategy {
    /// Every strategy, in the order they are listed on the command line.
    pub const ALL: [Strategy; 4] = [
        Strategy::Sequential,
        Strategy::Tasks,
        Strategy::ParallelProbe,
        Strategy::Queue,
    ];

    /// The command line name of the strategy.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Tasks => "tasks",
            Strategy::ParallelProbe => "parallel-probe",
            Strategy::Queue => "queue",
        }
    }

    /// Resolves `root` and everything below it.  `threads` bounds the
    /// worker count of the pooled strategies.
    pub fn run(self, sub: &Subdivider, root: Block, threads: usize) -> Result<(), RenderError> {
        match self {
            Strategy::Sequential => {
                sequential::run(sub, root);
                Ok(())
            }
            Strategy::ParallelProbe => {
                sequential::run_parallel_probe(sub, root);
                Ok(())
            }
            Strategy::Tasks => tasks::run(sub, root, threads),
            Strategy::Queue => {
                queue::run(sub, root, threads);
                Ok(())
            }
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Queue
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .iter()
            .cloned()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| format!("Unknown strategy '{}'", s))
    }
}
