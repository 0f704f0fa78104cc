// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Depth-first recursion on the calling thread.
use crate::block::Block;
use crate::probe::Probe;
use crate::subdivide::{Step, Subdivider};

fn recurse(sub: &Subdivider, block: Block, probe: Probe) {
    if let Step::Split(children) = sub.step(block, probe) {
        for child in children {
            recurse(sub, child, probe);
        }
    }
}

/// Resolves `root` with serial probes.  The reference every other
/// strategy is compared against.
pub fn run(sub: &Subdivider, root: Block) {
    recurse(sub, root, Probe::Serial);
}

/// Resolves `root` with the same recursion, but probes each border on
/// four threads.
pub fn run_parallel_probe(sub: &Subdivider, root: Block) {
    recurse(sub, root, Probe::Parallel);
}
