// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Task-per-recursion: every split spawns one task per child and waits
//! for all of them before the parent counts as done.
//!
//! The tasks run on a rayon pool of a fixed size rather than on a thread
//! each, so deep subdivisions queue up instead of piling up threads.  A
//! parent waiting in `rayon::scope` keeps executing pending tasks on its
//! own thread, which is what stops the nested waits from starving the
//! pool.
use log::debug;
use rayon::ThreadPoolBuilder;

use crate::block::Block;
use crate::errors::RenderError;
use crate::probe::Probe;
use crate::subdivide::{Step, Subdivider};

fn resolve(sub: &Subdivider, block: Block) {
    if let Step::Split(children) = sub.step(block, Probe::Serial) {
        rayon::scope(|scope| {
            for child in children {
                scope.spawn(move |_| resolve(sub, child));
            }
        });
    }
}

/// Resolves `root` on a pool of `threads` rayon workers.
pub fn run(sub: &Subdivider, root: Block, threads: usize) -> Result<(), RenderError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("mariani-task-{}", i))
        .build()
        .map_err(|e| RenderError::WorkerPool {
            reason: e.to_string(),
        })?;
    debug!("Task pool of {} threads", pool.current_num_threads());
    pool.install(|| resolve(sub, root));
    Ok(())
}
