// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Queue plus fixed worker pool.  A split does not recurse: its
//! children are pushed onto a shared FIFO and the worker moves on.  A
//! fixed set of workers pops one job at a time and runs exactly one
//! subdivider step on it.
//!
//! Termination is counted rather than signalled: `enqueued` is bumped
//! before a job becomes visible and `processed` after its step, children
//! included, has been pushed.  When the two meet, no job is queued or in
//! flight and every worker returns.
use log::debug;
use std::collections::VecDeque;
use std::panic;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread;

use crate::block::{disjoint, Block};
use crate::probe::Probe;
use crate::subdivide::{Step, Subdivider};

/// One pending subdivider step.  The plane mapping and the field reach
/// the job through the `Subdivider` every worker borrows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Job {
    /// The block to probe.
    pub block: Block,
}

/// Owns the job queue, the condition idle workers wait on, and the two
/// counters that decide when the work is finished.
#[derive(Debug, Default)]
pub struct WorkDistributor {
    queue: Mutex<VecDeque<Job>>,
    ready: Condvar,
    enqueued: AtomicUsize,
    processed: AtomicUsize,
    aborted: AtomicBool,
}

// Wakes every idle worker if the job being run panics, so they can
// leave instead of waiting for a `processed` bump that never comes.
struct AbortOnPanic<'a>(&'a WorkDistributor);

impl<'a> Drop for AbortOnPanic<'a> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.aborted.store(true, Ordering::SeqCst);
            let _queue = self.0.queue.lock();
            self.0.ready.notify_all();
        }
    }
}

impl WorkDistributor {
    /// An empty distributor.
    pub fn new() -> Self {
        WorkDistributor::default()
    }

    fn lock(&self) -> MutexGuard<VecDeque<Job>> {
        self.queue.lock().expect("job queue poisoned")
    }

    /// Queues one job per block and wakes idle workers.
    pub fn push_all(&self, blocks: Vec<Block>) {
        if blocks.is_empty() {
            return;
        }
        debug_assert!(disjoint(&blocks), "overlapping blocks queued");
        self.enqueued.fetch_add(blocks.len(), Ordering::SeqCst);
        let mut queue = self.lock();
        queue.extend(blocks.into_iter().map(|block| Job { block }));
        self.ready.notify_all();
    }

    /// Blocks until a job is available, or returns `None` once all work
    /// is done.
    pub fn next(&self) -> Option<Job> {
        let mut queue = self.lock();
        loop {
            if self.aborted.load(Ordering::SeqCst) {
                return None;
            }
            if let Some(job) = queue.pop_front() {
                return Some(job);
            }
            if self.is_finished() {
                return None;
            }
            queue = self.ready.wait(queue).expect("job queue poisoned");
        }
    }

    /// Records one finished job.  Must come after its children were
    /// pushed.
    pub fn done(&self) {
        let processed = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
        let enqueued = self.enqueued.load(Ordering::SeqCst);
        assert!(processed <= enqueued, "{} jobs processed, {} enqueued", processed, enqueued);
        if processed == enqueued {
            let _queue = self.lock();
            self.ready.notify_all();
        }
    }

    /// Runs jobs through `step` until all work is done.  `step` returns
    /// the blocks that still need a step of their own.
    pub fn work<F>(&self, step: F)
    where
        F: Fn(Job) -> Vec<Block>,
    {
        let _abort = AbortOnPanic(self);
        while let Some(job) = self.next() {
            let children = step(job);
            self.push_all(children);
            self.done();
        }
    }

    /// True when every queued job has been processed.
    pub fn is_finished(&self) -> bool {
        self.processed.load(Ordering::SeqCst) == self.enqueued.load(Ordering::SeqCst)
    }

    /// Jobs queued so far.
    pub fn enqueued(&self) -> usize {
        self.enqueued.load(Ordering::SeqCst)
    }

    /// Jobs finished so far.
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }
}

/// Resolves `root` with `threads` queue workers.
pub fn run(sub: &Subdivider, root: Block, threads: usize) {
    let distributor = WorkDistributor::new();
    distributor.push_all(vec![root]);
    let scoped = crossbeam::scope(|spawner| {
        for _ in 0..threads.max(1) {
            let distributor = &distributor;
            spawner.spawn(move |_| {
                distributor.work(|job| match sub.step(job.block, Probe::Serial) {
                    Step::Split(children) => children,
                    Step::Resolved => vec![],
                })
            });
        }
    });
    if let Err(cause) = scoped {
        panic::resume_unwind(cause);
    }
    debug!(
        "Queue drained: {} jobs enqueued, {} processed",
        distributor.enqueued(),
        distributor.processed()
    );
    assert!(distributor.is_finished());
}
