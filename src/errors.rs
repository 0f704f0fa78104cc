// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors a render can report.  Broken internal invariants are not in
//! here: those panic.
use failure::Fail;

/// Why a render or its image could not be produced.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The task strategy could not start its thread pool.
    #[fail(display = "Could not start the worker pool: {}", reason)]
    WorkerPool {
        /// What the pool builder reported.
        reason: String,
    },
    /// The image could not be encoded or written.
    #[fail(display = "An error occurred while writing the image file '{}': {}", path, reason)]
    ImageWrite {
        /// The destination that was attempted.
        path: String,
        /// What the encoder reported.
        reason: String,
    },
}
