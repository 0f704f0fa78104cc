#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mariani-Silver Mandelbrot renderer
//!
//! The Mandelbrot set is rendered by taking a point on the complex
//! plane and repeatedly squaring it and adding the point back, counting
//! how many iterations it takes to leave the circle of radius two.
//! That count, the "dwell", is what gets coloured.
//!
//! Computing the dwell of every pixel is expensive, and most of the
//! picture is large areas of one dwell.  The Mariani-Silver trick is
//! to compute only the border of a square block: if every border pixel
//! has the same dwell, the whole block is filled with it; otherwise the
//! block is split into smaller blocks and each of those is tried in
//! turn, down to a minimum size below which every pixel is computed.
//! Border pixels are kept in the dwell field as they are computed, so
//! the borders of the children reuse the work done on their parent.
//!
//! The block work can be scheduled four ways (see `strategy`), all of
//! which write into a single shared `DwellField` and produce the same
//! result.

pub mod block;
pub mod colour;
pub mod config;
pub mod dwell;
pub mod errors;
pub mod field;
pub mod planes;
pub mod probe;
pub mod strategy;
pub mod subdivide;
pub mod traditional;

use log::debug;

pub use crate::config::RenderConfig;
pub use crate::errors::RenderError;
pub use crate::field::{Cell, DwellField};
pub use crate::strategy::Strategy;
pub use crate::subdivide::Summary;

use crate::block::{root_side, Block};
use crate::dwell::Evaluator;
use crate::subdivide::{Policy, Stats, Subdivider};

/// The outcome of a render.
#[derive(Debug)]
pub struct Render {
    /// The dwell of every pixel.
    pub field: DwellField,
    /// What the subdivider did.  All zero in traditional mode.
    pub stats: Summary,
    /// Side of the root block the resolution was rounded up to.
    pub root_side: usize,
}

/// Computes the dwell field for `config`.  The configuration is
/// clamped first.
pub fn render(config: &RenderConfig) -> Result<Render, RenderError> {
    let config = config.clone().clamped();
    let eval = Evaluator::new(config.plane(), config.max_dwell);
    let field = DwellField::new(config.resolution);
    let stats = Stats::default();
    let root_side = root_side(
        config.resolution,
        config.min_block_size,
        config.subdivision_factor,
    );

    if config.traditional {
        debug!("Traditional render on {} threads", config.threads);
        traditional::render(&field, &eval, config.threads, config.mark_borders);
    } else {
        debug!(
            "Subdividing a root block of {} with the {} strategy",
            root_side, config.strategy
        );
        let policy = Policy {
            min_block: config.min_block_size,
            factor: config.subdivision_factor,
            mark_borders: config.mark_borders,
        };
        let sub = Subdivider::new(&field, &eval, policy, &stats);
        config
            .strategy
            .run(&sub, Block::root(root_side), config.threads)?;
    }

    Ok(Render {
        field,
        stats: stats.summary(),
        root_side,
    })
}
