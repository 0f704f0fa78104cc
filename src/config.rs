// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Run parameters.  Out-of-range values are never an error: they are
//! clamped into range by `RenderConfig::clamped`.
use num::clamp;
use std::path::PathBuf;

use crate::field::MAX_DWELL;
use crate::planes::PlaneMapper;
use crate::strategy::Strategy;

/// Smallest accepted brute-force block side.
pub const MIN_BLOCK_SIZE: usize = 4;
/// Smallest accepted subdivision factor.
pub const MIN_SUBDIVISION: usize = 2;
/// Worker threads allowed per logical CPU.
pub const THREADS_PER_CPU: usize = 4;

/// Everything one render needs.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Viewport center on the real axis, in [0, 1].
    pub center_x: f64,
    /// Viewport center on the imaginary axis, in [0, 1].
    pub center_y: f64,
    /// Inverse zoom, in (0, 1].
    pub scale: f64,
    /// Side of the square image, in pixels.
    pub resolution: usize,
    /// Iteration cap per pixel.
    pub max_dwell: u32,
    /// How many times the colour gradient repeats over the dwell range.
    pub colour_iterations: u32,
    /// Blocks this size or smaller are brute-forced.
    pub min_block_size: usize,
    /// Children per side of a split block.
    pub subdivision_factor: usize,
    /// Paint the perimeter of resolved blocks.
    pub mark_borders: bool,
    /// Skip subdivision and compute every pixel.
    pub traditional: bool,
    /// How the subdivision work is scheduled.
    pub strategy: Strategy,
    /// Worker budget of the pooled strategies and of traditional mode.
    pub threads: usize,
    /// Where the image goes.
    pub output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            center_x: 0.5,
            center_y: 0.5,
            scale: 1.0,
            resolution: 1024,
            max_dwell: 512,
            colour_iterations: 1,
            min_block_size: 16,
            subdivision_factor: 4,
            mark_borders: false,
            traditional: false,
            strategy: Strategy::default(),
            threads: num_cpus::get(),
            output: PathBuf::from("output.png"),
        }
    }
}

impl RenderConfig {
    /// Pulls every parameter into its valid range.  A scale of zero (or
    /// anything that is not a number) means no zoom.
    pub fn clamped(mut self) -> Self {
        self.center_x = unit(self.center_x, 0.5);
        self.center_y = unit(self.center_y, 0.5);
        self.scale = unit(self.scale, 1.0);
        if self.scale == 0.0 {
            self.scale = 1.0;
        }
        self.resolution = self.resolution.max(1);
        self.max_dwell = clamp(self.max_dwell, 1, MAX_DWELL);
        self.colour_iterations = self.colour_iterations.max(1);
        self.min_block_size = self.min_block_size.max(MIN_BLOCK_SIZE);
        // Any factor from the resolution up splits the root straight into
        // blocks of the minimum size, so larger ones render the same.
        self.subdivision_factor =
            clamp(self.subdivision_factor, MIN_SUBDIVISION, self.resolution.max(MIN_SUBDIVISION));
        self.threads = clamp(self.threads, 1, max_threads());
        self
    }

    /// The plane mapping of the viewport.
    pub fn plane(&self) -> PlaneMapper {
        PlaneMapper::from_view(self.resolution, self.center_x, self.center_y, self.scale)
    }
}

/// The most worker threads a render will start.
pub fn max_threads() -> usize {
    THREADS_PER_CPU * num_cpus::get()
}

fn unit(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        clamp(value, 0.0, 1.0)
    }
}
