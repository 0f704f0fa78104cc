// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns a finished dwell field into an RGBA image.
use image::{Rgba, RgbaImage};
use std::path::Path;

use crate::errors::RenderError;
use crate::field::{Cell, DwellField};

/// Colour of perimeters resolved by the fill shortcut.
pub const BORDER_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Colour of perimeters resolved by brute force.
pub const BORDER_COMPUTE: Rgba<u8> = Rgba([255, 0, 0, 255]);

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// The gradient stops: position in [0, 1] and colour.  The last stop
/// is at 1.0.
const GRADIENT: [(f64, [u8; 3]); 7] = [
    (0.0, [0, 0, 0]),
    (0.03, [0, 7, 100]),
    (0.16, [32, 107, 203]),
    (0.42, [237, 255, 255]),
    (0.64, [255, 170, 0]),
    (0.86, [0, 2, 0]),
    (1.0, [0, 0, 0]),
];

/// A discretized linear gradient, indexed by dwell modulo its length.
#[derive(Clone, Debug)]
pub struct Palette {
    colours: Vec<Rgba<u8>>,
}

impl Palette {
    /// Spreads the gradient over `buckets` colours (slightly more, as
    /// every segment is rounded up).
    pub fn new(buckets: u32) -> Self {
        let buckets = f64::from(buckets.max(1));
        let mut colours = vec![];
        let mut from = [0u8; 3];
        let mut pos = 0.0;
        for &(stop, to) in GRADIENT.iter() {
            let steps = (buckets * (stop - pos)).ceil() as usize;
            for i in 0..steps {
                let blend = i as f64 / steps as f64;
                let mut rgba = [0, 0, 0, 255];
                for channel in 0..3 {
                    let span = f64::from(to[channel]) - f64::from(from[channel]);
                    rgba[channel] = (f64::from(from[channel]) + blend * span) as u8;
                }
                colours.push(Rgba(rgba));
            }
            pos = stop;
            from = to;
        }
        Palette { colours }
    }

    /// The palette for a render: the gradient repeats `colour_iterations`
    /// times over the dwell range.
    pub fn for_dwell(max_dwell: u32, colour_iterations: u32) -> Self {
        Palette::new(max_dwell / colour_iterations.max(1))
    }

    /// Number of distinct colours.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Never true: even a single bucket yields a few colours.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// The colour of one cell.
    pub fn colour(&self, cell: Cell) -> Rgba<u8> {
        match cell {
            Cell::Computed(dwell) => self.colours[dwell as usize % self.colours.len()],
            Cell::BorderFill => BORDER_FILL,
            Cell::BorderCompute => BORDER_COMPUTE,
            Cell::Unset => BLACK,
        }
    }
}

/// Paints every cell of the field.
pub fn paint(field: &DwellField, palette: &Palette) -> RgbaImage {
    let res = field.res() as u32;
    let mut img = RgbaImage::new(res, res);
    for (i, cell) in field.snapshot().into_iter().enumerate() {
        let (row, col) = (i / field.res(), i % field.res());
        img.put_pixel(col as u32, row as u32, palette.colour(cell));
    }
    img
}

/// Encodes the image; the format follows the file extension.
pub fn write_image(path: &Path, img: &RgbaImage) -> Result<(), RenderError> {
    img.save(path).map_err(|e| RenderError::ImageWrite {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
