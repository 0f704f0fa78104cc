// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between the square pixel grid with an origin at 0,0 and a
//! rectangle on the complex plane, given by the complex coordinate of
//! pixel (0,0) and the complex extent covered by the whole grid.
use num::Complex;

/// Describes the column, row of a pixel on the grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of a `res` x `res` grid onto the complex plane.  Fixed
/// for a whole run and shared read-only between all workers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneMapper {
    /// The side of the pixel grid.
    pub res: usize,
    /// The complex coordinate of pixel (0, 0).
    pub origin: Complex<f64>,
    /// The complex extent of the full grid: the real part spans the
    /// columns, the imaginary part spans the rows.
    pub delta: Complex<f64>,
}

impl PlaneMapper {
    /// Constructor.  Takes the grid side, the coordinate of the first
    /// pixel and the extent of the grid on the complex plane.
    pub fn new(res: usize, origin: Complex<f64>, delta: Complex<f64>) -> PlaneMapper {
        assert!(res > 0, "the pixel grid must not be empty");
        PlaneMapper { res, origin, delta }
    }

    /// Builds the mapping for a viewport.  The center is given in unit
    /// coordinates: (0.5, 0.5) is the classic Re[-1.5, 0.5] x Im[-1, 1]
    /// window, and moving a unit coordinate by one moves the window by
    /// four on the complex plane.  `scale` shrinks the window around
    /// its center, so 0.5 is a 2x zoom.
    pub fn from_view(res: usize, center_x: f64, center_y: f64, scale: f64) -> PlaneMapper {
        let xmin = -3.5 + 4.0 * center_x;
        let xmax = -1.5 + 4.0 * center_x;
        let ymin = -3.0 + 4.0 * center_y;
        let ymax = -1.0 + 4.0 * center_y;
        let xlen = (xmax - xmin).abs();
        let ylen = (ymax - ymin).abs();

        let shrink = 0.5 * (1.0 - scale);
        let leftlower = Complex::new(xmin + shrink * xlen, ymin + shrink * ylen);
        let rightupper = Complex::new(xmax - shrink * xlen, ymax - shrink * ylen);
        PlaneMapper::new(res, leftlower, rightupper - leftlower)
    }

    /// The opposite corner of the window, i.e. `origin + delta`.
    pub fn corner(&self) -> Complex<f64> {
        self.origin + self.delta
    }

    /// The total number of points in the pixel grid.
    pub fn len(&self) -> usize {
        self.res * self.res
    }

    /// Never true for a mapper built by `new`; present for symmetry
    /// with `len`.
    pub fn is_empty(&self) -> bool {
        self.res == 0
    }

    /// Given a pixel on the grid, return the point it stands for on the
    /// complex plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let fx = pixel.0 as f64 / self.res as f64;
        let fy = pixel.1 as f64 / self.res as f64;
        self.origin + Complex::new(fx * self.delta.re, fy * self.delta.im)
    }
}
