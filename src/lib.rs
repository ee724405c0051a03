//! Perceptually uniform colormaps.
//!
//! - [`Colormap`]: anything mapping a value in \[0, 1\] to a color.
//! - [`Builder`]: synthetic colormaps laid out in a perceptual space.
//! - [`Linearize`]: make the lightness of a colormap linear.
//! - [`Symmetrize`]: make the lightness of a diverging colormap
//!   symmetric around its midpoint.
//!
//! The perceptual space is given by a [`Perceptual`] oracle, by
//! default [`Cam02Ucs`].  Named maps are looked up in a [`Registry`].
//!
//! ```
//! use ehtplot::{Registry, Linearize, Colormap};
//! let afmhot = Registry::builtin().get("afmhot").unwrap();
//! let ehthot = Linearize::new(64).apply(&afmhot).unwrap();
//! assert_eq!(ehthot.len(), 64);
//! ```

use rgb::RGB;

mod error;
pub mod perceptual;
mod builder;
pub mod solve;
mod uniformize;
pub mod table;
pub mod registry;
pub mod figure;

pub use error::{Error, Result};
pub use perceptual::{lightness, Perceptual, Cam02Ucs, CieLab, Jab};
pub use builder::Builder;
pub use uniformize::{Linearize, Symmetrize, Midpoint, Shape, Fallback,
                     linearize, symmetrize};
pub use registry::{Registry, MapType};

/// A function from \[0, 1\] to colors.  Components of the returned
/// colors are in \[0, 1\].
pub trait Colormap {
    /// Returns the color corresponding to `v`.
    fn rgb(&self, v: f64) -> RGB<f64>;

    /// Return an iterator yielding uniform sampling of `n` points
    /// between `a` and `b` (with the bounds `a` and `b` included in
    /// the list of points) together with their colors.  It is not
    /// required that `a <= b`.
    ///
    /// # Example
    ///
    /// ```
    /// use ehtplot::{Colormap, Registry};
    /// let gray = Registry::builtin().get("gray").unwrap();
    /// let v: Vec<f64> = gray.range(0., 1., 5).map(|(v, _)| v).collect();
    /// assert_eq!(v, [0., 0.25, 0.5, 0.75, 1.]);
    /// ```
    fn range(&self, a: f64, b: f64, n: usize) -> Range<'_, Self>
    where Self: Sized {
        if n == 0 {
            Range { cm: self, a, b, flast: 0., last: 0,
                    i: 1, j: 0 } // Empty iterator
        } else {
            Range { cm: self, a, b, flast: (n - 1) as f64,
                    last: n - 1, i: 0, j: n - 1 }
        }
    }
}

impl<F> Colormap for F
where F: Fn(f64) -> RGB<f64> {
    #[inline]
    fn rgb(&self, v: f64) -> RGB<f64> { clamp(self(v)) }
}

/// Clamp each component of `c` to \[0, 1\].
#[inline]
pub(crate) fn clamp(c: RGB<f64>) -> RGB<f64> {
    RGB::new(c.r.clamp(0., 1.), c.g.clamp(0., 1.), c.b.clamp(0., 1.))
}

/// `n` evenly spaced values from `a` to `b`, both included.
pub(crate) fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![a],
        _ => {
            let step = (b - a) / (n - 1) as f64;
            let mut v: Vec<f64> = (0 .. n).map(|i| a + i as f64 * step)
                .collect();
            v[n - 1] = b;
            v
        }
    }
}

/// An iterator yielding `f64` in a given range together with colors.
///
/// Created by [`Colormap::range`].
pub struct Range<'a, C> {
    cm: &'a C,
    a: f64,
    b: f64,
    flast: f64, // `last` as a floating-point number
    last: usize,
    i: usize, // first position to be consumed (i ≤ j)
    j: usize, // last position to be consumed
}

impl<'a, C: Colormap> Range<'a, C> {
    /// Return the value and color of the position `k` (assuming it
    /// is in the range `0 ..= self.last`).
    fn rgb(&self, k: usize) -> (f64, RGB<f64>) {
        let x = if k == 0 { self.a }
        else if k == self.last { self.b }
        else {
            let t = k as f64 / self.flast;
            (1. - t) * self.a + t * self.b
        };
        (x, self.cm.rgb(x))
    }
}

impl<'a, C: Colormap> Iterator for Range<'a, C> {
    type Item = (f64, RGB<f64>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.i <= self.j {
            let item = self.rgb(self.i);
            self.i += 1;
            Some(item)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<'a, C: Colormap> ExactSizeIterator for Range<'a, C> {
    fn len(&self) -> usize {
        if self.i <= self.j { self.j - self.i + 1 } else { 0 }
    }
}

impl<'a, C: Colormap> DoubleEndedIterator for Range<'a, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.i <= self.j {
            let item = self.rgb(self.j);
            if self.j == 0 {
                self.i = 1
            } else {
                self.j -= 1;
            }
            Some(item)
        } else {
            None
        }
    }
}


/// A colormap given by a table of colors.  Values in between table
/// entries are linearly interpolated in RGB.
#[derive(Clone, Debug, PartialEq)]
pub struct Listed {
    colors: Vec<RGB<f64>>, // Invariant: non-empty, components in [0, 1]
}

impl Listed {
    /// Colormap interpolating `colors`, the first one at `0.` and the
    /// last one at `1.`.  Components are clamped to \[0, 1\].
    pub fn new(colors: Vec<RGB<f64>>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::InvalidArgument(
                "a listed colormap needs at least one color".into()))
        }
        Ok(Self::from_vec(colors))
    }

    /// Same as [`Listed::new`] for 8-bit colors.
    pub fn from_rgb8(colors: &[[u8; 3]]) -> Result<Self> {
        Listed::new(colors.iter()
                    .map(|&[r, g, b]| RGB::new(r as f64 / 255.,
                                               g as f64 / 255.,
                                               b as f64 / 255.))
                    .collect())
    }

    /// Sample `cm` at `n` evenly spaced values of \[0, 1\].
    pub fn sample<C: Colormap>(cm: &C, n: usize) -> Result<Self> {
        Listed::new(cm.range(0., 1., n).map(|(_, c)| c).collect())
    }

    /// Assumes `colors` is non-empty.
    pub(crate) fn from_vec(colors: Vec<RGB<f64>>) -> Self {
        debug_assert!(!colors.is_empty());
        Listed { colors: colors.into_iter().map(clamp).collect() }
    }

    /// Returns the number of colors in the table.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.colors.len() }

    /// Returns the colors of the table.
    pub fn colors(&self) -> &[RGB<f64>] { &self.colors }

    /// Reverse the order of the colors.
    pub fn reversed(mut self) -> Self {
        self.colors.reverse();
        self
    }
}

impl Colormap for Listed {
    fn rgb(&self, v: f64) -> RGB<f64> {
        let n = self.colors.len();
        if n == 1 || v.is_nan() { return self.colors[0] }
        let x = v.clamp(0., 1.) * (n - 1) as f64;
        let i = x.trunc() as usize;
        if i >= n - 1 { return self.colors[n - 1] }
        let t = x.fract();
        let c0 = self.colors[i];
        let c1 = self.colors[i + 1];
        RGB::new(c0.r + t * (c1.r - c0.r),
                 c0.g + t * (c1.g - c0.g),
                 c0.b + t * (c1.b - c0.b))
    }
}

/// The colormap `v ↦ cm(1 - v)`.
#[derive(Clone, Debug)]
pub struct Reversed<C>(pub C);

impl<C: Colormap> Colormap for Reversed<C> {
    #[inline]
    fn rgb(&self, v: f64) -> RGB<f64> { self.0.rgb(1. - v) }
}
