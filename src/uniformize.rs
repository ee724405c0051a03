use std::io::Write;
use log::{debug, warn};
use rayon::prelude::*;
use rgb::RGB;
use crate::{linspace, table, Colormap, Error, Listed, Result};
use crate::perceptual::{Cam02Ucs, Perceptual};
use crate::solve::{Bisection, NelderMead};

fn check_samples(n: usize, even: bool) -> Result<()> {
    if n < 2 {
        return Err(Error::InvalidArgument(
            format!("need at least 2 samples, got {n}")))
    }
    if even && n % 2 != 0 {
        return Err(Error::InvalidArgument(
            format!("the number of samples must be even, got {n}")))
    }
    Ok(())
}

fn check_interval(vmin: f64, vmax: f64) -> Result<()> {
    if !(vmin < vmax) {
        return Err(Error::InvalidArgument(
            format!("empty value interval [{vmin}, {vmax}]")))
    }
    Ok(())
}

/// Record the lightness that was sought in a root-finding error.
fn for_target(e: Error, target: f64) -> Error {
    match e {
        Error::NoBracket { lo, hi, .. } => Error::NoBracket { target, lo, hi },
        e => e,
    }
}

/// Resample a colormap so that its lightness is a linear function of
/// the sample index.
///
/// For each of `n` lightness values evenly spaced between `lmin` and
/// `lmax` (by default the lightness at `vmin` and `vmax`), the value
/// `v` ∈ \[`vmin`, `vmax`\] with that lightness is found by bisection.
/// The lightness must be monotonic on \[`vmin`, `vmax`\] for the result
/// to be meaningful.  A lightness that cannot be bracketed is an
/// error.
///
/// # Example
///
/// ```
/// use ehtplot::{Linearize, Registry};
/// let afmhot = Registry::builtin().get("afmhot").unwrap();
/// let mut table = Vec::new();
/// Linearize::new(16).save(&afmhot, &mut table).unwrap();
/// assert_eq!(String::from_utf8(table).unwrap().lines().count(), 16);
/// ```
#[derive(Clone, Debug)]
pub struct Linearize<P = Cam02Ucs> {
    n: usize,
    lmin: Option<f64>,
    lmax: Option<f64>,
    vmin: f64,
    vmax: f64,
    oracle: P,
    bisection: Bisection,
}

impl Linearize {
    /// Linearize to `n ≥ 2` samples over \[0, 1\].
    pub fn new(n: usize) -> Self {
        Linearize { n, lmin: None, lmax: None, vmin: 0., vmax: 1.,
                    oracle: Cam02Ucs::default(),
                    bisection: Bisection::default() }
    }
}

impl<P: Perceptual + Sync> Linearize<P> {
    /// Lightness of the first sample.
    pub fn lmin(mut self, l: f64) -> Self {
        self.lmin = Some(l);
        self
    }

    /// Lightness of the last sample.
    pub fn lmax(mut self, l: f64) -> Self {
        self.lmax = Some(l);
        self
    }

    /// Lower end of the value interval (default `0.`).
    pub fn vmin(mut self, v: f64) -> Self {
        self.vmin = v;
        self
    }

    /// Upper end of the value interval (default `1.`).
    pub fn vmax(mut self, v: f64) -> Self {
        self.vmax = v;
        self
    }

    /// Root finder used for each sample.
    pub fn bisection(mut self, b: Bisection) -> Self {
        self.bisection = b;
        self
    }

    /// Measure lightness with `oracle`.
    pub fn oracle<Q: Perceptual + Sync>(self, oracle: Q) -> Linearize<Q> {
        Linearize { n: self.n, lmin: self.lmin, lmax: self.lmax,
                    vmin: self.vmin, vmax: self.vmax, oracle,
                    bisection: self.bisection }
    }

    /// The `n` colors of the linearized map.
    pub fn colors<C>(&self, cm: &C) -> Result<Vec<RGB<f64>>>
    where C: Colormap + Sync + ?Sized {
        check_samples(self.n, false)?;
        check_interval(self.vmin, self.vmax)?;
        let v2l = |v: f64| self.oracle.lightness(cm.rgb(v));
        let lmin = self.lmin.unwrap_or_else(|| v2l(self.vmin));
        let lmax = self.lmax.unwrap_or_else(|| v2l(self.vmax));
        debug!("linearize: {} samples, lightness {lmin} → {lmax}", self.n);
        linspace(lmin, lmax, self.n).par_iter()
            .map(|&l| {
                self.bisection.root(|v| v2l(v) - l, self.vmin, self.vmax)
                    .map(|v| cm.rgb(v))
                    .map_err(|e| for_target(e, l))
            })
            .collect()
    }

    /// The linearized colormap.
    pub fn apply<C>(&self, cm: &C) -> Result<Listed>
    where C: Colormap + Sync + ?Sized {
        Ok(Listed::from_vec(self.colors(cm)?))
    }

    /// Write the linearized colormap as a table to `w` (see
    /// [`table::write`]).
    pub fn save<C>(&self, cm: &C, w: impl Write) -> Result<()>
    where C: Colormap + Sync + ?Sized {
        table::write(w, &self.colors(cm)?)
    }
}

/// Linearize `cm` with `n` samples and default options.
pub fn linearize<C>(cm: &C, n: usize) -> Result<Listed>
where C: Colormap + Sync + ?Sized {
    Linearize::new(n).apply(cm)
}


/// Shape of the lightness curve of a diverging colormap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Darkest at the midpoint ("v" shape).
    Valley,
    /// Lightest at the midpoint ("^" shape).
    Peak,
}

/// Midpoint of a diverging colormap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Midpoint {
    /// Value at which the lightness is extremal.
    pub v: f64,
    /// Lightness at `v`.
    pub l: f64,
    pub shape: Shape,
}

/// Value substituted when no value with the target lightness can be
/// bracketed in one half of a diverging colormap: `bright` if the
/// target lightness exceeds `threshold`, otherwise the outer end of
/// the half (`vmin` or `vmax`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fallback {
    pub threshold: f64,
    pub bright: f64,
}

impl Default for Fallback {
    fn default() -> Self { Fallback { threshold: 75., bright: 0.5 } }
}

/// Resample a diverging colormap so that its lightness is symmetric
/// around the midpoint sample.
///
/// The map must diverge: with `lmin`, `lmid` and `lmax` the lightness
/// at `vmin`, `vmid` (default 0.5) and `vmax`, the midpoint lightness
/// must lie strictly above or below both ends.  When `vmid` is not
/// given, it is located by minimizing (or maximizing) the lightness
/// from 0.5.  Each half of the `n` (even) samples is then solved for
/// on its side of `vmid`; a lightness that cannot be bracketed is
/// logged and replaced according to the [`Fallback`] policy.
///
/// For v-shaped maps the target lightness is `|linspace(−b, b, n)|`
/// with `b = min(lmin, lmax)`: it bottoms out at 0 whatever `lmid`
/// is, so samples near the midpoint fall back unless the map is black
/// there.
#[derive(Clone, Debug)]
pub struct Symmetrize<P = Cam02Ucs> {
    n: usize,
    lmin: Option<f64>,
    lmid: Option<f64>,
    lmax: Option<f64>,
    vmin: f64,
    vmid: Option<f64>,
    vmax: f64,
    oracle: P,
    bisection: Bisection,
    nelder_mead: NelderMead,
    fallback: Fallback,
}

impl Symmetrize {
    /// Symmetrize to an even number `n` of samples over \[0, 1\].
    pub fn new(n: usize) -> Self {
        Symmetrize { n, lmin: None, lmid: None, lmax: None,
                     vmin: 0., vmid: None, vmax: 1.,
                     oracle: Cam02Ucs::default(),
                     bisection: Bisection::default(),
                     nelder_mead: NelderMead::default(),
                     fallback: Fallback::default() }
    }
}

impl<P: Perceptual + Sync> Symmetrize<P> {
    /// Lightness at `vmin` (default: measured).
    pub fn lmin(mut self, l: f64) -> Self {
        self.lmin = Some(l);
        self
    }

    /// Lightness at the midpoint (default: measured).
    pub fn lmid(mut self, l: f64) -> Self {
        self.lmid = Some(l);
        self
    }

    /// Lightness at `vmax` (default: measured).
    pub fn lmax(mut self, l: f64) -> Self {
        self.lmax = Some(l);
        self
    }

    /// Lower end of the value interval (default `0.`).
    pub fn vmin(mut self, v: f64) -> Self {
        self.vmin = v;
        self
    }

    /// Use `v` as the midpoint instead of searching for the extremum.
    pub fn vmid(mut self, v: f64) -> Self {
        self.vmid = Some(v);
        self
    }

    /// Upper end of the value interval (default `1.`).
    pub fn vmax(mut self, v: f64) -> Self {
        self.vmax = v;
        self
    }

    /// Root finder used for each sample.
    pub fn bisection(mut self, b: Bisection) -> Self {
        self.bisection = b;
        self
    }

    /// Minimizer used to locate the midpoint.
    pub fn nelder_mead(mut self, nm: NelderMead) -> Self {
        self.nelder_mead = nm;
        self
    }

    /// Substitution policy for samples that cannot be solved for.
    pub fn fallback(mut self, f: Fallback) -> Self {
        self.fallback = f;
        self
    }

    /// Measure lightness with `oracle`.
    pub fn oracle<Q: Perceptual + Sync>(self, oracle: Q) -> Symmetrize<Q> {
        Symmetrize { n: self.n, lmin: self.lmin, lmid: self.lmid,
                     lmax: self.lmax, vmin: self.vmin, vmid: self.vmid,
                     vmax: self.vmax, oracle, bisection: self.bisection,
                     nelder_mead: self.nelder_mead, fallback: self.fallback }
    }

    #[inline]
    fn v2l<C>(&self, cm: &C, v: f64) -> f64
    where C: Colormap + ?Sized {
        self.oracle.lightness(cm.rgb(v.clamp(self.vmin, self.vmax)))
    }

    /// Lightness at both ends and midpoint of `cm`.
    fn analyze<C>(&self, cm: &C) -> Result<(f64, Midpoint, f64)>
    where C: Colormap + ?Sized {
        check_interval(self.vmin, self.vmax)?;
        if let Some(v) = self.vmid {
            if !(self.vmin < v && v < self.vmax) {
                return Err(Error::InvalidArgument(format!(
                    "midpoint {v} not inside ({}, {})", self.vmin, self.vmax)))
            }
        }
        let lmin = self.lmin.unwrap_or_else(|| self.v2l(cm, self.vmin));
        let lmax = self.lmax.unwrap_or_else(|| self.v2l(cm, self.vmax));
        let lmid = self.lmid
            .unwrap_or_else(|| self.v2l(cm, self.vmid.unwrap_or(0.5)));
        if !((lmax - lmid) * (lmid - lmin) < 0.) {
            return Err(Error::NotDiverging { lmin, lmid, lmax })
        }
        let shape = if lmax > lmid { Shape::Valley } else { Shape::Peak };
        let mid = match self.vmid {
            Some(v) => Midpoint { v, l: lmid, shape },
            None => {
                let v = match shape {
                    Shape::Valley =>
                        self.nelder_mead.minimize(|v| self.v2l(cm, v), 0.5),
                    Shape::Peak =>
                        self.nelder_mead.minimize(|v| -self.v2l(cm, v), 0.5),
                };
                let v = v.clamp(self.vmin, self.vmax);
                Midpoint { v, l: self.v2l(cm, v), shape }
            }
        };
        debug!("symmetrize: {:?} midpoint at v = {} (lightness {})",
               mid.shape, mid.v, mid.l);
        Ok((lmin, mid, lmax))
    }

    /// Determine the midpoint of `cm`, failing with
    /// [`Error::NotDiverging`] if `cm` does not diverge.
    pub fn midpoint<C>(&self, cm: &C) -> Result<Midpoint>
    where C: Colormap + ?Sized {
        self.analyze(cm).map(|(_, mid, _)| mid)
    }

    /// The `n` colors of the symmetrized map.
    pub fn colors<C>(&self, cm: &C) -> Result<Vec<RGB<f64>>>
    where C: Colormap + Sync + ?Sized {
        check_samples(self.n, true)?;
        let (lmin, mid, lmax) = self.analyze(cm)?;
        let targets: Vec<f64> = match mid.shape {
            Shape::Valley => {
                let b = lmin.min(lmax);
                linspace(-b, b, self.n).into_iter().map(f64::abs).collect()
            }
            Shape::Peak => {
                let b = mid.l - lmin.max(lmax);
                linspace(-b, b, self.n).into_iter()
                    .map(|x| mid.l - x.abs()).collect()
            }
        };
        let half = self.n / 2;
        let colors = targets.par_iter().enumerate()
            .map(|(i, &l)| {
                let (lo, hi, outer, side) =
                    if i < half { (self.vmin, mid.v, self.vmin, "left") }
                    else { (mid.v, self.vmax, self.vmax, "right") };
                let v = self.bisection.root(|v| self.v2l(cm, v) - l, lo, hi)
                    .unwrap_or_else(|e| {
                        warn!("unable to solve for value in the {side} half \
                               at lightness {l}: {}", for_target(e, l));
                        if l > self.fallback.threshold { self.fallback.bright }
                        else { outer }
                    });
                cm.rgb(v)
            })
            .collect();
        Ok(colors)
    }

    /// The symmetrized colormap.
    pub fn apply<C>(&self, cm: &C) -> Result<Listed>
    where C: Colormap + Sync + ?Sized {
        Ok(Listed::from_vec(self.colors(cm)?))
    }

    /// Write the symmetrized colormap as a table to `w`.
    pub fn save<C>(&self, cm: &C, w: impl Write) -> Result<()>
    where C: Colormap + Sync + ?Sized {
        table::write(w, &self.colors(cm)?)
    }
}

/// Symmetrize `cm` with `n` samples and default options.
pub fn symmetrize<C>(cm: &C, n: usize) -> Result<Listed>
where C: Colormap + Sync + ?Sized {
    Symmetrize::new(n).apply(cm)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lightness, Registry};

    fn squared(v: f64) -> RGB<f64> {
        let x = v * v;
        RGB::new(x, 0.9 * x, 0.8 * x)
    }

    fn lightnesses(cm: &Listed) -> Vec<f64> {
        cm.colors().iter().map(|&c| lightness(c)).collect()
    }

    fn assert_evenly_spaced(l: &[f64], l0: f64, l1: f64, tol: f64) {
        let n = l.len();
        for (i, &x) in l.iter().enumerate() {
            let expected = l0 + (l1 - l0) * i as f64 / (n - 1) as f64;
            assert!((x - expected).abs() <= tol,
                    "L[{i}] = {} ≉ {}", x, expected);
        }
    }

    fn assert_symmetric(l: &[f64], tol: f64) {
        let n = l.len();
        for k in 0 .. n / 2 {
            assert!((l[k] - l[n - 1 - k]).abs() <= tol,
                    "L[{k}] = {} ≉ L[{}] = {}", l[k], n - 1 - k, l[n - 1 - k]);
        }
    }

    #[test]
    fn linearize_is_linear() {
        let cm = linearize(&squared, 32).unwrap();
        assert_eq!(cm.len(), 32);
        assert_evenly_spaced(&lightnesses(&cm), lightness(squared(0.)),
                             lightness(squared(1.)), 1e-6);
    }

    #[test]
    fn linearize_afmhot() {
        let afmhot = Registry::builtin().get("afmhot").unwrap();
        let cm = Linearize::new(256).apply(&afmhot).unwrap();
        assert_eq!(cm.len(), 256);
        assert_evenly_spaced(&lightnesses(&cm), lightness(afmhot.rgb(0.)),
                             lightness(afmhot.rgb(1.)), 1e-6);
    }

    #[test]
    fn linearize_sub_interval() {
        let lin = Linearize::new(11).vmin(0.2).vmax(0.8).lmin(20.).lmax(60.);
        let cm = lin.apply(&squared).unwrap();
        assert_evenly_spaced(&lightnesses(&cm), 20., 60., 1e-6);
    }

    #[test]
    fn linearize_is_idempotent() {
        let cm = linearize(&squared, 64).unwrap();
        let cm2 = linearize(&cm, 64).unwrap();
        for (c, c2) in cm.colors().iter().zip(cm2.colors()) {
            assert!((c.r - c2.r).abs() < 1e-6 && (c.g - c2.g).abs() < 1e-6
                    && (c.b - c2.b).abs() < 1e-6, "{:?} ≉ {:?}", c, c2);
        }
    }

    #[test]
    fn linearize_out_of_range_lightness_is_fatal() {
        let r = Linearize::new(8).lmax(150.).apply(&squared);
        assert!(matches!(r, Err(Error::NoBracket { .. })));
    }

    #[test]
    fn linearize_invalid_arguments() {
        assert!(matches!(linearize(&squared, 1), Err(Error::InvalidArgument(_))));
        let r = Linearize::new(8).vmin(0.6).vmax(0.4).apply(&squared);
        assert!(matches!(r, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn symmetrize_rejects_monotonic_maps() {
        let gray = |v: f64| RGB::new(v, v, v);
        assert!(matches!(symmetrize(&gray, 16),
                         Err(Error::NotDiverging { .. })));
        assert!(matches!(Symmetrize::new(16).midpoint(&squared),
                         Err(Error::NotDiverging { .. })));
    }

    #[test]
    fn symmetrize_rdbu() {
        let rdbu = Registry::builtin().get("RdBu").unwrap();
        let sym = Symmetrize::new(256);
        let mid = sym.midpoint(&rdbu).unwrap();
        assert_eq!(mid.shape, Shape::Peak);
        assert!((mid.v - 0.5).abs() < 0.05, "midpoint {}", mid.v);
        let cm = sym.apply(&rdbu).unwrap();
        assert_eq!(cm.len(), 256);
        let l = lightnesses(&cm);
        assert_symmetric(&l, 1e-6);
        let b = mid.l - lightness(rdbu.rgb(0.)).max(lightness(rdbu.rgb(1.)));
        for k in [127, 128] {
            assert!((l[k] - mid.l).abs() <= b / 255. + 1e-6,
                    "L[{k}] = {} ≉ {}", l[k], mid.l);
        }
    }

    #[test]
    fn symmetrize_given_midpoint() {
        let rdbu = Registry::builtin().get("RdBu").unwrap();
        let sym = Symmetrize::new(16).vmid(0.5);
        let mid = sym.midpoint(&rdbu).unwrap();
        assert_eq!(mid.v, 0.5);
        assert_eq!(mid.l, lightness(rdbu.rgb(0.5)));
        assert_symmetric(&lightnesses(&sym.apply(&rdbu).unwrap()), 1e-6);
        let sym = sym.lmid(90.);
        assert_eq!(sym.midpoint(&rdbu).unwrap().l, 90.);
        let l = lightnesses(&sym.apply(&rdbu).unwrap());
        assert_eq!(l.len(), 16);
        assert_symmetric(&l, 1e-6);
    }

    #[test]
    fn symmetrize_sub_interval() {
        let rdbu = Registry::builtin().get("RdBu").unwrap();
        let cm = Symmetrize::new(16).vmin(0.1).vmax(0.9).apply(&rdbu).unwrap();
        let l = lightnesses(&cm);
        assert_symmetric(&l, 1e-6);
        let end = lightness(rdbu.rgb(0.1)).max(lightness(rdbu.rgb(0.9)));
        assert!((l[0] - end).abs() < 1e-6, "L[0] = {} ≉ {}", l[0], end);
        assert!((l[15] - end).abs() < 1e-6, "L[15] = {} ≉ {}", l[15], end);
    }

    fn valley(center: u8) -> Listed {
        Listed::from_rgb8(&[[230, 230, 230], [center, center, center],
                            [230, 230, 230]]).unwrap()
    }

    #[test]
    fn symmetrize_black_valley() {
        let cm = valley(0);
        let mid = Symmetrize::new(64).midpoint(&cm).unwrap();
        assert_eq!(mid.shape, Shape::Valley);
        assert_eq!(mid.v, 0.5);
        let out = symmetrize(&cm, 64).unwrap();
        let l = lightnesses(&out);
        assert_symmetric(&l, 1e-6);
        assert!((l[0] - lightness(cm.rgb(0.))).abs() < 1e-6);
    }

    // The v-shaped target lightness bottoms out at 0 rather than at the
    // midpoint lightness: samples darker than the midpoint cannot be
    // solved for and fall back to the outer ends.
    #[test]
    fn symmetrize_gray_valley_falls_back() {
        let cm = valley(77);
        let out = Symmetrize::new(64).apply(&cm).unwrap();
        assert_eq!(out.colors()[31], cm.rgb(0.));
        assert_eq!(out.colors()[32], cm.rgb(1.));
        let fallback = Fallback { threshold: 0., bright: 0.5 };
        let out = Symmetrize::new(64).fallback(fallback).apply(&cm).unwrap();
        assert_eq!(out.colors()[31], cm.rgb(0.5));
    }

    #[test]
    fn symmetrize_invalid_arguments() {
        let rdbu = Registry::builtin().get("RdBu").unwrap();
        assert!(matches!(symmetrize(&rdbu, 15), Err(Error::InvalidArgument(_))));
        assert!(matches!(Symmetrize::new(16).vmid(1.).apply(&rdbu),
                         Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn save_writes_one_row_per_sample() {
        let rdbu = Registry::builtin().get("RdBu").unwrap();
        let mut buf = Vec::new();
        Symmetrize::new(32).save(&rdbu, &mut buf).unwrap();
        let cm = table::read(&buf[..]).unwrap();
        assert_eq!(cm.len(), 32);
        assert_eq!(cm, symmetrize(&rdbu, 32).unwrap());
    }
}
