//! Scalar root finding and minimization.

use crate::{Error, Result};

/// Bisection root finder.
///
/// Stops when the bracket is narrower than `xtol + rtol·|x|`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bisection {
    pub xtol: f64,
    pub rtol: f64,
    pub max_iter: usize,
}

impl Default for Bisection {
    fn default() -> Self {
        Bisection { xtol: 2e-12, rtol: 4. * f64::EPSILON, max_iter: 100 }
    }
}

impl Bisection {
    /// Find a root of `f` in \[`a`, `b`\].
    ///
    /// `f(a)` and `f(b)` must have opposite signs, otherwise
    /// [`Error::NoBracket`] is returned (with `target` set to `0.`).
    /// If one of them is zero, the corresponding bound is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use ehtplot::solve::Bisection;
    /// let x = Bisection::default().root(|x| x * x - 2., 0., 2.).unwrap();
    /// assert!((x - 2f64.sqrt()).abs() < 1e-11);
    /// ```
    pub fn root(&self, f: impl Fn(f64) -> f64, a: f64, b: f64) -> Result<f64> {
        let fa = f(a);
        let fb = f(b);
        if fa == 0. { return Ok(a) }
        if fb == 0. { return Ok(b) }
        // Also rejects NaN.
        if !(fa * fb < 0.) {
            return Err(Error::NoBracket { target: 0., lo: a, hi: b })
        }
        let mut xa = a;
        let mut dm = b - a;
        for _ in 0 .. self.max_iter {
            dm *= 0.5;
            let xm = xa + dm;
            let fm = f(xm);
            if fm * fa >= 0. { xa = xm }
            if fm == 0. || dm.abs() < self.xtol + self.rtol * xm.abs() {
                return Ok(xm)
            }
        }
        Err(Error::NoConvergence { iterations: self.max_iter })
    }
}


/// Derivative-free local minimizer of a function of one variable
/// (Nelder–Mead on a 1-simplex).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NelderMead {
    /// Relative size of the initial simplex.
    pub initial_step: f64,
    pub xatol: f64,
    pub fatol: f64,
    pub max_iter: usize,
}

impl Default for NelderMead {
    fn default() -> Self {
        NelderMead { initial_step: 0.05, xatol: 1e-4, fatol: 1e-4,
                     max_iter: 200 }
    }
}

impl NelderMead {
    /// Return a local minimum of `f` near `x0`.  When `max_iter` is
    /// reached, the best point found so far is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use ehtplot::solve::NelderMead;
    /// let x = NelderMead::default().minimize(|x| (x - 0.3).powi(2), 0.5);
    /// assert!((x - 0.3).abs() < 1e-2);
    /// ```
    pub fn minimize(&self, f: impl Fn(f64) -> f64, x0: f64) -> f64 {
        const RHO: f64 = 1.;
        const CHI: f64 = 2.;
        const PSI: f64 = 0.5;
        const SIGMA: f64 = 0.5;
        let x1 = if x0 != 0. { (1. + self.initial_step) * x0 }
                 else { 0.00025 };
        // (best, worst)
        let mut s = [(x0, f(x0)), (x1, f(x1))];
        if s[1].1 < s[0].1 { s.swap(0, 1) }
        for _ in 0 .. self.max_iter {
            let [(xb, fb), (xw, fw)] = s;
            if (xw - xb).abs() <= self.xatol && (fw - fb).abs() <= self.fatol {
                break
            }
            let xr = (1. + RHO) * xb - RHO * xw;
            let fr = f(xr);
            if fr < fb {
                let xe = (1. + RHO * CHI) * xb - RHO * CHI * xw;
                let fe = f(xe);
                s[1] = if fe < fr { (xe, fe) } else { (xr, fr) };
            } else {
                let contracted = if fr < fw {
                    let xc = (1. + PSI * RHO) * xb - PSI * RHO * xw;
                    let fc = f(xc);
                    (fc <= fr).then_some((xc, fc))
                } else {
                    let xcc = (1. - PSI) * xb + PSI * xw;
                    let fcc = f(xcc);
                    (fcc < fw).then_some((xcc, fcc))
                };
                s[1] = match contracted {
                    Some(p) => p,
                    None => {
                        let xs = xb + SIGMA * (xw - xb);
                        (xs, f(xs))
                    }
                };
            }
            if s[1].1 < s[0].1 { s.swap(0, 1) }
        }
        s[0].0
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bisection_cubic() {
        let f = |x: f64| x * x * x - x - 2.;
        let x = Bisection::default().root(f, 1., 2.).unwrap();
        assert!(f(x).abs() < 1e-10, "f({}) = {}", x, f(x));
    }

    #[test]
    fn bisection_decreasing() {
        let x = Bisection::default().root(|x| 0.25 - x, 0., 1.).unwrap();
        assert!((x - 0.25).abs() < 1e-11, "{} ≉ 0.25", x);
    }

    #[test]
    fn bisection_endpoint_root() {
        let b = Bisection::default();
        assert_eq!(b.root(|x| x, 0., 1.).unwrap(), 0.);
        assert_eq!(b.root(|x| x - 1., 0., 1.).unwrap(), 1.);
    }

    #[test]
    fn bisection_no_bracket() {
        let b = Bisection::default();
        assert!(matches!(b.root(|x| x * x + 1., -1., 1.),
                         Err(Error::NoBracket { .. })));
        assert!(matches!(b.root(|_| f64::NAN, 0., 1.),
                         Err(Error::NoBracket { .. })));
    }

    #[test]
    fn bisection_iteration_cap() {
        let b = Bisection { max_iter: 3, ..Default::default() };
        assert!(matches!(b.root(|x| x - 0.3, 0., 1.),
                         Err(Error::NoConvergence { iterations: 3 })));
    }

    #[test]
    fn nelder_mead_parabola() {
        let nm = NelderMead::default();
        let x = nm.minimize(|x| (x - 0.7).powi(2) + 1., 0.5);
        assert!((x - 0.7).abs() < 1e-2, "{} ≉ 0.7", x);
        let x = nm.minimize(|x| (x + 0.2).abs(), 0.);
        assert!((x + 0.2).abs() < 1e-3, "{} ≉ -0.2", x);
    }

    #[test]
    fn nelder_mead_stays_at_kink() {
        let x = NelderMead::default().minimize(|x| (x - 0.5).abs(), 0.5);
        assert!((x - 0.5).abs() < 1e-3, "{} ≉ 0.5", x);
    }
}
