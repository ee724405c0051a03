use rgb::RGB;
use crate::{clamp, Error, Listed, Result};
use crate::perceptual::{Cam02Ucs, Jab, Perceptual};

type Profile<'a> = Box<dyn Fn(f64) -> f64 + 'a>;

fn check_samples(n: usize) -> Result<()> {
    if n < 2 {
        return Err(Error::InvalidArgument(
            format!("need at least 2 samples, got {n}")))
    }
    Ok(())
}

/// Construct a colormap whose lightness grows linearly from `darkest`
/// to `lightest` in a perceptual space, with the given saturation and
/// hue profiles.
///
/// The saturation `s = saturation(f)` at the fractional position `f`
/// gives the chroma `J'·s/√(1 − s²)`; it must lie in \[0, 1).  The hue
/// is in radians.  Default: constant saturation √0.5 and hue 0.
///
/// # Example
///
/// ```
/// use ehtplot::{Builder, Colormap};
/// let cm = Builder::new()
///     .lightest(90.)
///     .saturation(|_| 0.2)
///     .hue(|f| 2. * std::f64::consts::PI * f)
///     .build(256).unwrap();
/// assert_eq!(cm.len(), 256);
/// ```
pub struct Builder<'a, P = Cam02Ucs> {
    darkest: f64,
    lightest: f64,
    saturation: Option<Profile<'a>>,
    hue: Option<Profile<'a>>,
    oracle: P,
}

impl<'a> Default for Builder<'a> {
    fn default() -> Self { Builder::new() }
}

impl<'a> Builder<'a> {
    pub fn new() -> Self {
        Builder { darkest: 0., lightest: 100., saturation: None, hue: None,
                  oracle: Cam02Ucs::default() }
    }
}

impl<'a, P: Perceptual> Builder<'a, P> {
    /// Lightness of the first color (default `0.`).
    pub fn darkest(mut self, j: f64) -> Self {
        self.darkest = j;
        self
    }

    /// Lightness of the last color (default `100.`).
    pub fn lightest(mut self, j: f64) -> Self {
        self.lightest = j;
        self
    }

    pub fn saturation(mut self, s: impl Fn(f64) -> f64 + 'a) -> Self {
        self.saturation = Some(Box::new(s));
        self
    }

    pub fn hue(mut self, h: impl Fn(f64) -> f64 + 'a) -> Self {
        self.hue = Some(Box::new(h));
        self
    }

    /// Use `oracle` as the perceptual space.
    pub fn oracle<Q: Perceptual>(self, oracle: Q) -> Builder<'a, Q> {
        Builder { darkest: self.darkest, lightest: self.lightest,
                  saturation: self.saturation, hue: self.hue, oracle }
    }

    /// Color of the sample `i` out of `n` (`n ≥ 2`), clamped to
    /// \[0, 1\]³.
    pub fn convert(&self, i: usize, n: usize) -> Result<RGB<f64>> {
        check_samples(n)?;
        if i >= n {
            return Err(Error::InvalidArgument(
                format!("sample {i} out of range 0 .. {n}")))
        }
        let f = i as f64 / (n - 1) as f64;
        let s = self.saturation.as_ref().map_or(0.5_f64.sqrt(), |s| s(f));
        if !(0. .. 1.).contains(&s) {
            return Err(Error::Domain { what: "saturation", at: f, value: s })
        }
        let h = self.hue.as_ref().map_or(0., |h| h(f));
        if !h.is_finite() {
            return Err(Error::Domain { what: "hue", at: f, value: h })
        }
        let j = self.darkest + f * (self.lightest - self.darkest);
        let c = j * s / (1. - s * s).sqrt();
        let rgb = self.oracle.to_rgb(Jab::from_polar(j, c, h));
        if !(rgb.r.is_finite() && rgb.g.is_finite() && rgb.b.is_finite()) {
            return Err(Error::Domain { what: "chroma", at: f, value: c })
        }
        Ok(clamp(rgb))
    }

    /// Build the colormap with `n ≥ 2` colors.
    pub fn build(&self, n: usize) -> Result<Listed> {
        check_samples(n)?;
        for (name, j) in [("darkest", self.darkest),
                          ("lightest", self.lightest)] {
            if !(0. ..= 100.).contains(&j) {
                return Err(Error::InvalidArgument(
                    format!("{name} lightness {j} not in [0, 100]")))
            }
        }
        let colors = (0 .. n).map(|i| self.convert(i, n))
            .collect::<Result<Vec<_>>>()?;
        Ok(Listed::from_vec(colors))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lightness, CieLab, Colormap};

    fn in_unit_cube(c: RGB<f64>) -> bool {
        [c.r, c.g, c.b].iter().all(|x| (0. ..= 1.).contains(x))
    }

    #[test]
    fn sizes_and_range() {
        for n in [2, 3, 17, 256] {
            for (d, l) in [(0., 100.), (20., 80.), (90., 10.), (50., 50.)] {
                let cm = Builder::new().darkest(d).lightest(l).build(n).unwrap();
                assert_eq!(cm.len(), n);
                assert!(cm.colors().iter().all(|&c| in_unit_cube(c)),
                        "n = {n}, darkest = {d}, lightest = {l}");
            }
        }
    }

    #[test]
    fn gray_has_requested_lightness() {
        let cm = Builder::new().saturation(|_| 0.).darkest(10.).lightest(90.)
            .build(9).unwrap();
        for (i, &c) in cm.colors().iter().enumerate() {
            let l = lightness(c);
            let expected = 10. + 10. * i as f64;
            assert!((l - expected).abs() < 1e-6, "{} ≉ {}", l, expected);
        }
    }

    #[test]
    fn saturation_one_is_a_domain_error() {
        let r = Builder::new().saturation(|f| if f > 0.5 { 1. } else { 0.3 })
            .build(16);
        match r {
            Err(Error::Domain { what: "saturation", value, .. }) =>
                assert_eq!(value, 1.),
            _ => panic!("expected a domain error"),
        }
        assert!(matches!(Builder::new().saturation(|_| -0.1).build(4),
                         Err(Error::Domain { .. })));
        assert!(matches!(Builder::new().hue(|_| f64::NAN).build(4),
                         Err(Error::Domain { what: "hue", .. })));
    }

    #[test]
    fn invalid_arguments() {
        assert!(matches!(Builder::new().build(1),
                         Err(Error::InvalidArgument(_))));
        assert!(matches!(Builder::new().lightest(120.).build(8),
                         Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn convert_checks_indices() {
        let b = Builder::new();
        assert!(matches!(b.convert(0, 0), Err(Error::InvalidArgument(_))));
        assert!(matches!(b.convert(0, 1), Err(Error::InvalidArgument(_))));
        assert!(matches!(b.convert(5, 5), Err(Error::InvalidArgument(_))));
        assert_eq!(b.convert(4, 5).unwrap(), b.build(5).unwrap().colors()[4]);
    }

    #[test]
    fn other_oracle() {
        let cm = Builder::new().oracle(CieLab).saturation(|_| 0.)
            .build(5).unwrap();
        let l = CieLab.lightness(cm.rgb(0.5));
        assert!((l - 50.).abs() < 1e-3, "{} ≉ 50", l);
    }
}
