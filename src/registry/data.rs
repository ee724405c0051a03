// Built-in colormaps.  Brewer tables: http://colorbrewer2.org/

use lazy_static::lazy_static;
use rgb::RGB;
use crate::Listed;

fn brewer(colors: &[[u8; 3]]) -> Listed {
    Listed::from_vec(colors.iter()
                     .map(|&[r, g, b]| RGB::new(r as f64 / 255.,
                                                g as f64 / 255.,
                                                b as f64 / 255.))
                     .collect())
}

/// Gnuplot-like "afm" hot colormap.
pub(crate) fn afmhot(v: f64) -> RGB<f64> {
    RGB::new(2. * v, 2. * v - 0.5, 2. * v - 1.)
}

pub(crate) fn gray(v: f64) -> RGB<f64> { RGB::new(v, v, v) }

lazy_static! {
  pub(crate) static ref RDBU: Listed = brewer(&[
      [103, 0, 31], [178, 24, 43], [214, 96, 77], [244, 165, 130],
      [253, 219, 199], [247, 247, 247], [209, 229, 240], [146, 197, 222],
      [67, 147, 195], [33, 102, 172], [5, 48, 97]]);

  pub(crate) static ref RDGY: Listed = brewer(&[
      [103, 0, 31], [178, 24, 43], [214, 96, 77], [244, 165, 130],
      [253, 219, 199], [255, 255, 255], [224, 224, 224], [186, 186, 186],
      [135, 135, 135], [77, 77, 77], [26, 26, 26]]);

  pub(crate) static ref PUOR: Listed = brewer(&[
      [127, 59, 8], [179, 88, 6], [224, 130, 20], [253, 184, 99],
      [254, 224, 182], [247, 247, 247], [216, 218, 235], [178, 171, 210],
      [128, 115, 172], [84, 39, 136], [45, 0, 75]]);

  pub(crate) static ref BRBG: Listed = brewer(&[
      [84, 48, 5], [140, 81, 10], [191, 129, 45], [223, 194, 125],
      [246, 232, 195], [245, 245, 245], [199, 234, 229], [128, 205, 193],
      [53, 151, 143], [1, 102, 94], [0, 60, 48]]);
}
