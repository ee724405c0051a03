//! Colormaps as text tables: one color per line, three floating-point
//! components separated by a space.
//!
//! Numbers are written the way NumPy's `savetxt` does by default
//! (`%.18e`), so tables can be loaded with `numpy.loadtxt`.

use std::io::{BufRead, BufReader, Read, Write};
use log::debug;
use rgb::RGB;
use crate::{Error, Listed, Result};

/// Format `x` as C's `%.18e`.
fn sci(x: f64) -> String {
    let s = format!("{:.18e}", x);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s, // NaN, inf
    }
}

/// Write `colors` to `w`, one per line.
pub fn write(w: impl Write, colors: &[RGB<f64>]) -> Result<()> {
    let mut w = std::io::BufWriter::new(w);
    for c in colors {
        writeln!(w, "{} {} {}", sci(c.r), sci(c.g), sci(c.b))?;
    }
    w.flush()?;
    debug!("wrote a table of {} colors", colors.len());
    Ok(())
}

/// Read a table written by [`write`] (or `numpy.savetxt`).  Empty
/// lines and lines starting with `#` are ignored.
///
/// # Example
///
/// ```
/// let cm = ehtplot::table::read("0 0 0\n# mid\n0.5 0.5 0.5\n".as_bytes())
///     .unwrap();
/// assert_eq!(cm.len(), 2);
/// ```
pub fn read(r: impl Read) -> Result<Listed> {
    let mut colors = Vec::new();
    for (i, line) in BufReader::new(r).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue }
        let x = line.split_whitespace()
            .map(str::parse::<f64>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Table { line: i + 1, msg: e.to_string() })?;
        match x[..] {
            [r, g, b] => colors.push(RGB::new(r, g, b)),
            _ => return Err(Error::Table {
                line: i + 1,
                msg: format!("expected 3 components, got {}", x.len()) }),
        }
    }
    Listed::new(colors)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numpy_format() {
        assert_eq!(sci(1.), "1.000000000000000000e+00");
        assert_eq!(sci(0.), "0.000000000000000000e+00");
        assert_eq!(sci(0.25), "2.500000000000000000e-01");
        assert_eq!(sci(1024.), "1.024000000000000000e+03");
        assert_eq!(sci(-2f64.powi(-10)), "-9.765625000000000000e-04");
    }

    #[test]
    fn write_then_read() {
        let colors = vec![RGB::new(0., 0.1, 0.2), RGB::new(1. / 3., 0.5, 1.)];
        let mut buf = Vec::new();
        write(&mut buf, &colors).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text.lines().next().unwrap(),
                   "0.000000000000000000e+00 1.000000000000000056e-01 \
                    2.000000000000000111e-01");
        assert_eq!(read(&buf[..]).unwrap().colors(), &colors[..]);
    }

    #[test]
    fn malformed() {
        match read("0 0 0\n1 1\n".as_bytes()) {
            Err(Error::Table { line: 2, .. }) => (),
            r => panic!("unexpected {:?}", r),
        }
        assert!(matches!(read("0 x 0\n".as_bytes()),
                         Err(Error::Table { line: 1, .. })));
        assert!(matches!(read("# nothing\n".as_bytes()),
                         Err(Error::InvalidArgument(_))));
    }
}
