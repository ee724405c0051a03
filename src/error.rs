use std::{fmt, io};

/// Errors raised while building or uniformizing a colormap.
#[derive(Debug)]
pub enum Error {
    /// A parameter leads to an undefined intermediate value, e.g. a
    /// saturation `s ≥ 1` makes the chroma `J·s/√(1−s²)` undefined.
    Domain { what: &'static str, at: f64, value: f64 },
    /// The lightness at the midpoint is not a strict extremum with
    /// respect to both ends: `(lmax − lmid)·(lmid − lmin) ≥ 0`.
    NotDiverging { lmin: f64, lmid: f64, lmax: f64 },
    /// The function takes values of the same sign (or NaN) at both
    /// ends of the bracket `[lo, hi]`.
    NoBracket { target: f64, lo: f64, hi: f64 },
    /// The root finder hit its iteration cap.
    NoConvergence { iterations: usize },
    /// Invalid sample count, interval,...
    InvalidArgument(String),
    /// Malformed line in a color table.
    Table { line: usize, msg: String },
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Domain { what, at, value } => write!(
                f, "{what} = {value} at f = {at} is outside its domain"),
            Error::NotDiverging { lmin, lmid, lmax } => write!(
                f, "colormap does not seem to diverge (lightness {lmin} → \
                    {lmid} → {lmax})"),
            Error::NoBracket { target, lo, hi } => write!(
                f, "unable to bracket lightness {target} in [{lo}, {hi}]"),
            Error::NoConvergence { iterations } => write!(
                f, "root finding did not converge in {iterations} iterations"),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Error::Table { line, msg } => write!(f, "table line {line}: {msg}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self { Error::Io(e) }
}
