use std::sync::Arc;
use crate::Colormap;

pub(crate) type SharedMap = Arc<dyn Colormap + Send + Sync>;

/// A colormap of the registry together with its characteristics.
#[derive(Clone)]
pub(crate) struct MapData {
    pub(crate) map: SharedMap,
    pub(crate) typ: MapType,
}

/// Type of colormap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapType {
    /// Sequential colormap, suited to ordered data that progress from
    /// low to high.  Lightness steps dominate the look of these maps.
    /// [`Linearize`](crate::Linearize) makes these steps uniform.
    Seq,
    /// Diverging colormap.  It puts equal emphasis on mid-range
    /// critical values and extremes at both ends of the data range.
    /// The break in the middle is emphasized with a lightness extremum
    /// and the low and high extremes with contrasting hues.
    /// [`Symmetrize`](crate::Symmetrize) balances both halves.
    Div,
}
