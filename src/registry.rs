//! Colormaps looked up by name.
//!
//! A [`Registry`] is an explicit value: the uniformization functions
//! never consult it, they take any [`Colormap`].

use std::collections::BTreeMap;
use std::sync::Arc;
use rgb::RGB;
use crate::Colormap;

mod data;
mod ty;
use ty::{MapData, SharedMap};
pub use ty::MapType;

/// A set of named colormaps.
#[derive(Clone, Default)]
pub struct Registry {
    maps: BTreeMap<String, MapData>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self { Self::default() }

    /// A registry with the built-in colormaps: `gray` and `afmhot`
    /// (sequential), `RdBu`, `RdGy`, `PuOr` and `BrBG` (diverging).
    pub fn builtin() -> Self {
        let mut r = Registry::new();
        r.insert("gray", MapType::Seq, data::gray);
        r.insert("afmhot", MapType::Seq, data::afmhot);
        r.insert("RdBu", MapType::Div, data::RDBU.clone());
        r.insert("RdGy", MapType::Div, data::RDGY.clone());
        r.insert("PuOr", MapType::Div, data::PUOR.clone());
        r.insert("BrBG", MapType::Div, data::BRBG.clone());
        r
    }

    /// Add `map` under `name`, replacing any previous map with that
    /// name.
    pub fn insert<C>(&mut self, name: impl Into<String>, typ: MapType, map: C)
    where C: Colormap + Send + Sync + 'static {
        self.maps.insert(name.into(), MapData { map: Arc::new(map), typ });
    }

    /// Return the colormap `name`.  If `name` ends with `_r` and is
    /// not registered, the reverse of the map without the suffix is
    /// returned.
    ///
    /// # Example
    ///
    /// ```
    /// use ehtplot::{Colormap, Registry};
    /// let r = Registry::builtin();
    /// let rdbu = r.get("RdBu").unwrap();
    /// let bura = r.get("RdBu_r").unwrap();
    /// assert_eq!(rdbu.rgb(0.25), bura.rgb(0.75));
    /// ```
    pub fn get(&self, name: &str) -> Option<Named> {
        if let Some(d) = self.maps.get(name) {
            return Some(Named::new(name, d, false))
        }
        let base = name.strip_suffix("_r")?;
        self.maps.get(base).map(|d| Named::new(name, d, true))
    }

    /// Names of the registered colormaps, in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    /// Names of the registered colormaps of type `typ`.
    pub fn find(&self, typ: MapType) -> impl Iterator<Item = &str> {
        self.maps.iter().filter(move |(_, d)| d.typ == typ)
            .map(|(n, _)| n.as_str())
    }
}

/// A colormap obtained from a [`Registry`].
#[derive(Clone)]
pub struct Named {
    name: String,
    typ: MapType,
    map: SharedMap,
    reversed: bool,
}

impl Named {
    fn new(name: &str, d: &MapData, reversed: bool) -> Self {
        Named { name: name.to_string(), typ: d.typ, map: Arc::clone(&d.map),
                reversed }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn typ(&self) -> MapType { self.typ }
}

impl Colormap for Named {
    #[inline]
    fn rgb(&self, v: f64) -> RGB<f64> {
        self.map.rgb(if self.reversed { 1. - v } else { v })
    }
}
