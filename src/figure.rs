//! Hierarchical container of plots.
//!
//! A [`Figure`] holds [`Panel`]s, each of which holds plot callables
//! drawing on a surface `S` provided by a plotting [`Backend`].

use std::path::Path;
use crate::Result;

/// A plotting backend: styles, creates and exports drawing surfaces.
pub trait Backend {
    type Surface;

    /// Apply the named theme to subsequently created surfaces.
    fn set_style(&mut self, style: &str) -> Result<()>;

    /// Create a single drawing surface.
    fn surface(&mut self) -> Result<Self::Surface>;

    /// Export the composed surface to `file`.
    fn export(&mut self, surface: Self::Surface, file: &Path) -> Result<()>;
}

type Plot<'a, S> = Box<dyn FnMut(&mut S) + 'a>;

/// An ordered sequence of plots.
pub struct Panel<'a, S> {
    plots: Vec<Plot<'a, S>>,
}

impl<'a, S> Default for Panel<'a, S> {
    fn default() -> Self { Panel { plots: vec![] } }
}

impl<'a, S> Panel<'a, S> {
    /// An empty panel.
    pub fn new() -> Self { Self::default() }

    /// Add a plot, drawn after the ones already present.
    pub fn plot(mut self, p: impl FnMut(&mut S) + 'a) -> Self {
        self.plots.push(Box::new(p));
        self
    }

    /// Number of plots.
    pub fn len(&self) -> usize { self.plots.len() }

    pub fn is_empty(&self) -> bool { self.plots.is_empty() }
}

/// The outermost container; it always contains at least one panel.
pub struct Figure<'a, S> {
    panels: Vec<Panel<'a, S>>,
}

impl<'a, S> Figure<'a, S> {
    /// A figure with the single panel `panel`.
    pub fn new(panel: Panel<'a, S>) -> Self {
        Figure { panels: vec![panel] }
    }

    /// Add a panel, drawn after the ones already present.
    pub fn panel(mut self, panel: Panel<'a, S>) -> Self {
        self.panels.push(panel);
        self
    }

    /// Draw every plot of every panel, in order, on one surface of
    /// `backend` styled with `style`, and export it to `file`.
    pub fn save<B>(&mut self, backend: &mut B, file: impl AsRef<Path>,
                   style: &str) -> Result<()>
    where B: Backend<Surface = S> {
        backend.set_style(style)?;
        let mut surface = backend.surface()?;
        for panel in &mut self.panels {
            for p in &mut panel.plots {
                p(&mut surface);
            }
        }
        backend.export(surface, file.as_ref())
    }
}
