//! Icon resolution.
//!
//! [`resolve`] turns an abstract icon name into an [`IconSurface`]: the
//! theme is searched with [`theme::IconLookup`], symbolic SVGs have their
//! neutral fills recolored to the foreground color
//! ([`symbolic::recolor`]), and with the `render` feature the result is
//! rasterized at the requested size.
//!
//! Resolution is a pure function of `(name, size, theme, color)`; callers
//! memoize it with their own [`IconCache`].

pub mod cache;
#[cfg(feature = "render")]
pub mod render;
pub mod symbolic;
pub mod theme;

pub use cache::IconCache;
pub use theme::IconLookup;

use log::{debug, warn};
use std::fmt;
use std::path::{Path, PathBuf};

/// Whether an icon file is vector or raster data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    Vector,
    Raster,
}

impl IconKind {
    /// Classify a file by extension.
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => IconKind::Vector,
            _ => IconKind::Raster,
        }
    }
}

/// A resolved, ready-to-draw icon.
#[derive(Clone)]
pub struct IconSurface {
    /// File the icon was loaded from.
    pub path: PathBuf,
    pub kind: IconKind,
    /// Requested pixel height.
    pub size: u32,
    /// File contents; for vector icons, after recoloring.
    pub source: Vec<u8>,
    /// Rendered image, `size` pixels high.
    #[cfg(feature = "render")]
    pub pixmap: tiny_skia::Pixmap,
}

impl fmt::Debug for IconSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconSurface")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("size", &self.size)
            .field("source_len", &self.source.len())
            .finish()
    }
}

/// Resolve `name` at `size` pixels in `theme`, recoloring symbolic icons to
/// `foreground`.
///
/// Returns `None` (never an error) when the icon is not found or cannot be
/// loaded.
pub fn resolve(name: &str, size: u32, theme: &IconLookup, foreground: &str) -> Option<IconSurface> {
    let path = theme.lookup(name, Some(size))?;
    let kind = IconKind::of(&path);
    let data = match std::fs::read(&path) {
        Ok(d) => d,
        Err(e) => {
            warn!("cannot read icon {}: {}", path.display(), e);
            return None;
        }
    };

    let source = match kind {
        IconKind::Vector => match String::from_utf8(data) {
            Ok(text) => symbolic::recolor(&text, foreground).into_bytes(),
            Err(e) => e.into_bytes(),
        },
        IconKind::Raster => data,
    };

    #[cfg(feature = "render")]
    let pixmap = match kind {
        IconKind::Vector => render::rasterize_svg(&source, size),
        IconKind::Raster => render::decode_raster(&source, size),
    }?;

    debug!("resolved icon {} -> {}", name, path.display());
    Some(IconSurface {
        path,
        kind,
        size,
        source,
        #[cfg(feature = "render")]
        pixmap,
    })
}
