//! Rasterization of resolved icon files.
//!
//! Vector icons are rendered with `resvg` at the requested height; raster
//! icons are decoded with `tiny-skia` and scaled to the requested height.
//! Both keep the source aspect ratio.

use log::warn;
use resvg::usvg;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// Render SVG `data` so that its height is `height` pixels.
pub fn rasterize_svg(data: &[u8], height: u32) -> Option<Pixmap> {
    let tree = match usvg::Tree::from_data(data, &usvg::Options::default()) {
        Ok(tree) => tree,
        Err(e) => {
            warn!("svg parse failed: {}", e);
            return None;
        }
    };
    let size = tree.size();
    if size.height() <= 0.0 || height == 0 {
        return None;
    }
    let scale = height as f32 / size.height();
    let width = (size.width() * scale).round().max(1.0) as u32;
    let mut pixmap = Pixmap::new(width, height)?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    Some(pixmap)
}

/// Decode PNG `data` and scale it to `height` pixels.
pub fn decode_raster(data: &[u8], height: u32) -> Option<Pixmap> {
    let source = match Pixmap::decode_png(data) {
        Ok(p) => p,
        Err(e) => {
            warn!("png decode failed: {}", e);
            return None;
        }
    };
    if height == 0 || source.height() == height {
        return Some(source);
    }
    let scale = height as f32 / source.height() as f32;
    let width = (source.width() as f32 * scale).round().max(1.0) as u32;
    let mut scaled = Pixmap::new(width, height)?;
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    scaled.draw_pixmap(0, 0, source.as_ref(), &paint, Transform::from_scale(scale, scale), None);
    Some(scaled)
}
