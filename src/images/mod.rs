//! SVG to PNG transcoding
//!
//! Contract-generated images are SVG. They are rasterized before being
//! served so marketplaces get a plain PNG instead of markup.

use std::sync::{Arc, OnceLock};

use resvg::tiny_skia;
use resvg::usvg::{self, fontdb};
use thiserror::Error;

/// Errors from rasterizing an SVG
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("SVG has an empty canvas")]
    EmptyCanvas,

    #[error("PNG encoding failed: {0}")]
    Png(String),
}

/// Shared font database, loaded once
///
/// Contract SVGs contain `<text>` elements, so system fonts must be
/// available to the parser.
fn font_database() -> Arc<fontdb::Database> {
    static FONTDB: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTDB
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            Arc::new(db)
        })
        .clone()
}

/// Rasterize an SVG document to a PNG at its intrinsic size
pub fn svg_to_png(svg: &[u8]) -> Result<Vec<u8>, ImageError> {
    let mut options = usvg::Options::default();
    options.fontdb = font_database();

    let tree = usvg::Tree::from_data(svg, &options)?;

    let size = tree.size().to_int_size();
    let mut pixmap =
        tiny_skia::Pixmap::new(size.width(), size.height()).ok_or(ImageError::EmptyCanvas)?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ImageError::Png(e.to_string()))
}
