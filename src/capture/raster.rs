use std::sync::Arc;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{self, fontdb};

use crate::error::{Error, Result};
use crate::render::{generate_svg, Theme};
use crate::session::Session;

/// Output pixels per SVG pixel.
pub const SCALE: f32 = 2.0;

/// Border around the card, in SVG pixels.
const MARGIN: f32 = 20.0;

const BACKDROP: [u8; 3] = [0x0a, 0x0a, 0x0f];

const MONOSPACE_FALLBACKS: [&str; 4] = [
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Menlo",
    "Courier New",
];

fn font_database() -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let installed = |family: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(name, _)| name == family))
    };
    let monospace = MONOSPACE_FALLBACKS
        .into_iter()
        .find(|family| installed(*family))
        .map(str::to_string)
        .or_else(|| {
            db.faces()
                .find(|face| face.monospaced)
                .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
        });

    match monospace {
        Some(family) => db.set_monospace_family(family),
        None => tracing::warn!("No monospace font found, the report image will have no text"),
    }
    db
}

/// Renders the session's report card and rasterizes it at [`SCALE`] on the
/// dark backdrop.
pub fn rasterize(session: &Session) -> Result<RgbaImage> {
    if session.reports().is_empty() {
        return Err(Error::Capture("no loaded profile to capture".to_string()));
    }

    let svg = generate_svg(session, Theme::Dark);
    rasterize_svg(&svg)
}

pub fn rasterize_svg(svg: &str) -> Result<RgbaImage> {
    let options = usvg::Options {
        fontdb: Arc::new(font_database()),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| Error::Capture(format!("unreadable report card: {}", e)))?;

    let size = tree.size();
    let width = ((size.width() + MARGIN * 2.0) * SCALE).ceil() as u32;
    let height = ((size.height() + MARGIN * 2.0) * SCALE).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::Capture(format!("cannot allocate {}x{} image", width, height)))?;
    let [r, g, b] = BACKDROP;
    pixmap.fill(Color::from_rgba8(r, g, b, 0xff));

    let transform = Transform::from_scale(SCALE, SCALE).pre_translate(MARGIN, MARGIN);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let mut image = RgbaImage::new(width, height);
    for (pixel, source) in image.pixels_mut().zip(pixmap.pixels()) {
        let color = source.demultiply();
        *pixel = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    Ok(image)
}
