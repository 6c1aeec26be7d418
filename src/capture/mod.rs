pub mod export;
pub mod raster;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::CaptureConfig;
use crate::error::{Error, Result};
use crate::session::Session;

pub use export::{copy_to_clipboard, export_png, export_svg};
pub use raster::rasterize;

/// The exported image of a finished analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureArtifact {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub copied: bool,
}

/// Rasterizes the session, writes it under the mode's export filename and
/// optionally places it on the clipboard.
pub fn capture_session(session: &Session, config: &CaptureConfig) -> Result<CaptureArtifact> {
    let mode = session
        .mode()
        .ok_or_else(|| Error::Capture("no analysis has been started".to_string()))?;

    let image = rasterize(session)?;
    let path = export_png(&image, &config.output_dir, &mode.export_filename())?;

    let copied = config.copy_to_clipboard
        && match copy_to_clipboard(&image) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Could not copy report image: {}", e);
                false
            }
        };

    Ok(CaptureArtifact {
        path,
        width: image.width(),
        height: image.height(),
        copied,
    })
}
