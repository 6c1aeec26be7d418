use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::{Error, Result};

pub fn export_png(image: &RgbaImage, dir: &Path, filename: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    image.save_with_format(&path, ImageFormat::Png)?;
    tracing::debug!("Wrote {}x{} PNG to {}", image.width(), image.height(), path.display());
    Ok(path)
}

pub fn export_svg(svg: &str, dir: &Path, filename: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, svg)?;
    tracing::debug!("Wrote SVG card to {}", path.display());
    Ok(path)
}

pub fn copy_to_clipboard(image: &RgbaImage) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;

    clipboard
        .set_image(arboard::ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.as_raw()),
        })
        .map_err(|e| Error::Clipboard(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_export_png_writes_decodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let image = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));

        let path = export_png(&image, &dir.path().join("out"), "github-analysis-octocat.png").unwrap();

        assert_eq!(path.file_name().unwrap(), "github-analysis-octocat.png");
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(image::image_dimensions(&path).unwrap(), (4, 3));
    }

    #[test]
    fn test_export_svg_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("cards").join("nested");

        let path = export_svg("<svg/>", &target, "github-analysis-octocat.svg").unwrap();

        assert_eq!(path, target.join("github-analysis-octocat.svg"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<svg/>");
    }
}
