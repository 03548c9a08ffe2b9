use std::path::{Path, PathBuf};

use eframe::egui::ColorImage;
use thiserror::Error;

/// A pre-rendered chart that could not be shown.
#[derive(Error, Debug)]
pub enum ImageUnavailable {
    #[error("chart image not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Read a chart PNG into pixels egui can upload as a texture.
pub fn load_chart_image(path: &Path) -> Result<ColorImage, ImageUnavailable> {
    if !path.is_file() {
        return Err(ImageUnavailable::FileNotFound(path.to_path_buf()));
    }
    let img = image::open(path).map_err(|source| ImageUnavailable::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn missing_image_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_chart_image(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, ImageUnavailable::FileNotFound(_)));
    }

    #[test]
    fn reads_png_pixels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chart.png");
        RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let img = load_chart_image(&path).unwrap();
        assert_eq!(img.size, [4, 3]);
        assert_eq!(img.pixels[0].r(), 10);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        let err = load_chart_image(&path).unwrap_err();
        assert!(matches!(err, ImageUnavailable::Decode { .. }));
    }
}
