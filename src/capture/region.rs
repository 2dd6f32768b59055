//! Pure region cropping and JPEG encoding.
//!
//! No OS access here apart from writing the encoded file. Pixels in,
//! pixels (or a file) out.

use image::{DynamicImage, ImageFormat};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Crops `image` to the given rectangle, in image-local coordinates.
///
/// # Arguments
/// * `image` - The monitor screenshot
/// * `x` - Left edge of the crop rectangle
/// * `y` - Top edge of the crop rectangle
/// * `width` - Width of the crop rectangle
/// * `height` - Height of the crop rectangle
pub fn crop_region(
    image: &DynamicImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<DynamicImage, CropError> {
    if width == 0 || height == 0 {
        return Err(CropError::ZeroDimension);
    }

    let (img_width, img_height) = (image.width(), image.height());

    let fits_x = x.checked_add(width).is_some_and(|r| r <= img_width);
    let fits_y = y.checked_add(height).is_some_and(|b| b <= img_height);
    if !fits_x || !fits_y {
        return Err(CropError::OutOfBounds {
            requested: (x, y, width, height),
            image_size: (img_width, img_height),
        });
    }

    Ok(image.crop_imm(x, y, width, height))
}

/// Encodes `image` as JPEG at `path`, replacing any existing file.
///
/// JPEG has no alpha channel, so the image is flattened to RGB8 first.
/// On failure the partially written file is removed so a later folder
/// scan does not count it.
pub fn write_jpeg(image: &DynamicImage, path: &Path) -> Result<(), CropError> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());

    let file = File::create(path).map_err(|e| CropError::Io(e.to_string()))?;
    let mut writer = BufWriter::new(file);

    let result = rgb
        .write_to(&mut writer, ImageFormat::Jpeg)
        .map_err(|e| CropError::EncodingFailed(e.to_string()))
        // BufWriter drops flush errors silently
        .and_then(|()| writer.flush().map_err(|e| CropError::Io(e.to_string())));

    if result.is_err() {
        drop(writer);
        discard_partial(path);
    }
    result
}

fn discard_partial(path: &Path) {
    // Only regular files; never unlink a device or whatever else sits there
    if path.is_file() {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("[CAPTURE] Cannot remove partial {}: {}", path.display(), e);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Crop rectangle has zero width or height")]
    ZeroDimension,

    #[error(
        "Crop rectangle ({},{},{},{}) exceeds image bounds ({}x{})",
        requested.0, requested.1, requested.2, requested.3,
        image_size.0, image_size.1
    )]
    OutOfBounds {
        requested: (u32, u32, u32, u32),
        image_size: (u32, u32),
    },

    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Cannot create image file: {0}")]
    Io(String),
}
