//! Headless capture: PNG screenshots and save-state files.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::canvas::{Canvas, unpack_rgb};
use crate::pbn::Scale;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG encode error: {0}")]
    Png(#[from] png::EncodingError),
}

/// Scale that leaves the image at canvas size.
pub const UNSCALED: Scale = Scale {
    horizontal: 1,
    vertical: 1,
};

/// Encode `canvas` as an 8-bit RGB PNG, each pixel drawn as a
/// `scale.horizontal` × `scale.vertical` block.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn write_png<W: Write>(canvas: &Canvas, scale: Scale, out: W) -> Result<(), CaptureError> {
    let sx = scale.horizontal.max(1) as usize;
    let sy = scale.vertical.max(1) as usize;
    let width = usize::from(canvas.width());
    let out_width = width * sx;
    let out_height = usize::from(canvas.height()) * sy;

    let mut encoder = png::Encoder::new(out, out_width as u32, out_height as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let mut rgb = Vec::with_capacity(out_width * out_height * 3);
    for row in canvas.pixels().chunks_exact(width) {
        let start = rgb.len();
        for &pixel in row {
            let (r, g, b) = unpack_rgb(pixel);
            for _ in 0..sx {
                rgb.extend_from_slice(&[r, g, b]);
            }
        }
        // Repeat the finished row for vertical magnification.
        for _ in 1..sy {
            rgb.extend_from_within(start..start + out_width * 3);
        }
    }

    writer.write_image_data(&rgb)?;
    Ok(())
}

/// Encode `canvas` as PNG into memory.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_png(canvas: &Canvas, scale: Scale) -> Result<Vec<u8>, CaptureError> {
    let mut buf = Vec::new();
    write_png(canvas, scale, &mut buf)?;
    Ok(buf)
}

/// Save `canvas` as a PNG file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_screenshot(canvas: &Canvas, scale: Scale, path: &Path) -> Result<(), CaptureError> {
    let file = fs::File::create(path)?;
    write_png(canvas, scale, BufWriter::new(file))
}

/// Write raw save-state bytes to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_state_file(path: &Path, data: &[u8]) -> Result<(), CaptureError> {
    fs::write(path, data)?;
    Ok(())
}

/// Read raw save-state bytes from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_state_file(path: &Path) -> Result<Vec<u8>, CaptureError> {
    Ok(fs::read(path)?)
}
