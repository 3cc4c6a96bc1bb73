//! Save-state format.
//!
//! A state is the raw canvas followed by the painted flag:
//!
//! ```text
//! [R G B] × width*height   one triplet per pixel, row-major
//! [P]                      1 if the canvas has been painted, else 0
//! ```
//!
//! There is no header. The canvas dimensions are not stored, so a state
//! only loads into a canvas of the size it was saved from.

use thiserror::Error;

use crate::canvas::{Canvas, unpack_rgb};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("save state is {actual} bytes, canvas needs {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Bytes in a save state for a `width` × `height` canvas.
#[must_use]
pub fn state_size(width: u16, height: u16) -> usize {
    usize::from(width) * usize::from(height) * 3 + 1
}

/// Serialize `canvas` into `out`, replacing its previous contents.
pub fn save_into(canvas: &Canvas, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(state_size(canvas.width(), canvas.height()));
    for &pixel in canvas.pixels() {
        let (r, g, b) = unpack_rgb(pixel);
        out.extend_from_slice(&[r, g, b]);
    }
    out.push(u8::from(canvas.is_painted()));
}

/// Serialize `canvas` into a fresh buffer.
#[must_use]
pub fn save(canvas: &Canvas) -> Vec<u8> {
    let mut out = Vec::new();
    save_into(canvas, &mut out);
    out
}

/// Restore `canvas` from `data`.
///
/// # Errors
///
/// Returns `SizeMismatch` when `data` was not saved from a canvas of the
/// current size. The canvas is untouched in that case.
pub fn load(canvas: &mut Canvas, data: &[u8]) -> Result<(), StateError> {
    let expected = state_size(canvas.width(), canvas.height());
    if data.len() != expected {
        return Err(StateError::SizeMismatch {
            expected,
            actual: data.len(),
        });
    }
    let (body, flag) = data.split_at(expected - 1);
    for (pixel, rgb) in canvas.pixels_mut().iter_mut().zip(body.chunks_exact(3)) {
        *pixel = u32::from_be_bytes([0, rgb[0], rgb[1], rgb[2]]);
    }
    canvas.set_painted(flag[0] != 0);
    Ok(())
}
