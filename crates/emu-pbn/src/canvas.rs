//! The raster the input driver paints on.

use crate::config::MAX_DIMENSION;

/// Pack 8-bit components into `0x00RRGGBB`.
#[must_use]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split `0x00RRGGBB` into its components. Bits above 23 are ignored.
#[must_use]
pub const fn unpack_rgb(v: u32) -> (u8, u8, u8) {
    ((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

/// Row-major 24-bit RGB raster, one `u32` per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    pixels: Vec<u32>,
    /// Set once a paint loop has run against this canvas.
    painted: bool,
}

impl Canvas {
    /// Allocate a zero-filled, unpainted canvas.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is outside 1–256. Dimensions reach this
    /// point through `PbnConfig`, which never produces such values.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        assert!(
            (1..=MAX_DIMENSION).contains(&width) && (1..=MAX_DIMENSION).contains(&height),
            "canvas dimensions {width}x{height} out of range"
        );
        Self {
            width,
            height,
            pixels: vec![0; usize::from(width) * usize::from(height)],
            painted: false,
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of pixels (`width * height`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always false: a canvas has at least one pixel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    #[must_use]
    pub fn pixel(&self, x: u16, y: u16) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[usize::from(y) * usize::from(self.width) + usize::from(x)])
        } else {
            None
        }
    }

    /// Write `rgb` at signed coordinates. Points outside the canvas are
    /// dropped. Returns whether a pixel was written.
    pub fn plot(&mut self, x: i16, y: i16, rgb: u32) -> bool {
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            return false;
        };
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = usize::from(y) * usize::from(self.width) + usize::from(x);
        self.pixels[index] = rgb & 0x00FF_FFFF;
        true
    }

    #[must_use]
    pub fn is_painted(&self) -> bool {
        self.painted
    }

    pub fn set_painted(&mut self, painted: bool) {
        self.painted = painted;
    }
}
