//! Host capabilities handed to a core.
//!
//! A core never talks to the outside world directly. The frontend registers
//! a `Host` once, and the core calls back into it to read controls and to
//! submit audio and video for the frame it just produced.

use crate::Rational;

/// Pixel layout of a submitted framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 32 bits per pixel, `0x00RRGGBB` in native byte order.
    Rgb32,
    /// 16 bits per pixel, 5-6-5.
    Rgb16,
}

impl PixelFormat {
    /// Bytes occupied by one pixel.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::Rgb32 => 4,
            Self::Rgb16 => 2,
        }
    }
}

/// Describes one video frame handed to the host.
///
/// The pixel data is borrowed from the core for the duration of the
/// `submit_frame` call only. Hosts that need the image later must copy it.
#[derive(Debug, Clone, Copy)]
pub struct FrameBuffer<'a> {
    pub format: PixelFormat,
    /// Packed pixels, row-major.
    pub pixels: &'a [u32],
    /// Allocated width and height of `pixels`.
    pub phys_width: u32,
    pub phys_height: u32,
    /// Bytes per row of `pixels`.
    pub phys_stride: u32,
    /// Visible width and height.
    pub width: u32,
    pub height: u32,
    /// Bytes per visible row.
    pub stride: u32,
    /// Top-left corner of the visible area inside the allocation.
    pub offset_x: u32,
    pub offset_y: u32,
}

impl<'a> FrameBuffer<'a> {
    /// A frame whose visible area is the whole allocation.
    #[must_use]
    pub fn full(format: PixelFormat, pixels: &'a [u32], width: u32, height: u32) -> Self {
        let stride = width * format.bytes_per_pixel();
        Self {
            format,
            pixels,
            phys_width: width,
            phys_height: height,
            phys_stride: stride,
            width,
            height,
            stride,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

/// Services a frontend provides to a core.
///
/// All three calls are synchronous. Implementations must not call back into
/// the core from inside them.
pub trait Host {
    /// Read the current value of one logical control.
    ///
    /// `port` and `index` select the controller, `control` the input on it.
    /// Unmapped controls read as 0.
    fn sample_input(&mut self, port: u32, index: u32, control: u32) -> i16;

    /// Submit interleaved audio. `frames` counts sample frames, so a stereo
    /// buffer holds `frames * 2` samples.
    fn submit_audio(&mut self, samples: &[i16], frames: usize, stereo: bool, rate: f64);

    /// Submit the finished video frame.
    fn submit_frame(&mut self, frame: &FrameBuffer<'_>, fps: Rational);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn sample_input(&mut self, port: u32, index: u32, control: u32) -> i16 {
        (**self).sample_input(port, index, control)
    }

    fn submit_audio(&mut self, samples: &[i16], frames: usize, stereo: bool, rate: f64) {
        (**self).submit_audio(samples, frames, stereo, rate);
    }

    fn submit_frame(&mut self, frame: &FrameBuffer<'_>, fps: Rational) {
        (**self).submit_frame(frame, fps);
    }
}

impl<H: Host + ?Sized> Host for Box<H> {
    fn sample_input(&mut self, port: u32, index: u32, control: u32) -> i16 {
        (**self).sample_input(port, index, control)
    }

    fn submit_audio(&mut self, samples: &[i16], frames: usize, stereo: bool, rate: f64) {
        (**self).submit_audio(samples, frames, stereo, rate);
    }

    fn submit_frame(&mut self, frame: &FrameBuffer<'_>, fps: Rational) {
        (**self).submit_frame(frame, fps);
    }
}
