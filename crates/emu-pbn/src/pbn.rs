//! The paint-by-numbers core.
//!
//! There is no CPU and no clock. Each `emulate` call reads points from the
//! input driver until it signals end-of-frame, writes them to the canvas,
//! and hands the host one audio buffer and one video frame.
//!
//! Spin-toggle protocol: the driver submits a point by changing the spin
//! control from its previous value and ends the frame by repeating it.
//! Spin starts at 0 every frame, so a driver that answers 0 straight away
//! paints nothing.

use emu_core::{FrameBuffer, Host, Observable, PixelFormat, Rational, Value};

use crate::canvas::Canvas;
use crate::config::PbnConfig;
use crate::input::PaintSample;
use crate::state::{self, StateError};

/// Declared video rate.
pub const FPS: Rational = Rational::whole(60);
/// Declared audio rate.
pub const AUDIO_RATE: Rational = Rational::whole(12_000);
/// Stereo sample frames submitted per video frame.
pub const AUDIO_FRAMES_PER_FRAME: usize = 200;
/// Display size the scale factors aim for, per axis.
pub const DISPLAY_TARGET: u32 = 512;

/// Integer magnification the host should apply to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub horizontal: u32,
    pub vertical: u32,
}

/// Audio/video parameters reported to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvState {
    pub fps: Rational,
    /// Pixel aspect ratio.
    pub par: f64,
    pub sample_rate: Rational,
    /// Coordinate space of the lightgun axes (the canvas size).
    pub lightgun_width: u32,
    pub lightgun_height: u32,
}

/// Paint-by-numbers core state.
#[derive(Debug)]
pub struct Pbn {
    canvas: Canvas,
    paint_limit: Option<u32>,
    /// Filler audio. Never written, so the core is silent.
    audio: [i16; AUDIO_FRAMES_PER_FRAME * 2],
    /// Most recent save state. Replaced by every save.
    save_buffer: Vec<u8>,
    frame_count: u64,
    points_last_frame: u32,
}

impl Pbn {
    #[must_use]
    pub fn new(config: &PbnConfig) -> Self {
        Self {
            canvas: Canvas::new(config.width, config.height),
            paint_limit: config.paint_limit,
            audio: [0; AUDIO_FRAMES_PER_FRAME * 2],
            save_buffer: Vec::new(),
            frame_count: 0,
            points_last_frame: 0,
        }
    }

    /// Throw away the canvas and start over with a blank one sized by
    /// `config`.
    pub fn load(&mut self, config: &PbnConfig) {
        log::debug!("new {}x{} canvas", config.width, config.height);
        self.canvas = Canvas::new(config.width, config.height);
        self.paint_limit = config.paint_limit;
        self.frame_count = 0;
        self.points_last_frame = 0;
    }

    /// Cap the points accepted per frame. `None` removes the cap.
    pub fn set_paint_limit(&mut self, limit: Option<u32>) {
        self.paint_limit = limit;
    }

    /// Run one frame against `host`. Returns the number of points the
    /// driver submitted, including any that fell outside the canvas.
    ///
    /// The loop has no bound of its own. Unless a `paint_limit` is
    /// configured, a driver that never repeats its spin value keeps this
    /// call from returning.
    pub fn emulate<H: Host + ?Sized>(&mut self, host: &mut H) -> u32 {
        self.canvas.set_painted(true);

        let mut last_spin = 0;
        let mut points = 0u32;
        loop {
            let sample = PaintSample::read(host);
            if sample.spin == last_spin {
                break;
            }
            last_spin = sample.spin;
            self.canvas.plot(sample.x, sample.y, sample.color());
            points += 1;

            if self.paint_limit.is_some_and(|limit| points >= limit) {
                log::warn!("paint limit of {points} points reached, ending frame early");
                break;
            }
        }

        self.frame_count += 1;
        self.points_last_frame = points;

        host.submit_audio(&self.audio, AUDIO_FRAMES_PER_FRAME, true, AUDIO_RATE.as_f64());
        let frame = FrameBuffer::full(
            PixelFormat::Rgb32,
            self.canvas.pixels(),
            u32::from(self.canvas.width()),
            u32::from(self.canvas.height()),
        );
        host.submit_frame(&frame, FPS);

        points
    }

    /// Serialize the canvas. The returned bytes stay valid until the next
    /// save.
    pub fn save_state(&mut self) -> &[u8] {
        state::save_into(&self.canvas, &mut self.save_buffer);
        &self.save_buffer
    }

    /// Restore the canvas from a save state of the same dimensions.
    ///
    /// # Errors
    ///
    /// Returns `StateError::SizeMismatch` (leaving the canvas untouched)
    /// when `data` does not fit the current canvas.
    pub fn load_state(&mut self, data: &[u8]) -> Result<(), StateError> {
        state::load(&mut self.canvas, data)
    }

    /// Magnification toward a 512×512 display. Unpainted canvases are
    /// shown at 1×.
    #[must_use]
    pub fn compute_scale(&self) -> Scale {
        if !self.canvas.is_painted() {
            return Scale {
                horizontal: 1,
                vertical: 1,
            };
        }
        Scale {
            horizontal: axis_factor(self.canvas.width()),
            vertical: axis_factor(self.canvas.height()),
        }
    }

    #[must_use]
    pub fn av_state(&self) -> AvState {
        AvState {
            fps: FPS,
            par: 1.0,
            sample_rate: AUDIO_RATE,
            lightgun_width: u32::from(self.canvas.width()),
            lightgun_height: u32::from(self.canvas.height()),
        }
    }

    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Frames emulated since the canvas was loaded.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Points submitted during the most recent frame.
    #[must_use]
    pub fn points_last_frame(&self) -> u32 {
        self.points_last_frame
    }
}

impl Default for Pbn {
    fn default() -> Self {
        Self::new(&PbnConfig::default())
    }
}

fn axis_factor(size: u16) -> u32 {
    (DISPLAY_TARGET / u32::from(size).max(1)).max(1)
}

impl Observable for Pbn {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("pixel.") {
            let (x, y) = rest.split_once(',')?;
            let x = x.trim().parse().ok()?;
            let y = y.trim().parse().ok()?;
            return self.canvas.pixel(x, y).map(Value::Rgb);
        }
        match path {
            "width" => Some(self.canvas.width().into()),
            "height" => Some(self.canvas.height().into()),
            "painted" => Some(self.canvas.is_painted().into()),
            "frame_count" => Some(self.frame_count.into()),
            "points_painted" => Some(self.points_last_frame.into()),
            "scale" => {
                let scale = self.compute_scale();
                Some(Value::List(vec![
                    scale.horizontal.into(),
                    scale.vertical.into(),
                ]))
            }
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "width",
            "height",
            "painted",
            "frame_count",
            "points_painted",
            "scale",
            "pixel.<x>,<y>",
        ]
    }
}
