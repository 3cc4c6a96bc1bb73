//! Scripted input driver.
//!
//! A paint script lists, frame by frame, the points to paint. `ScriptHost`
//! plays one script frame per `emulate` call by speaking the spin-toggle
//! protocol: it flips spin once per point and repeats the last value to end
//! the frame.
//!
//! Script JSON:
//!
//! ```json
//! { "frames": [
//!     [ { "x": 10, "y": 5, "color": "#FF0000" } ],
//!     [],
//!     [ { "x": 0, "y": 0, "color": 65280 } ]
//! ] }
//! ```

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use emu_core::{FrameBuffer, Host, Rational};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::input::{Control, INDEX, PORT};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("cannot read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid script: {0}")]
    Json(#[from] serde_json::Error),
}

/// One point to paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintPoint {
    pub x: i16,
    pub y: i16,
    /// `0x00RRGGBB`. Written in JSON as an integer or `"#RRGGBB"`.
    #[serde(deserialize_with = "deserialize_color")]
    pub color: u32,
}

impl PaintPoint {
    #[must_use]
    pub const fn new(x: i16, y: i16, color: u32) -> Self {
        Self { x, y, color }
    }

    fn control(&self, control: Control) -> i16 {
        let [_, r, g, b] = self.color.to_be_bytes();
        match control {
            Control::X => self.x,
            Control::Y => self.y,
            Control::R => i16::from(r),
            Control::G => i16::from(g),
            Control::B => i16::from(b),
            Control::Spin => 0,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Packed(u32),
    Hex(String),
}

fn deserialize_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match ColorRepr::deserialize(deserializer)? {
        ColorRepr::Packed(v) if v <= 0x00FF_FFFF => Ok(v),
        ColorRepr::Packed(v) => Err(D::Error::custom(format!("colour {v:#X} is wider than 24 bits"))),
        ColorRepr::Hex(s) => {
            parse_hex_color(&s).ok_or_else(|| D::Error::custom(format!("bad colour {s:?}, expected #RRGGBB")))
        }
    }
}

/// Parse `#RRGGBB`.
#[must_use]
pub fn parse_hex_color(s: &str) -> Option<u32> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Points to paint, grouped by frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintScript {
    pub frames: Vec<Vec<PaintPoint>>,
}

impl PaintScript {
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid script.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Total points across all frames.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.frames.iter().map(Vec::len).sum()
    }
}

/// A copy of the last frame the core submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

/// A `Host` that feeds a paint script to the core and keeps what comes back.
#[derive(Debug, Default)]
pub struct ScriptHost {
    pending: VecDeque<Vec<PaintPoint>>,
    /// Frame being played, and how many of its points were handed out.
    current: Vec<PaintPoint>,
    cursor: usize,
    frame_open: bool,
    last_frame: Option<CapturedFrame>,
    frames_submitted: u64,
    audio_frames_submitted: u64,
}

impl ScriptHost {
    #[must_use]
    pub fn new(script: PaintScript) -> Self {
        Self {
            pending: script.frames.into(),
            ..Self::default()
        }
    }

    /// Queue one more frame of points behind any already pending.
    pub fn push_frame(&mut self, points: Vec<PaintPoint>) {
        self.pending.push_back(points);
    }

    /// Script frames not yet played.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&CapturedFrame> {
        self.last_frame.as_ref()
    }

    #[must_use]
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Audio sample frames received so far.
    #[must_use]
    pub fn audio_frames_submitted(&self) -> u64 {
        self.audio_frames_submitted
    }

    fn open_frame(&mut self) {
        self.current = self.pending.pop_front().unwrap_or_default();
        self.cursor = 0;
        self.frame_open = true;
    }

    /// Spin for the next sample: toggles per point starting from 1, then
    /// repeats the last value handed out.
    fn next_spin(&mut self) -> i16 {
        if self.cursor < self.current.len() {
            let spin = i16::from(self.cursor % 2 == 0);
            self.cursor += 1;
            spin
        } else {
            self.frame_open = false;
            i16::from(self.current.len() % 2 == 1)
        }
    }
}

impl Host for ScriptHost {
    fn sample_input(&mut self, port: u32, index: u32, control: u32) -> i16 {
        if (port, index) != (PORT, INDEX) {
            return 0;
        }
        let Some(control) = Control::from_id(control) else {
            return 0;
        };
        if !self.frame_open {
            self.open_frame();
        }
        match control {
            Control::Spin => self.next_spin(),
            other => self
                .current
                .get(self.cursor)
                .map_or(0, |point| point.control(other)),
        }
    }

    fn submit_audio(&mut self, _samples: &[i16], frames: usize, _stereo: bool, _rate: f64) {
        self.audio_frames_submitted += frames as u64;
    }

    fn submit_frame(&mut self, frame: &FrameBuffer<'_>, _fps: Rational) {
        if self.frame_open {
            // The core stopped early (paint limit); the rest of this frame is dropped.
            log::warn!(
                "core ended the frame with {} scripted points unread",
                self.current.len() - self.cursor
            );
            self.frame_open = false;
        }
        let row = frame.stride as usize / 4;
        let mut pixels = Vec::with_capacity(frame.width as usize * frame.height as usize);
        for y in 0..frame.height as usize {
            let start = (frame.offset_y as usize + y) * row + frame.offset_x as usize;
            pixels.extend_from_slice(&frame.pixels[start..start + frame.width as usize]);
        }
        self.last_frame = Some(CapturedFrame {
            width: frame.width,
            height: frame.height,
            pixels,
        });
        self.frames_submitted += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spins(host: &mut ScriptHost, n: usize) -> Vec<i16> {
        (0..n)
            .map(|_| host.sample_input(PORT, INDEX, Control::Spin.id()))
            .collect()
    }

    #[test]
    fn parses_hex_and_packed_colours() {
        let script = PaintScript::from_json(
            r##"{"frames": [[{"x": 1, "y": 2, "color": "#FF0000"}, {"x": -3, "y": 4, "color": 255}]]}"##,
        )
        .expect("parse");
        assert_eq!(
            script.frames[0],
            [PaintPoint::new(1, 2, 0xFF_0000), PaintPoint::new(-3, 4, 0xFF)]
        );
        assert_eq!(script.point_count(), 2);
    }

    #[test]
    fn rejects_bad_colours() {
        for bad in [r#""red""#, r##""#12345""##, "16777216"] {
            let json = format!(r#"{{"frames": [[{{"x": 0, "y": 0, "color": {bad}}}]]}}"#);
            assert!(PaintScript::from_json(&json).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn hex_colour_parser() {
        assert_eq!(parse_hex_color("#00ff7f"), Some(0x00_FF7F));
        assert_eq!(parse_hex_color("00ff7f"), None);
        assert_eq!(parse_hex_color("#+0ff7f"), None);
    }

    #[test]
    fn spin_toggles_per_point_then_repeats() {
        let mut host = ScriptHost::new(PaintScript {
            frames: vec![vec![PaintPoint::new(0, 0, 0); 3]],
        });
        assert_eq!(spins(&mut host, 4), [1, 0, 1, 1]);
    }

    #[test]
    fn empty_frame_ends_on_first_sample() {
        let mut host = ScriptHost::new(PaintScript {
            frames: vec![vec![], vec![PaintPoint::new(0, 0, 0); 2]],
        });
        assert_eq!(spins(&mut host, 1), [0]);
        assert_eq!(spins(&mut host, 3), [1, 0, 0]);
        // Exhausted script: every later frame is empty.
        assert_eq!(spins(&mut host, 1), [0]);
    }

    #[test]
    fn point_controls_come_from_current_point() {
        let mut host = ScriptHost::new(PaintScript {
            frames: vec![vec![PaintPoint::new(7, -2, 0x12_3456)]],
        });
        let read = |host: &mut ScriptHost, c: Control| host.sample_input(PORT, INDEX, c.id());
        assert_eq!(read(&mut host, Control::X), 7);
        assert_eq!(read(&mut host, Control::Y), -2);
        assert_eq!(read(&mut host, Control::R), 0x12);
        assert_eq!(read(&mut host, Control::G), 0x34);
        assert_eq!(read(&mut host, Control::B), 0x56);
        assert_eq!(host.sample_input(0, 0, 0), 0);
        assert_eq!(host.sample_input(PORT, INDEX, 9), 0);
    }
}
