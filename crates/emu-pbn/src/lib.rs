//! Paint-by-numbers canvas core.
//!
//! A fixed-size RGB canvas that an external input driver paints one point
//! at a time. Each emulated frame the core reads points until the driver
//! stops toggling its spin control, then shows the whole canvas at 60 fps.
//! Save states are the raw canvas plus a painted flag.

#[cfg(feature = "native")]
pub mod capture;
mod canvas;
mod config;
pub mod info;
pub mod input;
#[cfg(feature = "native")]
pub mod mcp;
mod pbn;
pub mod plugin;
pub mod script;
pub mod state;

pub use canvas::{Canvas, pack_rgb, unpack_rgb};
pub use config::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_DIMENSION, PbnConfig, Setting, parse_dimension};
pub use pbn::{AUDIO_FRAMES_PER_FRAME, AUDIO_RATE, AvState, DISPLAY_TARGET, FPS, Pbn, Scale};
pub use plugin::{CoreError, Operation, Params, Plugin};
pub use script::{PaintPoint, PaintScript, ScriptHost};
pub use state::StateError;
