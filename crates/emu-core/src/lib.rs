//! Core-side contract between an emulation core and its host frontend.
//!
//! The host owns the window, the speakers and the controllers. A core owns
//! its machine state and reaches the outside world only through `Host`.

mod host;
mod observable;
mod rational;

pub use host::{FrameBuffer, Host, PixelFormat};
pub use observable::{Observable, Value};
pub use rational::Rational;
