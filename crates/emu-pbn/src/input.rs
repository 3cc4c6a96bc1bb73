//! Logical controls and per-point input sampling.
//!
//! The paint device sits on port 0, controller index 1 (index 0 is the
//! system controller carrying the hidden framesync button). Each sample
//! reads six controls in a fixed order.

use emu_core::Host;

use crate::canvas::pack_rgb;

/// Port the paint device is plugged into.
pub const PORT: u32 = 0;
/// Controller index of the paint device on that port.
pub const INDEX: u32 = 1;

/// Controls of the paint device, numbered as the host addresses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    X = 0,
    Y = 1,
    R = 2,
    G = 3,
    B = 4,
    /// Toggles once per submitted point.
    Spin = 5,
}

impl Control {
    /// All controls in sampling order.
    pub const ALL: [Self; 6] = [Self::X, Self::Y, Self::R, Self::G, Self::B, Self::Spin];

    #[must_use]
    pub const fn id(self) -> u32 {
        self as u32
    }

    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::R),
            3 => Some(Self::G),
            4 => Some(Self::B),
            5 => Some(Self::Spin),
            _ => None,
        }
    }
}

/// One read of every paint control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintSample {
    pub x: i16,
    pub y: i16,
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub spin: i16,
}

impl PaintSample {
    /// Read all six controls from the host, X first and spin last.
    pub fn read<H: Host + ?Sized>(host: &mut H) -> Self {
        let mut read = |control: Control| host.sample_input(PORT, INDEX, control.id());
        let x = read(Control::X);
        let y = read(Control::Y);
        let r = read(Control::R);
        let g = read(Control::G);
        let b = read(Control::B);
        let spin = read(Control::Spin);
        Self { x, y, r, g, b, spin }
    }

    /// The sampled colour as `0x00RRGGBB`. Components are clamped to 0–255.
    #[must_use]
    pub fn color(&self) -> u32 {
        pack_rgb(component(self.r), component(self.g), component(self.b))
    }
}

fn component(v: i16) -> u8 {
    v.clamp(0, 255) as u8
}
