//! ARGB colors.
//!
//! `Color` packs four 8-bit channels. Named colors are limited to the few
//! the drawing layer itself needs; larger tables belong to the caller.

use crate::error::{Error, Result};

/// An 8-bit-per-channel color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0, 255, 255, 255);
    pub const BLACK: Color = Color::opaque(0, 0, 0);
    pub const WHITE: Color = Color::opaque(255, 255, 255);
    pub const RED: Color = Color::opaque(255, 0, 0);
    pub const GREEN: Color = Color::opaque(0, 128, 0);
    pub const BLUE: Color = Color::opaque(0, 0, 255);

    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(255, r, g, b)
    }

    /// Build a color from integer components, each of which must lie in
    /// `0..=255`.
    pub fn from_argb(a: i32, r: i32, g: i32, b: i32) -> Result<Self> {
        Ok(Self {
            a: channel("alpha", a)?,
            r: channel("red", r)?,
            g: channel("green", g)?,
            b: channel("blue", b)?,
        })
    }

    /// Unpack `0xAARRGGBB`.
    pub const fn from_packed(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    pub const fn to_packed(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

fn channel(name: &str, v: i32) -> Result<u8> {
    u8::try_from(v)
        .map_err(|_| Error::InvalidArgument(format!("{name} component {v} is not in 0..=255")))
}
