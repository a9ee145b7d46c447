//! AutoCAD Color Index (ACI) palette
//!
//! Entities and layers carry a small integer color index. Two values are
//! sentinels rather than colors: [`BYBLOCK`] (inherit from the enclosing
//! block instance) and [`BYLAYER`] (inherit from the entity's layer).
//! Resolution of those sentinels lives in
//! [`render::color`](crate::render::color); this module only maps a concrete
//! index to RGB.

use std::fmt;

/// Color index meaning "inherit from the enclosing block instance"
pub const BYBLOCK: i16 = 0;

/// Color index meaning "inherit from the entity's layer"
pub const BYLAYER: i16 = 256;

/// Index used when nothing else resolves
pub const DEFAULT_COLOR_INDEX: i16 = 7;

/// An RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Unpack a DXF true color (group code 420, `0x00RRGGBB`)
    pub fn from_true_color(packed: i64) -> Self {
        Rgb {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    /// CSS-style `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Color shown for indices outside the palette.
    ///
    /// Index 7 is the "foreground" color; drawings sit on a light map, so it
    /// renders dark.
    pub const DEFAULT_DISPLAY: Rgb = Rgb::new(0, 0, 0);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

const STANDARD: [Rgb; 9] = [
    Rgb::new(255, 0, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 255, 255),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 0, 255),
    Rgb::DEFAULT_DISPLAY,
    Rgb::new(128, 128, 128),
    Rgb::new(192, 192, 192),
];

const GRAYS: [u8; 6] = [51, 91, 132, 173, 214, 255];

// Brightness steps for the 10..=249 hue wheel, indexed by (index % 10) / 2.
const WHEEL_VALUES: [f64; 5] = [1.0, 0.8, 0.6, 0.5, 0.3];

/// Map a color index to RGB. Never fails: sentinels and out-of-range
/// indices yield [`Rgb::DEFAULT_DISPLAY`].
pub fn aci_to_rgb(index: i16) -> Rgb {
    match index {
        1..=9 => STANDARD[(index - 1) as usize],
        10..=249 => {
            let hue = f64::from((index - 10) / 10) * 15.0;
            let step = (index % 10) as usize;
            let saturation = if step % 2 == 0 { 1.0 } else { 0.5 };
            hsv_to_rgb(hue, saturation, WHEEL_VALUES[step / 2])
        }
        250..=255 => {
            let v = GRAYS[(index - 250) as usize];
            Rgb::new(v, v, v)
        }
        _ => Rgb::DEFAULT_DISPLAY,
    }
}

fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
    let c = value * saturation;
    let h = hue / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = value - c;
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to_byte(r), to_byte(g), to_byte(b))
}
