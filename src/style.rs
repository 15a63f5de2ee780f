//! Style vocabulary shared by the normalization pass and the plotting backend.
//!
//! Colors, line dashes, markers and colormaps are spelled the way matplotlib
//! users write them in configuration files (`"r"`, `"C1"`, `"tab:blue"`,
//! `"--"`, `"o"`, `"viridis_r"`, …) and are resolved here into plain values.
//!
//! # Example
//!
//! ```rust
//! use chartgrid::style::{Colormap, LineDash, MarkerShape, Rgba};
//!
//! assert_eq!(Rgba::parse("red"), Some(Rgba::rgb(255, 0, 0)));
//! assert_eq!(Rgba::parse("#00ff00"), Some(Rgba::rgb(0, 255, 0)));
//! assert_eq!("--".parse::<LineDash>(), Ok(LineDash::Dash));
//! assert_eq!(MarkerShape::parse("s"), Ok(Some(MarkerShape::Square)));
//! assert!(Colormap::parse("viridis").is_some());
//! ```

use std::str::FromStr;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    const fn hex(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
            a: 255,
        }
    }

    /// Alpha as a fraction in `0..=1`.
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// Parse a matplotlib-style color spec. Case-insensitive for names.
    ///
    /// Accepts single-letter codes (`b g r c m y k w`), cycle references
    /// (`C0`–`C9`), `tab:` palette names, the 148 CSS4 color names and hex
    /// notation (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    pub fn parse(spec: &str) -> Option<Rgba> {
        let s = spec.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(idx) = s.strip_prefix('C').and_then(|n| n.parse::<usize>().ok()) {
            return Some(palette_color(idx));
        }
        let lower = s.to_ascii_lowercase();
        if let Some(name) = lower.strip_prefix("tab:") {
            return TAB10_NAMES
                .iter()
                .position(|n| *n == name)
                .map(palette_color);
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, v)| Rgba::hex(*v))
    }

    /// Linear interpolation between two colors, `t` in `0..=1`.
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Relative luminance, used to pick readable text over filled cells.
    pub fn luminance(&self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let nibble = |c: u8| (c as char).to_digit(16).map(|d| d as u8);
    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => {
            let mut out = [0u8; 3];
            for (slot, c) in out.iter_mut().zip(bytes) {
                let d = nibble(*c)?;
                *slot = d * 17;
            }
            Some(Rgba::rgb(out[0], out[1], out[2]))
        }
        6 | 8 => {
            let mut out = [255u8; 4];
            for (i, pair) in bytes.chunks(2).enumerate() {
                out[i] = nibble(pair[0])? * 16 + nibble(pair[1])?;
            }
            Some(Rgba::new(out[0], out[1], out[2], out[3]))
        }
        _ => None,
    }
}

/// matplotlib's default "tab10" color cycle.
/// Order: blue, orange, green, red, purple, brown, pink, gray, olive, cyan.
const TAB10: [u32; 10] = [
    0x1f77b4, // blue
    0xff7f0e, // orange
    0x2ca02c, // green
    0xd62728, // red
    0x9467bd, // purple
    0x8c564b, // brown
    0xe377c2, // pink
    0x7f7f7f, // gray
    0xbcbd22, // olive
    0x17becf, // cyan
];

const TAB10_NAMES: [&str; 10] = [
    "blue", "orange", "green", "red", "purple", "brown", "pink", "gray", "olive", "cyan",
];

/// Get a color from the default cycle.
#[inline]
pub fn palette_color(idx: usize) -> Rgba {
    Rgba::hex(TAB10[idx % TAB10.len()])
}

const NAMED_COLORS: &[(&str, u32)] = &[
    // single-letter shorthands
    ("b", 0x0000ff),
    ("g", 0x008000),
    ("r", 0xff0000),
    ("c", 0x00bfbf),
    ("m", 0xbf00bf),
    ("y", 0xbfbf00),
    ("k", 0x000000),
    ("w", 0xffffff),
    // CSS4 names
    ("aliceblue", 0xf0f8ff),
    ("antiquewhite", 0xfaebd7),
    ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4),
    ("azure", 0xf0ffff),
    ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4),
    ("black", 0x000000),
    ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff),
    ("blueviolet", 0x8a2be2),
    ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887),
    ("cadetblue", 0x5f9ea0),
    ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e),
    ("coral", 0xff7f50),
    ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc),
    ("crimson", 0xdc143c),
    ("cyan", 0x00ffff),
    ("darkblue", 0x00008b),
    ("darkcyan", 0x008b8b),
    ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9),
    ("darkkhaki", 0xbdb76b),
    ("darkmagenta", 0x8b008b),
    ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00),
    ("darkorchid", 0x9932cc),
    ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a),
    ("darkseagreen", 0x8fbc8f),
    ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f),
    ("darkslategrey", 0x2f4f4f),
    ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3),
    ("deeppink", 0xff1493),
    ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222),
    ("floralwhite", 0xfffaf0),
    ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff),
    ("gainsboro", 0xdcdcdc),
    ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700),
    ("goldenrod", 0xdaa520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xadff2f),
    ("grey", 0x808080),
    ("honeydew", 0xf0fff0),
    ("hotpink", 0xff69b4),
    ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082),
    ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa),
    ("lavenderblush", 0xfff0f5),
    ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd),
    ("lightblue", 0xadd8e6),
    ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff),
    ("lightgoldenrodyellow", 0xfafad2),
    ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90),
    ("lightgrey", 0xd3d3d3),
    ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a),
    ("lightseagreen", 0x20b2aa),
    ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0),
    ("lime", 0x00ff00),
    ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6),
    ("magenta", 0xff00ff),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa),
    ("mediumblue", 0x0000cd),
    ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370db),
    ("mediumseagreen", 0x3cb371),
    ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a),
    ("mediumturquoise", 0x48d1cc),
    ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xf5fffa),
    ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5),
    ("navajowhite", 0xffdead),
    ("navy", 0x000080),
    ("oldlace", 0xfdf5e6),
    ("olive", 0x808000),
    ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500),
    ("orangered", 0xff4500),
    ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa),
    ("palegreen", 0x98fb98),
    ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xdb7093),
    ("papayawhip", 0xffefd5),
    ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f),
    ("pink", 0xffc0cb),
    ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6),
    ("purple", 0x800080),
    ("rebeccapurple", 0x663399),
    ("red", 0xff0000),
    ("rosybrown", 0xbc8f8f),
    ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513),
    ("salmon", 0xfa8072),
    ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57),
    ("seashell", 0xfff5ee),
    ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0),
    ("skyblue", 0x87ceeb),
    ("slateblue", 0x6a5acd),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f),
    ("steelblue", 0x4682b4),
    ("tan", 0xd2b48c),
    ("teal", 0x008080),
    ("thistle", 0xd8bfd8),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
    ("wheat", 0xf5deb3),
    ("white", 0xffffff),
    ("whitesmoke", 0xf5f5f5),
    ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];

/// Line dash pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineDash {
    Solid,
    Dash,
    Dot,
    DashDot,
    /// `"None"`: markers only, no connecting line.
    Hidden,
}

impl LineDash {
    /// On/off segment lengths in pixels; empty for solid and hidden lines.
    pub fn pattern(&self) -> &'static [i32] {
        match self {
            LineDash::Solid | LineDash::Hidden => &[],
            LineDash::Dash => &[7, 3],
            LineDash::Dot => &[2, 3],
            LineDash::DashDot => &[10, 3, 2, 3],
        }
    }
}

impl FromStr for LineDash {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-" | "solid" => Ok(LineDash::Solid),
            "--" | "dashed" => Ok(LineDash::Dash),
            ":" | "dotted" => Ok(LineDash::Dot),
            "-." | "dashdot" => Ok(LineDash::DashDot),
            "" | " " | "None" | "none" => Ok(LineDash::Hidden),
            other => Err(format!("unknown linestyle '{other}'")),
        }
    }
}

/// Marker shape for data points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Point,
    Square,
    TriangleUp,
    TriangleDown,
    TriangleLeft,
    TriangleRight,
    Diamond,
    ThinDiamond,
    Pentagon,
    Hexagon,
    Star,
    Plus,
    X,
}

impl MarkerShape {
    /// Parse a marker code. Empty strings and `"None"` mean "no marker".
    pub fn parse(code: &str) -> Result<Option<MarkerShape>, String> {
        let shape = match code {
            "" | " " | "None" | "none" => return Ok(None),
            "o" => MarkerShape::Circle,
            "." => MarkerShape::Point,
            "s" => MarkerShape::Square,
            "^" => MarkerShape::TriangleUp,
            "v" => MarkerShape::TriangleDown,
            "<" => MarkerShape::TriangleLeft,
            ">" => MarkerShape::TriangleRight,
            "D" => MarkerShape::Diamond,
            "d" => MarkerShape::ThinDiamond,
            "p" => MarkerShape::Pentagon,
            "h" | "H" => MarkerShape::Hexagon,
            "*" => MarkerShape::Star,
            "+" | "P" => MarkerShape::Plus,
            "x" | "X" => MarkerShape::X,
            other => return Err(format!("unknown marker '{other}'")),
        };
        Ok(Some(shape))
    }

    /// Whether the marker is drawn as strokes rather than a filled outline.
    pub fn is_stroked(&self) -> bool {
        matches!(self, MarkerShape::Plus | MarkerShape::X)
    }

    /// Outline vertices around the origin for a marker of half-size `s`.
    /// Stroked markers return the end points of their strokes, pairwise.
    pub fn outline(&self, s: i32) -> Vec<(i32, i32)> {
        let regular = |n: usize, r: f64, phase: f64| -> Vec<(i32, i32)> {
            (0..n)
                .map(|k| {
                    let a = phase + k as f64 * std::f64::consts::TAU / n as f64;
                    ((r * a.cos()).round() as i32, (-r * a.sin()).round() as i32)
                })
                .collect()
        };
        let sf = s as f64;
        match self {
            MarkerShape::Circle | MarkerShape::Point => regular(16, sf, 0.0),
            MarkerShape::Square => vec![(-s, -s), (s, -s), (s, s), (-s, s)],
            MarkerShape::TriangleUp => vec![(0, -s), (-s, s), (s, s)],
            MarkerShape::TriangleDown => vec![(0, s), (-s, -s), (s, -s)],
            MarkerShape::TriangleLeft => vec![(-s, 0), (s, -s), (s, s)],
            MarkerShape::TriangleRight => vec![(s, 0), (-s, -s), (-s, s)],
            MarkerShape::Diamond => vec![(0, -s), (-s, 0), (0, s), (s, 0)],
            MarkerShape::ThinDiamond => vec![(0, -s), (-s * 2 / 3, 0), (0, s), (s * 2 / 3, 0)],
            MarkerShape::Pentagon => regular(5, sf, std::f64::consts::FRAC_PI_2),
            MarkerShape::Hexagon => regular(6, sf, std::f64::consts::FRAC_PI_2),
            MarkerShape::Star => (0..10)
                .map(|k| {
                    let r = if k % 2 == 0 { sf } else { sf * 0.45 };
                    let a = std::f64::consts::FRAC_PI_2 + k as f64 * std::f64::consts::PI / 5.0;
                    ((r * a.cos()).round() as i32, (-r * a.sin()).round() as i32)
                })
                .collect(),
            MarkerShape::Plus => vec![(-s, 0), (s, 0), (0, -s), (0, s)],
            MarkerShape::X => vec![(-s, -s), (s, s), (-s, s), (s, -s)],
        }
    }
}

/// Continuous colormaps for heatmaps, sampled by linear interpolation
/// between evenly spaced stops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Colormap {
    pub name: String,
    stops: &'static [u32],
    reversed: bool,
}

const VIRIDIS: &[u32] = &[
    0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e, 0x1f9e89, 0x35b779, 0x6ece58, 0xb5de2b,
    0xfde725,
];
const PLASMA: &[u32] = &[
    0x0d0887, 0x46039f, 0x7201a8, 0x9c179e, 0xbd3786, 0xd8576b, 0xed7953, 0xfb9f3a, 0xfdca26,
    0xf0f921,
];
const INFERNO: &[u32] = &[
    0x000004, 0x1b0c41, 0x4a0c6b, 0x781c6d, 0xa52c60, 0xcf4446, 0xed6925, 0xfb9b06, 0xf7d13d,
    0xfcffa4,
];
const MAGMA: &[u32] = &[
    0x000004, 0x180f3d, 0x440f76, 0x721f81, 0x9e2f7f, 0xcd4071, 0xf1605d, 0xfd9668, 0xfeca8d,
    0xfcfdbf,
];
const CIVIDIS: &[u32] = &[
    0x00224e, 0x123570, 0x3b496c, 0x575d6d, 0x707173, 0x8a8779, 0xa69d75, 0xc4b56c, 0xe4cf5b,
    0xfee838,
];
const COOLWARM: &[u32] = &[
    0x3b4cc0, 0x6f92f3, 0xaac7fd, 0xdddcdc, 0xf7b89c, 0xe7745b, 0xb40426,
];
const BLUES: &[u32] = &[
    0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c, 0x08306b,
];
const REDS: &[u32] = &[
    0xfff5f0, 0xfee0d2, 0xfcbba1, 0xfc9272, 0xfb6a4a, 0xef3b2c, 0xcb181d, 0xa50f15, 0x67000d,
];
const HOT: &[u32] = &[
    0x0b0000, 0x600000, 0xb40000, 0xff0a00, 0xff5e00, 0xffb200, 0xffff0a, 0xffff85, 0xffffff,
];
const GREYS: &[u32] = &[0xffffff, 0x000000];
const GRAY: &[u32] = &[0x000000, 0xffffff];

impl Colormap {
    /// Look up a colormap by name; a `_r` suffix reverses it.
    pub fn parse(name: &str) -> Option<Colormap> {
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (name, false),
        };
        let stops = match base {
            "viridis" => VIRIDIS,
            "plasma" => PLASMA,
            "inferno" => INFERNO,
            "magma" => MAGMA,
            "cividis" => CIVIDIS,
            "coolwarm" => COOLWARM,
            "Blues" => BLUES,
            "Reds" => REDS,
            "hot" => HOT,
            "Greys" => GREYS,
            "gray" | "grey" => GRAY,
            _ => return None,
        };
        Some(Colormap {
            name: name.to_string(),
            stops,
            reversed,
        })
    }

    /// Color at position `t` in `0..=1` (clamped; NaN maps to the low end).
    pub fn sample(&self, t: f64) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = if self.reversed { 1.0 - t } else { t };
        let last = self.stops.len() - 1;
        let pos = t * last as f64;
        let i = (pos.floor() as usize).min(last);
        if i == last {
            return Rgba::hex(self.stops[last]);
        }
        Rgba::hex(self.stops[i]).lerp(Rgba::hex(self.stops[i + 1]), pos - i as f64)
    }

    /// Color for `value` normalized into `[min, max]`.
    pub fn map(&self, value: f64, min: f64, max: f64) -> Rgba {
        if (max - min).abs() < f64::EPSILON {
            return self.sample(0.0);
        }
        self.sample((value - min) / (max - min))
    }
}
