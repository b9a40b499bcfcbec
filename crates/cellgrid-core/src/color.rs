//! Color descriptor resolution
//!
//! Documents encode a single visual color several competing ways: a direct
//! RGB/ARGB code, an index into the legacy palette, or a theme slot plus a
//! tint factor. [`resolve_color`] collapses a descriptor into one canonical
//! 6-hex-digit uppercase string via a strict precedence chain; malformed
//! fields fail closed and fall through rather than erroring.

use ahash::AHashMap;

/// A color descriptor as found on a font, fill, or border edge.
///
/// All fields optional; resolution order is rgb > indexed > theme+tint > auto.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorRef {
    /// Direct code: 6-digit RGB, 8-digit ARGB, or 3-digit shorthand
    pub rgb: Option<String>,
    /// Legacy palette index (0-63)
    pub indexed: Option<u32>,
    /// Theme slot (0-11)
    pub theme: Option<u32>,
    /// Tint factor in [-1.0, 1.0]; negative darkens, positive lightens
    pub tint: f64,
    /// Automatic color flag (resolves to black)
    pub auto: bool,
}

impl ColorRef {
    /// A descriptor with only a direct code set
    pub fn rgb<S: Into<String>>(code: S) -> Self {
        Self {
            rgb: Some(code.into()),
            ..Default::default()
        }
    }

    /// A descriptor with only a palette index set
    pub fn indexed(index: u32) -> Self {
        Self {
            indexed: Some(index),
            ..Default::default()
        }
    }

    /// A descriptor with a theme slot and tint set
    pub fn theme(index: u32, tint: f64) -> Self {
        Self {
            theme: Some(index),
            tint,
            ..Default::default()
        }
    }

    /// True when no field carries any color information
    pub fn is_empty(&self) -> bool {
        self.rgb.is_none() && self.indexed.is_none() && self.theme.is_none() && !self.auto
    }

    fn cache_key(&self) -> ColorKey {
        (
            self.rgb.clone(),
            self.indexed,
            self.theme,
            self.tint.to_bits(),
            self.auto,
        )
    }
}

/// Structured cache key: the tuple of discriminating descriptor fields
type ColorKey = (Option<String>, Option<u32>, Option<u32>, u64, bool);

/// Compute-once cache for resolved descriptors.
///
/// One cache lives per worksheet walk; it is not shared across walks.
#[derive(Debug, Default)]
pub struct ColorCache {
    map: AHashMap<ColorKey, Option<String>>,
}

impl ColorCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached descriptors
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Resolve a descriptor to a canonical `"RRGGBB"` string, if any.
pub fn resolve_color(color: &ColorRef) -> Option<String> {
    // 1. Direct code wins outright when well-formed.
    if let Some(code) = color.rgb.as_deref() {
        if let Some(hex) = normalize_rgb(code) {
            return Some(hex);
        }
        // Malformed code: treat as absent, fall through.
    }

    // 2. Legacy palette index.
    if let Some(index) = color.indexed {
        if let Some(hex) = indexed_to_rgb(index) {
            return Some(hex.to_string());
        }
    }

    // 3. Theme slot + tint.
    if let Some(index) = color.theme {
        if let Some(base) = theme_to_rgb(index) {
            let (r, g, b) = apply_tint(base, color.tint);
            return Some(format!("{:02X}{:02X}{:02X}", r, g, b));
        }
    }

    // 4. Automatic color.
    if color.auto {
        return Some("000000".to_string());
    }

    None
}

/// Resolve through a per-walk cache; identical descriptors compute once.
pub fn resolve_color_cached(color: &ColorRef, cache: &mut ColorCache) -> Option<String> {
    let key = color.cache_key();
    if let Some(hit) = cache.map.get(&key) {
        return hit.clone();
    }
    let resolved = resolve_color(color);
    cache.map.insert(key, resolved.clone());
    resolved
}

/// Normalize a direct code into `"RRGGBB"`.
///
/// 8 digits drop the leading alpha pair, 6 digits pass through, 3-digit
/// shorthand duplicates each digit. Anything else (wrong length, non-hex)
/// yields `None`.
pub fn normalize_rgb(code: &str) -> Option<String> {
    let code = code.trim().trim_start_matches('#');
    if !code.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match code.len() {
        8 => Some(code[2..].to_ascii_uppercase()),
        6 => Some(code.to_ascii_uppercase()),
        3 => {
            let mut out = String::with_capacity(6);
            for c in code.chars() {
                let c = c.to_ascii_uppercase();
                out.push(c);
                out.push(c);
            }
            Some(out)
        }
        _ => None,
    }
}

/// Legacy 0-63 palette lookup; unknown indices yield `None`.
pub fn indexed_to_rgb(index: u32) -> Option<&'static str> {
    // Standard legacy office palette. Indices 0-7 mirror 8-15.
    const PALETTE: [&str; 64] = [
        "000000", "FFFFFF", "FF0000", "00FF00", "0000FF", "FFFF00", "FF00FF", "00FFFF", // 0-7
        "000000", "FFFFFF", "FF0000", "00FF00", "0000FF", "FFFF00", "FF00FF", "00FFFF", // 8-15
        "800000", "008000", "000080", "808000", "800080", "008080", "C0C0C0", "808080", // 16-23
        "9999FF", "993366", "FFFFCC", "CCFFFF", "660066", "FF8080", "0066CC", "CCCCFF", // 24-31
        "000080", "FF00FF", "FFFF00", "00FFFF", "800080", "800000", "008080", "0000FF", // 32-39
        "00CCFF", "CCFFFF", "CCFFCC", "FFFF99", "99CCFF", "FF99CC", "CC99FF", "FFCC99", // 40-47
        "3366FF", "33CCCC", "99CC00", "FFCC00", "FF9900", "FF6600", "666699", "969696", // 48-55
        "003366", "339966", "003300", "333300", "993300", "993366", "333399", "333333", // 56-63
    ];

    PALETTE.get(index as usize).copied()
}

/// Default office theme palette (0-11); unknown slots yield `None`.
///
/// Slot order: background 1, text 1, background 2, text 2, accents 1-6,
/// hyperlink, followed hyperlink.
pub fn theme_to_rgb(index: u32) -> Option<(u8, u8, u8)> {
    match index {
        0 => Some((255, 255, 255)), // Background 1
        1 => Some((0, 0, 0)),       // Text 1
        2 => Some((238, 236, 225)), // Background 2
        3 => Some((31, 73, 125)),   // Text 2
        4 => Some((79, 129, 189)),  // Accent 1
        5 => Some((192, 80, 77)),   // Accent 2
        6 => Some((155, 187, 89)),  // Accent 3
        7 => Some((128, 100, 162)), // Accent 4
        8 => Some((75, 172, 198)),  // Accent 5
        9 => Some((247, 150, 70)),  // Accent 6
        10 => Some((0, 0, 255)),    // Hyperlink
        11 => Some((128, 0, 128)),  // Followed hyperlink
        _ => None,
    }
}

/// Apply a tint factor to a base color.
///
/// Negative tints scale each channel toward black, positive tints blend
/// toward white; the result is clamped to [0, 255].
pub fn apply_tint(base: (u8, u8, u8), tint: f64) -> (u8, u8, u8) {
    let apply = |c: u8| -> u8 {
        let c = c as f64;
        let result = if tint < 0.0 {
            c * (1.0 + tint)
        } else {
            c + (255.0 - c) * tint
        };
        result.round().clamp(0.0, 255.0) as u8
    };

    (apply(base.0), apply(base.1), apply(base.2))
}
