//! Header-level image dimension sniffing
//!
//! When the document carries no usable size metadata for an embedded picture,
//! the raw byte stream is inspected: PNG and GIF store dimensions at fixed
//! header offsets, JPEG requires a walk over its marker segments. No pixel
//! data is decoded.

/// Fallback edge length (pixels) when no dimension can be determined
pub const PLACEHOLDER_PX: u32 = 64;

/// Image container formats this module recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Short lowercase tag for serialization ("png", "jpeg", "gif")
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
        }
    }
}

/// Sniff `(width, height)` in pixels from a raw image byte stream.
pub fn sniff_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    sniff(bytes).map(|(_, w, h)| (w, h))
}

/// Sniff the container format along with `(width, height)`.
pub fn sniff(bytes: &[u8]) -> Option<(ImageFormat, u32, u32)> {
    if let Some((w, h)) = png_dimensions(bytes) {
        return Some((ImageFormat::Png, w, h));
    }
    if let Some((w, h)) = gif_dimensions(bytes) {
        return Some((ImageFormat::Gif, w, h));
    }
    if let Some((w, h)) = jpeg_dimensions(bytes) {
        return Some((ImageFormat::Jpeg, w, h));
    }
    None
}

/// Parse width/height from the PNG IHDR chunk without decoding pixel data.
fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    const SIG: &[u8; 8] = b"\x89PNG\r\n\x1a\n";
    if bytes.len() < 24 {
        return None;
    }
    if bytes.get(0..8)? != SIG {
        return None;
    }
    if bytes.get(12..16)? != b"IHDR" {
        return None;
    }
    let w = u32::from_be_bytes(bytes.get(16..20)?.try_into().ok()?);
    let h = u32::from_be_bytes(bytes.get(20..24)?.try_into().ok()?);
    Some((w, h))
}

/// GIF87a/GIF89a logical screen size, little-endian at fixed offsets.
fn gif_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() < 10 {
        return None;
    }
    let header = bytes.get(0..6)?;
    if header != b"GIF87a" && header != b"GIF89a" {
        return None;
    }
    let w = u32::from(u16::from_le_bytes([bytes[6], bytes[7]]));
    let h = u32::from(u16::from_le_bytes([bytes[8], bytes[9]]));
    Some((w, h))
}

/// Walk JPEG marker segments until a start-of-frame carries the frame size.
fn jpeg_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    // SOI marker
    if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != 0xD8 {
        return None;
    }

    let mut pos = 2usize;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            // Lost sync; resync by scanning for the next marker byte.
            pos += 1;
            continue;
        }
        let marker = bytes[pos + 1];
        pos += 2;

        match marker {
            // Padding and restart markers carry no length.
            0xFF => continue,
            0x01 | 0xD0..=0xD7 => continue,
            // Start of scan / end of image: no frame header was found.
            0xDA | 0xD9 => return None,
            _ => {}
        }

        if pos + 2 > bytes.len() {
            return None;
        }
        let seg_len = u16::from_be_bytes([bytes[pos], bytes[pos + 1]]) as usize;
        if seg_len < 2 {
            return None;
        }

        // SOF0-SOF15, excluding DHT (C4), JPG (C8), DAC (CC).
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            // Segment payload: length(2) precision(1) height(2) width(2) ...
            if pos + 7 > bytes.len() {
                return None;
            }
            let h = u32::from(u16::from_be_bytes([bytes[pos + 3], bytes[pos + 4]]));
            let w = u32::from(u16::from_be_bytes([bytes[pos + 5], bytes[pos + 6]]));
            return Some((w, h));
        }

        pos += seg_len;
    }

    None
}
