//! Dominant-color extraction by sparse pixel sampling and quantization.
//!
//! Every 10th pixel (row-major) is read; translucent pixels are skipped and
//! each channel is snapped to the nearest multiple of 32. Buckets holding
//! more than 1% of the opaque samples become palette entries. The result
//! is never empty: undecodable input yields [`default_palette`].

use std::collections::HashMap;

use tracing::{debug, warn};

use artlens_core::defaults;
use artlens_core::{ColorSample, Hsl, Rgb};

/// Fallback palette used when the image cannot be decoded.
const DEFAULT_PALETTE: [(Rgb, f64); 6] = [
    (Rgb::new(139, 69, 19), 25.0),
    (Rgb::new(70, 130, 180), 20.0),
    (Rgb::new(222, 184, 135), 18.0),
    (Rgb::new(47, 79, 79), 15.0),
    (Rgb::new(245, 245, 220), 12.0),
    (Rgb::new(128, 0, 32), 10.0),
];

/// The fixed six-entry palette returned on decode failure.
pub fn default_palette() -> Vec<ColorSample> {
    DEFAULT_PALETTE
        .iter()
        .map(|&(rgb, pct)| sample_from_rgb(rgb, pct))
        .collect()
}

/// Extract up to six dominant colors, most frequent first.
pub fn extract_palette(bytes: &[u8]) -> Vec<ColorSample> {
    sample_palette(bytes).unwrap_or_else(default_palette)
}

/// Like [`extract_palette`], but `None` when no pixels could be sampled.
pub fn sample_palette(bytes: &[u8]) -> Option<Vec<ColorSample>> {
    let image = match image::load_from_memory(bytes) {
        Ok(image) => image.to_rgba8(),
        Err(e) => {
            warn!(
                component = "palette",
                error = %e,
                image_bytes = bytes.len(),
                "Image decode failed"
            );
            return None;
        }
    };

    let mut buckets: HashMap<Rgb, usize> = HashMap::new();
    let mut opaque = 0usize;
    for pixel in image.pixels().step_by(defaults::PIXEL_STRIDE) {
        let [r, g, b, a] = pixel.0;
        if a < defaults::ALPHA_THRESHOLD {
            continue;
        }
        opaque += 1;
        *buckets
            .entry(Rgb::new(quantize(r), quantize(g), quantize(b)))
            .or_insert(0) += 1;
    }

    if opaque == 0 {
        debug!(component = "palette", "No opaque pixels sampled");
        return None;
    }

    let mut samples: Vec<ColorSample> = buckets
        .into_iter()
        .map(|(rgb, count)| sample_from_rgb(rgb, count as f64 / opaque as f64 * 100.0))
        .filter(|s| s.percentage > defaults::MIN_COLOR_PERCENTAGE)
        .collect();

    if samples.is_empty() {
        return None;
    }

    samples.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.hex.cmp(&b.hex))
    });
    samples.truncate(defaults::MAX_PALETTE_COLORS);

    debug!(
        component = "palette",
        sampled = opaque,
        result_count = samples.len(),
        "Palette extracted"
    );
    Some(samples)
}

/// Snap a channel to the nearest multiple of the quantization step, capped at 255.
fn quantize(channel: u8) -> u8 {
    let step = defaults::QUANTIZATION_STEP as f64;
    ((channel as f64 / step).round() * step).min(255.0) as u8
}

/// Build a palette entry, deriving hex, HSL and name.
pub fn sample_from_rgb(rgb: Rgb, percentage: f64) -> ColorSample {
    let hsl = rgb_to_hsl(rgb);
    ColorSample {
        hex: rgb.hex(),
        rgb,
        hsl,
        percentage,
        name: color_name(&hsl).to_string(),
    }
}

/// Standard RGB to HSL conversion. Hue is rounded modulo 360; saturation
/// and lightness are rounded percentages.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f64::EPSILON {
        return Hsl {
            h: 0,
            s: 0,
            l: (l * 100.0).round() as u8,
        };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let sector = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    let h = sector * 60.0;

    Hsl {
        h: (h.round() as u16) % 360,
        s: (s * 100.0).round() as u8,
        l: (l * 100.0).round() as u8,
    }
}

/// Human color name from HSL.
pub fn color_name(hsl: &Hsl) -> &'static str {
    if hsl.s < defaults::ACHROMATIC_SATURATION {
        return if hsl.l < 20 {
            "black"
        } else if hsl.l > 80 {
            "white"
        } else {
            "gray"
        };
    }
    match hsl.h {
        h if !(15..345).contains(&h) => "red",
        h if h < 45 => "orange",
        h if h < 70 => "yellow",
        h if h < 165 => "green",
        h if h < 195 => "cyan",
        h if h < 255 => "blue",
        h if h < 290 => "purple",
        _ => "pink",
    }
}

/// Parse a vision color descriptor such as `rgb(100,150,200)`.
pub fn parse_rgb_descriptor(descriptor: &str) -> Option<Rgb> {
    let inner = descriptor
        .trim()
        .strip_prefix("rgb(")?
        .strip_suffix(')')?;
    let mut channels = inner.split(',').map(|c| c.trim().parse::<u8>());
    let rgb = Rgb::new(
        channels.next()?.ok()?,
        channels.next()?.ok()?,
        channels.next()?.ok()?,
    );
    channels.next().is_none().then_some(rgb)
}
