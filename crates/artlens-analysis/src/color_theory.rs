//! Color-theory reading of a palette: harmony, temperature, mood.
//!
//! All functions are pure; thresholds are on the HSL scale produced by
//! [`crate::palette::rgb_to_hsl`].

use artlens_core::defaults;
use artlens_core::{ColorAnalysis, ColorHarmony, ColorMood, ColorSample, ColorTemperature};

/// Smallest arc of the hue circle covering every hue, so 355 and 5 are
/// 10 degrees apart.
pub fn hue_arc(hues: &[u16]) -> u16 {
    let mut sorted: Vec<u16> = hues.iter().map(|h| h % 360).collect();
    sorted.sort_unstable();
    let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
        return 0;
    };
    let wrap_gap = 360 - last + first;
    let largest_gap = sorted
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold(wrap_gap, u16::max);
    360 - largest_gap
}

/// Classify hue spread by [`hue_arc`].
pub fn classify_harmony(hues: &[u16]) -> ColorHarmony {
    if hues.len() < 2 {
        return ColorHarmony::Monochromatic;
    }
    match hue_arc(hues) {
        r if r < 30 => ColorHarmony::Monochromatic,
        r if r <= 120 => ColorHarmony::Analogous,
        r if r < 180 => ColorHarmony::Complementary,
        _ => ColorHarmony::Triadic,
    }
}

fn is_chromatic(sample: &ColorSample) -> bool {
    sample.hsl.s >= defaults::ACHROMATIC_SATURATION
}

pub fn is_warm_hue(h: u16) -> bool {
    h < 90 || h >= 330
}

pub fn is_cool_hue(h: u16) -> bool {
    (150..=270).contains(&h)
}

/// Warm versus cool by count of chromatic samples.
pub fn classify_temperature(samples: &[ColorSample]) -> ColorTemperature {
    let (warm, cool) = samples
        .iter()
        .filter(|s| is_chromatic(s))
        .fold((0usize, 0usize), |(warm, cool), s| {
            (
                warm + usize::from(is_warm_hue(s.hsl.h)),
                cool + usize::from(is_cool_hue(s.hsl.h)),
            )
        });
    match warm.cmp(&cool) {
        std::cmp::Ordering::Greater => ColorTemperature::Warm,
        std::cmp::Ordering::Less => ColorTemperature::Cool,
        std::cmp::Ordering::Equal => ColorTemperature::Balanced,
    }
}

pub fn classify_mood(avg_saturation: f64, avg_lightness: f64) -> ColorMood {
    if avg_lightness < 35.0 {
        ColorMood::Dramatic
    } else if avg_saturation > 60.0 && avg_lightness >= 50.0 {
        ColorMood::Energetic
    } else if avg_saturation < 30.0 {
        ColorMood::Calm
    } else if avg_lightness > 65.0 {
        ColorMood::Serene
    } else {
        ColorMood::Balanced
    }
}

/// Teaching notes triggered by the palette's measurements.
pub fn color_insights(
    avg_saturation: f64,
    avg_lightness: f64,
    harmony: ColorHarmony,
    temperature: ColorTemperature,
    color_count: usize,
) -> Vec<String> {
    let mut insights = Vec::new();
    if avg_saturation > 60.0 {
        insights.push(
            "High saturation gives the palette a vivid intensity that commands attention."
                .to_string(),
        );
    }
    if avg_lightness < 35.0 {
        insights.push(
            "Deep values point to chiaroscuro, the modelling of form through strong light and shadow."
                .to_string(),
        );
    }
    if avg_lightness > 70.0 {
        insights.push("A high-key palette fills the work with luminosity and air.".to_string());
    }
    match harmony {
        ColorHarmony::Complementary => insights.push(
            "Complementary hues set up a visual contrast that makes each color appear stronger."
                .to_string(),
        ),
        ColorHarmony::Monochromatic => insights.push(
            "A narrow range of hues lends the composition tonal unity.".to_string(),
        ),
        _ => {}
    }
    match temperature {
        ColorTemperature::Warm => insights.push(
            "Warm hues advance toward the viewer and suggest energy or intimacy.".to_string(),
        ),
        ColorTemperature::Cool => insights.push(
            "Cool hues recede into space and evoke calm or distance.".to_string(),
        ),
        ColorTemperature::Balanced => {}
    }
    if color_count <= 2 {
        insights.push(
            "A restrained palette of few colors shifts attention to value and form.".to_string(),
        );
    }
    insights
}

/// Full color-theory reading of `samples`.
pub fn analyze_colors(samples: &[ColorSample]) -> ColorAnalysis {
    let count = samples.len().max(1) as f64;
    let average_saturation = samples.iter().map(|s| s.hsl.s as f64).sum::<f64>() / count;
    let average_lightness = samples.iter().map(|s| s.hsl.l as f64).sum::<f64>() / count;

    let hues: Vec<u16> = samples
        .iter()
        .filter(|s| is_chromatic(s))
        .map(|s| s.hsl.h)
        .collect();
    let harmony = classify_harmony(&hues);
    let temperature = classify_temperature(samples);
    let mood = classify_mood(average_saturation, average_lightness);

    ColorAnalysis {
        dominant_colors: samples.to_vec(),
        harmony,
        temperature,
        mood,
        average_saturation,
        average_lightness,
        insights: color_insights(
            average_saturation,
            average_lightness,
            harmony,
            temperature,
            samples.len(),
        ),
    }
}
