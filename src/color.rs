use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` soft, visually distinct colours using evenly spaced hues.
pub fn pastel_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            // Start at a blue hue so two classes get blue / orange.
            let hue = (210.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.7, 0.72);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: class label → Color32
// ---------------------------------------------------------------------------

/// Maps class labels to distinct colours, shared by every chart so a class
/// keeps its colour when the user switches features.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the class labels, in the given order.
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let palette = pastel_palette(labels.len());
        let mapping = labels
            .iter()
            .zip(palette)
            .map(|(label, c)| (label.as_ref().to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a class label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_label_gets_its_own_color() {
        let map = ColorMap::new(&["Extrovert", "Introvert"]);
        assert_ne!(map.color_for("Extrovert"), map.color_for("Introvert"));
        assert_eq!(map.color_for("Ambivert"), Color32::GRAY);
    }

    #[test]
    fn empty_palette() {
        assert!(pastel_palette(0).is_empty());
        assert_eq!(pastel_palette(3).len(), 3);
    }
}
