//! Text measurement for unit and contact labels.
//!
//! Box widths of leaf units depend on the measured width of their contact
//! labels. Measurement goes through the [`TextMeasure`] trait so layout can
//! run with real font shaping ([`CosmicTextMeasure`]) or with a fixed
//! per-character estimate ([`EstimatedTextMeasure`]) where no fonts are
//! available. Layout never fails because measurement is unavailable.
//!
//! ```
//! # use orgchart_core::text::{EstimatedTextMeasure, TextMeasure, TextStyle};
//! let measure = EstimatedTextMeasure::default();
//! let style = TextStyle::default();
//! assert!(measure.text_width("Yamada Taro", &style) > 0.0);
//! ```

use std::{
    fmt,
    sync::{Arc, Mutex, OnceLock},
};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{info, warn};

/// Font settings used to measure a label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    font_family: String,
    font_size: u16,
}

impl TextStyle {
    /// Creates a style with the given family and size in pixels.
    pub fn new(font_family: impl Into<String>, font_size: u16) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }
}

impl Default for TextStyle {
    /// 12px Arial, the font contact labels are drawn with.
    fn default() -> Self {
        Self::new("Arial", 12)
    }
}

/// Measures the rendered width of a single-line label.
pub trait TextMeasure: fmt::Debug {
    /// Returns the width of `text` in logical pixels.
    fn text_width(&self, text: &str, style: &TextStyle) -> f32;
}

/// Fixed-width estimate: every character advances by
/// `font_size * char_width_ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedTextMeasure {
    char_width_ratio: f32,
}

impl EstimatedTextMeasure {
    pub fn new(char_width_ratio: f32) -> Self {
        Self { char_width_ratio }
    }
}

impl Default for EstimatedTextMeasure {
    fn default() -> Self {
        Self::new(0.55)
    }
}

impl TextMeasure for EstimatedTextMeasure {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        text.chars().count() as f32 * f32::from(style.font_size()) * self.char_width_ratio
    }
}

/// Font-shaped measurement backed by cosmic-text.
///
/// All instances share one lazily created `FontSystem`, which is expensive
/// to build. When shaping produces no layout runs (for instance when no
/// system fonts are installed) the width falls back to
/// [`EstimatedTextMeasure`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CosmicTextMeasure {
    fallback: EstimatedTextMeasure,
}

impl CosmicTextMeasure {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .measure_width(text, style)
            .unwrap_or_else(|| self.fallback.text_width(text, style))
    }
}

/// Owns the shared `FontSystem` used for shaping.
struct TextManager {
    font_system: Arc<Mutex<FontSystem>>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Arc::new(Mutex::new(FontSystem::new())),
        }
    }

    /// Shapes `text` and returns the x extent of its widest run, or `None`
    /// if shaping produced nothing to measure.
    fn measure_width(&self, text: &str, style: &TextStyle) -> Option<f32> {
        let Ok(mut font_system) = self.font_system.lock() else {
            warn!("FontSystem lock poisoned, using estimated text width");
            return None;
        };

        let font_size_px = f32::from(style.font_size());
        let metrics = Metrics::new(font_size_px, font_size_px * 1.15);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        let attrs = Attrs::new().family(Family::Name(style.font_family()));

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|glyph| glyph.x + glyph.w))
            .reduce(f32::max)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();
