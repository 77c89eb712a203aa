//! Configuration types for chart layout and interaction.
//!
//! All types implement [`serde::Deserialize`] and fall back to the built-in
//! defaults for any field that is not set, so a configuration file only
//! needs to name what it overrides.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Box sizes, gaps and text measurement used by the layout engine.
//! - [`InteractionConfig`] - Drag threshold, hit margin and order-key arithmetic.
//! - [`ViewportConfig`] - Zoom limits and step.
//! - [`StyleConfig`] - Fill colors.
//!
//! # Example
//!
//! ```
//! # use orgchart::config::AppConfig;
//! let config: AppConfig = toml::from_str(r#"
//!     [layout]
//!     horizontal_gap = 200.0
//!
//!     [interaction]
//!     drag_threshold = 8.0
//! "#).unwrap();
//!
//! assert_eq!(config.layout().horizontal_gap(), 200.0);
//! assert_eq!(config.layout().vertical_gap(), 10.0);
//! assert_eq!(config.interaction().drag_threshold(), 8.0);
//! ```

use serde::Deserialize;

use orgchart_core::{
    color::{Color, LevelPalette},
    text::TextStyle,
};

/// Top-level configuration root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Pointer interaction configuration section.
    #[serde(default)]
    interaction: InteractionConfig,

    /// Viewport configuration section.
    #[serde(default)]
    viewport: ViewportConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        layout: LayoutConfig,
        interaction: InteractionConfig,
        viewport: ViewportConfig,
        style: StyleConfig,
    ) -> Self {
        Self {
            layout,
            interaction,
            viewport,
            style,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the interaction configuration.
    pub fn interaction(&self) -> &InteractionConfig {
        &self.interaction
    }

    /// Returns the viewport configuration.
    pub fn viewport(&self) -> &ViewportConfig {
        &self.viewport
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Replaces the layout section (builder style).
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Checks the numeric limits of the interaction and viewport sections.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        self.interaction.validate()?;
        self.viewport.validate()
    }
}

fn require_positive(section: &str, field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("`{section}.{field}` must be a finite number above 0, got {value}"))
    }
}

fn require_non_negative(section: &str, field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("`{section}.{field}` must be a finite number of at least 0, got {value}"))
    }
}

/// How label widths are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMeasureKind {
    /// Font shaping with cosmic-text, falling back to the estimate.
    #[default]
    Cosmic,
    /// Fixed per-character width estimate.
    Estimate,
}

/// Box geometry and spacing used by the layout engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    horizontal_gap: f32,
    vertical_gap: f32,
    unit_width: f32,
    leaf_gap: f32,
    leaf_row_extra: f32,
    box_top_padding: f32,
    leaf_row_height: f32,
    leaf_row_gap: f32,
    leaf_inset: f32,
    detached_width: f32,
    detached_height: f32,
    detached_gap: f32,
    detached_band_y: f32,
    font_family: String,
    font_size: u16,
    text_measure: TextMeasureKind,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_gap: 160.0,
            vertical_gap: 10.0,
            unit_width: 150.0,
            leaf_gap: 15.0,
            leaf_row_extra: 50.0,
            box_top_padding: 40.0,
            leaf_row_height: 20.0,
            leaf_row_gap: 5.0,
            leaf_inset: 10.0,
            detached_width: 120.0,
            detached_height: 50.0,
            detached_gap: 20.0,
            detached_band_y: 200.0,
            font_family: "Arial".to_string(),
            font_size: 12,
            text_measure: TextMeasureKind::default(),
        }
    }
}

impl LayoutConfig {
    /// Horizontal distance between a parent's left edge and its children's.
    pub fn horizontal_gap(&self) -> f32 {
        self.horizontal_gap
    }

    /// Vertical space between consecutive sibling subtrees.
    pub fn vertical_gap(&self) -> f32 {
        self.vertical_gap
    }

    /// Width of non-leaf units, and the minimum width of leaf units.
    pub fn unit_width(&self) -> f32 {
        self.unit_width
    }

    /// Horizontal gap between leaf labels of a leaf unit.
    pub fn leaf_gap(&self) -> f32 {
        self.leaf_gap
    }

    /// Extra width added around the leaf label row of a leaf unit.
    pub fn leaf_row_extra(&self) -> f32 {
        self.leaf_row_extra
    }

    /// Space above the first leaf row, reserved for the unit name.
    pub fn box_top_padding(&self) -> f32 {
        self.box_top_padding
    }

    pub fn leaf_row_height(&self) -> f32 {
        self.leaf_row_height
    }

    pub fn leaf_row_gap(&self) -> f32 {
        self.leaf_row_gap
    }

    /// Horizontal inset of stacked leaf slots inside a non-leaf unit.
    pub fn leaf_inset(&self) -> f32 {
        self.leaf_inset
    }

    pub fn detached_width(&self) -> f32 {
        self.detached_width
    }

    pub fn detached_height(&self) -> f32 {
        self.detached_height
    }

    pub fn detached_gap(&self) -> f32 {
        self.detached_gap
    }

    /// Y coordinate of the band holding unplaced units.
    pub fn detached_band_y(&self) -> f32 {
        self.detached_band_y
    }

    /// Font used to measure leaf labels.
    pub fn text_style(&self) -> TextStyle {
        TextStyle::new(self.font_family.clone(), self.font_size)
    }

    pub fn text_measure(&self) -> TextMeasureKind {
        self.text_measure
    }

    /// Selects the text measurement backend (builder style).
    pub fn with_text_measure(mut self, text_measure: TextMeasureKind) -> Self {
        self.text_measure = text_measure;
        self
    }
}

/// Pointer interaction and order-key settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    drag_threshold: f32,
    hit_margin: f32,
    parent_zone_ratio: f32,
    order_increment: f64,
    insert_offset: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
            hit_margin: 50.0,
            parent_zone_ratio: 0.75,
            order_increment: 10.0,
            insert_offset: 1.0,
        }
    }
}

impl InteractionConfig {
    /// Screen distance the pointer must travel before a press becomes a drag.
    pub fn drag_threshold(&self) -> f32 {
        self.drag_threshold
    }

    /// Margin added around unit boxes when hit-testing drop targets.
    pub fn hit_margin(&self) -> f32 {
        self.hit_margin
    }

    /// Fraction of a target's width left of the "drop as child" zone.
    pub fn parent_zone_ratio(&self) -> f32 {
        self.parent_zone_ratio
    }

    /// Step used when appending under a parent and when renumbering.
    pub fn order_increment(&self) -> f64 {
        self.order_increment
    }

    /// Offset from the target's key for before/after inserts.
    pub fn insert_offset(&self) -> f64 {
        self.insert_offset
    }

    /// Order keys must keep increasing under renumbering, and the parent
    /// zone must fall inside the target box.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        require_non_negative("interaction", "drag_threshold", self.drag_threshold.into())?;
        require_non_negative("interaction", "hit_margin", self.hit_margin.into())?;
        require_positive("interaction", "order_increment", self.order_increment)?;
        require_positive("interaction", "insert_offset", self.insert_offset)?;
        if !(0.0..=1.0).contains(&self.parent_zone_ratio) {
            return Err(format!(
                "`interaction.parent_zone_ratio` must be within [0, 1], got {}",
                self.parent_zone_ratio
            ));
        }
        Ok(())
    }
}

/// Zoom limits for the viewport.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    min_scale: f32,
    max_scale: f32,
    zoom_factor: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 5.0,
            zoom_factor: 1.2,
        }
    }
}

impl ViewportConfig {
    pub fn min_scale(&self) -> f32 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f32 {
        self.max_scale
    }

    /// Multiplier applied per zoom step.
    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    /// # Errors
    ///
    /// Returns a message when a limit is not a positive number or when
    /// `min_scale` exceeds `max_scale`.
    pub fn validate(&self) -> Result<(), String> {
        require_positive("viewport", "min_scale", self.min_scale.into())?;
        require_positive("viewport", "max_scale", self.max_scale.into())?;
        require_positive("viewport", "zoom_factor", self.zoom_factor.into())?;
        if self.min_scale > self.max_scale {
            return Err(format!(
                "`viewport.min_scale` ({}) is above `viewport.max_scale` ({})",
                self.min_scale, self.max_scale
            ));
        }
        Ok(())
    }
}

/// Fill colors, as CSS color strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    level_colors: Vec<String>,
    neutral_color: String,
    detached_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            level_colors: ["#fff", "#cce0ff", "#99c2ff", "#66a3ff", "#3385ff", "#0033ff"]
                .into_iter()
                .map(String::from)
                .collect(),
            neutral_color: "#fff".to_string(),
            detached_color: "#ffe".to_string(),
        }
    }
}

impl StyleConfig {
    /// Returns the parsed contact-level palette.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured color cannot be parsed.
    pub fn palette(&self) -> Result<LevelPalette, String> {
        LevelPalette::parse(&self.level_colors, &self.neutral_color)
            .map_err(|err| format!("Invalid palette color in config: {err}"))
    }

    /// Returns the parsed fill color of unplaced units.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color cannot be parsed.
    pub fn detached_color(&self) -> Result<Color, String> {
        Color::new(&self.detached_color)
            .map_err(|err| format!("Invalid detached color in config: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout().horizontal_gap(), 160.0);
        assert_eq!(config.layout().unit_width(), 150.0);
        assert_eq!(config.interaction().drag_threshold(), 5.0);
        assert_eq!(config.interaction().parent_zone_ratio(), 0.75);
        assert_eq!(config.viewport().max_scale(), 5.0);
        assert!(config.style().palette().is_ok());
        assert!(config.style().detached_color().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r##"
            [layout]
            text_measure = "estimate"
            font_size = 14

            [style]
            neutral_color = "#eee"
            "##,
        )
        .unwrap();

        assert_eq!(config.layout().text_measure(), TextMeasureKind::Estimate);
        assert_eq!(config.layout().text_style().font_size(), 14);
        assert_eq!(config.layout().box_top_padding(), 40.0);
        assert_eq!(
            config.style().palette().unwrap().neutral(),
            Color::new("#eee").unwrap()
        );
    }

    #[test]
    fn test_invalid_style_color() {
        let config: AppConfig = toml::from_str(
            r#"
            [style]
            detached_color = "definitely-not-a-color"
            "#,
        )
        .unwrap();
        assert!(config.style().detached_color().is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_zoom_limits_rejected() {
        let config: AppConfig = toml::from_str(
            r#"
            [viewport]
            min_scale = 5.0
            max_scale = 1.0
            "#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("min_scale"), "{err}");
    }

    #[test]
    fn test_non_positive_viewport_values_rejected() {
        for section in [
            "[viewport]\nmin_scale = 0.0\n",
            "[viewport]\nmax_scale = -2.0\n",
            "[viewport]\nzoom_factor = 0.0\n",
            "[viewport]\nmin_scale = nan\n",
        ] {
            let config: AppConfig = toml::from_str(section).unwrap();
            assert!(config.validate().is_err(), "{section}");
        }
    }

    #[test]
    fn test_order_arithmetic_must_be_positive() {
        for section in [
            "[interaction]\norder_increment = 0.0\n",
            "[interaction]\norder_increment = -10.0\n",
            "[interaction]\ninsert_offset = 0.0\n",
            "[interaction]\ninsert_offset = -1.0\n",
            "[interaction]\ninsert_offset = inf\n",
        ] {
            let config: AppConfig = toml::from_str(section).unwrap();
            let err = config.validate().unwrap_err();
            assert!(err.starts_with("`interaction."), "{err}");
        }
    }

    #[test]
    fn test_parent_zone_ratio_range() {
        let config: AppConfig = toml::from_str("[interaction]\nparent_zone_ratio = 1.5\n").unwrap();
        assert!(config.validate().unwrap_err().contains("parent_zone_ratio"));

        let config: AppConfig = toml::from_str("[interaction]\nparent_zone_ratio = 1.0\n").unwrap();
        assert!(config.validate().is_ok());
    }
}
