//! Pan and zoom.
//!
//! Layouts are stored in unscaled chart coordinates. The viewport maps them
//! to screen coordinates at render time and maps pointer positions back
//! before hit-testing:
//!
//! ```text
//! screen = chart * scale + translate
//! chart  = (screen - translate) / scale
//! ```

use log::trace;

use orgchart_core::geometry::Point;

use crate::config::ViewportConfig;

/// Current pan offset and zoom scale.
///
/// # Examples
///
/// ```
/// # use orgchart::{config::ViewportConfig, viewport::Viewport};
/// # use orgchart_core::geometry::Point;
/// let mut viewport = Viewport::new(&ViewportConfig::default());
/// viewport.pan_by(Point::new(100.0, 50.0));
/// viewport.zoom_in();
///
/// let screen = Point::new(220.0, 170.0);
/// let chart = viewport.screen_to_diagram(screen);
/// assert!((chart.x() - 100.0).abs() < 1e-4);
/// assert!((chart.y() - 100.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    translate: Point,
    scale: f32,
    min_scale: f32,
    max_scale: f32,
    zoom_factor: f32,
}

impl Viewport {
    /// Creates an identity viewport with the configured zoom limits.
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            translate: Point::default(),
            scale: 1.0,
            min_scale: config.min_scale(),
            max_scale: config.max_scale(),
            zoom_factor: config.zoom_factor(),
        }
    }

    pub fn translate(&self) -> Point {
        self.translate
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Converts a screen point to chart coordinates.
    pub fn screen_to_diagram(&self, screen: Point) -> Point {
        screen.sub_point(self.translate).scale(1.0 / self.scale)
    }

    /// Converts a chart point to screen coordinates.
    pub fn diagram_to_screen(&self, chart: Point) -> Point {
        chart.scale(self.scale).add_point(self.translate)
    }

    /// Moves the chart by `delta` screen pixels.
    pub fn pan_by(&mut self, delta: Point) {
        self.translate = self.translate.add_point(delta);
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale * self.zoom_factor);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale / self.zoom_factor);
    }

    /// Sets the scale, clamped to the configured limits.
    /// The upper limit wins when the limits cross.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(self.min_scale).min(self.max_scale);
        trace!(scale = self.scale; "Viewport scale changed");
    }

    /// Back to no pan and scale 1.
    pub fn reset(&mut self) {
        self.translate = Point::default();
        self.scale = 1.0;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&ViewportConfig::default())
    }
}
