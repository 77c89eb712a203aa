//! Color handling for organization charts
//!
//! [`Color`] wraps `DynamicColor` from the color crate. [`LevelPalette`]
//! maps the average contact level of a unit to its fill color.

use std::str::FromStr;

use color::DynamicColor;
use serde::{Serialize, Serializer};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a CSS color string such as "#ff0000",
    /// "rgb(255, 0, 0)" or "red".
    ///
    /// # Examples
    ///
    /// ```
    /// use orgchart_core::color::Color;
    ///
    /// let light_blue = Color::new("#cce0ff").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("white").expect("'white' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fill colors indexed by the floored average contact level of a unit.
///
/// Level `n` maps to `levels[n]`. Units without contacts, and averages
/// outside the palette, get the neutral color.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelPalette {
    levels: Vec<Color>,
    neutral: Color,
}

impl LevelPalette {
    /// Creates a palette from per-level colors and a neutral fallback.
    pub fn new(levels: Vec<Color>, neutral: Color) -> Self {
        Self { levels, neutral }
    }

    /// Parses a palette from CSS color strings.
    ///
    /// # Errors
    ///
    /// Returns the first color string that fails to parse.
    pub fn parse<S: AsRef<str>>(levels: &[S], neutral: &str) -> Result<Self, String> {
        let levels = levels
            .iter()
            .map(|level| Color::new(level.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(levels, Color::new(neutral)?))
    }

    /// Returns the neutral color.
    pub fn neutral(&self) -> Color {
        self.neutral
    }

    /// Returns the color for an exact level.
    pub fn for_level(&self, level: i64) -> Color {
        usize::try_from(level)
            .ok()
            .and_then(|idx| self.levels.get(idx).copied())
            .unwrap_or(self.neutral)
    }

    /// Returns the color for the floored mean of `levels`.
    pub fn for_average<I>(&self, levels: I) -> Color
    where
        I: IntoIterator<Item = i32>,
    {
        let (sum, count) = levels
            .into_iter()
            .fold((0i64, 0i64), |(sum, count), level| {
                (sum + i64::from(level), count + 1)
            });
        if count == 0 {
            return self.neutral;
        }
        self.for_level(sum.div_euclid(count))
    }
}

impl Default for LevelPalette {
    fn default() -> Self {
        Self::parse(
            &["#fff", "#cce0ff", "#99c2ff", "#66a3ff", "#3385ff", "#0033ff"],
            "#fff",
        )
        .expect("default palette colors are valid CSS colors")
    }
}
