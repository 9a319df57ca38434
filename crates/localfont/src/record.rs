//! Per-font processing state

use std::fmt;

use localfont_css::{StylesheetInfo, subset_ranges, templates};

use crate::Error;

/// Opaque identifier of a font slot, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(u64);

impl FontId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font-{}", self.0)
    }
}

/// A variable-font design axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Weight,
    Width,
    Slant,
}

impl Axis {
    /// OpenType axis tag
    pub fn tag(self) -> &'static str {
        match self {
            Axis::Weight => "wght",
            Axis::Width => "wdth",
            Axis::Slant => "slnt",
        }
    }

    /// Accepted value range (inclusive)
    pub fn range(self) -> (f32, f32) {
        match self {
            Axis::Weight => (100.0, 900.0),
            Axis::Width => (50.0, 150.0),
            Axis::Slant => (-90.0, 90.0),
        }
    }
}

/// Current values of the variable-font axes. Unset axes use the font default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VariableAxes {
    weight: Option<f32>,
    width: Option<f32>,
    slant: Option<f32>,
}

impl VariableAxes {
    /// Initial values after a variable font is parsed
    pub fn initial() -> Self {
        Self {
            weight: Some(400.0),
            ..Self::default()
        }
    }

    pub fn get(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Weight => self.weight,
            Axis::Width => self.width,
            Axis::Slant => self.slant,
        }
    }

    /// Set one axis, rejecting values outside its range
    pub fn with(mut self, axis: Axis, value: f32) -> Result<Self, Error> {
        let (min, max) = axis.range();
        if !value.is_finite() || value < min || value > max {
            return Err(Error::input(format!(
                "{} must be between {min} and {max}, got {value}",
                axis.tag()
            )));
        }
        match axis {
            Axis::Weight => self.weight = Some(value),
            Axis::Width => self.width = Some(value),
            Axis::Slant => self.slant = Some(value),
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.weight.is_none() && self.width.is_none() && self.slant.is_none()
    }

    /// `font-variation-settings` value, e.g. `'wght' 400, 'wdth' 100`
    pub fn font_variation_settings(&self) -> Option<String> {
        let parts: Vec<String> = [Axis::Weight, Axis::Width, Axis::Slant]
            .into_iter()
            .filter_map(|axis| self.get(axis).map(|v| format!("'{}' {v}", axis.tag())))
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

/// Presentation settings for the preview
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewStyle {
    size: f32,
    weight: u16,
    color: String,
    line_height: f32,
    letter_spacing: f32,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            size: 16.0,
            weight: 400,
            color: "#000000".to_string(),
            line_height: 1.5,
            letter_spacing: 0.0,
        }
    }
}

impl PreviewStyle {
    pub fn new(
        size: f32,
        weight: u16,
        color: impl Into<String>,
        line_height: f32,
        letter_spacing: f32,
    ) -> Result<Self, Error> {
        let color = color.into();
        if !(size.is_finite() && size > 0.0) {
            return Err(Error::input(format!("preview size must be positive, got {size}")));
        }
        if !(1..=1000).contains(&weight) {
            return Err(Error::input(format!(
                "preview weight must be between 1 and 1000, got {weight}"
            )));
        }
        if !is_hex_color(&color) {
            return Err(Error::input(format!("invalid preview color: {color}")));
        }
        if !(line_height.is_finite() && line_height > 0.0) {
            return Err(Error::input(format!(
                "line height must be positive, got {line_height}"
            )));
        }
        if !letter_spacing.is_finite() {
            return Err(Error::input("letter spacing must be a finite number"));
        }
        Ok(Self {
            size,
            weight,
            color,
            line_height,
            letter_spacing,
        })
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn letter_spacing(&self) -> f32 {
        self.letter_spacing
    }
}

/// `#rgb` or `#rrggbb`
fn is_hex_color(color: &str) -> bool {
    color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Stylesheet data produced by a successful fetch + parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFont {
    pub source_url: String,
    pub stylesheet: String,
    pub info: StylesheetInfo,
    pub estimated_size_kb: u64,
}

/// Everything known about one font slot.
///
/// Records are only changed through [`crate::FontSession`], which keeps the
/// name and stylesheet populated together and the axes empty for static fonts.
#[derive(Debug, Clone, PartialEq)]
pub struct FontRecord {
    id: FontId,
    source_url: String,
    display_name: String,
    raw_stylesheet: String,
    declared_weights: Vec<String>,
    is_variable_font: bool,
    variable_axes: VariableAxes,
    last_error: Option<String>,
    estimated_size_kb: u64,
    sample_text: String,
    preview_style: PreviewStyle,
}

impl FontRecord {
    pub(crate) fn empty(id: FontId, sample_text: &str) -> Self {
        Self {
            id,
            source_url: String::new(),
            display_name: String::new(),
            raw_stylesheet: String::new(),
            declared_weights: Vec::new(),
            is_variable_font: false,
            variable_axes: VariableAxes::default(),
            last_error: None,
            estimated_size_kb: 0,
            sample_text: sample_text.to_string(),
            preview_style: PreviewStyle::default(),
        }
    }

    pub(crate) fn apply_parsed(&mut self, parsed: ParsedFont) {
        self.source_url = parsed.source_url;
        self.display_name = parsed.info.family;
        self.raw_stylesheet = parsed.stylesheet;
        self.declared_weights = parsed.info.weights;
        self.is_variable_font = parsed.info.is_variable;
        self.variable_axes = if self.is_variable_font {
            VariableAxes::initial()
        } else {
            VariableAxes::default()
        };
        self.estimated_size_kb = parsed.estimated_size_kb;
        self.last_error = None;
    }

    pub(crate) fn set_error(&mut self, error: &Error) {
        self.last_error = Some(error.to_string());
    }

    pub(crate) fn set_source_url(&mut self, url: String) {
        self.source_url = url;
    }

    pub(crate) fn set_sample_text(&mut self, text: String) {
        self.sample_text = text;
    }

    pub(crate) fn set_preview_style(&mut self, style: PreviewStyle) {
        self.preview_style = style;
    }

    pub(crate) fn set_variable_axes(&mut self, axes: VariableAxes) {
        self.variable_axes = axes;
    }

    pub fn id(&self) -> FontId {
        self.id
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Family name, empty until a stylesheet has been parsed
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn raw_stylesheet(&self) -> &str {
        &self.raw_stylesheet
    }

    pub fn declared_weights(&self) -> &[String] {
        &self.declared_weights
    }

    pub fn is_variable_font(&self) -> bool {
        self.is_variable_font
    }

    pub fn variable_axes(&self) -> &VariableAxes {
        &self.variable_axes
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn estimated_size_kb(&self) -> u64 {
        self.estimated_size_kb
    }

    pub fn sample_text(&self) -> &str {
        &self.sample_text
    }

    pub fn preview_style(&self) -> &PreviewStyle {
        &self.preview_style
    }

    /// True once a stylesheet has been fetched and parsed
    pub fn is_populated(&self) -> bool {
        !self.raw_stylesheet.is_empty()
    }

    /// `unicode-range` covering the sample text
    pub fn subset_ranges(&self) -> String {
        subset_ranges(&self.sample_text)
    }
}

/// Default sample text for new slots
pub const DEFAULT_SAMPLE_TEXT: &str = templates::PANGRAM;
