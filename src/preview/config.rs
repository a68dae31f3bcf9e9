//! Configuration for theme previews

/// Configuration options for preview output
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Whether to emit ANSI escape sequences
    pub color: bool,

    /// Whether to show the unresolved template next to each resolved value
    pub show_templates: bool,

    /// Swatch drawn in front of each color name
    pub swatch: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_templates: true,
            swatch: "██".to_string(),
        }
    }
}

impl PreviewConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether output is colored
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Set whether unresolved templates are shown
    pub fn with_templates(mut self, show: bool) -> Self {
        self.show_templates = show;
        self
    }

    /// Set the swatch text
    pub fn with_swatch(mut self, swatch: impl Into<String>) -> Self {
        self.swatch = swatch.into();
        self
    }
}
