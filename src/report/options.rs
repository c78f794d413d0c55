//! Report assembly options.

/// Options controlling the assembled report's fixed text and layout.
///
/// Defaults reproduce the survival-analysis report this tool was built
/// around; override any of them for other studies.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Document title text
    pub title: String,

    /// Heading above the summary table
    pub table_heading: String,

    /// Descriptive paragraph between heading and table
    pub table_caption: String,

    /// Heading above the chart image
    pub chart_heading: String,

    /// Chart display width in points (1 pt = 1/72 in)
    pub image_width: f32,
}

impl ReportOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the table section heading.
    pub fn with_table_heading(mut self, heading: impl Into<String>) -> Self {
        self.table_heading = heading.into();
        self
    }

    /// Set the table caption paragraph.
    pub fn with_table_caption(mut self, caption: impl Into<String>) -> Self {
        self.table_caption = caption.into();
        self
    }

    /// Set the chart section heading.
    pub fn with_chart_heading(mut self, heading: impl Into<String>) -> Self {
        self.chart_heading = heading.into();
        self
    }

    /// Set the chart display width in points.
    pub fn with_image_width(mut self, points: f32) -> Self {
        self.image_width = points;
        self
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Healthcare Survival Analysis Report".to_string(),
            table_heading: "Cox Proportional Hazards Model".to_string(),
            table_caption: "Summary table of hazard ratios and significance.".to_string(),
            chart_heading: "Kaplan-Meier Curve".to_string(),
            image_width: 360.0, // 5 inches
        }
    }
}
