//! Rendering options and configuration.

/// Page size for the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// US Letter, 8.5 x 11 inches (default)
    #[default]
    Letter,
    /// ISO A4, 210 x 297 mm
    A4,
}

impl PageSize {
    /// Page dimensions as (width, height) in twips (1/20 pt, 1440 per inch).
    pub fn dimensions_twips(&self) -> (u32, u32) {
        match self {
            PageSize::Letter => (12240, 15840),
            PageSize::A4 => (11906, 16838),
        }
    }
}

/// Options for rendering documents to DOCX.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Page size
    pub page_size: PageSize,

    /// Page margin on all four sides, in twips
    pub margin_twips: u32,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Use A4 pages.
    pub fn a4(mut self) -> Self {
        self.page_size = PageSize::A4;
        self
    }

    /// Set the page margin in twips.
    pub fn with_margin_twips(mut self, twips: u32) -> Self {
        self.margin_twips = twips;
        self
    }

    /// Width of the text column in twips (page width minus margins).
    pub fn text_width_twips(&self) -> u32 {
        let (width, _) = self.page_size.dimensions_twips();
        width.saturating_sub(2 * self.margin_twips)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            margin_twips: 1440, // 1 inch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!(options.page_size, PageSize::Letter);
        assert_eq!(options.margin_twips, 1440);
        assert_eq!(options.text_width_twips(), 12240 - 2880);
    }

    #[test]
    fn test_options_builder() {
        let options = RenderOptions::new().a4().with_margin_twips(720);
        assert_eq!(options.page_size, PageSize::A4);
        assert_eq!(options.text_width_twips(), 11906 - 1440);
    }
}
