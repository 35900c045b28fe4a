//! Layout inference for slides without an explicit `layout:` line.
//!
//! The rules overlap, so they are checked in a fixed order and the first
//! match wins. Two images and a heading is `Split`, not `Grid`.

use crate::types::{Layout, SlideElement};

/// Counts the decision table is evaluated against.
#[derive(Debug, Default, Clone, Copy)]
struct ElementCounts {
    visible: usize,
    images: usize,
    headings: usize,
    /// Every element is an image.
    only_images: bool,
    first_heading_level: Option<u8>,
}

impl ElementCounts {
    fn from_elements(elements: &[SlideElement]) -> Self {
        let mut counts = Self {
            only_images: !elements.is_empty(),
            ..Self::default()
        };

        for element in elements {
            if element.visible {
                counts.visible += 1;
            }
            if element.is_image() {
                counts.images += 1;
            } else {
                counts.only_images = false;
            }
            if let Some(level) = element.heading_level() {
                counts.headings += 1;
                counts.first_heading_level.get_or_insert(level);
            }
        }

        counts
    }
}

/// Pick a layout from a slide's elements.
pub fn infer_layout(elements: &[SlideElement]) -> Layout {
    let c = ElementCounts::from_elements(elements);

    if c.only_images && c.images > 0 && c.headings == 0 {
        Layout::FullImage
    } else if c.first_heading_level.is_some_and(|level| level <= 2) && c.visible <= 2 {
        Layout::Title
    } else if c.headings == 1 && c.first_heading_level == Some(3) && c.visible <= 2 {
        Layout::Section
    } else if c.images == 1 && c.visible > 1 {
        Layout::Caption
    } else if c.images >= 1 && c.headings >= 1 {
        Layout::Split
    } else if c.images > 1 {
        Layout::Grid
    } else {
        Layout::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementKind;

    fn heading(level: u8) -> SlideElement {
        SlideElement::new(ElementKind::Heading { level }, "Heading", "# Heading")
    }

    fn image() -> SlideElement {
        SlideElement::new(
            ElementKind::Image { alt: String::new() },
            "pic.png",
            "![](pic.png)",
        )
    }

    fn paragraph() -> SlideElement {
        SlideElement::new(ElementKind::Paragraph, "text", "    text")
    }

    #[test]
    fn test_only_images_is_full_image() {
        assert_eq!(infer_layout(&[image()]), Layout::FullImage);
        assert_eq!(infer_layout(&[image(), image(), image()]), Layout::FullImage);
    }

    #[test]
    fn test_title_layout() {
        assert_eq!(infer_layout(&[heading(1)]), Layout::Title);
        assert_eq!(infer_layout(&[heading(2), paragraph()]), Layout::Title);
        assert_eq!(infer_layout(&[heading(1), image()]), Layout::Title);
    }

    #[test]
    fn test_title_needs_few_elements() {
        assert_eq!(
            infer_layout(&[heading(1), paragraph(), paragraph()]),
            Layout::Default
        );
    }

    #[test]
    fn test_section_layout() {
        assert_eq!(infer_layout(&[heading(3)]), Layout::Section);
        assert_eq!(infer_layout(&[heading(3), paragraph()]), Layout::Section);
        assert_eq!(infer_layout(&[heading(4)]), Layout::Default);
    }

    #[test]
    fn test_caption_layout() {
        assert_eq!(infer_layout(&[image(), paragraph()]), Layout::Caption);
        assert_eq!(infer_layout(&[heading(3), image(), paragraph()]), Layout::Caption);
    }

    #[test]
    fn test_two_images_and_heading_is_split_not_grid() {
        assert_eq!(infer_layout(&[heading(1), image(), image()]), Layout::Split);
        assert_eq!(infer_layout(&[image(), heading(4), image()]), Layout::Split);
    }

    #[test]
    fn test_grid_layout() {
        assert_eq!(infer_layout(&[image(), image(), paragraph()]), Layout::Grid);
    }

    #[test]
    fn test_fallback_layout() {
        assert_eq!(infer_layout(&[]), Layout::Default);
        assert_eq!(infer_layout(&[paragraph(), paragraph()]), Layout::Default);
    }
}
