//! Domain types for representing a compiled slide deck.

use serde::{Deserialize, Serialize};

use crate::frontmatter::Frontmatter;

/// A compiled document: frontmatter plus slides in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    /// Document-level metadata from the leading `---` block.
    pub frontmatter: Frontmatter,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Create a presentation from already parsed parts.
    pub fn new(frontmatter: Frontmatter, slides: Vec<Slide>) -> Self {
        Self {
            frontmatter,
            slides,
        }
    }

    /// Number of slides in the deck.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Get all speaker notes from all slides, flattened.
    pub fn all_notes(&self) -> Vec<&str> {
        self.slides
            .iter()
            .flat_map(|s| s.speaker_notes.iter().map(String::as_str))
            .collect()
    }
}

/// A single slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// 0-based position within the parse that produced it.
    pub index: usize,

    /// Per-slide settings from the preamble, with the inferred layout filled in.
    pub metadata: SlideMetadata,

    /// Visible content in source line order.
    pub elements: Vec<SlideElement>,

    /// Lines that are kept but never rendered on the slide.
    pub speaker_notes: Vec<String>,

    /// The slide's source text, trimmed.
    pub raw_content: String,

    /// Set by consumers that hide slides from the show. The parser always
    /// leaves this `false`.
    #[serde(default)]
    pub hidden: bool,
}

impl Slide {
    /// Create an empty slide at the given position.
    pub fn new(index: usize, raw_content: impl Into<String>) -> Self {
        Self {
            index,
            metadata: SlideMetadata::default(),
            elements: Vec::new(),
            speaker_notes: Vec::new(),
            raw_content: raw_content.into(),
            hidden: false,
        }
    }

    /// Elements that will be rendered.
    pub fn visible_elements(&self) -> impl Iterator<Item = &SlideElement> {
        self.elements.iter().filter(|e| e.visible)
    }

    /// The first heading on the slide, if any.
    pub fn first_heading(&self) -> Option<&SlideElement> {
        self.elements.iter().find(|e| e.heading_level().is_some())
    }
}

/// Settings read from a slide's `key: value` preamble.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    /// Always within `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_opacity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<SlideMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

/// Named visual arrangement of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    Default,
    Title,
    Section,
    FullImage,
    Caption,
    Split,
    Grid,
}

impl Layout {
    /// Parse a layout tag as written in a slide preamble.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "default" => Some(Self::Default),
            "title" => Some(Self::Title),
            "section" => Some(Self::Section),
            "full-image" => Some(Self::FullImage),
            "caption" => Some(Self::Caption),
            "split" => Some(Self::Split),
            "grid" => Some(Self::Grid),
            _ => None,
        }
    }

    /// The tag as written in a slide preamble.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Title => "title",
            Self::Section => "section",
            Self::FullImage => "full-image",
            Self::Caption => "caption",
            Self::Split => "split",
            Self::Grid => "grid",
        }
    }
}

/// Color mode override for a single slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideMode {
    Light,
    Dark,
}

/// One classified piece of slide content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideElement {
    /// Element type and its type-specific fields.
    #[serde(flatten)]
    pub kind: ElementKind,

    /// Normalized content handed to renderers.
    pub content: String,

    /// Whether the element is rendered. Every classified element is visible.
    pub visible: bool,

    /// Source lines the element was built from.
    pub raw: String,
}

impl SlideElement {
    /// Create a visible element.
    pub fn new(kind: ElementKind, content: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            visible: true,
            raw: raw.into(),
        }
    }

    /// Heading level, or `None` for any other element.
    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            ElementKind::Heading { level } => Some(level),
            _ => None,
        }
    }

    /// Whether this is an image element.
    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image { .. })
    }
}

/// The closed set of element types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// `#` to `######` heading; `level` is in `1..=6`.
    Heading { level: u8 },
    Paragraph,
    List,
    Blockquote,
    Image {
        #[serde(default)]
        alt: String,
    },
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    Table,
    Math,
}

impl ElementKind {
    /// Type name used in serialized output and content fingerprints.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Paragraph => "paragraph",
            Self::List => "list",
            Self::Blockquote => "blockquote",
            Self::Image { .. } => "image",
            Self::Code { .. } => "code",
            Self::Table => "table",
            Self::Math => "math",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_tag_roundtrip() {
        for layout in [
            Layout::Default,
            Layout::Title,
            Layout::Section,
            Layout::FullImage,
            Layout::Caption,
            Layout::Split,
            Layout::Grid,
        ] {
            assert_eq!(Layout::from_tag(layout.as_tag()), Some(layout));
        }
        assert_eq!(Layout::from_tag("two-column"), None);
    }

    #[test]
    fn test_element_serializes_with_type_tag() {
        let heading = SlideElement::new(ElementKind::Heading { level: 2 }, "Intro", "## Intro");
        let json = serde_json::to_value(&heading).unwrap();

        assert_eq!(json["type"], "heading");
        assert_eq!(json["level"], 2);
        assert_eq!(json["content"], "Intro");
        assert_eq!(json["visible"], true);
    }

    #[test]
    fn test_layout_serializes_kebab_case() {
        let json = serde_json::to_string(&Layout::FullImage).unwrap();
        assert_eq!(json, "\"full-image\"");
    }

    #[test]
    fn test_first_heading_skips_other_elements() {
        let mut slide = Slide::new(0, "");
        slide
            .elements
            .push(SlideElement::new(ElementKind::Image { alt: String::new() }, "a.png", "![](a.png)"));
        slide
            .elements
            .push(SlideElement::new(ElementKind::Heading { level: 3 }, "Later", "### Later"));

        assert_eq!(slide.first_heading().and_then(|h| h.heading_level()), Some(3));
        assert_eq!(slide.visible_elements().count(), 2);
    }
}
