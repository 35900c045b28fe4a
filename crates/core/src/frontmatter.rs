//! Document frontmatter extraction.
//!
//! A document may open with a flat `key: value` block fenced by `---` lines.
//! Keys are resolved through a fixed alias table so that kebab-case and
//! camelCase spellings land on the same field; anything else is dropped.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Leading `---` block. The closing fence must be exactly three dashes on
/// its own line.
static FRONTMATTER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A---\r?\n((?s:.*?))\r?\n---(?:\r?\n|\z)").unwrap());

/// Canonical frontmatter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FrontmatterKey {
    Title,
    Author,
    Date,
    Theme,
    TitleFont,
    BodyFont,
    CodeFont,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    LightBackground,
    DarkBackground,
    HeaderLeft,
    HeaderMiddle,
    HeaderRight,
    FooterLeft,
    FooterMiddle,
    FooterRight,
    Logo,
    LogoSize,
    AspectRatio,
    ShowProgress,
    ShowSlideNumbers,
    Transition,
}

/// Every accepted spelling and the field it resolves to.
const FRONTMATTER_ALIASES: &[(&str, FrontmatterKey)] = &[
    ("title", FrontmatterKey::Title),
    ("author", FrontmatterKey::Author),
    ("date", FrontmatterKey::Date),
    ("theme", FrontmatterKey::Theme),
    ("title-font", FrontmatterKey::TitleFont),
    ("titleFont", FrontmatterKey::TitleFont),
    ("body-font", FrontmatterKey::BodyFont),
    ("bodyFont", FrontmatterKey::BodyFont),
    ("code-font", FrontmatterKey::CodeFont),
    ("codeFont", FrontmatterKey::CodeFont),
    ("accent1", FrontmatterKey::Accent1),
    ("accent2", FrontmatterKey::Accent2),
    ("accent3", FrontmatterKey::Accent3),
    ("accent4", FrontmatterKey::Accent4),
    ("accent5", FrontmatterKey::Accent5),
    ("accent6", FrontmatterKey::Accent6),
    ("light-background", FrontmatterKey::LightBackground),
    ("lightBackground", FrontmatterKey::LightBackground),
    ("dark-background", FrontmatterKey::DarkBackground),
    ("darkBackground", FrontmatterKey::DarkBackground),
    ("header-left", FrontmatterKey::HeaderLeft),
    ("headerLeft", FrontmatterKey::HeaderLeft),
    ("header-middle", FrontmatterKey::HeaderMiddle),
    ("headerMiddle", FrontmatterKey::HeaderMiddle),
    ("header-right", FrontmatterKey::HeaderRight),
    ("headerRight", FrontmatterKey::HeaderRight),
    ("footer-left", FrontmatterKey::FooterLeft),
    ("footerLeft", FrontmatterKey::FooterLeft),
    ("footer-middle", FrontmatterKey::FooterMiddle),
    ("footerMiddle", FrontmatterKey::FooterMiddle),
    ("footer-right", FrontmatterKey::FooterRight),
    ("footerRight", FrontmatterKey::FooterRight),
    ("logo", FrontmatterKey::Logo),
    ("logo-size", FrontmatterKey::LogoSize),
    ("logoSize", FrontmatterKey::LogoSize),
    ("aspect-ratio", FrontmatterKey::AspectRatio),
    ("aspectRatio", FrontmatterKey::AspectRatio),
    ("show-progress", FrontmatterKey::ShowProgress),
    ("showProgress", FrontmatterKey::ShowProgress),
    ("show-slide-numbers", FrontmatterKey::ShowSlideNumbers),
    ("showSlideNumbers", FrontmatterKey::ShowSlideNumbers),
    ("transition", FrontmatterKey::Transition),
];

impl FrontmatterKey {
    /// Resolve a key as written in a document.
    pub fn from_alias(alias: &str) -> Option<Self> {
        FRONTMATTER_ALIASES
            .iter()
            .find(|(name, _)| *name == alias)
            .map(|(_, key)| *key)
    }
}

/// A frontmatter value. Only the literals `true` and `false` become booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Bool(bool),
    Text(String),
}

impl FrontmatterValue {
    fn parse(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// The text, or `None` for a boolean.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Bool(_) => None,
        }
    }

    /// The boolean, or `None` for text.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(_) => None,
        }
    }
}

/// Document-level metadata. Iteration and serialization follow the
/// declaration order of [`FrontmatterKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter {
    values: BTreeMap<FrontmatterKey, FrontmatterValue>,
}

impl Frontmatter {
    /// Create an empty frontmatter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the body of a frontmatter block (without the fences).
    pub fn parse(block: &str) -> Self {
        let mut frontmatter = Self::new();

        for line in block.lines() {
            let Some((raw_key, raw_value)) = line.split_once(':') else {
                continue;
            };
            let raw_key = raw_key.trim();
            let Some(key) = FrontmatterKey::from_alias(raw_key) else {
                if !raw_key.is_empty() {
                    log::debug!("Ignoring unrecognized frontmatter key '{}'", raw_key);
                }
                continue;
            };
            let value = strip_matching_quotes(raw_value.trim());
            frontmatter.values.insert(key, FrontmatterValue::parse(value));
        }

        frontmatter
    }

    /// Raw value of a key.
    pub fn get(&self, key: FrontmatterKey) -> Option<&FrontmatterValue> {
        self.values.get(&key)
    }

    /// Text value of a key; `None` when missing or boolean.
    pub fn get_str(&self, key: FrontmatterKey) -> Option<&str> {
        self.get(key).and_then(FrontmatterValue::as_str)
    }

    /// Boolean value of a key; `None` when missing or text.
    pub fn get_bool(&self, key: FrontmatterKey) -> Option<bool> {
        self.get(key).and_then(FrontmatterValue::as_bool)
    }

    /// Deck title.
    pub fn title(&self) -> Option<&str> {
        self.get_str(FrontmatterKey::Title)
    }

    /// Deck author.
    pub fn author(&self) -> Option<&str> {
        self.get_str(FrontmatterKey::Author)
    }

    /// Theme name.
    pub fn theme(&self) -> Option<&str> {
        self.get_str(FrontmatterKey::Theme)
    }

    /// Aspect ratio as written, e.g. `16:9`.
    pub fn aspect_ratio(&self) -> Option<&str> {
        self.get_str(FrontmatterKey::AspectRatio)
    }

    /// Whether a progress bar should be shown.
    pub fn show_progress(&self) -> Option<bool> {
        self.get_bool(FrontmatterKey::ShowProgress)
    }

    /// Whether slide numbers should be shown.
    pub fn show_slide_numbers(&self) -> Option<bool> {
        self.get_bool(FrontmatterKey::ShowSlideNumbers)
    }

    /// Number of recognized keys present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no recognized keys are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over keys and values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (FrontmatterKey, &FrontmatterValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }
}

/// Remove one pair of surrounding quotes when both ends use the same kind.
fn strip_matching_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Split a document into its frontmatter and the remaining body.
///
/// Without a leading block the frontmatter is empty and the body is the
/// whole input. This never fails.
pub fn extract_frontmatter(text: &str) -> (Frontmatter, &str) {
    match FRONTMATTER_REGEX.captures(text) {
        Some(caps) => {
            let block = caps.get(1).map_or("", |m| m.as_str());
            let end = caps.get(0).map_or(0, |m| m.end());
            (Frontmatter::parse(block), &text[end..])
        }
        None => (Frontmatter::new(), text),
    }
}
