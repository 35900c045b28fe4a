//! Slide body parsing.
//!
//! Each slide is read in two phases: an optional `key: value` preamble that
//! fills [`SlideMetadata`], then a line classifier that turns the rest into
//! visible elements or speaker notes. Nothing here can fail; input that does
//! not fit a rule degrades to a speaker note.

use regex::Regex;
use std::sync::LazyLock;

use crate::frontmatter::extract_frontmatter;
use crate::layout::infer_layout;
use crate::split::split_slides;
use crate::types::{ElementKind, Layout, Presentation, Slide, SlideElement, SlideMetadata, SlideMode};

static LAYOUT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^layout:\s*(\S+)\s*$").unwrap());

static BACKGROUND_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^background:\s*(.+)$").unwrap());

static OPACITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^opacity:\s*(\d+(?:\.\d+)?|\.\d+)\s*(%)?$").unwrap());

static MODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^mode:\s*(light|dark)$").unwrap());

static CLASS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^class:\s*(.+)$").unwrap());

static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());

/// A whole-line image: `![alt](url)` with an optional `"title"`.
static IMAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^!\[([^\]]*)\]\(\s*([^)\s]+)(?:\s+"[^"]*")?\s*\)$"#).unwrap());

/// Bullet (`-`, `*`, `+`) or numbered (`1.`, `1)`) list item.
static LIST_ITEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+]|\d+[.)])\s+").unwrap());

const FENCE: &str = "```";
const MATH_FENCE: &str = "$$";

/// Where the line scanner is within a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    ScanningMetadata,
    ScanningBody,
}

/// Compiles document text into a [`Presentation`].
#[derive(Debug, Clone)]
pub struct SlideParser {
    /// Whether to fill in a layout for slides that do not declare one.
    infer_layout: bool,
}

impl Default for SlideParser {
    fn default() -> Self {
        Self { infer_layout: true }
    }
}

impl SlideParser {
    /// Create a parser with layout inference enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether slides without a `layout:` line get an inferred layout.
    pub fn with_layout_inference(mut self, enabled: bool) -> Self {
        self.infer_layout = enabled;
        self
    }

    /// Parse a full document: frontmatter, then one slide per chunk.
    pub fn parse(&self, text: &str) -> Presentation {
        let (frontmatter, body) = extract_frontmatter(text);

        let slides: Vec<Slide> = split_slides(body)
            .into_iter()
            .enumerate()
            .map(|(index, chunk)| self.parse_slide(index, chunk))
            .collect();

        log::debug!(
            "Parsed {} slides ({} frontmatter keys)",
            slides.len(),
            frontmatter.len()
        );

        Presentation::new(frontmatter, slides)
    }

    /// Parse one slide's source text.
    pub fn parse_slide(&self, index: usize, source: &str) -> Slide {
        let mut slide = Slide::new(index, source);

        let body_lines = read_preamble(source, &mut slide.metadata);
        let (elements, notes) = classify_body(&body_lines);
        slide.elements = elements;
        slide.speaker_notes = notes;

        if slide.metadata.layout.is_none() && self.infer_layout {
            slide.metadata.layout = Some(infer_layout(&slide.elements));
        }

        log::trace!(
            "Slide {}: {} elements, {} notes, layout {:?}",
            index,
            slide.elements.len(),
            slide.speaker_notes.len(),
            slide.metadata.layout.map(|l| l.as_tag())
        );

        slide
    }
}

/// Consume the metadata preamble and return the lines left for the body.
///
/// The preamble ends at the first blank line, the first heading or the
/// first line without a colon. A colon line that is not a metadata key is
/// handed to the body and scanning continues.
fn read_preamble<'a>(source: &'a str, metadata: &mut SlideMetadata) -> Vec<&'a str> {
    let mut state = ScanState::ScanningMetadata;
    let mut body = Vec::new();

    for line in source.lines() {
        match state {
            ScanState::ScanningMetadata => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    state = ScanState::ScanningBody;
                } else if HEADING_REGEX.is_match(trimmed) {
                    state = ScanState::ScanningBody;
                    body.push(line);
                } else if apply_metadata_line(trimmed, metadata) {
                    continue;
                } else if !trimmed.contains(':') {
                    state = ScanState::ScanningBody;
                    body.push(line);
                } else {
                    body.push(line);
                }
            }
            ScanState::ScanningBody => body.push(line),
        }
    }

    body
}

/// Apply one preamble line. Returns `false` if it is not a metadata line.
fn apply_metadata_line(line: &str, metadata: &mut SlideMetadata) -> bool {
    if let Some(caps) = LAYOUT_REGEX.captures(line) {
        let tag = &caps[1];
        match Layout::from_tag(tag) {
            Some(layout) => metadata.layout = Some(layout),
            None => log::debug!("Ignoring unknown layout '{}'", tag),
        }
        return true;
    }

    if let Some(caps) = OPACITY_REGEX.captures(line) {
        if let Ok(mut value) = caps[1].parse::<f64>() {
            if caps.get(2).is_some() {
                value /= 100.0;
            }
            metadata.background_opacity = Some(value.clamp(0.0, 1.0));
        }
        return true;
    }

    if let Some(caps) = MODE_REGEX.captures(line) {
        metadata.mode = Some(if &caps[1] == "dark" {
            SlideMode::Dark
        } else {
            SlideMode::Light
        });
        return true;
    }

    if let Some(caps) = BACKGROUND_REGEX.captures(line) {
        metadata.background = Some(caps[1].trim().to_string());
        return true;
    }

    if let Some(caps) = CLASS_REGEX.captures(line) {
        metadata.class = Some(caps[1].trim().to_string());
        return true;
    }

    false
}

/// Classify body lines into elements and speaker notes, in source order.
fn classify_body(lines: &[&str]) -> (Vec<SlideElement>, Vec<String>) {
    let mut elements = Vec::new();
    let mut notes = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with("//") {
            i += 1;
            continue;
        }

        if let Some(caps) = HEADING_REGEX.captures(trimmed) {
            let level = caps[1].len() as u8;
            elements.push(SlideElement::new(
                ElementKind::Heading { level },
                caps[2].trim(),
                line,
            ));
            i += 1;
        } else if let Some(caps) = IMAGE_REGEX.captures(trimmed) {
            elements.push(SlideElement::new(
                ElementKind::Image {
                    alt: caps[1].to_string(),
                },
                &caps[2],
                line,
            ));
            i += 1;
        } else if let Some(lang) = trimmed.strip_prefix(FENCE) {
            let (element, next) = read_code_block(lines, i, lang.trim());
            elements.push(element);
            i = next;
        } else if trimmed.starts_with(MATH_FENCE) {
            let (element, next) = read_math_block(lines, i);
            elements.push(element);
            i = next;
        } else if trimmed.starts_with('|') {
            let (element, next) = read_table(lines, i);
            elements.push(element);
            i = next;
        } else if let Some(dedented) = dedent(line) {
            let (element, next) = read_indented(lines, i, dedented);
            elements.push(element);
            i = next;
        } else {
            notes.push(trimmed.to_string());
            i += 1;
        }
    }

    (elements, notes)
}

/// Strip one level of indentation (a tab or four spaces).
fn dedent(line: &str) -> Option<&str> {
    line.strip_prefix('\t').or_else(|| line.strip_prefix("    "))
}

/// Read a fenced code block starting at `start`. An unclosed fence runs to
/// the end of the slide.
fn read_code_block(lines: &[&str], start: usize, lang: &str) -> (SlideElement, usize) {
    let mut end = start + 1;
    let mut closed = false;
    while end < lines.len() {
        if lines[end].trim().starts_with(FENCE) {
            closed = true;
            break;
        }
        end += 1;
    }

    if !closed {
        log::debug!("Unterminated code fence absorbed to end of slide");
    }

    let code = lines[start + 1..end].join("\n");
    let next = if closed { end + 1 } else { end };
    let raw = lines[start..next].join("\n");

    let (language, content) = if lang.is_empty() {
        (None, code)
    } else {
        (Some(lang.to_string()), format!("{}\n{}", lang, code))
    };

    (
        SlideElement::new(ElementKind::Code { language }, content, raw),
        next,
    )
}

/// Read a `$$` math block starting at `start`. A block may open and close on
/// one line; an unclosed block runs to the end of the slide.
fn read_math_block(lines: &[&str], start: usize) -> (SlideElement, usize) {
    let opening = lines[start].trim();
    let after_open = &opening[MATH_FENCE.len()..];

    if let Some(inner) = after_open.strip_suffix(MATH_FENCE) {
        return (
            SlideElement::new(ElementKind::Math, inner.trim(), lines[start]),
            start + 1,
        );
    }

    let mut body: Vec<&str> = Vec::new();
    if !after_open.trim().is_empty() {
        body.push(after_open);
    }

    let mut end = start + 1;
    let mut closed = false;
    while end < lines.len() {
        let trimmed = lines[end].trim();
        if let Some(before_close) = trimmed.strip_suffix(MATH_FENCE) {
            if !before_close.trim().is_empty() {
                body.push(before_close);
            }
            closed = true;
            break;
        }
        body.push(lines[end]);
        end += 1;
    }

    if !closed {
        log::debug!("Unterminated math block absorbed to end of slide");
    }

    let next = if closed { end + 1 } else { end };
    let raw = lines[start..next].join("\n");

    (
        SlideElement::new(ElementKind::Math, body.join("\n").trim(), raw),
        next,
    )
}

/// Read contiguous lines containing `|` as one table.
fn read_table(lines: &[&str], start: usize) -> (SlideElement, usize) {
    let mut end = start;
    while end < lines.len() && lines[end].contains('|') {
        end += 1;
    }

    let rows = &lines[start..end];
    let content = rows.iter().map(|r| r.trim()).collect::<Vec<_>>().join("\n");

    (
        SlideElement::new(ElementKind::Table, content, rows.join("\n")),
        end,
    )
}

/// Read an indented line as a list, blockquote or paragraph.
fn read_indented(lines: &[&str], start: usize, dedented: &str) -> (SlideElement, usize) {
    let first = dedented.trim();

    if LIST_ITEM_REGEX.is_match(first) {
        let mut items = vec![dedented.trim_end()];
        let mut end = start + 1;
        while end < lines.len() {
            match dedent(lines[end]) {
                Some(next) if LIST_ITEM_REGEX.is_match(next.trim_start()) => {
                    items.push(next.trim_end());
                    end += 1;
                }
                _ => break,
            }
        }
        let raw = lines[start..end].join("\n");
        return (
            SlideElement::new(ElementKind::List, items.join("\n"), raw),
            end,
        );
    }

    let element = match first.strip_prefix('>') {
        Some(quote) => SlideElement::new(ElementKind::Blockquote, quote.trim(), lines[start]),
        None => SlideElement::new(ElementKind::Paragraph, first, lines[start]),
    };
    (element, start + 1)
}
