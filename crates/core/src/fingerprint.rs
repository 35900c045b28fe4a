//! Change-detection fingerprints for slides and frontmatter.
//!
//! Hashes here only decide whether something changed. They are not
//! identities and collisions are tolerated.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::frontmatter::Frontmatter;
use crate::types::{Presentation, Slide, SlideMetadata};

const ELEMENT_SEPARATOR: &str = "|";
const NOTES_SEPARATOR: &str = "\n";

/// String hash used for all fingerprints.
pub trait ContentHasher {
    fn hash(&self, input: &str) -> u64;
}

/// 32-bit multiply-and-add hash (`h = h * 31 + unit`) over UTF-16 code
/// units, widened to `u64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingHasher;

impl ContentHasher for RollingHasher {
    fn hash(&self, input: &str) -> u64 {
        let hash = input
            .encode_utf16()
            .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)));
        u64::from(hash)
    }
}

/// Hashes of one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideFingerprint {
    /// Elements and speaker notes.
    pub content_hash: u64,
    /// Metadata and the hidden flag.
    pub metadata_hash: u64,
    /// Both of the above.
    pub combined_hash: u64,
}

/// Fingerprint snapshot of a built presentation.
///
/// Treat it as immutable: after diffing, replace the old snapshot with a new
/// one rather than editing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationCache {
    pub frontmatter_hash: u64,
    /// One entry per slide, in slide order.
    pub slide_fingerprints: Vec<SlideFingerprint>,
    pub slide_count: usize,
}

impl PresentationCache {
    /// Decode a snapshot previously written with [`PresentationCache::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidCache(e.to_string()))
    }

    /// Encode the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// The part of a slide that feeds `metadata_hash`.
#[derive(Serialize)]
struct MetadataKey<'a> {
    metadata: &'a SlideMetadata,
    hidden: bool,
}

/// Computes fingerprints with a chosen [`ContentHasher`].
#[derive(Debug, Clone, Default)]
pub struct Fingerprinter<H = RollingHasher> {
    hasher: H,
}

impl Fingerprinter<RollingHasher> {
    /// Create a fingerprinter using [`RollingHasher`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: ContentHasher> Fingerprinter<H> {
    /// Create a fingerprinter with a custom hasher.
    pub fn with_hasher(hasher: H) -> Self {
        Self { hasher }
    }

    /// Fingerprint one slide's content and metadata.
    pub fn hash_slide(&self, slide: &Slide) -> SlideFingerprint {
        let mut content = slide
            .elements
            .iter()
            .map(|e| format!("{}:{}:{}", e.kind.type_name(), e.content, e.raw))
            .collect::<Vec<_>>()
            .join(ELEMENT_SEPARATOR);
        content.push_str(ELEMENT_SEPARATOR);
        content.push_str("notes:");
        content.push_str(&slide.speaker_notes.join(NOTES_SEPARATOR));

        let content_hash = self.hasher.hash(&content);
        let metadata_hash = self.hasher.hash(&to_canonical_json(&MetadataKey {
            metadata: &slide.metadata,
            hidden: slide.hidden,
        }));
        let combined_hash = self
            .hasher
            .hash(&format!("{}:{}", content_hash, metadata_hash));

        SlideFingerprint {
            content_hash,
            metadata_hash,
            combined_hash,
        }
    }

    /// Hash the document frontmatter.
    pub fn hash_frontmatter(&self, frontmatter: &Frontmatter) -> u64 {
        self.hasher.hash(&to_canonical_json(frontmatter))
    }

    /// Snapshot a presentation for later diffing.
    pub fn build_cache(&self, presentation: &Presentation) -> PresentationCache {
        PresentationCache {
            frontmatter_hash: self.hash_frontmatter(&presentation.frontmatter),
            slide_fingerprints: presentation
                .slides
                .iter()
                .map(|s| self.hash_slide(s))
                .collect(),
            slide_count: presentation.slides.len(),
        }
    }
}

/// Fingerprint a slide with the default hasher.
pub fn hash_slide(slide: &Slide) -> SlideFingerprint {
    Fingerprinter::new().hash_slide(slide)
}

/// Hash frontmatter with the default hasher.
pub fn hash_frontmatter(frontmatter: &Frontmatter) -> u64 {
    Fingerprinter::new().hash_frontmatter(frontmatter)
}

/// Snapshot a presentation with the default hasher.
pub fn build_cache(presentation: &Presentation) -> PresentationCache {
    Fingerprinter::new().build_cache(presentation)
}

/// JSON text of plain model data. These types have string map keys and no
/// custom serializers, so encoding cannot fail.
fn to_canonical_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            debug_assert!(false, "model serialization failed: {}", e);
            log::warn!("Failed to serialize model for fingerprinting: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SlideParser;
    use crate::types::Layout;

    #[test]
    fn test_rolling_hash_known_values() {
        let hasher = RollingHasher;

        assert_eq!(hasher.hash(""), 0);
        assert_eq!(hasher.hash("a"), 97);
        assert_eq!(hasher.hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_rolling_hash_wraps_at_32_bits() {
        let long = "z".repeat(10_000);
        assert!(RollingHasher.hash(&long) <= u64::from(u32::MAX));
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let text = "---\ntheme: dark\n---\n# A\nnote\n---\n    - x\n![i](i.png)";
        let first = build_cache(&SlideParser::new().parse(text));
        let second = build_cache(&SlideParser::new().parse(text));

        assert_eq!(first, second);
    }

    #[test]
    fn test_notes_change_content_hash() {
        let parser = SlideParser::new();
        let a = hash_slide(&parser.parse_slide(0, "# A\nfirst note"));
        let b = hash_slide(&parser.parse_slide(0, "# A\nsecond note"));

        assert_ne!(a.content_hash, b.content_hash);
        assert_eq!(a.metadata_hash, b.metadata_hash);
        assert_ne!(a.combined_hash, b.combined_hash);
    }

    #[test]
    fn test_metadata_change_only_touches_metadata_hash() {
        let parser = SlideParser::new();
        let plain = hash_slide(&parser.parse_slide(0, "# A"));
        let dark = hash_slide(&parser.parse_slide(0, "mode: dark\n# A"));

        assert_eq!(plain.content_hash, dark.content_hash);
        assert_ne!(plain.metadata_hash, dark.metadata_hash);
    }

    #[test]
    fn test_hidden_flag_is_fingerprinted() {
        let mut slide = SlideParser::new().parse_slide(0, "# A");
        let visible = hash_slide(&slide);
        slide.hidden = true;
        let hidden = hash_slide(&slide);

        assert_eq!(visible.content_hash, hidden.content_hash);
        assert_ne!(visible.metadata_hash, hidden.metadata_hash);
    }

    #[test]
    fn test_index_not_fingerprinted() {
        let parser = SlideParser::new();
        let first = hash_slide(&parser.parse_slide(0, "# Same"));
        let later = hash_slide(&parser.parse_slide(7, "# Same"));

        assert_eq!(first, later);
    }

    #[test]
    fn test_build_cache_aligns_with_slides() {
        let presentation = SlideParser::new().parse("# A\n---\n# B\n---\n# C");
        let cache = build_cache(&presentation);

        assert_eq!(cache.slide_count, 3);
        assert_eq!(cache.slide_fingerprints.len(), 3);
        assert_eq!(
            cache.slide_fingerprints[1],
            hash_slide(&presentation.slides[1])
        );
        assert_eq!(cache.frontmatter_hash, hash_frontmatter(&presentation.frontmatter));
    }

    #[test]
    fn test_custom_hasher_is_used() {
        struct LengthHasher;
        impl ContentHasher for LengthHasher {
            fn hash(&self, input: &str) -> u64 {
                input.len() as u64
            }
        }

        let mut slide = SlideParser::new().parse_slide(0, "# A");
        slide.metadata.layout = Some(Layout::Title);
        let fingerprint = Fingerprinter::with_hasher(LengthHasher).hash_slide(&slide);

        // "heading:A:# A" + "|notes:"
        assert_eq!(fingerprint.content_hash, 20);
    }

    #[test]
    fn test_canonical_json_of_metadata() {
        let mut slide = SlideParser::new().parse_slide(0, "mode: dark\n# A");
        slide.hidden = true;
        let json = to_canonical_json(&MetadataKey {
            metadata: &slide.metadata,
            hidden: slide.hidden,
        });

        assert_eq!(
            json,
            r#"{"metadata":{"layout":"title","mode":"dark"},"hidden":true}"#
        );
    }

    #[test]
    fn test_cache_json_roundtrip() {
        let cache = build_cache(&SlideParser::new().parse("# A\n---\n# B"));
        let json = cache.to_json().unwrap();

        assert_eq!(PresentationCache::from_json(&json).unwrap(), cache);
    }

    #[test]
    fn test_invalid_cache_json() {
        let err = PresentationCache::from_json("{\"slide_count\": 1}").unwrap_err();
        assert!(matches!(err, Error::InvalidCache(_)));
    }
}
