//! Slide deck compiler and change detection for markdown presentations.
//!
//! Text goes through frontmatter extraction, slide splitting and slide body
//! parsing to produce a [`Presentation`]. A [`PresentationCache`] snapshot of
//! that model can later be diffed against a fresh parse to decide between a
//! per-slide patch and a full re-render.

pub mod diff;
pub mod error;
pub mod fingerprint;
pub mod frontmatter;
pub mod layout;
pub mod parser;
pub mod split;
pub mod types;

pub use diff::{diff, requires_full_render, DiffEngine, DiffType, SlideDiff, UpdatePlan};
pub use error::{Error, Result};
pub use fingerprint::{
    build_cache, hash_frontmatter, hash_slide, ContentHasher, Fingerprinter, PresentationCache,
    RollingHasher, SlideFingerprint,
};
pub use frontmatter::{extract_frontmatter, Frontmatter, FrontmatterKey, FrontmatterValue};
pub use layout::infer_layout;
pub use parser::SlideParser;
pub use split::split_slides;
pub use types::{ElementKind, Layout, Presentation, Slide, SlideElement, SlideMetadata, SlideMode};
