//! Classifying the change between a cached snapshot and a new parse.
//!
//! With equal slide counts slides are compared by position. When the count
//! changes, each new slide claims the first unclaimed old slide with the same
//! combined hash; slides that were edited as well as moved show up as one
//! removal plus one addition, never as a modification.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use crate::fingerprint::{
    ContentHasher, Fingerprinter, PresentationCache, RollingHasher, SlideFingerprint,
};
use crate::types::Presentation;

/// More added or removed slides than this forces a full re-render.
pub const FULL_RENDER_THRESHOLD: usize = 5;

/// Kind of change between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffType {
    None,
    /// Same slide count, some slides edited in place.
    ContentOnly,
    /// Slides were added or removed.
    Structural,
}

impl DiffType {
    /// Tag as written in serialized diffs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ContentOnly => "content-only",
            Self::Structural => "structural",
        }
    }
}

/// Result of comparing a snapshot with a new presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDiff {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    /// Positions whose fingerprint changed (content-only diffs).
    pub modified_indices: Vec<usize>,
    /// New-presentation indices with no matching old slide.
    pub added_indices: Vec<usize>,
    /// Old-snapshot indices with no matching new slide.
    pub removed_indices: Vec<usize>,
    pub frontmatter_changed: bool,
    /// Any frontmatter edit counts as a possible theme change.
    pub theme_changed: bool,
}

/// What a consumer should do with a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum UpdatePlan {
    Unchanged,
    /// Drop `remove` (old-snapshot indices), then re-render `render`
    /// (new-presentation indices). Slides in neither list are kept as they
    /// are and take their position from the new presentation.
    Patch {
        render: Vec<usize>,
        remove: Vec<usize>,
    },
    FullRender,
}

impl SlideDiff {
    fn unchanged() -> Self {
        Self {
            diff_type: DiffType::None,
            modified_indices: Vec::new(),
            added_indices: Vec::new(),
            removed_indices: Vec::new(),
            frontmatter_changed: false,
            theme_changed: false,
        }
    }

    /// See [`requires_full_render`].
    pub fn requires_full_render(&self) -> bool {
        requires_full_render(self)
    }

    /// Turn the diff into the steps a renderer has to take.
    pub fn update_plan(&self) -> UpdatePlan {
        if self.requires_full_render() {
            return UpdatePlan::FullRender;
        }
        if self.diff_type == DiffType::None {
            return UpdatePlan::Unchanged;
        }

        let mut render: Vec<usize> = self
            .modified_indices
            .iter()
            .chain(&self.added_indices)
            .copied()
            .collect();
        render.sort_unstable();
        render.dedup();
        UpdatePlan::Patch {
            render,
            remove: self.removed_indices.clone(),
        }
    }
}

/// Whether a diff must be applied by rebuilding everything.
pub fn requires_full_render(diff: &SlideDiff) -> bool {
    diff.theme_changed
        || diff.added_indices.len() > FULL_RENDER_THRESHOLD
        || diff.removed_indices.len() > FULL_RENDER_THRESHOLD
}

/// Compares snapshots against presentations using a chosen hasher. The
/// hasher must be the one that built the snapshot.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine<H = RollingHasher> {
    fingerprinter: Fingerprinter<H>,
}

impl DiffEngine<RollingHasher> {
    /// Create an engine using [`RollingHasher`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: ContentHasher> DiffEngine<H> {
    /// Create an engine around a custom fingerprinter.
    pub fn with_fingerprinter(fingerprinter: Fingerprinter<H>) -> Self {
        Self { fingerprinter }
    }

    /// The fingerprinter, for building snapshots this engine can compare.
    pub fn fingerprinter(&self) -> &Fingerprinter<H> {
        &self.fingerprinter
    }

    /// Classify the change from `old` to `new`.
    pub fn diff(&self, old: &PresentationCache, new: &Presentation) -> SlideDiff {
        let frontmatter_changed =
            self.fingerprinter.hash_frontmatter(&new.frontmatter) != old.frontmatter_hash;
        let new_cache = self.fingerprinter.build_cache(new);

        let mut diff = SlideDiff {
            frontmatter_changed,
            theme_changed: frontmatter_changed,
            ..SlideDiff::unchanged()
        };

        if new_cache.slide_count == old.slide_count {
            diff.modified_indices = new_cache
                .slide_fingerprints
                .iter()
                .enumerate()
                .filter(|(i, fp)| {
                    old.slide_fingerprints
                        .get(*i)
                        .map_or(true, |old_fp| old_fp.combined_hash != fp.combined_hash)
                })
                .map(|(i, _)| i)
                .collect();

            if !diff.modified_indices.is_empty() || frontmatter_changed {
                diff.diff_type = DiffType::ContentOnly;
            }
        } else {
            let (added, removed) =
                match_first_fit(&old.slide_fingerprints, &new_cache.slide_fingerprints);
            diff.added_indices = added;
            diff.removed_indices = removed;
            diff.diff_type = DiffType::Structural;
        }

        log::debug!(
            "Diff {:?}: {} modified, {} added, {} removed, frontmatter changed: {}",
            diff.diff_type,
            diff.modified_indices.len(),
            diff.added_indices.len(),
            diff.removed_indices.len(),
            diff.frontmatter_changed
        );

        diff
    }
}

/// Match each new slide to the lowest-index unmatched old slide with the
/// same combined hash. Returns `(added, removed)`.
fn match_first_fit(
    old: &[SlideFingerprint],
    new: &[SlideFingerprint],
) -> (Vec<usize>, Vec<usize>) {
    let mut unmatched_old: HashMap<u64, VecDeque<usize>> = HashMap::new();
    for (i, fp) in old.iter().enumerate() {
        unmatched_old.entry(fp.combined_hash).or_default().push_back(i);
    }

    let mut matched_old = vec![false; old.len()];
    let mut added = Vec::new();

    for (i, fp) in new.iter().enumerate() {
        match unmatched_old
            .get_mut(&fp.combined_hash)
            .and_then(VecDeque::pop_front)
        {
            Some(old_index) => matched_old[old_index] = true,
            None => added.push(i),
        }
    }

    let removed = matched_old
        .iter()
        .enumerate()
        .filter(|(_, matched)| !**matched)
        .map(|(i, _)| i)
        .collect();

    (added, removed)
}

/// Diff with the default hasher.
pub fn diff(old: &PresentationCache, new: &Presentation) -> SlideDiff {
    DiffEngine::new().diff(old, new)
}
