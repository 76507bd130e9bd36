use crate::error::{CoreError, Result};
use crate::types::{Clip, ClipPatch, MIN_CLIP_LEN};
use std::collections::HashMap;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TimelineModel
// ---------------------------------------------------------------------------

/// Owns the placed clips and derives timeline-level facts from them.
///
/// The collection is unordered; the sorted view is recomputed on demand so
/// that nothing goes stale while a gesture is rewriting `start` values.
/// Overlapping placements are permitted and resolved only at lookup time.
#[derive(Debug, Clone, Default)]
pub struct TimelineModel {
    clips: HashMap<Uuid, Clip>,
}

impl TimelineModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a clip. No overlap validation by design.
    pub fn add(&mut self, clip: Clip) -> Uuid {
        let key = clip.key;
        self.clips.insert(key, clip);
        key
    }

    /// Remove a clip, returning it. The caller is responsible for clearing
    /// any selection that pointed at the removed clip.
    pub fn remove(&mut self, key: Uuid) -> Result<Clip> {
        self.clips.remove(&key).ok_or(CoreError::ClipNotFound(key))
    }

    pub fn get(&self, key: Uuid) -> Option<&Clip> {
        self.clips.get(&key)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Clips ordered by ascending `start`, derived fresh on every call.
    pub fn sorted_clips(&self) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self.clips.values().collect();
        clips.sort_by(|a, b| {
            a.start
                .partial_cmp(&b.start)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        clips
    }

    /// First clip (by ascending `start`) covering `time` in `[start, end)`.
    /// On overlaps, the earliest-starting clip wins.
    pub fn clip_at(&self, time: f64) -> Option<&Clip> {
        self.sorted_clips()
            .into_iter()
            .find(|c| time >= c.start && time < c.end())
    }

    /// `max(start + length)` over all clips, 0 when empty.
    pub fn timeline_end(&self) -> f64 {
        self.clips
            .values()
            .map(|c| c.end())
            .fold(0.0, f64::max)
    }

    /// Apply a patch, then clamp the result back inside the clip invariants.
    ///
    /// Callers pre-clamp during gestures, but this is the single authority:
    /// a patch can never leave a clip with `start < 0`, a trim window outside
    /// the source, or a span shorter than `MIN_CLIP_LEN`.
    pub fn mutate(&mut self, key: Uuid, patch: ClipPatch) -> Result<()> {
        let clip = self
            .clips
            .get_mut(&key)
            .ok_or(CoreError::ClipNotFound(key))?;

        if let Some(start) = patch.start {
            clip.start = start.max(0.0);
        }
        if let Some(source_in) = patch.source_in {
            clip.source_in = source_in;
        }
        if let Some(source_out) = patch.source_out {
            clip.source_out = source_out;
        }

        // Clamp order matters: fix the in point first so the out point has a
        // valid floor to clamp against.
        let max_in = (clip.source_duration - MIN_CLIP_LEN).max(0.0);
        clip.source_in = clip.source_in.clamp(0.0, max_in);
        let min_out = clip.source_in + MIN_CLIP_LEN;
        // For a source somehow shorter than MIN_CLIP_LEN (Clip::new pads
        // those away) the minimum length takes precedence over the duration.
        let max_out = clip.source_duration.max(min_out);
        clip.source_out = clip.source_out.clamp(min_out, max_out);

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
