//! Pure conversions between timeline time and a clip's source time.
//!
//! All inputs are clamped rather than rejected: a timeline position before
//! the clip maps to its first frame, one past it maps to its last.

use crate::types::Clip;

/// Local offset into the clip's trimmed span, in `[0, length]`.
pub fn clip_local_time(clip: &Clip, timeline_time: f64) -> f64 {
    (timeline_time - clip.start).clamp(0.0, clip.length())
}

/// Absolute position to seek the source media to for a timeline position.
pub fn source_time(clip: &Clip, timeline_time: f64) -> f64 {
    clip.source_in + clip_local_time(clip, timeline_time)
}

/// Inverse of `source_time`: timeline position for a player-reported source
/// position.
pub fn timeline_time_from_source(clip: &Clip, source_time: f64) -> f64 {
    clip.start + (source_time - clip.source_in).clamp(0.0, clip.length())
}
