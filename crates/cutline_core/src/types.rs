use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shortest span a clip may occupy on the timeline, in seconds.
pub const MIN_CLIP_LEN: f64 = 0.25;

// ---------------------------------------------------------------------------
// Clip
// ---------------------------------------------------------------------------

/// A placed, trimmed instance of a source media item on the timeline.
///
/// `key` identifies the placement, not the media: the same source can be
/// placed any number of times, each with its own key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    pub key: Uuid,
    pub source_ref: Uuid,
    /// Total duration of the source media, fixed at creation.
    pub source_duration: f64,
    /// Position of the clip's first frame on the timeline, >= 0.
    pub start: f64,
    /// Trim window within the source: 0 <= source_in < source_out <= source_duration.
    pub source_in: f64,
    pub source_out: f64,
}

impl Clip {
    /// Create a clip exposing the full source, placed at `start`. Sources
    /// shorter than `MIN_CLIP_LEN` are padded up to it, so the trim window
    /// always fits inside `source_duration`.
    pub fn new(source_ref: Uuid, source_duration: f64, start: f64) -> Self {
        let source_duration = source_duration.max(MIN_CLIP_LEN);
        Self {
            key: Uuid::new_v4(),
            source_ref,
            source_duration,
            start: start.max(0.0),
            source_in: 0.0,
            source_out: source_duration,
        }
    }

    /// Span this clip occupies on the timeline. Always derived, never stored.
    pub fn length(&self) -> f64 {
        self.source_out - self.source_in
    }

    /// Timeline position just past the clip's last frame.
    pub fn end(&self) -> f64 {
        self.start + self.length()
    }
}

// ---------------------------------------------------------------------------
// ClipPatch
// ---------------------------------------------------------------------------

/// Partial update applied through `TimelineModel::mutate`. Unset fields keep
/// their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClipPatch {
    pub start: Option<f64>,
    pub source_in: Option<f64>,
    pub source_out: Option<f64>,
}

impl ClipPatch {
    pub fn start(value: f64) -> Self {
        Self {
            start: Some(value),
            ..Self::default()
        }
    }

    pub fn source_out(value: f64) -> Self {
        Self {
            source_out: Some(value),
            ..Self::default()
        }
    }

    /// Shift `start` and `source_in` together (left-edge trim).
    pub fn left_trim(start: f64, source_in: f64) -> Self {
        Self {
            start: Some(start),
            source_in: Some(source_in),
            source_out: None,
        }
    }
}

// ---------------------------------------------------------------------------
// ClipRecord
// ---------------------------------------------------------------------------

/// Persisted form of a clip: the `{source_ref, start, in, out}` tuple shared
/// by project files and publish payloads. Placement keys are session-local
/// and deliberately not persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClipRecord {
    #[serde(rename = "sourceRef")]
    pub source_ref: Uuid,
    pub start: f64,
    #[serde(rename = "in")]
    pub source_in: f64,
    #[serde(rename = "out")]
    pub source_out: f64,
}

impl From<&Clip> for ClipRecord {
    fn from(clip: &Clip) -> Self {
        Self {
            source_ref: clip.source_ref,
            start: clip.start,
            source_in: clip.source_in,
            source_out: clip.source_out,
        }
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// The persisted unit: created empty, mutated by every clip add/move/trim/
/// remove, saved on demand, loaded once at session start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub name: String,
    pub clips: Vec<ClipRecord>,
    pub playhead: f64,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clips: vec![],
            playhead: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_length_is_derived() {
        let mut clip = Clip::new(Uuid::new_v4(), 10.0, 2.0);
        assert!((clip.length() - 10.0).abs() < 1e-9);

        clip.source_in = 2.0;
        clip.source_out = 7.0;
        assert!((clip.length() - 5.0).abs() < 1e-9);
        assert!((clip.end() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn new_clip_spans_full_source() {
        let clip = Clip::new(Uuid::new_v4(), 8.0, 1.5);
        assert_eq!(clip.source_in, 0.0);
        assert_eq!(clip.source_out, 8.0);
        assert_eq!(clip.start, 1.5);
    }

    #[test]
    fn tiny_source_is_padded_to_minimum_length() {
        let clip = Clip::new(Uuid::new_v4(), 0.1, 0.0);
        assert_eq!(clip.source_duration, MIN_CLIP_LEN);
        assert_eq!(clip.source_out, MIN_CLIP_LEN);
        assert!(clip.source_out <= clip.source_duration);
    }

    #[test]
    fn new_clip_clamps_negative_start() {
        let clip = Clip::new(Uuid::new_v4(), 8.0, -3.0);
        assert_eq!(clip.start, 0.0);
    }

    #[test]
    fn clip_record_uses_wire_names() {
        let clip = Clip::new(Uuid::new_v4(), 10.0, 0.0);
        let record = ClipRecord::from(&clip);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("in").is_some());
        assert!(json.get("out").is_some());
        assert!(json.get("sourceRef").is_some());
        assert!(json.get("source_in").is_none());
    }

    #[test]
    fn serde_roundtrip_project() {
        let project = Project {
            name: "My Edit".to_string(),
            clips: vec![ClipRecord {
                source_ref: Uuid::new_v4(),
                start: 1.0,
                source_in: 0.5,
                source_out: 4.5,
            }],
            playhead: 2.25,
        };
        let json = serde_json::to_string(&project).unwrap();
        let back: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(project, back);
    }
}
