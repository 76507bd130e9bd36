use cutline_core::timeline::TimelineModel;
use cutline_core::types::ClipRecord;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Publish payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
}

/// User-entered publish form fields, separate from the timeline content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishMeta {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub visibility: Visibility,
}

/// The payload submitted to the external publish endpoint. The engine's only
/// responsibility here is serializing its clip list; submission and its
/// failures belong to the caller, which surfaces them verbatim and leaves
/// editor state untouched for retry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub visibility: Visibility,
    pub timeline_name: String,
    pub clips: Vec<ClipRecord>,
}

impl PublishRequest {
    pub fn new(meta: PublishMeta, timeline_name: impl Into<String>, model: &TimelineModel) -> Self {
        Self {
            title: meta.title,
            description: meta.description,
            tags: meta.tags,
            visibility: meta.visibility,
            timeline_name: timeline_name.into(),
            clips: model.sorted_clips().into_iter().map(ClipRecord::from).collect(),
        }
    }
}
