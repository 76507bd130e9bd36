use crate::error::Result;
use crate::timeline::TimelineModel;
use crate::types::{Clip, ClipRecord, Project};
use std::path::Path;
use uuid::Uuid;

impl Project {
    /// Snapshot the current timeline into the persisted shape.
    pub fn from_model(name: impl Into<String>, model: &TimelineModel, playhead: f64) -> Self {
        Self {
            name: name.into(),
            clips: model.sorted_clips().into_iter().map(ClipRecord::from).collect(),
            playhead,
        }
    }

    /// Rebuild a timeline from the persisted clip records. Placement keys are
    /// freshly generated; the duration lookup supplies each source's total
    /// duration (records only carry the trim window).
    pub fn into_model(&self, mut source_duration: impl FnMut(Uuid) -> f64) -> TimelineModel {
        let mut model = TimelineModel::new();
        for record in &self.clips {
            model.add(Clip {
                key: Uuid::new_v4(),
                source_ref: record.source_ref,
                source_duration: source_duration(record.source_ref),
                start: record.start,
                source_in: record.source_in,
                source_out: record.source_out,
            });
        }
        model
    }

    /// Save as pretty-printed JSON, appending the `.cutline` extension if
    /// not present.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = ensure_extension(path.as_ref());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a project from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let project: Project = serde_json::from_str(&data)?;
        Ok(project)
    }
}

fn ensure_extension(path: &Path) -> std::path::PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some("cutline") {
        path.to_path_buf()
    } else {
        let mut p = path.to_path_buf();
        let mut name = p.file_name().unwrap_or_default().to_os_string();
        name.push(".cutline");
        p.set_file_name(name);
        p
    }
}
