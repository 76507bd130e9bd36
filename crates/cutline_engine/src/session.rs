use crate::error::{EngineError, Result};
use crate::interaction::{
    GestureEffect, InteractionController, InteractionState, Modifiers, PointerTarget,
};
use crate::playback::PlaybackSync;
use crate::publish::{PublishMeta, PublishRequest};
use cutline_core::timeline::TimelineModel;
use cutline_core::types::{Clip, Project};
use cutline_media::player::{Player, PlayerEvent};
use cutline_media::resolver::{DurationProbe, DurationResolver};
use cutline_media::source::{SourceLibrary, SourceMedia};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// EditorSession
// ---------------------------------------------------------------------------

/// Root wiring of the editing engine: owns the timeline model, the gesture
/// controller, the playback bridge, the source registry and the duration
/// resolver, and forwards between them.
///
/// All model mutations funnel through this one owner, which keeps the
/// single-sequence mutation guarantee without locking.
pub struct EditorSession<P: Player, D: DurationProbe> {
    name: String,
    model: TimelineModel,
    controller: InteractionController,
    playback: PlaybackSync<P>,
    sources: SourceLibrary,
    resolver: DurationResolver<D>,
}

impl<P: Player, D: DurationProbe> EditorSession<P, D> {
    pub fn new(name: impl Into<String>, player: P, probe: D, pixels_per_second: f64) -> Self {
        Self {
            name: name.into(),
            model: TimelineModel::new(),
            controller: InteractionController::new(pixels_per_second),
            playback: PlaybackSync::new(player),
            sources: SourceLibrary::new(),
            resolver: DurationResolver::new(probe),
        }
    }

    // -----------------------------------------------------------------------
    // Sources and clips
    // -----------------------------------------------------------------------

    pub fn register_source(&mut self, source: SourceMedia) {
        self.sources.insert(source);
    }

    /// Place a new clip spanning the full source at the end of the timeline.
    /// An unregistered source is rejected with no mutation.
    pub async fn add_clip(&mut self, source_ref: Uuid) -> Result<Uuid> {
        let source = self
            .sources
            .get(source_ref)
            .ok_or(EngineError::UnknownSource(source_ref))?;
        let declared = source.duration_seconds;
        let url = source.playable_url.clone();

        let duration = self.resolver.resolve(source_ref, declared, &url).await;
        let clip = Clip::new(source_ref, duration, self.model.timeline_end());
        let key = clip.key;
        tracing::info!(%source_ref, %key, duration, "adding clip to timeline");
        self.model.add(clip);
        Ok(key)
    }

    pub fn remove_clip(&mut self, key: Uuid) -> Result<()> {
        self.model.remove(key)?;
        if self.controller.selected() == Some(key) {
            self.controller.clear_selection();
        }
        tracing::info!(%key, "removed clip");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pointer events
    // -----------------------------------------------------------------------

    pub fn pointer_down(&mut self, target: PointerTarget, x_px: f64) -> Result<()> {
        let effect = self.controller.pointer_down(target, x_px, &self.model);
        self.apply(effect)
    }

    pub fn pointer_move(&mut self, x_px: f64, modifiers: Modifiers) -> Result<()> {
        let effect = self.controller.pointer_move(x_px, modifiers, &mut self.model);
        self.apply(effect)
    }

    pub fn pointer_up(&mut self) -> Result<()> {
        let effect = self.controller.pointer_up(&mut self.model);
        self.apply(effect)
    }

    pub fn pointer_cancel(&mut self) {
        self.controller.pointer_cancel(&mut self.model);
    }

    fn apply(&mut self, effect: GestureEffect) -> Result<()> {
        match effect {
            GestureEffect::Scrub(time) => {
                self.playback.set_playhead(time, &self.model, &self.sources)?;
            }
            GestureEffect::Select(_) | GestureEffect::None => {}
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Playback
    // -----------------------------------------------------------------------

    pub fn play(&mut self) -> Result<()> {
        self.playback.play()
    }

    pub fn pause(&mut self) -> Result<()> {
        self.playback.pause()
    }

    pub fn player_event(&mut self, event: PlayerEvent) -> Result<()> {
        self.playback.handle_event(event, &self.model, &self.sources)
    }

    // -----------------------------------------------------------------------
    // Persistence and publish
    // -----------------------------------------------------------------------

    pub fn save_project(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let project = Project::from_model(&self.name, &self.model, self.playback.playhead());
        project.save_to_file(path)?;
        Ok(())
    }

    /// Replace the session's timeline with a loaded project. Records whose
    /// source is not registered are skipped rather than crashing the load.
    pub async fn load_project(&mut self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let project = Project::load_from_file(path)?;

        let mut model = TimelineModel::new();
        for record in &project.clips {
            let Some(source) = self.sources.get(record.source_ref) else {
                tracing::warn!(source_ref = %record.source_ref, "skipping clip with unknown source");
                continue;
            };
            let declared = source.duration_seconds;
            let url = source.playable_url.clone();
            let duration = self
                .resolver
                .resolve(record.source_ref, declared, &url)
                .await;
            model.add(Clip {
                key: Uuid::new_v4(),
                source_ref: record.source_ref,
                source_duration: duration,
                start: record.start,
                source_in: record.source_in,
                source_out: record.source_out,
            });
        }

        self.name = project.name;
        self.model = model;
        self.controller.clear_selection();
        self.playback
            .set_playhead(project.playhead, &self.model, &self.sources)?;
        tracing::info!(name = %self.name, clips = self.model.len(), "loaded project");
        Ok(())
    }

    pub fn publish_request(&self, meta: PublishMeta) -> PublishRequest {
        PublishRequest::new(meta, &self.name, &self.model)
    }

    // -----------------------------------------------------------------------
    // Read-only snapshots for the rendering layer
    // -----------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clips(&self) -> Vec<&Clip> {
        self.model.sorted_clips()
    }

    pub fn timeline_end(&self) -> f64 {
        self.model.timeline_end()
    }

    pub fn playhead(&self) -> f64 {
        self.playback.playhead()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn selected_clip(&self) -> Option<Uuid> {
        self.controller.selected()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
