use crate::error::Result;
use cutline_core::timeline::TimelineModel;
use cutline_core::timemap::{source_time, timeline_time_from_source};
use cutline_media::player::{Player, PlayerEvent};
use cutline_media::source::SourceLibrary;
use uuid::Uuid;

/// How close (in source seconds) the player may get to a clip's out point
/// before we hand off to the next clip, ahead of the native ended signal.
pub const BOUNDARY_EPS: f64 = 0.03;

/// Nudge past a clip's end when looking up its successor.
pub const ADVANCE_EPS: f64 = 0.001;

// ---------------------------------------------------------------------------
// PlaybackSync
// ---------------------------------------------------------------------------

/// Bidirectional bridge between the single media player and the timeline
/// playhead.
///
/// Timeline -> player: scrubs resolve the clip under the playhead and seek
/// the player into its source. Player -> timeline: native time updates map
/// back into playhead positions, with auto-advance across clip boundaries.
/// A re-entrancy guard keeps the two directions from feeding back into each
/// other: position reports are ignored while a commanded seek is in flight.
pub struct PlaybackSync<P: Player> {
    player: P,
    playhead: f64,
    playing: bool,
    active_clip: Option<Uuid>,
    loaded_source: Option<Uuid>,
    /// Source position to apply once a freshly loaded source is seekable.
    pending_seek: Option<f64>,
    seek_in_flight: bool,
}

impl<P: Player> PlaybackSync<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            playhead: 0.0,
            playing: false,
            active_clip: None,
            loaded_source: None,
            pending_seek: None,
            seek_in_flight: false,
        }
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The clip playback is currently bound to. Time-derived; independent of
    /// the UI selection.
    pub fn active_clip(&self) -> Option<Uuid> {
        self.active_clip
    }

    pub fn play(&mut self) -> Result<()> {
        self.playing = true;
        self.player.play()?;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.playing = false;
        self.player.pause()?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Timeline -> player
    // -----------------------------------------------------------------------

    /// Move the playhead (scrub direction) and reseek the player to match.
    /// No clip under the playhead is a valid state: the player stays parked.
    pub fn set_playhead(
        &mut self,
        time: f64,
        model: &TimelineModel,
        sources: &SourceLibrary,
    ) -> Result<()> {
        self.playhead = time.max(0.0);

        match model.clip_at(self.playhead) {
            Some(clip) => {
                let (key, source_ref) = (clip.key, clip.source_ref);
                let position = source_time(clip, self.playhead);
                self.bind(key, source_ref, position, sources)
            }
            None => {
                self.active_clip = None;
                Ok(())
            }
        }
    }

    /// Point the player at `source_ref` at `position` seconds, reloading the
    /// source when it differs from the loaded one. A reload defers the seek
    /// until the new source reports its metadata.
    fn bind(
        &mut self,
        key: Uuid,
        source_ref: Uuid,
        position: f64,
        sources: &SourceLibrary,
    ) -> Result<()> {
        self.active_clip = Some(key);

        if self.loaded_source != Some(source_ref) {
            let Some(source) = sources.get(source_ref) else {
                tracing::warn!(%source_ref, "clip references unregistered source, parking player");
                self.active_clip = None;
                return Ok(());
            };
            tracing::debug!(%source_ref, position, "switching player source");
            self.player.set_source(&source.playable_url)?;
            self.loaded_source = Some(source_ref);
            self.pending_seek = Some(position);
        } else {
            self.seek_in_flight = true;
            self.player.seek(position)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Player -> timeline
    // -----------------------------------------------------------------------

    pub fn handle_event(
        &mut self,
        event: PlayerEvent,
        model: &TimelineModel,
        sources: &SourceLibrary,
    ) -> Result<()> {
        match event {
            PlayerEvent::LoadedMetadata => {
                if let Some(position) = self.pending_seek.take() {
                    self.seek_in_flight = true;
                    self.player.seek(position)?;
                }
                if self.playing {
                    self.player.play()?;
                }
            }
            PlayerEvent::TimeUpdate { position } => {
                if self.seek_in_flight {
                    return Ok(());
                }
                let Some(key) = self.active_clip else {
                    return Ok(());
                };
                let Some(clip) = model.get(key) else {
                    // Active clip was removed out from under playback.
                    self.active_clip = None;
                    return Ok(());
                };

                let (end, out) = (clip.end(), clip.source_out);
                self.playhead = timeline_time_from_source(clip, position);

                if self.playing && position >= out - BOUNDARY_EPS {
                    self.advance_from(end, model, sources)?;
                }
            }
            PlayerEvent::Seeked => {
                self.seek_in_flight = false;
            }
            PlayerEvent::Ended => {
                if let Some(key) = self.active_clip {
                    if let Some(end) = model.get(key).map(|c| c.end()) {
                        self.advance_from(end, model, sources)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Hand off to the clip at the finished clip's end, or stop at the gap.
    fn advance_from(
        &mut self,
        end: f64,
        model: &TimelineModel,
        sources: &SourceLibrary,
    ) -> Result<()> {
        match model.clip_at(end + ADVANCE_EPS) {
            Some(next) => {
                let (key, source_ref, start) = (next.key, next.source_ref, next.start);
                let position = source_time(next, start);
                tracing::debug!(clip = %key, start, "auto-advancing to next clip");
                self.playhead = start;
                let same_source = self.loaded_source == Some(source_ref);
                self.bind(key, source_ref, position, sources)?;
                // A player that already signalled ended sits paused, so a
                // same-source handoff must resume explicitly. A reload path
                // resumes on LoadedMetadata instead.
                if self.playing && same_source {
                    self.player.play()?;
                }
                Ok(())
            }
            None => {
                tracing::debug!(end, "no clip past boundary, stopping playback");
                self.playing = false;
                self.player.pause()?;
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
