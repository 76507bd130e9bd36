use crate::error::Result;

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Control surface of the single active media player.
///
/// Commands are fire-and-forget; completion and position flow back through
/// `PlayerEvent`s that the host feeds into the playback bridge.
pub trait Player {
    /// Load a new source. The player is not seekable again until it reports
    /// `PlayerEvent::LoadedMetadata`.
    fn set_source(&mut self, url: &str) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    /// Seek to an absolute position in the loaded source, in seconds.
    fn seek(&mut self, seconds: f64) -> Result<()>;
}

// ---------------------------------------------------------------------------
// PlayerEvent
// ---------------------------------------------------------------------------

/// Native player notifications, in the player's own source time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerEvent {
    /// A freshly loaded source became seekable.
    LoadedMetadata,
    /// Periodic position report, in source seconds.
    TimeUpdate { position: f64 },
    /// A commanded seek completed.
    Seeked,
    /// The loaded source ran out.
    Ended,
}
