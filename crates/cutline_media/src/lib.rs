//! Boundary with the media subsystem: source descriptors, duration probing
//! with caching and fallback, and the player control surface.

pub mod error;
pub mod mpv;
pub mod player;
pub mod probe;
pub mod resolver;
pub mod source;
