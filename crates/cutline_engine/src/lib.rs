//! Interactive timeline editing engine: pointer gestures, playback
//! synchronization with auto-advance, and session wiring.

pub mod error;
pub mod interaction;
pub mod playback;
pub mod publish;
pub mod session;
