//! Timeline data model and pure editing math: clips on a shared time axis,
//! timeline/source time mapping, and snap computation.

pub mod error;
pub mod project;
pub mod snapping;
pub mod timeline;
pub mod timemap;
pub mod types;
