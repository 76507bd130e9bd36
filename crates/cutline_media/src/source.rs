use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// SourceMedia
// ---------------------------------------------------------------------------

/// Descriptor of a source media item as delivered by the asset service.
/// `duration_seconds` is optional; when absent the duration resolver probes
/// the playable URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceMedia {
    pub id: Uuid,
    pub duration_seconds: Option<f64>,
    pub playable_url: String,
}

// ---------------------------------------------------------------------------
// SourceLibrary
// ---------------------------------------------------------------------------

/// Registry of the sources known to the session. Clips reference sources by
/// id; anything not registered here is rejected at add time.
#[derive(Debug, Clone, Default)]
pub struct SourceLibrary {
    sources: HashMap<Uuid, SourceMedia>,
}

impl SourceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: SourceMedia) {
        self.sources.insert(source.id, source);
    }

    pub fn get(&self, id: Uuid) -> Option<&SourceMedia> {
        self.sources.get(&id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.sources.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut library = SourceLibrary::new();
        let id = Uuid::new_v4();
        library.insert(SourceMedia {
            id,
            duration_seconds: Some(10.0),
            playable_url: "http://media.local/v/1.mp4".to_string(),
        });

        assert!(library.contains(id));
        assert_eq!(library.get(id).unwrap().duration_seconds, Some(10.0));
        assert!(!library.contains(Uuid::new_v4()));
    }

    #[test]
    fn reinsert_replaces_descriptor() {
        let mut library = SourceLibrary::new();
        let id = Uuid::new_v4();
        let url = "http://media.local/v/1.mp4".to_string();
        library.insert(SourceMedia {
            id,
            duration_seconds: None,
            playable_url: url.clone(),
        });
        library.insert(SourceMedia {
            id,
            duration_seconds: Some(7.5),
            playable_url: url,
        });

        assert_eq!(library.len(), 1);
        assert_eq!(library.get(id).unwrap().duration_seconds, Some(7.5));
    }
}
