use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Duration assumed for sources whose metadata cannot be read, in seconds.
pub const FALLBACK_DURATION: f64 = 12.0;

/// Durations below this are treated as junk (unreadable or zero-length).
const MIN_PLAUSIBLE_DURATION: f64 = 0.01;

// ---------------------------------------------------------------------------
// DurationProbe
// ---------------------------------------------------------------------------

/// Asynchronous metadata-only duration lookup against a playable URL.
pub trait DurationProbe {
    fn probe_duration(&self, url: &str) -> impl Future<Output = anyhow::Result<f64>> + Send;
}

// ---------------------------------------------------------------------------
// DurationResolver
// ---------------------------------------------------------------------------

/// Resolves a source's total duration: trust a declared value, fall back to
/// the cache, probe as a last resort. Never fails; a broken probe yields
/// `FALLBACK_DURATION`, and that result is latched so a dead source is not
/// re-probed on every placement.
pub struct DurationResolver<P> {
    probe: P,
    cache: Mutex<HashMap<Uuid, f64>>,
}

impl<P: DurationProbe> DurationResolver<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Every entry in the cache is a complete, valid duration, so a lock
    /// poisoned by a panicking sibling task loses nothing.
    fn cache(&self) -> MutexGuard<'_, HashMap<Uuid, f64>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Resolve the duration for `source_ref`.
    ///
    /// A plausible declared duration always wins and refreshes the cache, so
    /// a previously latched fallback does not poison later resolutions that
    /// arrive with real metadata.
    pub async fn resolve(&self, source_ref: Uuid, declared: Option<f64>, url: &str) -> f64 {
        if let Some(declared) = declared {
            if declared.is_finite() && declared > MIN_PLAUSIBLE_DURATION {
                self.cache().insert(source_ref, declared);
                return declared;
            }
        }

        if let Some(&cached) = self.cache().get(&source_ref) {
            return cached;
        }

        let resolved = match self.probe.probe_duration(url).await {
            Ok(d) if d.is_finite() && d > MIN_PLAUSIBLE_DURATION => d,
            Ok(d) => {
                tracing::warn!(%source_ref, duration = d, "probe returned junk duration, using fallback");
                FALLBACK_DURATION
            }
            Err(e) => {
                tracing::warn!(%source_ref, error = %e, "duration probe failed, using fallback");
                FALLBACK_DURATION
            }
        };

        self.cache().insert(source_ref, resolved);
        resolved
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
