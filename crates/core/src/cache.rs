use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use tokio::sync::OnceCell;

use crate::{error::Result, services::TranscriptSource, types::Transcript};

/// Get the working directory for a given video reference
pub fn get_cache_dir(video_ref: &str) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    video_ref.hash(&mut hasher);
    let ref_hash = hasher.finish();

    get_root_cache_dir().join(ref_hash.to_string())
}

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("shpora")
}

/// Find a downloaded subtitle track in the working directory
pub fn find_subtitles_in_cache(cache_dir: &Path) -> Option<PathBuf> {
    let Ok(entries) = std::fs::read_dir(cache_dir) else {
        return None;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if let Some(ext) = path.extension() {
            if ext.to_string_lossy().eq_ignore_ascii_case("json3") {
                return Some(path);
            }
        }
    }
    None
}

struct Slot {
    video_ref: Option<String>,
    cell: Arc<OnceCell<Arc<Transcript>>>,
}

/// Holds at most one transcript per session, keyed by video reference.
///
/// The first caller for a reference performs the remote fetch; callers that
/// race against it await the same in-flight fetch instead of issuing their
/// own. A failed fetch leaves the cache empty.
pub struct TranscriptCache {
    source: Arc<dyn TranscriptSource>,
    slot: Mutex<Slot>,
}

impl TranscriptCache {
    pub fn new(source: Arc<dyn TranscriptSource>) -> Self {
        Self {
            source,
            slot: Mutex::new(Slot {
                video_ref: None,
                cell: Arc::new(OnceCell::new()),
            }),
        }
    }

    /// Return the transcript for `video_ref`, fetching it on first use.
    /// Asking for a different reference than the cached one resets the slot.
    pub async fn get_or_fetch(&self, video_ref: &str) -> Result<Arc<Transcript>> {
        let cell = {
            let mut slot = self.slot.lock().expect("transcript cache poisoned");
            if slot.video_ref.as_deref() != Some(video_ref) {
                slot.video_ref = Some(video_ref.to_string());
                slot.cell = Arc::new(OnceCell::new());
            }
            Arc::clone(&slot.cell)
        };

        let transcript = cell
            .get_or_try_init(|| async {
                tracing::debug!(video_ref, "fetching transcript");
                self.source.fetch_transcript(video_ref).await.map(Arc::new)
            })
            .await?;

        Ok(Arc::clone(transcript))
    }

    /// Drop the cached transcript so the next `get_or_fetch` performs a fresh
    /// remote fetch. An in-flight fetch keeps writing into the detached cell
    /// and cannot repopulate the cleared slot.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().expect("transcript cache poisoned");
        slot.video_ref = None;
        slot.cell = Arc::new(OnceCell::new());
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::error::ShporaError;

    struct SlowSource {
        calls: AtomicUsize,
    }

    impl SlowSource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TranscriptSource for SlowSource {
        async fn fetch_transcript(&self, video_ref: &str) -> Result<Transcript> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(Transcript {
                text: format!("transcript of {video_ref}"),
                segments: Vec::new(),
                language: "en".to_string(),
            })
        }
    }

    struct FlakySource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TranscriptSource for FlakySource {
        async fn fetch_transcript(&self, video_ref: &str) -> Result<Transcript> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                return Err(ShporaError::TranscriptUnavailable {
                    video_ref: video_ref.to_string(),
                    reason: "no captions".to_string(),
                });
            }
            Ok(Transcript {
                text: format!("transcript of {video_ref}"),
                segments: Vec::new(),
                language: "en".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let source = SlowSource::new();
        let cache = TranscriptCache::new(source.clone());

        let first = cache.get_or_fetch("v1").await.unwrap();
        let second = cache.get_or_fetch("v1").await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_fetch() {
        let source = SlowSource::new();
        let cache = TranscriptCache::new(source.clone());

        let (a, b) = tokio::join!(cache.get_or_fetch("v1"), cache.get_or_fetch("v1"));

        assert_eq!(a.unwrap().text, b.unwrap().text);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let source = Arc::new(FlakySource {
            calls: AtomicUsize::new(0),
        });
        let cache = TranscriptCache::new(source.clone());

        let err = cache.get_or_fetch("v1").await.unwrap_err();
        assert!(matches!(err, ShporaError::TranscriptUnavailable { .. }));

        cache.get_or_fetch("v1").await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_a_fresh_fetch() {
        let source = SlowSource::new();
        let cache = TranscriptCache::new(source.clone());

        cache.get_or_fetch("v1").await.unwrap();
        cache.invalidate();
        cache.get_or_fetch("v1").await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn switching_reference_resets_the_slot() {
        let source = SlowSource::new();
        let cache = TranscriptCache::new(source.clone());

        let first = cache.get_or_fetch("v1").await.unwrap();
        let second = cache.get_or_fetch("v2").await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_ne!(first.text, second.text);
    }
}
