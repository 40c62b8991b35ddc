/*!
 * Mock provider implementation for testing.
 *
 * The mock never touches the network. Its behavior is chosen up front:
 * - `MockProvider::working(tracks)` - finds a song and returns the given tracks
 * - `MockProvider::not_found()` - every search misses
 * - `MockProvider::failing_search()` / `failing_fetch()` - errors at that step
 * - `MockProvider::rejected_search(status)` - the search endpoint answers with `status`
 * - `MockProvider::miss_first_search(tracks)` - only the retry search hits
 */

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::lyrics::TrackSet;
use crate::providers::netease::search_outcome;
use crate::providers::{LyricProvider, SongId};

/// Song id the mock hands out
pub const MOCK_SONG_ID: SongId = 42;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Search hits, fetch returns the tracks
    Working(TrackSet),
    /// Search never hits
    NotFound,
    /// Search fails with a connection error
    FailingSearch,
    /// Search hits, fetch fails with an API error
    FailingFetch,
    /// The search endpoint replies with this HTTP status and an HTML body
    RejectedSearch(StatusCode),
    /// The first search misses, later searches hit
    MissOnFirstSearch(TrackSet),
}

/// Mock provider for testing lookup behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of search calls
    search_count: Arc<AtomicUsize>,
    /// Number of fetch calls
    fetch_count: Arc<AtomicUsize>,
    /// Keywords received, in order
    keywords: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            search_count: Arc::new(AtomicUsize::new(0)),
            fetch_count: Arc::new(AtomicUsize::new(0)),
            keywords: Mutex::new(Vec::new()),
        }
    }

    pub fn working(tracks: TrackSet) -> Self {
        Self::new(MockBehavior::Working(tracks))
    }

    pub fn not_found() -> Self {
        Self::new(MockBehavior::NotFound)
    }

    pub fn failing_search() -> Self {
        Self::new(MockBehavior::FailingSearch)
    }

    pub fn failing_fetch() -> Self {
        Self::new(MockBehavior::FailingFetch)
    }

    pub fn rejected_search(status: StatusCode) -> Self {
        Self::new(MockBehavior::RejectedSearch(status))
    }

    pub fn miss_first_search(tracks: TrackSet) -> Self {
        Self::new(MockBehavior::MissOnFirstSearch(tracks))
    }

    /// Get the number of searches made
    pub fn search_count(&self) -> usize {
        self.search_count.load(Ordering::SeqCst)
    }

    /// Get the number of fetches made
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Keywords searched so far
    pub fn keywords(&self) -> Vec<String> {
        match self.keywords.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl LyricProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, keyword: &str) -> Result<Option<SongId>, ProviderError> {
        let call = self.search_count.fetch_add(1, Ordering::SeqCst);
        match self.keywords.lock() {
            Ok(mut guard) => guard.push(keyword.to_string()),
            Err(poisoned) => poisoned.into_inner().push(keyword.to_string()),
        }

        match &self.behavior {
            MockBehavior::Working(_) | MockBehavior::FailingFetch => Ok(Some(MOCK_SONG_ID)),
            MockBehavior::NotFound => Ok(None),
            MockBehavior::FailingSearch => Err(ProviderError::ConnectionError("mock connection refused".to_string())),
            MockBehavior::MissOnFirstSearch(_) => Ok((call > 0).then_some(MOCK_SONG_ID)),
            MockBehavior::RejectedSearch(status) => search_outcome(*status, "<html>unavailable</html>"),
        }
    }

    async fn fetch_tracks(&self, song_id: SongId) -> Result<TrackSet, ProviderError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working(tracks) | MockBehavior::MissOnFirstSearch(tracks) => Ok(tracks.clone()),
            MockBehavior::FailingFetch => Err(ProviderError::ApiError {
                status_code: 503,
                message: format!("mock fetch failure for song {}", song_id),
            }),
            MockBehavior::NotFound | MockBehavior::FailingSearch | MockBehavior::RejectedSearch(_) => {
                Ok(TrackSet::default())
            }
        }
    }
}
