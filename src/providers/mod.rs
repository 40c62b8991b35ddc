/*!
 * Lyric catalog providers.
 *
 * A provider answers two questions, one after the other: which song best
 * matches a keyword, and what lyric tracks that song has.
 * - `netease`: NetEase Cloud Music public API
 * - `mock`: scripted provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::lyrics::TrackSet;

/// Catalog identifier of a song
pub type SongId = u64;

/// Common trait for all lyric catalogs
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the controller.
#[async_trait]
pub trait LyricProvider: Send + Sync + Debug {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Search the catalog and return the top hit, if any
    ///
    /// # Arguments
    /// * `keyword` - Free-text search keyword
    ///
    /// # Returns
    /// * `Ok(None)` when the catalog has no match
    async fn search(&self, keyword: &str) -> Result<Option<SongId>, ProviderError>;

    /// Fetch the raw lyric tracks of a song
    ///
    /// Missing tracks are `None` in the returned set, not errors.
    async fn fetch_tracks(&self, song_id: SongId) -> Result<TrackSet, ProviderError>;
}

pub mod mock;
pub mod netease;
