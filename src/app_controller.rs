use log::{debug, error, info, warn};
use std::sync::Arc;

use crate::app_config::{Config, ConfigStore};
use crate::errors::AppError;
use crate::keyword;
use crate::lyrics::{MergeEngine, MergeReport};
use crate::notifications::{LookupEvent, NotificationSink};
use crate::providers::LyricProvider;

// @module: Lookup controller for one playing song

/// The song whose lyrics are wanted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaItem {
    pub title: String,
    pub artist: String,
}

impl MediaItem {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }
}

/// How a lookup ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Merged lyric text
    Lyrics { text: String, report: MergeReport },
    /// A song was found but nothing could be merged
    NoLyrics,
    /// No song matched the keyword or its cleaned form
    SongNotFound,
    /// Lookups are switched off in the configuration
    Disabled,
    /// Title and artist were both blank
    Skipped,
    /// A collaborator failed
    Failed { message: String },
}

impl LookupOutcome {
    pub fn lyrics(&self) -> Option<&str> {
        match self {
            Self::Lyrics { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Outcome plus every event raised on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub outcome: LookupOutcome,
    pub events: Vec<LookupEvent>,
}

/// Main application controller for lyric lookups
pub struct Controller {
    // @field: Song catalog
    provider: Arc<dyn LyricProvider>,

    // @field: Configuration source, read once per lookup
    config: ConfigStore,

    // @field: Where user-facing messages go
    sink: Arc<dyn NotificationSink>,
}

/// Event collection for one lookup
struct EventLog<'a> {
    sink: &'a dyn NotificationSink,
    dispatch: bool,
    events: Vec<LookupEvent>,
}

impl EventLog<'_> {
    fn emit(&mut self, event: LookupEvent) {
        if self.dispatch {
            self.sink.notify(event.severity(), &event.message());
        }
        self.events.push(event);
    }
}

impl Controller {
    // @method: Create a new controller from its collaborators
    pub fn new(provider: Arc<dyn LyricProvider>, config: ConfigStore, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            provider,
            config,
            sink,
        }
    }

    /// Look up, fetch and merge the lyrics of `item`.
    ///
    /// Never fails: collaborator errors end as `LookupOutcome::Failed` with a
    /// single `LookupFailed` event.
    pub async fn lookup(&self, item: &MediaItem) -> LookupResult {
        let config = match self.config.snapshot() {
            Ok(config) => config,
            Err(e) => {
                let error = AppError::config(&e);
                error!("Lyric lookup aborted: {}", error);
                let mut log = EventLog { sink: self.sink.as_ref(), dispatch: true, events: Vec::new() };
                log.emit(LookupEvent::LookupFailed { message: error.to_string() });
                return LookupResult {
                    outcome: LookupOutcome::Failed { message: error.to_string() },
                    events: log.events,
                };
            }
        };

        let mut log = EventLog {
            sink: self.sink.as_ref(),
            dispatch: config.merge.show_notifications,
            events: Vec::new(),
        };

        let outcome = match self.run(item, &config, &mut log).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Lyric lookup for '{}' failed: {}", item.title, e);
                log.emit(LookupEvent::LookupFailed { message: e.to_string() });
                LookupOutcome::Failed { message: e.to_string() }
            }
        };

        LookupResult {
            outcome,
            events: log.events,
        }
    }

    async fn run(&self, item: &MediaItem, config: &Config, log: &mut EventLog<'_>) -> Result<LookupOutcome, AppError> {
        if !config.merge.enable_plugin {
            debug!("Lyric lookups are disabled");
            return Ok(LookupOutcome::Disabled);
        }

        let keyword = keyword::build_keyword(&item.title, &item.artist);
        if keyword.is_empty() {
            debug!("Blank title and artist, nothing to look up");
            return Ok(LookupOutcome::Skipped);
        }

        log.emit(LookupEvent::Matching { title: item.title.clone() });

        let mut song_id = self.provider.search(&keyword).await?;
        if song_id.is_none() {
            if let Some(cleaned) = keyword::retry_keyword(&keyword) {
                info!("No {} match for '{}', retrying with '{}'", self.provider.name(), keyword, cleaned);
                song_id = self.provider.search(&cleaned).await?;
            }
        }

        let Some(song_id) = song_id else {
            warn!("No song found for '{}'", keyword);
            log.emit(LookupEvent::SongNotFound { title: item.title.clone() });
            return Ok(LookupOutcome::SongNotFound);
        };

        let tracks = self.provider.fetch_tracks(song_id).await?;
        let outcome = MergeEngine::new(config.merge_options()).merge(&tracks);

        match outcome.lyrics {
            Some(text) => {
                log.emit(LookupEvent::MatchSucceeded {
                    matched: outcome.report.matched,
                    word_lines: outcome.report.word_lines,
                });
                Ok(LookupOutcome::Lyrics { text, report: outcome.report })
            }
            None => {
                warn!("Song {} has no usable lyric lines", song_id);
                log.emit(LookupEvent::NoLyrics { title: item.title.clone() });
                Ok(LookupOutcome::NoLyrics)
            }
        }
    }
}
