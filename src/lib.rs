/*!
 * # lyricsync - multi-track lyric synchronization
 *
 * A Rust library that merges the lyric tracks of one song into a single
 * time-ordered LRC stream.
 *
 * ## Features
 *
 * - Parse line-level `[mm:ss.xx]` tracks and word-level `[start,dur](t,d,f)` tracks
 * - Align word-level lines onto plain-lyric timestamps:
 *   - exact normalized text match
 *   - containment match
 *   - nearest timestamp fallback
 * - Attach translation and romanization lines to the right sung line
 * - Suppress production-credit lines such as "作词：..." or "Lyrics by ..."
 * - Look songs up on NetEase Cloud Music
 * - Hot-reloaded JSON configuration
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `lyrics`: the synchronous merge core:
 *   - `lyrics::timestamp`: tag grammars and output formatting
 *   - `lyrics::parser`: track parsing into time maps and word lines
 *   - `lyrics::metadata`: credit-line detection
 *   - `lyrics::alignment`: tiered timestamp matching
 *   - `lyrics::merge`: the merge engine
 * - `app_config`: Configuration management
 * - `app_controller`: Lookup controller (search, fetch, merge, notify)
 * - `keyword`: Search keyword construction and cleanup
 * - `notifications`: Lookup events and notification sinks
 * - `providers`: Song catalog clients:
 *   - `providers::netease`: NetEase Cloud Music API client
 *   - `providers::mock`: scripted provider for tests
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod keyword;
pub mod lyrics;
pub mod notifications;
pub mod providers;

// Re-export main types for easier usage
pub use app_config::{Config, ConfigStore};
pub use app_controller::{Controller, LookupOutcome, LookupResult, MediaItem};
pub use errors::{AppError, ProviderError};
pub use lyrics::{LyricTrack, MergeEngine, MergeOptions, TrackSet, merge::merge_tracks};
pub use notifications::{LookupEvent, NotificationSink, Severity};
