// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use lyricsync::app_config::{self, Config, ConfigStore, MergeStrategy};
use lyricsync::app_controller::{Controller, LookupOutcome, MediaItem};
use lyricsync::file_utils::FileManager;
use lyricsync::lyrics::{LyricTrack, MergeEngine, TrackSet};
use lyricsync::notifications::LogSink;
use lyricsync::providers::netease::Netease;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for MergeStrategy to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMergeStrategy {
    Layered,
    Legacy,
}

impl From<CliMergeStrategy> for MergeStrategy {
    fn from(cli_strategy: CliMergeStrategy) -> Self {
        match cli_strategy {
            CliMergeStrategy::Layered => MergeStrategy::Layered,
            CliMergeStrategy::Legacy => MergeStrategy::Legacy,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look a song up on NetEase Cloud Music and print its merged lyrics
    Fetch(FetchArgs),

    /// Merge local lyric track files
    Merge(MergeArgs),

    /// Generate shell completions for lyricsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct FetchArgs {
    /// Song title
    #[arg(short, long)]
    title: String,

    /// Song artist
    #[arg(short, long, default_value = "")]
    artist: String,

    /// Write the lyrics here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Line-level plain lyric file
    #[arg(short, long)]
    plain: Option<PathBuf>,

    /// Line-level translation file
    #[arg(short, long)]
    translation: Option<PathBuf>,

    /// Line-level romanization file
    #[arg(short, long)]
    romanization: Option<PathBuf>,

    /// Word-level track file
    #[arg(short, long)]
    word_level: Option<PathBuf>,

    /// Merge strategy, overrides the config file
    #[arg(short, long, value_enum)]
    strategy: Option<CliMergeStrategy>,

    /// Write the lyrics here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// lyricsync - multi-track lyric merger
///
/// Merges plain, translated, romanized and word-level lyric tracks of one
/// song into a single time-ordered LRC stream.
#[derive(Parser, Debug)]
#[command(name = "lyricsync")]
#[command(version)]
#[command(about = "Multi-track lyric synchronization tool")]
#[command(long_about = "lyricsync merges the lyric tracks of a song into one time-ordered LRC stream.

EXAMPLES:
    lyricsync fetch -t \"Song\" -a \"Artist\"              # Look up and print merged lyrics
    lyricsync fetch -t \"Song\" -o song.lrc               # Save merged lyrics to a file
    lyricsync merge -p song.lrc -t song.zh.lrc          # Merge local tracks
    lyricsync merge -p song.lrc -w song.yrc -s legacy   # Pick the merge strategy
    lyricsync completions bash > lyricsync.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The file is re-read for every lookup.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and label for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, label) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "lyricsync", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config.validate()
        .context("Configuration validation failed")?;

    match cli.command {
        Commands::Fetch(args) => run_fetch(args, &config, &cli.config_path).await,
        Commands::Merge(args) => run_merge(args, config),
        Commands::Completions { .. } => Ok(()),
    }
}

async fn run_fetch(args: FetchArgs, config: &Config, config_path: &Path) -> Result<()> {
    let provider = Netease::new(&config.provider)?;
    let controller = Controller::new(
        Arc::new(provider),
        ConfigStore::file(config_path),
        Arc::new(LogSink),
    );

    let item = MediaItem::new(args.title, args.artist);
    let result = controller.lookup(&item).await;

    match result.outcome {
        LookupOutcome::Lyrics { text, report } => {
            info!(
                "Merged {} lines ({} path, {}/{} word lines aligned)",
                report.emitted_lines, report.path, report.matched, report.word_lines
            );
            emit_output(&text, args.output.as_deref())
        }
        LookupOutcome::NoLyrics => {
            warn!("'{}' has no lyrics", item.title);
            Ok(())
        }
        LookupOutcome::SongNotFound => Err(anyhow!("No song found for '{}'", item.title)),
        LookupOutcome::Disabled => {
            warn!("Lookups are disabled in {}", config_path.display());
            Ok(())
        }
        LookupOutcome::Skipped => Err(anyhow!("A title or artist is required")),
        LookupOutcome::Failed { message } => Err(anyhow!(message)),
    }
}

fn run_merge(args: MergeArgs, mut config: Config) -> Result<()> {
    // A track given on the command line is always merged
    if args.translation.is_some() {
        config.merge.enable_translation = true;
    }
    if args.romanization.is_some() {
        config.merge.enable_romanization = true;
    }
    if args.word_level.is_some() {
        config.merge.enable_word_level = true;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }

    let tracks = read_tracks(&args)?;
    if tracks.is_empty() {
        return Err(anyhow!("No lyric track given; pass at least one of --plain, --translation, --romanization, --word-level"));
    }

    let outcome = MergeEngine::new(config.merge_options()).merge(&tracks);
    let Some(lyrics) = outcome.lyrics else {
        warn!("Nothing to merge: every track was empty or malformed");
        return Ok(());
    };

    info!(
        "Merged {} lines ({} path, {} skipped)",
        outcome.report.emitted_lines, outcome.report.path, outcome.report.skipped_lines
    );
    emit_output(&lyrics, args.output.as_deref())
}

fn read_tracks(args: &MergeArgs) -> Result<TrackSet> {
    let files = [
        (LyricTrack::Plain, &args.plain),
        (LyricTrack::Translation, &args.translation),
        (LyricTrack::Romanization, &args.romanization),
        (LyricTrack::WordLevel, &args.word_level),
    ];

    let mut tracks = TrackSet::default();
    for (track, path) in files {
        if let Some(content) = FileManager::read_optional(path.as_deref())? {
            tracks = tracks.with_track(track, content);
        }
    }

    Ok(tracks)
}

fn emit_output(lyrics: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            FileManager::write_to_file(path, lyrics)?;
            info!("Success: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout.write_all(lyrics.as_bytes())
                .context("Failed to write lyrics to stdout")?;
        }
    }
    Ok(())
}
