// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod language_utils;
mod merge;
mod providers;
mod shift;
mod subtitle_processor;
mod timecode;
mod translation;

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

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Shift every timecode by a signed number of seconds
    Shift {
        /// Input SRT file
        input: PathBuf,
        /// Output SRT file
        output: PathBuf,
        /// Seconds to shift by (negative shifts clamp at 00:00:00,000)
        #[arg(allow_negative_numbers = true)]
        delta_seconds: i64,
    },

    /// Shift the whole file so the first timing line starts at a new time
    Rebase {
        /// Input SRT file
        input: PathBuf,
        /// Output SRT file
        output: PathBuf,
        /// New start timecode, HH:MM:SS,mmm or HH:MM:SS
        new_start: String,
    },

    /// Combine timing from one file with text from another
    Merge {
        /// File providing index and timing
        timing_file: PathBuf,
        /// File providing text
        text_file: PathBuf,
        /// Output SRT file
        output: PathBuf,
    },

    /// Translate subtitle text using the configured provider
    Translate {
        /// Input SRT file
        input: PathBuf,
        /// Output SRT file
        output: PathBuf,
        /// Target language (ISO code or name), overrides config
        target_language: Option<String>,
        /// Entries per translation batch, overrides config
        chunk_size: Option<usize>,
    },

    /// Generate shell completions for subkit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subkit - SRT subtitle toolkit
///
/// Shift, rebase and merge SubRip subtitle files, and translate them
/// using an OpenAI-compatible provider.
#[derive(Parser, Debug)]
#[command(name = "subkit")]
#[command(version = "0.1.0")]
#[command(about = "SRT subtitle shifting, merging and AI translation")]
#[command(long_about = "subkit manipulates SubRip (SRT) subtitle files: shifting timecodes,
rebasing a file to a new start time, merging timing from one file with text
from another, and translating dialogue through an OpenAI-compatible API.

EXAMPLES:
    subkit shift movie.srt shifted.srt 10        # Delay all subtitles by 10 s
    subkit shift movie.srt shifted.srt -3        # Advance by 3 s
    subkit rebase movie.srt out.srt 00:01:20     # First timing line at 1:20
    subkit merge timing.en.srt text.fa.srt out.srt
    subkit translate movie.srt movie.fa.srt fa   # Translate to Persian
    subkit translate movie.srt out.srt fa 1      # Line-by-line translation
    subkit completions bash > subkit.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically. Translation requires
    provider.api_key to be set.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
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

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default;
    // the level is adjusted after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "subkit", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&level));
    }

    // Load or create configuration
    let config_path = &cli.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config
            .write_to_file(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Shift {
            input,
            output,
            delta_seconds,
        } => {
            controller.run_shift(&input, &output, delta_seconds)?;
        }
        Commands::Rebase {
            input,
            output,
            new_start,
        } => {
            controller.run_rebase(&input, &output, &new_start)?;
        }
        Commands::Merge {
            timing_file,
            text_file,
            output,
        } => {
            controller.run_merge(&timing_file, &text_file, &output)?;
        }
        Commands::Translate {
            input,
            output,
            target_language,
            chunk_size,
        } => {
            controller
                .run_translate(&input, &output, target_language.as_deref(), chunk_size)
                .await?;
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
