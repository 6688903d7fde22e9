// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use annosub::app_config::{self, Config, InvalidIntervalPolicy};
use annosub::app_controller::{ConversionOutcome, Controller};

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert interval batches to subtitle cues (default command)
    Convert(ConvertArgs),

    /// Generate shell completions for annosub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct ConvertArgs {
    /// Interval batch (JSON) or directory of *.intervals.json batches
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file, or '-' for stdout (single batch only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Drop intervals with start >= end instead of failing
    #[arg(long)]
    drop_invalid: bool,

    /// Index of the first cue
    #[arg(long)]
    first_index: Option<usize>,
}

/// annosub - Annotation spans to subtitle cues
///
/// Resolves overlapping timed annotation spans into non-overlapping
/// subtitle cues.
#[derive(Parser, Debug)]
#[command(name = "annosub")]
#[command(version)]
#[command(about = "Turn overlapping annotation spans into subtitle cues")]
#[command(long_about = "annosub reads batches of timed text spans, splits overlapping spans and writes numbered subtitle cues.

EXAMPLES:
    annosub clip.intervals.json                 # Writes clip.srt next to the batch
    annosub -f clip.intervals.json              # Force overwrite existing output
    annosub -o - clip.intervals.json            # Print cues to stdout
    annosub --drop-invalid clip.intervals.json  # Skip spans with start >= end
    annosub --log-level debug /annotations/     # Convert every batch in a directory
    annosub completions bash > annosub.bash     # Generate bash completions

INPUT FORMAT:
    A JSON array of {\"start\": ..., \"end\": ..., \"text\": ...} objects. Times are
    milliseconds or timestamps such as \"00:01:02,500\" or \"1:02.500\".

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Interval batch (JSON) or directory of *.intervals.json batches
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file, or '-' for stdout (single batch only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Drop intervals with start >= end instead of failing
    #[arg(long)]
    drop_invalid: bool,

    /// Index of the first cue
    #[arg(long)]
    first_index: Option<usize>,
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

    // @returns: ANSI colour for log level
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
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
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

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is applied with set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "annosub", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            run_convert(ConvertArgs {
                input_path,
                output: cli.output,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                log_level: cli.log_level,
                drop_invalid: cli.drop_invalid,
                first_index: cli.first_index,
            })
        }
    }
}

// @loads: Config file, creating a default one when missing
fn load_config(options: &ConvertArgs) -> Result<Config> {
    let config_path = Path::new(&options.config_path);
    let mut config = if config_path.exists() {
        Config::load_from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config_path);
        let config = Config::default();
        config.save_to_file(config_path)?;
        config
    };

    // Override config with CLI options if provided
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if options.drop_invalid {
        config.resolver.invalid_policy = InvalidIntervalPolicy::Drop;
    }
    if let Some(first_index) = options.first_index {
        config.output.first_index = first_index;
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it before loading the config
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    if options.input_path.is_dir() {
        if options.output.is_some() {
            return Err(anyhow!("--output cannot be used with a directory input"));
        }
        controller.run_folder(options.input_path, options.force_overwrite)?;
        return Ok(());
    }

    if !options.input_path.is_file() {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    if options.output.as_deref() == Some(Path::new("-")) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        controller.run_to_writer(&options.input_path, &mut handle)?;
        return Ok(());
    }

    match controller.run(options.input_path, options.output, options.force_overwrite)? {
        ConversionOutcome::Written { dropped_invalid, .. } if dropped_invalid > 0 => {
            warn!("{} invalid interval(s) were dropped", dropped_invalid);
        }
        ConversionOutcome::Written { .. } => {}
        ConversionOutcome::Skipped { output } => {
            info!("Skipped existing output: {:?}", output);
        }
    }

    Ok(())
}
