// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use textstim::app_config::{self, Config};
use textstim::app_controller::Controller;
use textstim::file_utils::FileManager;

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
    /// Run extractors over a stimulus file or every stimulus file in a directory
    Extract(ExtractArgs),

    /// Segment text into word or sentence tokens and print them as JSON
    Segment(SegmentArgs),

    /// Generate shell completions for textstim
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Input stimulus file (.txt/.tsv/.srt) or directory
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file (single input) or directory (directory input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Extractors to run, in order (overrides config)
    #[arg(short, long = "extractor")]
    extractors: Vec<String>,

    /// Keep separate events for extractors sharing an onset
    #[arg(long)]
    no_merge: bool,

    /// Column order for header-less delimited files (t=text, o=onset, d=duration)
    #[arg(long)]
    columns: Option<String>,

    /// Duration for rows without one
    #[arg(long)]
    default_duration: Option<f64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct SegmentArgs {
    /// Text to segment (reads --file when omitted)
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Read the text from a file
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Segmentation unit: word or sentence
    #[arg(short, long)]
    unit: Option<String>,

    /// Regex tokenizer overriding the unit
    #[arg(short, long)]
    pattern: Option<String>,

    /// Tokenizer language
    #[arg(long)]
    language: Option<String>,

    /// Use the built-in rule-based NLP tokenizer
    #[arg(long)]
    rules: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// textstim - text stimulus timelines
///
/// Builds timelines of features extracted from text stimuli.
#[derive(Parser, Debug)]
#[command(name = "textstim")]
#[command(version)]
#[command(about = "Extract feature timelines from text stimuli")]
#[command(long_about = "textstim loads timed text (tab-delimited or SRT files) or segments raw text,
runs feature extractors over it and writes the merged event timeline as JSON.

EXAMPLES:
    textstim extract story.tsv                       # Extract with default config
    textstim extract --columns ot words.txt          # Onset in column 0, text in column 1
    textstim extract -e length -e num_unique_words movie.srt
    textstim extract -o out/ stimuli/                # Process a whole directory
    textstim segment \"It's a wonderful life.\"        # Word tokens as JSON
    textstim segment -u sentence --rules --file story.txt
    textstim completions bash > textstim.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one is created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
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

    // @returns: ANSI colour and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
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
            let (colour, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "textstim", &mut std::io::stdout());
            Ok(())
        }
        Commands::Extract(args) => run_extract(args),
        Commands::Segment(args) => run_segment(args),
    }
}

// Load the config file, creating a default one when it does not exist
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        return Config::load(config_path);
    }

    warn!("Config file not found at '{}', creating default config.", config_path);
    let config = Config::default();
    config.save(config_path)?;
    Ok(config)
}

fn apply_log_level(config: &mut Config, cli_level: Option<CliLogLevel>) {
    if let Some(level) = cli_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());
}

fn run_extract(options: ExtractArgs) -> Result<()> {
    let mut config = load_or_create_config(&options.config_path)?;
    apply_log_level(&mut config, options.log_level);

    if !options.extractors.is_empty() {
        config.extraction.extractors = options.extractors;
    }
    if options.no_merge {
        config.extraction.merge_events = false;
    }
    if let Some(columns) = options.columns {
        config.ingestion.columns = columns;
    }
    if let Some(duration) = options.default_duration {
        config.ingestion.default_duration = Some(duration);
    }

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        controller.run(options.input_path, options.output, options.force_overwrite)
    } else if options.input_path.is_dir() {
        let count = controller.run_folder(options.input_path, options.output, options.force_overwrite)?;
        info!("Wrote {} timeline(s)", count);
        Ok(())
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}

fn run_segment(options: SegmentArgs) -> Result<()> {
    let mut config = load_or_create_config(&options.config_path)?;
    apply_log_level(&mut config, options.log_level);

    if let Some(unit) = options.unit {
        config.segmentation.unit = unit;
    }
    if let Some(pattern) = options.pattern {
        config.segmentation.pattern = Some(pattern);
    }
    if let Some(language) = options.language {
        config.segmentation.language = language;
    }
    if options.rules {
        config.segmentation.use_rule_tokenizer = true;
    }

    let text = match (options.text, options.file) {
        (Some(text), _) => text,
        (None, Some(path)) => FileManager::read_to_string(&path)?,
        (None, None) => return Err(anyhow!("Provide TEXT or --file")),
    };

    let controller = Controller::with_config(config)?;
    let collection = controller.segment_text(&text)?;
    println!("{}", serde_json::to_string_pretty(&collection.texts())?);
    Ok(())
}
