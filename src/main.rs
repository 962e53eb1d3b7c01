// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use lingotutor::app_config::{self, Config, ProviderKind};
use lingotutor::app_controller::Controller;
use lingotutor::lookup::{LookupResult, LookupSource};
use lingotutor::reader::{TokenKind, annotate};
use lingotutor::review::{Grade, ReviewSession, WordFilter, hint};
use lingotutor::session::PracticeSession;
use lingotutor::tutor::{Difficulty, Evaluation, GenerateRequest, LengthClass};
use lingotutor::vocabulary::{CefrLevel, VocabularyItem};

/// CLI Wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Ollama,
    OpenAI,
    Anthropic,
    LMStudio,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Ollama => ProviderKind::Ollama,
            CliProvider::OpenAI => ProviderKind::OpenAI,
            CliProvider::Anthropic => ProviderKind::Anthropic,
            CliProvider::LMStudio => ProviderKind::LMStudio,
        }
    }
}

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

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<CliDifficulty> for Difficulty {
    fn from(cli: CliDifficulty) -> Self {
        match cli {
            CliDifficulty::Beginner => Difficulty::Beginner,
            CliDifficulty::Intermediate => Difficulty::Intermediate,
            CliDifficulty::Advanced => Difficulty::Advanced,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLength {
    Short,
    Medium,
    Long,
}

impl From<CliLength> for LengthClass {
    fn from(cli: CliLength) -> Self {
        match cli {
            CliLength::Short => LengthClass::Short,
            CliLength::Medium => LengthClass::Medium,
            CliLength::Long => LengthClass::Long,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the tutor for a new reading text
    Generate {
        /// What the text should be about
        #[arg(short, long)]
        topic: String,

        #[arg(short, long, value_enum, default_value_t = CliDifficulty::Intermediate)]
        difficulty: CliDifficulty,

        #[arg(long, value_enum, default_value_t = CliLength::Medium)]
        length: CliLength,
    },

    /// Extract vocabulary from your own English text (a file, or stdin)
    Analyze {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Print a session's text with its vocabulary highlighted
    Read {
        /// Session id or unique id prefix
        session: String,
    },

    /// Define a word, or a phrase selected from the text, in context
    Lookup {
        session: String,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Submit a translation of a session's text for evaluation
    Translate {
        session: String,

        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// List or delete practice sessions
    History {
        #[command(subcommand)]
        action: Option<HistoryCommand>,
    },

    /// Manage the saved-words deck
    Words {
        #[command(subcommand)]
        action: Option<WordsCommand>,
    },

    /// Review flashcards interactively
    Review {
        /// Review this session's vocabulary instead of the saved words
        #[arg(short, long)]
        session: Option<String>,

        /// Only these CEFR levels (repeatable)
        #[arg(long)]
        cefr: Vec<CefrLevel>,

        /// Only this part of speech
        #[arg(long = "type")]
        part_of_speech: Option<String>,

        /// Only words whose word, definition or translation contains this
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Check that the configured provider is reachable
    Check,

    /// Generate shell completions for lingotutor
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    List,
    Delete { session: String },
}

#[derive(Subcommand, Debug)]
enum WordsCommand {
    List,
    /// Save a word of a session to the deck
    Save {
        session: String,
        #[arg(required = true, num_args = 1..)]
        word: Vec<String>,
    },
    Unsave {
        #[arg(required = true, num_args = 1..)]
        word: Vec<String>,
    },
}

/// lingotutor - an AI language tutor for the terminal
///
/// Generates or analyzes English texts, explains their vocabulary, scores
/// your translations and keeps a flashcard deck of the words you save.
#[derive(Parser, Debug)]
#[command(name = "lingotutor")]
#[command(version)]
#[command(about = "AI language tutor: reading, vocabulary lookups, translation feedback and flashcards")]
#[command(long_about = "lingotutor generates or analyzes English texts with an AI provider, highlights their vocabulary,
explains words in context, scores your translations and reviews saved words as flashcards.

EXAMPLES:
    lingotutor generate -t \"city cycling\" -d beginner --length short
    lingotutor analyze article.txt
    lingotutor read 3f2a
    lingotutor lookup 3f2a sat on
    lingotutor translate 3f2a --file my_translation.txt
    lingotutor words save 3f2a mat
    lingotutor review --cefr B1 --cefr B2
    lingotutor completions bash > lingotutor.bash

CONFIGURATION:
    Configuration is stored in lingotutor.json by default. If the file doesn't
    exist, a default one is created. Sessions and saved words are kept in a
    SQLite database in the platform data directory unless storage.database_path
    is set.

SUPPORTED PROVIDERS:
    ollama    - Local Ollama server (default)
    openai    - OpenAI API (requires API key)
    anthropic - Anthropic API (requires API key)
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "lingotutor.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Provider to use
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliProvider>,

    /// Model name to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// API key for the provider
    #[arg(long, global = true, env = "LINGOTUTOR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
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
            Level::Error => ("\x1B[1;31m", "error"),
            Level::Warn => ("\x1B[1;33m", "warn "),
            Level::Info => ("\x1B[1;32m", "info "),
            Level::Debug => ("\x1B[1;36m", "debug"),
            Level::Trace => ("\x1B[1;35m", "trace"),
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
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is applied once config is read
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let options = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &options.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "lingotutor", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let config = load_config(&options)?;
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let mut controller = Controller::with_config(config)?;
    run_command(&mut controller, options.command).await
}

/// Load the config file (creating a default one if missing) and apply CLI overrides
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        serde_json::from_reader(BufReader::new(file))
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(provider) = &options.provider {
        config.tutor.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.tutor.active_provider_config_mut().model = model.clone();
    }
    if let Some(api_key) = &options.api_key {
        config.tutor.active_provider_config_mut().api_key = api_key.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_command(controller: &mut Controller, command: Commands) -> Result<()> {
    match command {
        Commands::Generate { topic, difficulty, length } => {
            let request = GenerateRequest::new(topic, difficulty.into(), length.into());
            let session = controller.generate(request).await?;
            print_session(&session);
        }
        Commands::Analyze { file } => {
            let text = read_input(file.as_deref())?;
            let session = controller.analyze(&text).await?;
            print_session(&session);
        }
        Commands::Read { session } => {
            print_session(controller.session(&session)?);
        }
        Commands::Lookup { session, text } => {
            let result = controller.lookup(&session, &text.join(" ")).await?;
            print_lookup(&result);
        }
        Commands::Translate { session, text, file } => {
            let translation = match text {
                Some(text) => text,
                None => read_input(file.as_deref())?,
            };
            let evaluation = controller.translate(&session, &translation).await?;
            print_evaluation(&evaluation);
        }
        Commands::History { action } => match action.unwrap_or(HistoryCommand::List) {
            HistoryCommand::List => print_history(controller.history()),
            HistoryCommand::Delete { session } => {
                let deleted = controller.delete_session(&session)?;
                info!("Deleted session {} '{}'", deleted.short_id(), deleted.title);
            }
        },
        Commands::Words { action } => match action.unwrap_or(WordsCommand::List) {
            WordsCommand::List => {
                if controller.saved_words().is_empty() {
                    println!("No saved words yet.");
                }
                for item in controller.saved_words() {
                    print_item(item);
                }
            }
            WordsCommand::Save { session, word } => {
                let item = controller.save_word(&session, &word.join(" ")).await?;
                info!("Saved '{}'", item.word);
            }
            WordsCommand::Unsave { word } => {
                let word = word.join(" ");
                if controller.unsave_word(&word)? {
                    info!("Removed '{}'", word);
                } else {
                    warn!("'{}' was not saved", word);
                }
            }
        },
        Commands::Review { session, cefr, part_of_speech, query } => {
            let mut filter = WordFilter::new();
            for level in cefr {
                filter = filter.with_cefr(level);
            }
            if let Some(part_of_speech) = part_of_speech {
                filter = filter.with_part_of_speech(part_of_speech);
            }
            if let Some(query) = query {
                filter = filter.with_query(query);
            }
            let deck = controller.review_deck(session.as_deref(), &filter)?;
            run_review(deck)?;
        }
        Commands::Check => {
            controller.check_connection().await?;
            println!("Connection OK");
        }
        Commands::Completions { .. } => {}
    }
    Ok(())
}

/// Read a whole file, or stdin when no file is given
fn read_input(file: Option<&Path>) -> Result<String> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .context(format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };
    if text.trim().is_empty() {
        return Err(anyhow!("No input text"));
    }
    Ok(text)
}

fn print_session(session: &PracticeSession) {
    println!("\x1B[1m{}\x1B[0m  ({})\n", session.title, session.short_id());

    let index = session.vocabulary_index();
    let annotation = annotate(&session.text, &index);
    let mut rendered = String::with_capacity(session.text.len() * 2);
    for token in annotation.tokens() {
        match token.kind {
            TokenKind::Phrase => rendered.push_str(&format!("\x1B[1;35m{}\x1B[0m", token.text)),
            TokenKind::Vocabulary => rendered.push_str(&format!("\x1B[1;36m{}\x1B[0m", token.text)),
            TokenKind::Plain | TokenKind::Separator => rendered.push_str(token.text),
        }
    }
    println!("{}\n", rendered);

    for item in &session.vocabulary {
        print_item(item);
    }
    if let Some(evaluation) = &session.evaluation {
        println!();
        print_evaluation(evaluation);
    }
    println!("\n{}", session.usage);
}

fn print_item(item: &VocabularyItem) {
    let mut tags = Vec::new();
    if let Some(pos) = &item.part_of_speech {
        tags.push(pos.clone());
    }
    if let Some(cefr) = item.cefr {
        tags.push(cefr.to_string());
    }
    let tags = if tags.is_empty() { String::new() } else { format!(" [{}]", tags.join(", ")) };

    println!("  \x1B[1m{}\x1B[0m{} - {}", item.word, tags, item.translation);
    if !item.definition.is_empty() {
        println!("      {}", item.definition);
    }
}

fn print_lookup(result: &LookupResult) {
    print_item(&result.item);
    if let Some(context) = result.item.context.as_deref().filter(|c| !c.is_empty()) {
        println!("      \"{}\"", context);
    }
    if result.source == LookupSource::Remote {
        println!("      ({})", result.usage);
    }
}

fn print_evaluation(evaluation: &Evaluation) {
    println!("\x1B[1mScore: {}/100\x1B[0m", evaluation.score);
    println!("{}", evaluation.feedback);
    if !evaluation.corrected_translation.is_empty() {
        println!("\nSuggested translation:\n  {}", evaluation.corrected_translation);
    }
    for improvement in &evaluation.key_improvements {
        println!("  - {}", improvement);
    }
    if !evaluation.difficult_words.is_empty() {
        println!("Difficult words: {}", evaluation.difficult_words.join(", "));
    }
}

fn print_history(history: &[PracticeSession]) {
    if history.is_empty() {
        println!("No sessions yet.");
        return;
    }
    for session in history {
        let score = session
            .evaluation
            .as_ref()
            .map(|e| format!("{:>3}/100", e.score))
            .unwrap_or_else(|| "    -  ".to_string());
        println!(
            "{}  {}  {}  {:>3} words  {}",
            session.short_id(),
            session.date.format("%Y-%m-%d %H:%M"),
            score,
            session.vocabulary.len(),
            session.title
        );
    }
}

/// Interactive flashcard loop on stdin
fn run_review(deck: Vec<VocabularyItem>) -> Result<()> {
    let mut review = ReviewSession::new();
    review.start(deck).context("Nothing to review")?;

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = std::io::stdout();

    while !review.is_finished() {
        let Some(card) = review.current().cloned() else { break };
        let (position, total) = review.position().unwrap_or((0, 0));
        let face = review.face();

        println!("\n[{}/{}] \x1B[1m{}\x1B[0m", position, total, card.word);
        if face.hint_visible {
            println!("  hint: {}", hint(&card));
        }
        if face.flipped {
            println!("  {} - {}", card.translation, card.definition);
        }
        print!("f flip, h hint, 1 hard, 2 good, 3 easy, q quit > ");
        stdout.flush()?;

        let Some(line) = lines.next() else { break };
        match line?.trim() {
            "f" => {
                review.flip()?;
            }
            "h" => review.show_hint()?,
            "q" => break,
            other => match other.parse::<Grade>() {
                Ok(grade) => review.grade(grade)?,
                Err(e) => println!("{}", e),
            },
        }
    }

    let outcome = if review.is_finished() { "finished" } else { "stopped" };
    println!("\nReview {}: {}", outcome, review.stats());
    Ok(())
}
