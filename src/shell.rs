//! Interactive search shell
//!
//! Parses the commands typed at the `(search)> ` prompt and runs them against the
//! currently loaded index. Every refusal is a [`CommandError`] whose message tells
//! the user what to do instead.

use crate::config::Config;
use crate::crawler::{crawl, CrawlOutcome};
use crate::index::{InvertedIndex, QueryEngine};
use crate::output::{render_postings, render_results, render_statistics};
use crate::state::StopHandle;
use crate::storage::{IndexStore, JsonIndexStore, StorageError};
use crate::LexiError;
use thiserror::Error;

/// Commands understood by the shell, with their help text
pub const COMMANDS: &[(&str, &str)] = &[
    ("build", "Crawl the website, build the index and save it into a file"),
    ("load", "Load a previously built index file"),
    ("print", "Print the inverted file for the specified word: print foo"),
    ("find", "Search for a phrase containing one or more words: find foo bar"),
    ("help", "List available commands (also: ?)"),
    ("exit", "Quit the program"),
];

/// User-facing command failures
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Index is empty. Create a new index using the \"build\" command or load a previously saved index using the \"load\" command.")]
    IndexEmpty,

    #[error("Enter a word to search for.")]
    MissingTerm,

    #[error("Too many words supplied. Enter only one word.")]
    TooManyTerms,

    #[error("Enter at least one word to search for.")]
    MissingQuery,

    #[error("No entry in index for term {0}")]
    TermNotFound(String),

    #[error("No documents contain any of those words.")]
    NoMatches,

    #[error("Index file not found. Please use the \"build\" command to create the index file first.")]
    IndexFileNotFound,

    #[error("Could not read the index file: {0}")]
    Load(StorageError),

    #[error("Build failed: {0}")]
    Build(#[from] LexiError),

    #[error("*** Unknown syntax: {0}")]
    UnknownCommand(String),
}

impl From<StorageError> for CommandError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::IndexFileNotFound(_) => Self::IndexFileNotFound,
            other => Self::Load(other),
        }
    }
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Build,
    Load,
    Print(Vec<String>),
    Find(Vec<String>),
    Help,
    Exit,
    /// A blank line
    Empty,
    Unknown(String),
}

impl Command {
    /// Splits a line into a command word and whitespace-separated arguments
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix('?') {
            return if rest.trim().is_empty() {
                Self::Help
            } else {
                Self::Unknown(line.to_string())
            };
        }

        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Self::Empty;
        };
        let args: Vec<String> = words.map(str::to_string).collect();

        match name {
            "build" => Self::Build,
            "load" => Self::Load,
            "print" => Self::Print(args),
            "find" => Self::Find(args),
            "help" => Self::Help,
            "exit" => Self::Exit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// What the shell should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print the text and prompt again
    Output(String),
    /// Print the text and quit
    Exit(String),
}

/// Search shell state: the configuration and the currently loaded index
pub struct Shell {
    config: Config,
    index: InvertedIndex,
}

impl Shell {
    /// Creates a shell with an empty index
    pub fn new(config: Config) -> Self {
        Self {
            config,
            index: InvertedIndex::new(),
        }
    }

    /// Greeting shown when the shell starts
    pub fn intro(&self) -> String {
        format!(
            "Welcome to the search tool for the website {}. Type help or ? to list commands.",
            self.config.site.root_url
        )
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Runs one command
    ///
    /// `stop` is handed to the crawl started by `build`; the other commands ignore it.
    pub async fn execute(&mut self, command: Command, stop: StopHandle) -> Result<Reply, CommandError> {
        let text = match command {
            Command::Build => self.build(stop).await?,
            Command::Load => self.load()?,
            Command::Print(args) => self.print(&args)?,
            Command::Find(args) => self.find(&args)?,
            Command::Help => help(),
            Command::Empty => String::new(),
            Command::Exit => return Ok(Reply::Exit("Exiting program".to_string())),
            Command::Unknown(line) => return Err(CommandError::UnknownCommand(line)),
        };

        Ok(Reply::Output(text))
    }

    /// Crawls the site, saves the index and makes it the loaded index
    pub async fn build(&mut self, stop: StopHandle) -> Result<String, CommandError> {
        let CrawlOutcome { index, stats } = crawl(self.config.clone(), Some(stop)).await?;
        self.index = index;

        Ok(format!(
            "{}\nWebsite crawled and index file saved successfully.",
            render_statistics(&stats)
        ))
    }

    /// Replaces the loaded index with the one in the index file
    pub fn load(&mut self) -> Result<String, CommandError> {
        let store = JsonIndexStore::new(&self.config.output.index_path);
        self.index = store.load()?;
        tracing::debug!("Loaded {} terms from {}", self.index.term_count(), store.path().display());
        Ok("Index successfully loaded.".to_string())
    }

    /// Shows the postings for exactly one word
    pub fn print(&self, args: &[String]) -> Result<String, CommandError> {
        self.require_index()?;

        let term = match args {
            [] => return Err(CommandError::MissingTerm),
            [term] => term,
            _ => return Err(CommandError::TooManyTerms),
        };

        QueryEngine::new(&self.index)
            .lookup(term)
            .map(|postings| render_postings(term, postings))
            .ok_or_else(|| CommandError::TermNotFound(term.clone()))
    }

    /// Ranks pages for one or more words, most relevant first
    pub fn find(&self, args: &[String]) -> Result<String, CommandError> {
        self.require_index()?;

        if args.is_empty() {
            return Err(CommandError::MissingQuery);
        }

        let hits = QueryEngine::new(&self.index).search(args);
        if hits.is_empty() {
            return Err(CommandError::NoMatches);
        }

        Ok(render_results(&hits))
    }

    fn require_index(&self) -> Result<(), CommandError> {
        if self.index.is_empty() {
            Err(CommandError::IndexEmpty)
        } else {
            Ok(())
        }
    }
}

/// Lists the available commands
pub fn help() -> String {
    let mut out = String::from("Documented commands:\n");
    for (name, description) in COMMANDS {
        out.push_str(&format!("  {:<6} {}\n", name, description));
    }
    out
}
