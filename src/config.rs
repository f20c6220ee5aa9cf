// src/config.rs
use crate::errors::StorageError;
use crate::fetch::DEFAULT_HOST;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "redlanes")]
#[command(version, about = "Side-by-side lanes of the latest subreddit posts")]
pub struct Cli {
    /// Host serving the subreddit JSON endpoints
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// File holding the saved lane list
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Keep lanes in memory only
    #[arg(long, conflicts_with = "store")]
    pub ephemeral: bool,

    /// Where to write the log
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Show at most this many posts per lane
    #[arg(long, value_name = "N")]
    pub max_posts: Option<usize>,
}

impl Cli {
    pub fn open_store(&self) -> Result<Box<dyn KeyValueStore>, StorageError> {
        if self.ephemeral {
            return Ok(Box::new(MemoryStore::new()));
        }
        let path = match &self.store {
            Some(path) => path.clone(),
            None => FileStore::default_path()?,
        };
        Ok(Box::new(FileStore::new(path)))
    }

    /// `<data_dir>/redlanes/redlanes.log` unless given on the command line.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("redlanes")
                .join("redlanes.log")
        })
    }
}
