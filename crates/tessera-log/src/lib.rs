use std::{
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

// Re-export logging functions for convenience.
pub use log::*;
use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{runtime::ConfigErrors, Appender, Root},
    encode::pattern::PatternEncoder,
    Config, Handle,
};
use thiserror::Error;

const CONSOLE_PATTERN: &str = "{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}";
const FILE_PATTERN: &str = "{d} {l:<5} {t} - {m}{n}";

/// Handle of the installed logger. Later calls to `init` swap its configuration instead of
/// installing a second logger.
static HANDLE: Mutex<Option<Handle>> = Mutex::new(None);

#[derive(Debug, Error)]
pub enum LogError {
    #[error("unable to create log file `{path}`: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid logging configuration: {0}")]
    Config(#[from] ConfigErrors),
    #[error("a foreign logger is already installed: {0}")]
    AlreadySet(#[from] SetLoggerError),
}

/// Initializes console logging. Provided `LevelFilter` will remove all logs below the provided
/// level. Calling this more than once replaces the previous configuration.
pub fn init(filter: LevelFilter) -> Result<(), LogError> {
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(console())))
        .build(Root::builder().appender("stdout").build(filter))?;

    install(config)
}

/// Initializes logging to both the console and a file inside `dir`. Name of the file is based on
/// the current time.
pub fn init_with_file(filter: LevelFilter, dir: impl AsRef<Path>) -> Result<(), LogError> {
    let now = chrono::Utc::now();
    let path = dir
        .as_ref()
        .join(format!("{}.txt", now.format("%Y-%m-%d %H-%M-%S")));

    let log_file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
        .build(&path)
        .map_err(|source| LogError::File {
            path: path.clone(),
            source,
        })?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(console())))
        .appender(Appender::builder().build("log_file", Box::new(log_file)))
        .build(
            Root::builder()
                .appender("log_file")
                .appender("stdout")
                .build(filter),
        )?;

    install(config)
}

fn console() -> ConsoleAppender {
    ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build()
}

fn install(config: Config) -> Result<(), LogError> {
    let mut handle = HANDLE.lock().unwrap_or_else(PoisonError::into_inner);
    match handle.as_ref() {
        Some(handle) => handle.set_config(config),
        None => {
            *handle = Some(log4rs::init_config(config)?);
            log_panics::init();
        }
    }
    Ok(())
}
