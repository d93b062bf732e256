use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};

const STDERR_APPENDER: &str = "stderr";

/// A process-unique identifier for one voting session, used to tag log lines.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SessionId(pub usize);

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "session{}", self.0)
    }
}

impl SessionId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> SessionId {
        static SESSION_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        SessionId(SESSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Errors from setting up logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to load logging config: {0}")]
    File(String),
    #[error("Failed to build logging config: {0}")]
    Build(#[from] log4rs::config::runtime::ConfigErrors),
    #[error("Logger already initialised: {0}")]
    AlreadySet(#[from] log::SetLoggerError),
}

/// Load the logging config from the given YAML file, or fall back to
/// warnings on stderr if the file does not exist.
pub fn load_config(config_path: impl AsRef<Path>) -> Result<Config, LoggingError> {
    let path = config_path.as_ref();
    if path.exists() {
        return log4rs::config::load_config_file(path, Default::default())
            .map_err(|e| LoggingError::File(e.to_string()));
    }
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d} {l} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build(STDERR_APPENDER, Box::new(stderr)))
        .build(Root::builder().appender(STDERR_APPENDER).build(LevelFilter::Warn))?;
    Ok(config)
}

/// Initialise the global logger. See [`load_config`].
pub fn init(config_path: impl AsRef<Path>) -> Result<(), LoggingError> {
    log4rs::init_config(load_config(config_path)?)?;
    Ok(())
}
