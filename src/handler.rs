use {
    crate::{Error, Formatter, Level, LineFormatter},
    std::{
        io::Write,
        sync::{Arc, Mutex, PoisonError},
    },
};

/// An independent log output destination.
///
/// Each handler carries its own minimum [`Level`] and [`Formatter`]; the
/// [`Logger`](crate::Logger) hands every record to every handler and each
/// one decides for itself whether to act. Implementations must be safe to
/// share between threads, which is why `log` takes `&self` and interior
/// state lives behind a lock.
pub trait Handler: Send + Sync {
    /// Handle one record. Records below the handler's minimum level are
    /// discarded silently and successfully.
    fn log(&self, level: Level, message: &str) -> Result<(), Error>;
}

/// Handler that writes rendered lines to a console stream.
///
/// Defaults to `stderr`; any `Write` target can be substituted with
/// [`with_writer`](ConsoleHandler::with_writer), mainly for capturing output
/// in tests.
///
/// # Examples
/// ```
/// use logfan::{ConsoleHandler, Handler, Level};
///
/// let handler = ConsoleHandler::new().level(Level::Warn);
/// handler.log(Level::Info, "not shown").unwrap();
/// handler.log(Level::Error, "shown on stderr").unwrap();
/// ```
pub struct ConsoleHandler {
    level: Level,
    formatter: Arc<dyn Formatter>,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleHandler {
    /// Create a handler writing to `stderr` at [`Level::Info`] with the
    /// default [`LineFormatter`].
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Create a handler writing to an arbitrary target.
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        ConsoleHandler {
            level: Level::Info,
            formatter: Arc::new(LineFormatter::new()),
            writer: Mutex::new(writer),
        }
    }

    /// Set the minimum level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the formatter.
    pub fn formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for ConsoleHandler {
    fn log(&self, level: Level, message: &str) -> Result<(), Error> {
        if level < self.level {
            return Ok(());
        }
        let line = self.formatter.format(level, message)?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut result = writer.write_all(line.as_bytes());
        if result.is_ok() && !line.ends_with('\n') {
            result = writer.write_all(b"\n");
        }
        result.map_err(|source| Error::Console { source })
    }
}
