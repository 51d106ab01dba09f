use {
    crate::{
        sink::{FileSink, DEFAULT_BUFFER_SIZE, DEFAULT_FILE_MODE},
        Error, Formatter, Handler, Level, LineFormatter,
    },
    std::{
        path::PathBuf,
        sync::{Arc, Mutex, PoisonError},
    },
};

/// Handler that appends every accepted record to one log file, without
/// rotation.
///
/// Takes a *base* name and appends the `.log` extension itself; use
/// [`RotatingFileHandler`](crate::RotatingFileHandler) when the file must
/// not grow without bound. The level filter runs before any file
/// interaction, so the directory and file are only ever created by a record
/// that will actually be written (or by an explicit [`flush`](Self::flush)).
///
/// # Examples
/// ```no_run
/// use logfan::{FileHandler, Handler, Level};
///
/// // Writes to ./logs/app.log
/// let handler = FileHandler::builder("./logs", "app").build();
/// handler.log(Level::Info, "service started")?;
/// # Ok::<(), logfan::Error>(())
/// ```
pub struct FileHandler {
    level: Level,
    formatter: Arc<dyn Formatter>,
    sink: Mutex<FileSink>,
}

impl FileHandler {
    /// Start building a handler for `<directory>/<base_name>.log`.
    pub fn builder(
        directory: impl Into<PathBuf>,
        base_name: impl Into<String>,
    ) -> FileHandlerBuilder {
        FileHandlerBuilder {
            directory: directory.into(),
            base_name: base_name.into(),
            level: Level::Info,
            formatter: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            file_mode: DEFAULT_FILE_MODE,
        }
    }

    /// Flush buffered bytes, opening the sink first if needed.
    pub fn flush(&self) -> Result<(), Error> {
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }

    /// Flush and close the sink. Logging again reopens it.
    pub fn close(&self) -> Result<(), Error> {
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .close()
    }
}

impl Handler for FileHandler {
    fn log(&self, level: Level, message: &str) -> Result<(), Error> {
        if level < self.level {
            return Ok(());
        }
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        let line = self.formatter.format(level, message)?;
        sink.write(&line)?;
        sink.flush()
    }
}

/// Builder for [`FileHandler`].
pub struct FileHandlerBuilder {
    directory: PathBuf,
    base_name: String,
    level: Level,
    formatter: Option<Arc<dyn Formatter>>,
    buffer_size: usize,
    file_mode: u32,
}

impl FileHandlerBuilder {
    /// Minimum level this handler acts on. Defaults to [`Level::Info`].
    pub fn level(self, level: Level) -> Self {
        Self { level, ..self }
    }

    /// Formatter used to render records.
    pub fn formatter(self, formatter: Arc<dyn Formatter>) -> Self {
        Self {
            formatter: Some(formatter),
            ..self
        }
    }

    /// Write buffer capacity in bytes.
    pub fn buffer_size(self, buffer_size: usize) -> Self {
        Self {
            buffer_size,
            ..self
        }
    }

    /// Mode bits for created log files (Unix only).
    pub fn file_mode(self, file_mode: u32) -> Self {
        Self { file_mode, ..self }
    }

    /// Build the handler. Touches nothing on disk until the first accepted
    /// record or explicit flush.
    pub fn build(self) -> FileHandler {
        let sink = FileSink::new(
            self.directory,
            format!("{}.log", self.base_name),
            self.buffer_size,
            self.file_mode,
        );
        FileHandler {
            level: self.level,
            formatter: self
                .formatter
                .unwrap_or_else(|| Arc::new(LineFormatter::new())),
            sink: Mutex::new(sink),
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::fs, tempfile::tempdir};

    #[test]
    fn appends_log_extension_to_the_base_name() {
        let dir = tempdir().unwrap();
        let handler = FileHandler::builder(dir.path(), "app")
            .formatter(Arc::new(LineFormatter::with_template("%m")))
            .build();
        handler.log(Level::Info, "first").unwrap();
        let contents = fs::read_to_string(dir.path().join("app.log")).unwrap();
        assert_eq!(contents, "first\n");
    }

    #[test]
    fn filtered_records_create_no_file() {
        let dir = tempdir().unwrap();
        let handler = FileHandler::builder(dir.path().join("logs"), "app")
            .level(Level::Error)
            .build();
        handler.log(Level::Info, "dropped").unwrap();
        assert!(!dir.path().join("logs").exists());
    }

    #[test]
    fn close_then_log_reopens_and_appends() {
        let dir = tempdir().unwrap();
        let handler = FileHandler::builder(dir.path(), "app")
            .formatter(Arc::new(LineFormatter::with_template("%m")))
            .build();
        handler.log(Level::Info, "one").unwrap();
        handler.close().unwrap();
        handler.log(Level::Info, "two").unwrap();
        let contents = fs::read_to_string(dir.path().join("app.log")).unwrap();
        assert_eq!(contents, "one\ntwo\n");
    }
}
