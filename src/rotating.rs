use {
    crate::{
        sink::{FileSink, DEFAULT_BUFFER_SIZE, DEFAULT_FILE_MODE},
        Error, Formatter, Handler, Level, LineFormatter,
    },
    chrono::Local,
    regex::Regex,
    std::{
        fs,
        path::PathBuf,
        sync::{Arc, Mutex, PoisonError},
    },
};

/// Default rotation threshold in bytes.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_000_000;

/// Default number of backup files retained after rotation.
pub const DEFAULT_MAX_BACKUP_COUNT: usize = 5;

/// Default backup naming template: original name dot ordinal.
pub const DEFAULT_BACKUP_TEMPLATE: &str = "%s.%d";

/// Handler that writes to a file and rotates it once it grows past a size
/// threshold.
///
/// Each record below the configured level is discarded before any file
/// interaction, so a quiet handler never creates its directory or file.
/// For records that pass the filter, the handler (under one lock, as a
/// single linearizable sequence):
///
/// 1. lazily opens the sink,
/// 2. re-stats the active file and, if it is strictly larger than
///    `max_file_size`, closes it, renames it to the next free backup name
///    and reopens a fresh file at the original path,
/// 3. deletes the oldest backups beyond `max_backup_count`,
/// 4. renders the record and writes it through, flushing so the next size
///    check observes it.
///
/// Backups are named by rendering the backup template and live next to the
/// active file. Backup ordinals only ever grow, so the surviving backups
/// after pruning are always the most recently created ones, and rotation
/// never overwrites an existing backup even when two rotations share a
/// timestamp.
///
/// Rotation correctness is guaranteed only while exactly one handler
/// instance owns the file path within one process.
///
/// # Examples
/// ```no_run
/// use logfan::{Handler, Level, RotatingFileHandler};
///
/// let handler = RotatingFileHandler::builder("./logs", "app.log")
///     .max_file_size(10 * 1024 * 1024)
///     .max_backup_count(5)
///     .build()?;
/// handler.log(Level::Info, "service started")?;
/// # Ok::<(), logfan::Error>(())
/// ```
pub struct RotatingFileHandler {
    level: Level,
    formatter: Arc<dyn Formatter>,
    directory: PathBuf,
    file_name: String,
    max_file_size: u64,
    max_backup_count: usize,
    backup_template: String,
    backup_pattern: Regex,
    sink: Mutex<FileSink>,
}

impl RotatingFileHandler {
    /// Start building a handler for `<directory>/<file_name>`. Unlike
    /// [`FileHandler`](crate::FileHandler), the file name is taken in full,
    /// extension included.
    pub fn builder(
        directory: impl Into<PathBuf>,
        file_name: impl Into<String>,
    ) -> RotatingFileHandlerBuilder {
        RotatingFileHandlerBuilder {
            directory: directory.into(),
            file_name: file_name.into(),
            level: Level::Info,
            formatter: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_backup_count: DEFAULT_MAX_BACKUP_COUNT,
            backup_template: DEFAULT_BACKUP_TEMPLATE.to_owned(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            file_mode: DEFAULT_FILE_MODE,
        }
    }

    /// Full path of the active log file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
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

    /// Render the backup template for one ordinal. Placeholders are
    /// substituted by literal sequential replacement in a fixed priority
    /// order: `%s` file name, `%d` ordinal, `%t` datetime, `%n` compact
    /// datetime, then any remaining `%d` as date and `%t` as time. A later
    /// pass can re-match text produced by an earlier one on pathological
    /// templates; that quirk is part of the contract.
    fn render_backup_name(&self, ordinal: u64) -> String {
        let now = Local::now();
        self.backup_template
            .replace("%s", &self.file_name)
            .replace("%d", &ordinal.to_string())
            .replace("%t", &now.format("%Y-%m-%dT%H:%M:%S").to_string())
            .replace("%n", &now.format("%Y%m%d%H%M%S").to_string())
            .replace("%d", &now.format("%Y-%m-%d").to_string())
            .replace("%t", &now.format("%H:%M:%S").to_string())
    }

    /// Highest backup ordinal currently present in the directory. Files
    /// matching the backup prefix whose trailing segment is not numeric are
    /// ignored here; pruning is where they are reported.
    fn highest_used_ordinal(&self) -> Result<u64, Error> {
        if !self.directory.is_dir() {
            return Ok(0);
        }
        let entries = fs::read_dir(&self.directory).map_err(|source| Error::ReadDir {
            path: self.directory.clone(),
            source,
        })?;
        let mut highest = 0;
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if self.backup_pattern.is_match(name) {
                if let Some(ordinal) = trailing_ordinal(name) {
                    highest = highest.max(ordinal);
                }
            }
        }
        Ok(highest)
    }

    /// First unused backup path. Probing starts one past the highest ordinal
    /// in use, so ordinals never regress and pruning by lowest ordinal
    /// always removes the oldest backups; it keeps advancing while the
    /// rendered name exists (timestamp templates colliding within one
    /// second). A template whose renderings cannot diverge between ordinals
    /// has no free name to find once its one name is taken.
    fn next_backup_path(&self) -> Result<PathBuf, Error> {
        let mut ordinal = self.highest_used_ordinal()? + 1;
        let mut name = self.render_backup_name(ordinal);
        loop {
            let candidate = self.directory.join(&name);
            if !candidate.exists() {
                return Ok(candidate);
            }
            ordinal += 1;
            let next = self.render_backup_name(ordinal);
            if next == name {
                return Err(Error::BackupNameExhausted { path: candidate });
            }
            name = next;
        }
    }

    /// Close the sink, rename the active file to the next free backup name
    /// and reopen a fresh file at the original path. A rename failure
    /// propagates and leaves the sink cleanly closed; the next record
    /// reopens it.
    fn rotate(&self, sink: &mut FileSink) -> Result<(), Error> {
        sink.close()?;
        let backup_path = self.next_backup_path()?;
        fs::rename(sink.path(), &backup_path).map_err(|source| Error::Rename {
            from: sink.path().to_path_buf(),
            to: backup_path.clone(),
            source,
        })?;
        sink.open()
    }

    /// Delete the lowest-ordinal backups until at most `max_backup_count`
    /// remain. Ordinals are parsed only when the retention limit is
    /// exceeded; a prefix-matching file with a non-numeric trailing segment
    /// is then a [`Error::MalformedBackupName`], since it means the
    /// directory holds files this handler's naming convention cannot
    /// account for.
    fn prune_backups(&self) -> Result<(), Error> {
        let entries = fs::read_dir(&self.directory).map_err(|source| Error::ReadDir {
            path: self.directory.clone(),
            source,
        })?;

        let mut backups = Vec::new();
        for entry in entries.flatten() {
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if self.backup_pattern.is_match(name) {
                backups.push(name.to_owned());
            }
        }

        if backups.len() <= self.max_backup_count {
            return Ok(());
        }

        let mut ordered = Vec::with_capacity(backups.len());
        for name in backups {
            let path = self.directory.join(&name);
            let suffix = name.rsplit('.').next().unwrap_or("").to_owned();
            let ordinal: u64 = suffix.parse().map_err(|_| Error::MalformedBackupName {
                path: path.clone(),
                ordinal: suffix.clone(),
            })?;
            ordered.push((ordinal, path));
        }
        ordered.sort_by_key(|(ordinal, _)| *ordinal);

        let excess = ordered.len() - self.max_backup_count;
        for (_, path) in ordered.into_iter().take(excess) {
            fs::remove_file(&path).map_err(|source| Error::Remove {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl Handler for RotatingFileHandler {
    fn log(&self, level: Level, message: &str) -> Result<(), Error> {
        // Level is checked before any lock or file interaction: filtered-out
        // records must not create the directory or file as a side effect.
        if level < self.level {
            return Ok(());
        }

        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        sink.open()?;

        // Strictly greater than the threshold, from a fresh stat, so files
        // truncated or swapped behind our back are still sized correctly.
        if sink.current_size()? > self.max_file_size {
            self.rotate(&mut sink)?;
        }

        self.prune_backups()?;

        let line = self.formatter.format(level, message)?;
        sink.write(&line)?;
        // Flushed per record so the size check above sees everything written
        // so far, and the record that trips the threshold lands in the
        // fresh file.
        sink.flush()
    }
}

/// Numeric value of the name's final dot-separated segment, if any.
fn trailing_ordinal(name: &str) -> Option<u64> {
    name.rsplit('.').next().and_then(|segment| segment.parse().ok())
}

/// Builder for [`RotatingFileHandler`].
///
/// # Examples
/// ```no_run
/// use logfan::{Level, LineFormatter, RotatingFileHandler};
/// use std::sync::Arc;
///
/// let handler = RotatingFileHandler::builder("./logs", "app.log")
///     .level(Level::Warn)
///     .formatter(Arc::new(LineFormatter::with_template("%d [%l] %m")))
///     .max_file_size(1024 * 1024)
///     .max_backup_count(3)
///     .backup_template("%s.%n.%d")
///     .file_mode(0o640)
///     .build()?;
/// # drop(handler);
/// # Ok::<(), logfan::Error>(())
/// ```
pub struct RotatingFileHandlerBuilder {
    directory: PathBuf,
    file_name: String,
    level: Level,
    formatter: Option<Arc<dyn Formatter>>,
    max_file_size: u64,
    max_backup_count: usize,
    backup_template: String,
    buffer_size: usize,
    file_mode: u32,
}

impl RotatingFileHandlerBuilder {
    /// Minimum level this handler acts on. Defaults to [`Level::Info`].
    pub fn level(self, level: Level) -> Self {
        Self { level, ..self }
    }

    /// Formatter used to render records. Defaults to [`LineFormatter`] with
    /// the default template.
    pub fn formatter(self, formatter: Arc<dyn Formatter>) -> Self {
        Self {
            formatter: Some(formatter),
            ..self
        }
    }

    /// Size threshold in bytes; the file rotates once it is strictly larger.
    pub fn max_file_size(self, max_file_size: u64) -> Self {
        Self {
            max_file_size,
            ..self
        }
    }

    /// Number of backup files retained; older ones are deleted.
    pub fn max_backup_count(self, max_backup_count: usize) -> Self {
        Self {
            max_backup_count,
            ..self
        }
    }

    /// Backup naming template. Placeholders: `%s` original file name, `%d`
    /// backup ordinal, `%t` datetime, `%n` compact datetime.
    pub fn backup_template(self, backup_template: impl Into<String>) -> Self {
        Self {
            backup_template: backup_template.into(),
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

    /// Mode bits for created log files (Unix only), e.g. `0o640`.
    pub fn file_mode(self, file_mode: u32) -> Self {
        Self { file_mode, ..self }
    }

    /// Build the handler. Touches nothing on disk; the directory and file
    /// are created by the first record that passes the level filter (or by
    /// an explicit flush).
    pub fn build(self) -> Result<RotatingFileHandler, Error> {
        let backup_pattern = Regex::new(&format!(r"^{}\.(.+)$", regex::escape(&self.file_name)))
            .map_err(|err| Error::Internal(err.to_string()))?;
        let sink = FileSink::new(
            self.directory.clone(),
            &self.file_name,
            self.buffer_size,
            self.file_mode,
        );
        Ok(RotatingFileHandler {
            level: self.level,
            formatter: self
                .formatter
                .unwrap_or_else(|| Arc::new(LineFormatter::new())),
            directory: self.directory,
            file_name: self.file_name,
            max_file_size: self.max_file_size,
            max_backup_count: self.max_backup_count,
            backup_template: self.backup_template,
            backup_pattern,
            sink: Mutex::new(sink),
        })
    }
}
