use {
    crate::Error,
    std::{
        fs,
        io::{BufWriter, Write as _},
        path::{Path, PathBuf},
    },
};

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};

/// Mode for created log directories (owner rwx, group/others rx).
const DIRECTORY_MODE: u32 = 0o755;

/// Default mode for created log files: read/write for owner and group.
/// Explicit rather than inherited from the process umask.
pub const DEFAULT_FILE_MODE: u32 = 0o660;

/// Default write buffer capacity in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// A buffered append-only sink over one log file.
///
/// The sink owns the file handle exclusively; handlers wrap it in a mutex
/// and drive the whole open-check-write-flush sequence through it. The
/// handle is created lazily: construction touches nothing on disk, and the
/// directory and file first appear on [`open`](FileSink::open) (called
/// implicitly by [`write`](FileSink::write) and [`flush`](FileSink::flush)).
///
/// Writes are buffered; durability is only guaranteed after a `flush`. The
/// on-disk size is deliberately re-statted on every
/// [`current_size`](FileSink::current_size) call instead of tracked in
/// memory, so external truncation or rotation of the file is still observed.
pub struct FileSink {
    directory: PathBuf,
    path: PathBuf,
    buffer_size: usize,
    file_mode: u32,
    writer: Option<BufWriter<fs::File>>,
}

impl FileSink {
    /// Create a sink for `<directory>/<file_name>`. Nothing is opened yet.
    pub fn new(
        directory: impl Into<PathBuf>,
        file_name: impl AsRef<Path>,
        buffer_size: usize,
        file_mode: u32,
    ) -> Self {
        let directory = directory.into();
        let path = directory.join(file_name.as_ref());
        FileSink {
            directory,
            path,
            buffer_size,
            file_mode,
            writer: None,
        }
    }

    /// Full path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a file handle is currently held.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Open (or create) the log file in append mode, creating the directory
    /// chain first if needed. Idempotent while already open.
    pub fn open(&mut self) -> Result<(), Error> {
        if self.writer.is_some() {
            return Ok(());
        }

        if !self.directory.is_dir() {
            let mut builder = fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            builder.mode(DIRECTORY_MODE);
            builder.create(&self.directory).map_err(|source| {
                Error::CreateDirectory {
                    path: self.directory.clone(),
                    source,
                }
            })?;
        }

        let mut options = fs::OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        options.mode(self.file_mode);
        let file = options.open(&self.path).map_err(|source| Error::OpenFile {
            path: self.path.clone(),
            source,
        })?;

        self.writer = Some(BufWriter::with_capacity(self.buffer_size, file));
        Ok(())
    }

    /// Write one rendered line through the buffer, appending a trailing
    /// newline if the line does not already carry one. Opens lazily. Does
    /// not imply durability.
    pub fn write(&mut self, line: &str) -> Result<(), Error> {
        self.open()?;
        if let Some(writer) = self.writer.as_mut() {
            let mut result = writer.write_all(line.as_bytes());
            if result.is_ok() && !line.ends_with('\n') {
                result = writer.write_all(b"\n");
            }
            result.map_err(|source| Error::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Force buffered bytes to the file. Opens the sink first if it is
    /// closed, so a flush on a fresh sink publishes an empty log file.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.open()?;
        if let Some(writer) = self.writer.as_mut() {
            writer.flush().map_err(|source| Error::Flush {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Flush and release the file handle. No-op when already closed. The
    /// handle is released even if the final flush fails, so the sink is
    /// never left half-open.
    pub fn close(&mut self) -> Result<(), Error> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        writer.flush().map_err(|source| Error::Flush {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Byte length of the file on disk, from a fresh `stat`. Fails if the
    /// file is missing or inaccessible.
    pub fn current_size(&self) -> Result<u64, Error> {
        fs::metadata(&self.path)
            .map(|metadata| metadata.len())
            .map_err(|source| Error::Stat {
                path: self.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use {super::*, tempfile::tempdir};

    fn sink_in(dir: &Path) -> FileSink {
        FileSink::new(dir.join("logs"), "app.log", DEFAULT_BUFFER_SIZE, DEFAULT_FILE_MODE)
    }

    #[test]
    fn construction_touches_nothing_on_disk() {
        let dir = tempdir().unwrap();
        let sink = sink_in(dir.path());
        assert!(!sink.is_open());
        assert!(!dir.path().join("logs").exists());
    }

    #[test]
    fn open_creates_directory_chain_and_file() {
        let dir = tempdir().unwrap();
        let mut sink = FileSink::new(
            dir.path().join("a").join("b"),
            "app.log",
            DEFAULT_BUFFER_SIZE,
            DEFAULT_FILE_MODE,
        );
        sink.open().unwrap();
        assert!(sink.is_open());
        assert!(dir.path().join("a").join("b").join("app.log").is_file());
    }

    #[test]
    fn write_appends_missing_newline_only() {
        let dir = tempdir().unwrap();
        let mut sink = sink_in(dir.path());
        sink.write("plain").unwrap();
        sink.write("terminated\n").unwrap();
        sink.flush().unwrap();
        let contents = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents, "plain\nterminated\n");
    }

    #[test]
    fn flush_publishes_an_empty_file() {
        let dir = tempdir().unwrap();
        let mut sink = sink_in(dir.path());
        sink.flush().unwrap();
        assert_eq!(sink.current_size().unwrap(), 0);
        // A second flush with nothing buffered changes nothing.
        sink.flush().unwrap();
        assert_eq!(sink.current_size().unwrap(), 0);
    }

    #[test]
    fn close_is_idempotent_and_releases_the_handle() {
        let dir = tempdir().unwrap();
        let mut sink = sink_in(dir.path());
        sink.write("line").unwrap();
        sink.close().unwrap();
        assert!(!sink.is_open());
        sink.close().unwrap();
        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "line\n");
    }

    #[test]
    fn current_size_reflects_flushed_bytes() {
        let dir = tempdir().unwrap();
        let mut sink = sink_in(dir.path());
        sink.write("12345").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.current_size().unwrap(), 6);
    }

    #[test]
    fn current_size_fails_when_the_file_is_missing() {
        let dir = tempdir().unwrap();
        let sink = sink_in(dir.path());
        assert!(matches!(sink.current_size(), Err(Error::Stat { .. })));
    }
}
