//! # logfan
//!
//! logfan is a small leveled-logging facility: a [`Logger`] fans each record
//! out to a set of pluggable [`Handler`]s, and each handler filters by its
//! own minimum [`Level`] and renders the record through its own
//! [`Formatter`]. The centerpiece is the [`RotatingFileHandler`], a buffered
//! file writer that rotates the log file once it grows past a size
//! threshold, keeps a bounded set of numbered backups and deletes the
//! oldest ones beyond the retention limit.
//!
//! All work happens synchronously on the calling thread; there are no
//! background threads or timers. Each file handler guards its whole
//! check-rotate-write sequence with one lock, so concurrent callers see a
//! linearizable sequence of records. Rotation correctness is guaranteed
//! within a single process owning the file path; multi-process coordination
//! is out of scope.
//!
//! ## Example
//!
//! ```no_run
//! use {
//!     logfan::{ConsoleHandler, Level, LineFormatter, Logger, RotatingFileHandler},
//!     std::sync::Arc,
//! };
//!
//! fn main() -> Result<(), logfan::Error> {
//!     let file = RotatingFileHandler::builder("./logs", "app.log")
//!         .level(Level::Debug)
//!         .formatter(Arc::new(LineFormatter::with_template("%d [%l] %m")))
//!         .max_file_size(5 * 1024 * 1024)
//!         .max_backup_count(3)
//!         .build()?;
//!     let console = ConsoleHandler::new().level(Level::Warn);
//!
//!     let mut logger = Logger::new();
//!     logger.add_handler(Arc::new(file));
//!     logger.add_handler(Arc::new(console));
//!
//!     logger.info("written to the file only");
//!     logger.error("written to the file and stderr");
//!     Ok(())
//! }
//! ```

mod error;
mod file;
mod format;
mod handler;
mod level;
mod logger;
mod rotating;
mod sink;

pub use {
    error::Error,
    file::{FileHandler, FileHandlerBuilder},
    format::{Formatter, LineFormatter, DEFAULT_TEMPLATE},
    handler::{ConsoleHandler, Handler},
    level::Level,
    logger::Logger,
    rotating::{
        RotatingFileHandler, RotatingFileHandlerBuilder, DEFAULT_BACKUP_TEMPLATE,
        DEFAULT_MAX_BACKUP_COUNT, DEFAULT_MAX_FILE_SIZE,
    },
    sink::{FileSink, DEFAULT_BUFFER_SIZE, DEFAULT_FILE_MODE},
};
