use std::{io, path::PathBuf};

/// Errors that can occur when configuring or running log handlers.
///
/// Variants fall into four groups:
///
/// * Configuration errors ([`Error::InvalidLevel`], [`Error::UnknownLevel`])
///   from fallible [`Level`](crate::Level) conversions.
/// * I/O errors, one variant per file-system operation so a failure always
///   names the operation and the path it failed on.
/// * Backup naming errors ([`Error::MalformedBackupName`],
///   [`Error::BackupNameExhausted`]). These are deliberately distinct from
///   the I/O group: they signal that the log directory contains files
///   inconsistent with the handler's backup naming convention, not that the
///   OS refused an operation.
/// * Formatter errors ([`Error::Format`]). The shipped
///   [`LineFormatter`](crate::LineFormatter) never fails, but the
///   [`Formatter`](crate::Formatter) contract allows it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid log level value: {0}")]
    InvalidLevel(u8),
    #[error("unknown log level name: '{0}'")]
    UnknownLevel(String),
    #[error("failed to create log directory '{path}': {source}")]
    CreateDirectory { path: PathBuf, source: io::Error },
    #[error("failed to open log file '{path}': {source}")]
    OpenFile { path: PathBuf, source: io::Error },
    #[error("failed to stat log file '{path}': {source}")]
    Stat { path: PathBuf, source: io::Error },
    #[error("failed to write to log file '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to flush log file '{path}': {source}")]
    Flush { path: PathBuf, source: io::Error },
    #[error("failed to rename log file '{from}' to '{to}': {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    #[error("failed to remove backup file '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },
    #[error("failed to list log directory '{path}': {source}")]
    ReadDir { path: PathBuf, source: io::Error },
    #[error("failed to write to console: {source}")]
    Console { source: io::Error },
    #[error("backup file '{path}' has a non-numeric ordinal suffix '{ordinal}'")]
    MalformedBackupName { path: PathBuf, ordinal: String },
    #[error("no unused backup file name available for '{path}'")]
    BackupNameExhausted { path: PathBuf },
    #[error("failed to format log message: {0}")]
    Format(String),
    #[error("internal error: {0}")]
    Internal(String),
}
