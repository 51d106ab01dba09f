use {
    crate::Error,
    std::{fmt, str::FromStr},
};

/// Severity of a log record, ordered from least to most severe.
///
/// Every handler carries a minimum level; records below it are discarded by
/// that handler before any I/O happens. The ordering is total:
/// `Debug < Info < Warn < Error < Critical`.
///
/// # Examples
/// ```
/// use logfan::Level;
///
/// assert!(Level::Debug < Level::Error);
/// assert_eq!(Level::Warn.as_str(), "WARN");
/// assert_eq!("CRITICAL".parse::<Level>().unwrap(), Level::Critical);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Diagnostic detail, normally disabled in production.
    Debug,
    /// Routine operational messages.
    Info,
    /// Something unexpected that the program can tolerate.
    Warn,
    /// A failure that affected the current operation.
    Error,
    /// A failure that threatens the whole program.
    Critical,
}

impl Level {
    /// Canonical upper-case display name, as written into log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Level {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Level::Debug),
            1 => Ok(Level::Info),
            2 => Ok(Level::Warn),
            3 => Ok(Level::Error),
            4 => Ok(Level::Critical),
            other => Err(Error::InvalidLevel(other)),
        }
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "CRITICAL" => Ok(Level::Critical),
            other => Err(Error::UnknownLevel(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_totally_ordered() {
        let levels = [
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
            Level::Critical,
        ];
        for pair in levels.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(Level::Debug.to_string(), "DEBUG");
        assert_eq!(Level::Info.to_string(), "INFO");
        assert_eq!(Level::Warn.to_string(), "WARN");
        assert_eq!(Level::Error.to_string(), "ERROR");
        assert_eq!(Level::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn numeric_conversion_round_trips() {
        for value in 0u8..=4 {
            let level = Level::try_from(value).unwrap();
            assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
        }
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        assert!(matches!(Level::try_from(5), Err(Error::InvalidLevel(5))));
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(matches!(
            "verbose".parse::<Level>(),
            Err(Error::UnknownLevel(name)) if name == "verbose"
        ));
    }
}
