use {
    crate::{Error, Level},
    chrono::Local,
    std::sync::{PoisonError, RwLock},
};

/// Default line template: timestamp, level name, message.
pub const DEFAULT_TEMPLATE: &str = "%d %l %m";

/// Renders a log record into the line a handler writes out.
///
/// Formatting is pure and side-effect free; implementations must be safe to
/// share between handlers. The contract is fallible even though
/// [`LineFormatter`] never actually fails.
pub trait Formatter: Send + Sync {
    /// Render `message` at `level` into a single log line.
    fn format(&self, level: Level, message: &str) -> Result<String, Error>;
}

/// Template-driven line formatter.
///
/// The template is substituted by literal sequential text replacement, in
/// this order:
///
/// * `%d` — the current local date and time, `YYYY-MM-DD HH:MM:SS`
/// * `%l` — the level's display name
/// * `%m` — the message
///
/// Anything else in the template, including unrecognized `%` sequences, is
/// passed through verbatim. The template lives behind a lock and is read on
/// every call, so a formatter shared between handlers can be retargeted
/// between calls and the change takes effect immediately.
///
/// # Examples
/// ```
/// use logfan::{Formatter, Level, LineFormatter};
///
/// let formatter = LineFormatter::with_template("[%l] %m");
/// let line = formatter.format(Level::Warn, "disk almost full").unwrap();
/// assert_eq!(line, "[WARN] disk almost full");
///
/// formatter.set_template("%m");
/// let line = formatter.format(Level::Warn, "disk almost full").unwrap();
/// assert_eq!(line, "disk almost full");
/// ```
pub struct LineFormatter {
    template: RwLock<String>,
}

impl LineFormatter {
    /// Create a formatter with the default template (`"%d %l %m"`).
    pub fn new() -> Self {
        Self::with_template(DEFAULT_TEMPLATE)
    }

    /// Create a formatter with a custom template.
    pub fn with_template(template: impl Into<String>) -> Self {
        LineFormatter {
            template: RwLock::new(template.into()),
        }
    }

    /// Replace the template. Takes effect on the next `format` call.
    pub fn set_template(&self, template: impl Into<String>) {
        *self
            .template
            .write()
            .unwrap_or_else(PoisonError::into_inner) = template.into();
    }

    /// The currently configured template.
    pub fn template(&self) -> String {
        self.template
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for LineFormatter {
    fn format(&self, level: Level, message: &str) -> Result<String, Error> {
        let template = self.template();
        let line = template
            .replace("%d", &Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
            .replace("%l", level.as_str())
            .replace("%m", message);
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, regex::Regex};

    #[test]
    fn default_template_renders_date_level_message() {
        let formatter = LineFormatter::new();
        let line = formatter.format(Level::Info, "hello").unwrap();
        let pattern =
            Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} INFO hello$").unwrap();
        assert!(pattern.is_match(&line), "unexpected line: {line}");
    }

    #[test]
    fn dashed_template_renders_as_configured() {
        let formatter = LineFormatter::with_template("%d - %l - %m");
        let line = formatter.format(Level::Info, "hello").unwrap();
        let pattern =
            Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} - INFO - hello$").unwrap();
        assert!(pattern.is_match(&line), "unexpected line: {line}");
    }

    #[test]
    fn unknown_placeholders_pass_through() {
        let formatter = LineFormatter::with_template("%x %l %m %z");
        let line = formatter.format(Level::Error, "boom").unwrap();
        assert_eq!(line, "%x ERROR boom %z");
    }

    #[test]
    fn template_change_applies_to_next_call() {
        let formatter = LineFormatter::with_template("%m");
        assert_eq!(formatter.format(Level::Info, "one").unwrap(), "one");
        formatter.set_template("%l: %m");
        assert_eq!(formatter.format(Level::Info, "two").unwrap(), "INFO: two");
    }

    #[test]
    fn message_may_contain_placeholder_text() {
        // %d is substituted before %m, so placeholder text arriving inside
        // the message survives untouched.
        let formatter = LineFormatter::with_template("%m");
        assert_eq!(formatter.format(Level::Info, "100%d").unwrap(), "100%d");
    }
}
