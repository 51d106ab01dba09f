use {
    crate::{Handler, Level},
    std::sync::Arc,
};

/// Dispatcher that fans each record out to an ordered set of handlers.
///
/// Every handler receives every record, in insertion order, and applies its
/// own level filter; the logger itself filters nothing. A failing handler is
/// reported on `stderr` and never prevents the remaining handlers from
/// receiving the record.
///
/// # Examples
/// ```
/// use logfan::{ConsoleHandler, Level, Logger};
/// use std::sync::Arc;
///
/// let mut logger = Logger::new();
/// logger.add_handler(Arc::new(ConsoleHandler::new().level(Level::Warn)));
/// logger.info("not shown");
/// logger.error("shown on stderr");
/// ```
#[derive(Default)]
pub struct Logger {
    handlers: Vec<Arc<dyn Handler>>,
}

impl Logger {
    /// Create a logger with no handlers. Records go nowhere until one is
    /// added.
    pub fn new() -> Self {
        Logger {
            handlers: Vec::new(),
        }
    }

    /// Append a handler to the dispatch order.
    pub fn add_handler(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.push(handler);
    }

    /// Remove a handler by identity: every entry sharing the given
    /// allocation is dropped.
    pub fn remove_handler(&mut self, handler: &Arc<dyn Handler>) {
        self.handlers.retain(|h| !Arc::ptr_eq(h, handler));
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Dispatch one record to every handler.
    pub fn log(&self, level: Level, message: &str) {
        for handler in &self.handlers {
            if let Err(err) = handler.log(level, message) {
                eprintln!("log handler failed: {err}");
            }
        }
    }

    /// Log at [`Level::Debug`].
    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    /// Log at [`Level::Info`].
    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    /// Log at [`Level::Warn`].
    pub fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    /// Log at [`Level::Error`].
    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Log at [`Level::Critical`].
    pub fn critical(&self, message: &str) {
        self.log(Level::Critical, message);
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::Error,
        std::sync::{Arc, Mutex},
    };

    /// Handler that records every call it receives.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(Level, String)>>,
    }

    impl Handler for Recorder {
        fn log(&self, level: Level, message: &str) -> Result<(), Error> {
            self.seen.lock().unwrap().push((level, message.to_owned()));
            Ok(())
        }
    }

    /// Handler that always fails.
    struct Failing;

    impl Handler for Failing {
        fn log(&self, _level: Level, _message: &str) -> Result<(), Error> {
            Err(Error::Format("always fails".to_owned()))
        }
    }

    #[test]
    fn every_handler_receives_every_record() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        let mut logger = Logger::new();
        logger.add_handler(first.clone());
        logger.add_handler(second.clone());

        logger.debug("a");
        logger.critical("b");

        for recorder in [&first, &second] {
            let seen = recorder.seen.lock().unwrap();
            assert_eq!(
                *seen,
                vec![
                    (Level::Debug, "a".to_owned()),
                    (Level::Critical, "b".to_owned()),
                ]
            );
        }
    }

    #[test]
    fn remove_handler_matches_by_identity() {
        let kept = Arc::new(Recorder::default());
        let removed = Arc::new(Recorder::default());
        let mut logger = Logger::new();
        logger.add_handler(kept.clone());
        let removed_dyn: Arc<dyn Handler> = removed.clone();
        logger.add_handler(removed_dyn.clone());
        assert_eq!(logger.handler_count(), 2);

        logger.remove_handler(&removed_dyn);
        assert_eq!(logger.handler_count(), 1);

        logger.info("after removal");
        assert_eq!(kept.seen.lock().unwrap().len(), 1);
        assert!(removed.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn a_failing_handler_does_not_block_the_rest() {
        let recorder = Arc::new(Recorder::default());
        let mut logger = Logger::new();
        logger.add_handler(Arc::new(Failing));
        logger.add_handler(recorder.clone());

        logger.info("still delivered");
        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
    }
}
