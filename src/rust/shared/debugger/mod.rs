/// Debugger utilities - timing for resolver diagnostics
use crate::tools::logger::Logger;
use std::time::Instant;

/// Measures a labelled span; reports it through the logger on drop when armed.
pub struct DebugTimer {
    start: Instant,
    label: String,
    logger: Option<Logger>,
}

impl DebugTimer {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
            logger: None,
        }
    }

    /// Report the elapsed time to `logger` when the timer is dropped
    pub fn reporting_to(mut self, logger: &Logger) -> Self {
        self.logger = Some(logger.clone());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn log_elapsed(&self) {
        if let Some(logger) = &self.logger {
            logger.debug(format!("{} took {:.3}ms", self.label, self.elapsed_ms()));
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        self.log_elapsed();
    }
}

#[cfg(test)]
#[path = "test_shared_debugger.rs"]
mod tests;
