use log::{debug, info, warn};

/// Thin wrapper over the `log` facade shared by synthesis and composition.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn detail(&self, message: &str) {
        debug!("{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
