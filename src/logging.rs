/// Logging setup
use log::LevelFilter;

/// Initialize logging for the service
pub fn init_logging(level: LogLevel) {
    let level_filter = match level {
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Error => LevelFilter::Error,
    };

    let _ = env_logger::Builder::from_default_env()
        .filter_level(level_filter)
        .try_init();
}

/// Log levels
#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Level selected by the DEBUG configuration flag
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug { LogLevel::Debug } else { LogLevel::Info }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_debug_flag() {
        assert!(matches!(LogLevel::from_debug_flag(true), LogLevel::Debug));
        assert!(matches!(LogLevel::from_debug_flag(false), LogLevel::Info));
    }
}
