//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    // A second initialization is a no-op rather than a panic
    let _ = env_logger::try_init();
}

/// Initialize the logging system with a default level
///
/// `RUST_LOG` still takes precedence when it is set.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Whether `level` names a valid log level filter
pub fn is_valid_level(level: &str) -> bool {
    level.parse::<log::LevelFilter>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert!(is_valid_level("info"));
        assert!(is_valid_level("DEBUG"));
        assert!(is_valid_level("off"));
        assert!(!is_valid_level("loud"));
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        init_with_level("warn");
        init();
        info!("logger initialized twice");
    }
}
