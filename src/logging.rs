//! Logger bootstrap on top of the `log` facade

use std::sync::Once;

/// Used when neither the config nor `RUST_LOG` names a filter. macroquad and
/// the image codecs only get through with warnings.
pub const DEFAULT_FILTER: &str = "warn,softraster=info";

/// `env_filter` uses `env_logger` filter syntax (e.g. "info", "softraster=debug").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Pick the filter: explicit config first, then `RUST_LOG`, then `DEFAULT_FILTER`.
/// Blank values count as unset.
pub fn resolve_filter(explicit: Option<&str>, env: Option<&str>) -> String {
    fn set(f: Option<&str>) -> Option<&str> {
        f.map(str::trim).filter(|f| !f.is_empty())
    }
    set(explicit).or(set(env)).unwrap_or(DEFAULT_FILTER).to_string()
}

static INIT: Once = Once::new();

/// Install the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let env = std::env::var("RUST_LOG").ok();
        let filter = resolve_filter(config.env_filter.as_deref(), env.as_deref());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        builder.format_timestamp_millis();

        // try_init: a test harness may already own the logger
        if builder.try_init().is_ok() {
            log::debug!("logging initialized with filter {:?}", filter);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_filter_wins() {
        assert_eq!(resolve_filter(Some("softraster=trace"), Some("debug")), "softraster=trace");
    }

    #[test]
    fn test_env_filter_used_without_config() {
        assert_eq!(resolve_filter(None, Some("debug")), "debug");
    }

    #[test]
    fn test_default_quiets_dependencies() {
        assert_eq!(resolve_filter(None, None), DEFAULT_FILTER);
        assert_eq!(resolve_filter(Some("  "), None), DEFAULT_FILTER);
        assert_eq!(resolve_filter(Some(""), Some("debug")), "debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig { env_filter: Some("off".to_string()), ..Default::default() });
    }
}
