use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber: rolling file output plus stdout in text mode
///
/// `RUST_LOG` wins over `log_level`. Keep the guard alive for the process
/// lifetime or buffered lines are lost.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let file_appender = match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).init();
    }

    guard
}

/// Configured level for our crate, quieter defaults for the connection pool
fn filter_directives(config: &AppConfig) -> String {
    format!("{},sqlx=warn", config.log_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_parse() {
        let config = AppConfig {
            log_level: "debug".to_string(),
            ..AppConfig::default()
        };
        let directives = filter_directives(&config);
        assert_eq!(directives, "debug,sqlx=warn");
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
