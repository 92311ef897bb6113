use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// `filter` uses the `env_logger` directive syntax (e.g. "info" or
/// "nimbus_hud=debug"); a `RUST_LOG` environment variable always wins over
/// it, so a deployed overlay can still be cranked up in the field without a
/// rebuild.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Compiled-in filter directives; `None` falls back to `default_level`.
    pub filter: Option<String>,
    /// Level used when neither `filter` nor `RUST_LOG` is present.
    pub default_level: LevelFilter,
    /// Include the emitting module path in each line.
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: None, default_level: LevelFilter::Info, show_target: true }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; subsequent calls are no-ops.
///
/// Intended usage is early in `main`, before the first window event.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match (std::env::var("RUST_LOG").ok(), config.filter) {
            (Some(env), _) => {
                builder.parse_filters(&env);
            }
            (None, Some(filter)) => {
                builder.parse_filters(&filter);
            }
            (None, None) => {
                builder.filter_level(config.default_level);
            }
        }

        builder.format_timestamp_millis();
        builder.format_target(config.show_target);
        builder.init();
    });
}
