use env_logger::Env;

use crate::models::Config;

/// Initialize the global logger.
///
/// `RUST_LOG` wins when set; otherwise `--debug` selects the `debug` level
/// and the default is `info`.
pub fn init_logging(config: &Config) {
    let default_level = if config.debug_mode { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}
