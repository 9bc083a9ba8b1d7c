//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::AppEnv;

/// Installs the global subscriber. `RUST_LOG` wins over the `info` default.
///
/// Logs go to stderr so command output on stdout stays parseable.
pub fn init(app_env: AppEnv) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match app_env {
        AppEnv::Development => builder.pretty().init(),
        AppEnv::Production => builder.compact().init(),
    }
}
