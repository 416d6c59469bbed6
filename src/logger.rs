use env_logger::Builder;
use log::{debug, LevelFilter};

/// Installs the global logger. `RUST_LOG` overrides the default level.
/// Calling it again keeps the logger already installed.
pub fn init(debug: bool) {
    let mut builder = Builder::new();
    builder.filter_level(if debug { LevelFilter::Debug } else { LevelFilter::Info });
    builder.parse_default_env();
    if builder.try_init().is_err() {
        debug!("Logger already installed, keeping it");
    }
}
