use std::io::Write;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Initialises the global logger. An explicit `level` wins over `RUST_LOG`;
/// with neither set the level is `info`. Calling it twice is harmless.
pub fn init_logging(level: Option<&str>) {
    let log_level = level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| {
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|v| v.parse::<LevelFilter>().ok())
        })
        .unwrap_or(LevelFilter::Info);

    let initialised = Builder::new()
        .filter_level(log_level)
        .target(Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();

    if initialised.is_ok() {
        log::debug!("logging at level {}", log_level);
    }
}
