use env_logger::{Builder, Env};
use std::io::Write;

/// Initializes the global logger.
///
/// Call once at the start of a binary's `main`. The level comes from the
/// `RUST_LOG` environment variable and defaults to `info`
/// (e.g. `RUST_LOG=debug clean_swords sample.in`). Logs go to stderr so that
/// stdout carries only results.
///
/// Calling it again is harmless; later calls leave the first logger in place.
pub fn init() {
    let result = Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();

    if result.is_ok() {
        log::debug!("Logger initialized.");
    }
}
