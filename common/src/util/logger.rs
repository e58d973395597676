use env_logger::{Builder, Env};
use std::io::Write;

/// Installs the global logger. `RUST_LOG` overrides the default `info` filter.
/// Calling it again is harmless, so tests may call it freely.
pub fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
}
