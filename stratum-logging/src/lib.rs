use stratum_core::err::Result;
pub use log::*;

mod limiting;
pub use limiting::*;

/// Statements longer than this are truncated when logged
pub const MAX_SQL_LOG_LENGTH: usize = 2048;

/// Configures the logger of the connector process.
///
/// Defaults to `info`, overridden by `RUST_LOG`.
pub fn init_logging() -> Result<()> {
    env_logger::try_init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    )?;
    Ok(())
}

/// Logging init function for tests
pub fn init_for_tests() {
    let res = env_logger::builder()
        .filter_module("stratum", LevelFilter::Trace)
        .is_test(true)
        .try_init();
    if let Err(err) = res {
        eprintln!("Failed to init logging: {}", err);
    }
}
