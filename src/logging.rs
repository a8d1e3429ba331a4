use env_logger::WriteStyle;
use log::LevelFilter;
use std::io::Write;

/// Installs a stderr logger at `Info`, overridable through `RUST_LOG`.
/// Fails if a logger is already installed.
pub fn try_init() -> Result<(), log::SetLoggerError> {
    env_logger::builder()
        .format(|buf, record| writeln!(buf, "[NARROW | {}] {}", record.level(), record.args()))
        .write_style(WriteStyle::Auto)
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .try_init()
}
