// Logger setup for hosts embedding the ledger
//
// Library code only emits through the `log` facade. Binaries and services
// call `setup_logger` once at startup; integration tests use `env_logger`.

use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

use crate::time::get_current_time_in_millis;

/// Install a global fern dispatcher writing to stdout
///
/// Fails if a logger was already installed for this process.
pub fn setup_logger(level: LevelFilter, colored: bool) -> Result<(), log::SetLoggerError> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::BrightBlack);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = get_current_time_in_millis();
            if colored {
                out.finish(format_args!(
                    "{} [{}] {} > {}",
                    timestamp,
                    colors.color(record.level()),
                    record.target(),
                    message
                ))
            } else {
                out.finish(format_args!(
                    "{} [{}] {} > {}",
                    timestamp,
                    record.level(),
                    record.target(),
                    message
                ))
            }
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()
}
