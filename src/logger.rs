use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!(
            "{file}:{line}: {}: {}",
            record.level(),
            record.args(),
            file = record.file().unwrap_or_default(),
            line = record.line().unwrap_or_default()
        );
    }

    fn flush(&self) {}
}

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the stderr logger. Each `-v` raises the level by one step,
/// starting from warnings only.
pub fn init(verbosity: u8) {
    // Only fails if a logger is already installed, in which case that one
    // stays in charge.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_for(verbosity));
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, LevelFilter::Warn)]
    #[case(1, LevelFilter::Info)]
    #[case(2, LevelFilter::Debug)]
    #[case(3, LevelFilter::Trace)]
    #[case(9, LevelFilter::Trace)]
    fn verbosity_levels(#[case] verbosity: u8, #[case] expected: LevelFilter) {
        assert_eq!(level_for(verbosity), expected);
    }
}
