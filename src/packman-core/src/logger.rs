use slog::{Drain, Level, Logger};

/// A Slog formatter that writes to a term decorator.
pub struct PackmanFormat<D>
where
    D: slog_term::Decorator,
{
    decorator: D,
}

impl<D: slog_term::Decorator> PackmanFormat<D> {
    pub fn new(decorator: D) -> PackmanFormat<D> {
        PackmanFormat { decorator }
    }
}

impl<D: slog_term::Decorator> slog::Drain for PackmanFormat<D> {
    type Ok = ();
    type Err = std::io::Error;

    fn log(
        &self,
        record: &slog::Record<'_>,
        values: &slog::OwnedKVList,
    ) -> Result<Self::Ok, Self::Err> {
        self.decorator.with_record(record, values, |decorator| {
            if record.level() <= Level::Warning {
                decorator.start_level()?;
                write!(decorator, "{}: ", record.level().as_str())?;
                // start_whitespace resets to normal coloring after printing the level
                decorator.start_whitespace()?;
            }

            decorator.start_msg()?;
            write!(decorator, "{}", record.msg())?;

            decorator.start_whitespace()?;
            writeln!(decorator)?;

            decorator.flush()?;
            Ok(())
        })
    }
}

/// The level for a verbosity. `None` means quiet enough to discard everything.
fn log_level(verbose_level: i64) -> Option<Level> {
    match verbose_level {
        -3 => Some(Level::Critical),
        -2 => Some(Level::Error),
        -1 => Some(Level::Warning),
        0 => Some(Level::Info),
        1 => Some(Level::Debug),
        x if x > 1 => Some(Level::Trace),
        _ => None,
    }
}

/// Create a root logger writing to STDERR.
/// The verbose_level can be negative, in which case it's a quiet mode which removes warnings,
/// then errors entirely.
pub fn create_root_logger(verbose_level: i64) -> Logger {
    let Some(level) = log_level(verbose_level) else {
        return Logger::root(slog::Discard, slog::o!());
    };

    let decorator = slog_term::TermDecorator::new().build();
    let drain = PackmanFormat::new(decorator).fuse();
    let drain = slog::LevelFilter::new(drain, level).fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(drain, slog::o!("version" => env!("CARGO_PKG_VERSION")))
}
