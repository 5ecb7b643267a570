use std::io;

use time::macros::format_description;
use time::UtcOffset;
use tracing_subscriber::{self, fmt, prelude::*};

/// Initialize logging to stderr.
///
/// # Arguments
/// * `no_color` - Disable ANSI colors
/// * `log_level` - Override log level (otherwise uses RUST_LOG or defaults to "info")
///
/// Installing twice is not an error: the first subscriber stays in place.
pub fn init_logger(no_color: bool, log_level: Option<&str>) -> io::Result<()> {
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::UTC,
        format_description!("[[[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z]"),
    );

    let filter = match log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer)
        .with_ansi(!no_color)
        .with_filter(filter);

    match tracing_subscriber::registry().with(stderr_layer).try_init() {
        Ok(()) => Ok(()),
        Err(e) => {
            if e.to_string().contains("already been set") || e.to_string().contains("SetLoggerError") {
                Ok(())
            } else {
                Err(io::Error::new(io::ErrorKind::Other, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init_logger(true, Some("debug")).unwrap();
        init_logger(true, None).unwrap();
    }
}
