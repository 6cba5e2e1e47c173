use crate::Result;

use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Warnings by default, `--verbose` traces every engine step. `RUST_LOG` wins over both
pub fn configure_app(verbose: bool) -> Result {
    SimpleLogger::new()
        .with_level(default_level(verbose))
        .env()
        .init()?;

    return Ok(());
}

fn default_level(verbose: bool) -> LevelFilter {
    return match verbose {
        true => LevelFilter::Debug,
        false => LevelFilter::Warn,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_lowers_level() {
        assert_eq!(default_level(false), LevelFilter::Warn);
        assert_eq!(default_level(true), LevelFilter::Debug);
    }
}
