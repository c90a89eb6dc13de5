//! Log subscriber installation.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::error::{Result, TnCliError};

/// Level used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install a global `fmt` subscriber writing to standard error.
///
/// `RUST_LOG` takes precedence over `verbosity`.
///
/// # Errors
///
/// Returns [`TnCliError::Logging`] when a global subscriber is already set.
pub fn init(verbosity: u8) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbosity).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(TnCliError::Logging)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tracing_subscriber::filter::LevelFilter;

    use super::default_level;

    #[rstest]
    #[case(0, LevelFilter::INFO)]
    #[case(1, LevelFilter::DEBUG)]
    #[case(2, LevelFilter::TRACE)]
    #[case(9, LevelFilter::TRACE)]
    fn verbosity_raises_the_level(#[case] verbosity: u8, #[case] expected: LevelFilter) {
        assert_eq!(default_level(verbosity), expected);
    }
}
