//! Structured logging setup for the CLI.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging on stderr. `RUST_LOG` and then `MAZE_EXPLORER_LOG`
/// override the level chosen from the flags.
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let level = match (verbose, log_level) {
        (_, Some(level)) => level,
        (true, None) => "debug",
        (false, None) => "warn",
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("MAZE_EXPLORER_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(directive(level)));

    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_span_events(
                        fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE,
                    ),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

/// Scope a bare level to this crate; full directives pass through
fn directive(level: &str) -> String {
    if level.contains('=') {
        level.to_string()
    } else {
        format!("maze_explorer={}", level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_scoping() {
        assert_eq!(directive("debug"), "maze_explorer=debug");
        assert_eq!(directive("maze_explorer=trace,warn"), "maze_explorer=trace,warn");
    }
}
