//! Tracing setup for MCP servers

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for an MCP server process
///
/// Logs go to stderr without ANSI colors, since stdout is the MCP transport.
/// `RUST_LOG` is honoured; on top of it the server crate itself logs at
/// `info`, or `debug` when `verbose` is set. `LOG_FORMAT=json` switches to
/// JSON lines.
///
/// Can only be called once per process.
pub fn init_tracing(crate_name: &str, verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::from_default_env().add_directive(directive(crate_name, level).parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}

/// Filter directives use the crate's module path, so dashes become underscores
fn directive(crate_name: &str, level: &str) -> String {
    format!("{}={}", crate_name.replace('-', "_"), level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_normalizes_crate_name() {
        assert_eq!(directive("pushplus-mcp", "debug"), "pushplus_mcp=debug");
        assert_eq!(directive("pushplus_mcp", "info"), "pushplus_mcp=info");
    }

    #[test]
    fn test_directive_parses_as_filter() {
        let parsed: Result<tracing_subscriber::filter::Directive, _> =
            directive("pushplus-mcp", "info").parse();
        assert!(parsed.is_ok());
    }
}
