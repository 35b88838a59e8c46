use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Log targets of the workspace crates; `init` raises all of them to the chosen level.
pub const WORKSPACE_TARGETS: [&str; 6] = [
    "nutri_advisor",
    "api",
    "diet_advisor",
    "knowledge_graph",
    "rag_base",
    "ai_llm_service",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        // Keep timestamps compact: no fractional seconds, Z-suffix
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Build the formatting layer used by the server binary.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format
/// - `file:line` and target (module path)
/// - Span close events (duration at the end of spans)
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
}

/// `target=level` directive, e.g. `diet_advisor=debug`.
///
/// Returns `None` if `target` is not a valid target name.
pub fn level_directive(target: &str, level: Level) -> Option<Directive> {
    Directive::from_str(&format!("{target}={}", level.as_str().to_lowercase())).ok()
}

/// `RUST_LOG` when set; otherwise `default` globally plus `level` for
/// every entry of [`WORKSPACE_TARGETS`].
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return from_env;
    }
    WORKSPACE_TARGETS
        .iter()
        .filter_map(|t| level_directive(t, level))
        .fold(EnvFilter::new(default), EnvFilter::add_directive)
}

/// Installs the global subscriber: env filter + [`layer`].
///
/// # Errors
/// Returns [`TryInitError`] if a global subscriber is already set.
pub fn init(default: &str, level: Level) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter_with_level(default, level))
        .with(layer())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_per_target() {
        let d = level_directive("diet_advisor", Level::DEBUG).unwrap();
        assert_eq!(d.to_string().to_lowercase(), "diet_advisor=debug");
    }

    #[test]
    fn every_workspace_target_is_valid() {
        for t in WORKSPACE_TARGETS {
            assert!(level_directive(t, Level::TRACE).is_some(), "{t}");
        }
    }
}
