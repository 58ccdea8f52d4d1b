//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! Behavior:
//! - LOG_LEVEL overrides the filter (e.g. "debug" or directives like
//!   "info,import=debug,leetnote=debug,tower_http=info").
//! - Without LOG_LEVEL, `serve` logs requests and imports at info/debug while a
//!   one-shot `import` only reports warnings and the import outcome.
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.
//!
//! Logs go to stderr so `leetnote import` keeps stdout for the note path.

use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Server,
    OneShot,
}

fn default_directives(mode: Mode) -> &'static str {
    match mode {
        Mode::Server => "info,import=debug,leetnote=debug,tower_http=info,axum=info",
        Mode::OneShot => "warn,import=info",
    }
}

pub fn init_tracing(mode: Mode) {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(default_directives(mode)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(mode == Mode::Server)
        .with_line_number(mode == Mode::Server);

    // Choose JSON vs pretty; the two builders have different types.
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_parse() {
        for mode in [Mode::Server, Mode::OneShot] {
            assert!(default_directives(mode).parse::<EnvFilter>().is_ok());
        }
    }
}
