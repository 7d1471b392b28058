//! Logging setup for the command-line caller.
//!
//! Everything goes to stderr; stdout carries only command output.

use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per line, with the current span and span list.
    Json,
}

impl LogFormat {
    /// Reads `LOG_FORMAT`. `json` (any case) selects [`LogFormat::Json`].
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT").map_or(Self::Pretty, |value| Self::parse(&value))
    }

    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") { Self::Json } else { Self::Pretty }
    }

    fn layer(self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE);

        match self {
            Self::Pretty => base.boxed(),
            Self::Json => base.json().with_current_span(true).with_span_list(true).boxed(),
        }
    }
}

/// Installs the global subscriber.
///
/// Span close events carry each gateway call's duration, tagged with the
/// account label and invoice id recorded by the library.
pub fn init_observability(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry().with(format.layer()).with(filter).init();
}
