//! Subscriber setup for composer traces. Events are compiled out unless the
//! `trace` feature is on, so without it every call here is a no-op.

use std::path::Path;

/// File written by [`TraceSink::JsonLines`].
pub const TRACE_FILE: &str = "kana-trace.jsonl";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "kana_core=debug,kana_composer=debug";

/// Where trace events go.
#[derive(Debug, Clone, Copy)]
pub enum TraceSink<'a> {
    /// Human-readable lines on stderr.
    Stderr,
    /// One JSON object per event in [`TRACE_FILE`] under the directory.
    JsonLines(&'a Path),
}

/// Keeps the file writer alive. Dropping it flushes pending lines.
#[derive(Debug, Default)]
pub struct TraceGuard {
    #[cfg(feature = "trace")]
    _worker: Option<tracing_appender::non_blocking::WorkerGuard>,
}

#[cfg(feature = "trace")]
mod imp {
    use std::sync::Once;

    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    use super::{TraceGuard, TraceSink, DEFAULT_FILTER, TRACE_FILE};

    static INIT: Once = Once::new();

    fn filter() -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }

    pub(super) fn install(sink: TraceSink<'_>) -> TraceGuard {
        let mut guard = TraceGuard::default();
        INIT.call_once(|| match sink {
            TraceSink::Stderr => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter())
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .init();
            }
            TraceSink::JsonLines(dir) => {
                let appender = tracing_appender::rolling::never(dir, TRACE_FILE);
                let (writer, worker) = tracing_appender::non_blocking(appender);
                tracing_subscriber::fmt()
                    .json()
                    .with_current_span(true)
                    .with_writer(writer)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_env_filter(filter())
                    .init();
                guard._worker = Some(worker);
            }
        });
        guard
    }
}

/// Install the global subscriber for `sink`. Only the first call in a
/// process has an effect; hold the returned guard until exit.
pub fn init_tracing(sink: TraceSink<'_>) -> TraceGuard {
    #[cfg(feature = "trace")]
    {
        imp::install(sink)
    }
    #[cfg(not(feature = "trace"))]
    {
        let _ = sink;
        TraceGuard::default()
    }
}
