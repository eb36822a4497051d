//! Structured logging for the service.
//!
//! Records are formatted and written by `tracing-subscriber`. This module
//! only decides the severity threshold, the output encoding and the
//! `service` span that tags records with the service name.

use anyhow::{Context, Result};
use tracing::{Span, Subscriber};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

use crate::config::{LogFormat, LoggingConfig};
use crate::domain::{LogLevel, ServiceIdentity};

/// Process-wide logger settings for one service.
///
/// Cheap to clone. The level is fixed at construction.
#[derive(Debug, Clone)]
pub struct Logger {
    service_name: String,
    level: LogLevel,
    format: LogFormat,
}

/// Creates the service logger from resolved configuration.
pub fn create_logger(config: &LoggingConfig, identity: &ServiceIdentity) -> Logger {
    // ---
    Logger {
        service_name: identity.service_name.clone(),
        level: config.level,
        format: config.format,
    }
}

impl Logger {
    // ---
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Effective severity threshold.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Root span tagging every record emitted inside it with the service name.
    ///
    /// Created at `ERROR` so it passes every threshold, including
    /// `LOG_LEVEL=error`. Create it after [`Logger::install`]; spans created
    /// before a subscriber exists are disabled.
    pub fn span(&self) -> Span {
        // ---
        tracing::error_span!("service", service.name = %self.service_name)
    }

    /// Builds the subscriber this logger describes, writing to `writer`.
    pub fn subscriber<W>(&self, writer: W) -> impl Subscriber + Send + Sync + 'static
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        // ---
        let layer: Box<dyn Layer<Registry> + Send + Sync> = match self.format {
            LogFormat::Text => fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(writer)
                .boxed(),
        };

        Registry::default()
            .with(layer)
            .with(self.level.as_filter())
    }

    /// Installs this logger as the global `tracing` subscriber on stdout.
    ///
    /// # Errors
    /// Fails if a global subscriber is already installed.
    pub fn install(&self) -> Result<()> {
        // ---
        tracing::subscriber::set_global_default(self.subscriber(std::io::stdout))
            .context("Failed to install global logger")?;

        tracing::debug!(level = %self.level, "Logger installed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// In-memory sink so tests can inspect formatted output.
    #[derive(Clone, Default)]
    struct BufferWriter(Arc<Mutex<Vec<u8>>>);

    impl BufferWriter {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for BufferWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = BufferWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn logger(level: LogLevel, format: LogFormat) -> Logger {
        // ---
        create_logger(
            &LoggingConfig { level, format },
            &ServiceIdentity::evaluation_coordinator(),
        )
    }

    /// Emits one record per severity inside the service span.
    fn emit_all(logger: &Logger) -> String {
        // ---
        let buffer = BufferWriter::default();
        tracing::subscriber::with_default(logger.subscriber(buffer.clone()), || {
            let _guard = logger.span().entered();
            tracing::trace!("trace-record");
            tracing::debug!("debug-record");
            tracing::info!("info-record");
            tracing::warn!("warn-record");
            tracing::error!("error-record");
        });
        buffer.contents()
    }

    #[test]
    fn info_threshold_suppresses_debug() {
        // ---
        let out = emit_all(&logger(LogLevel::Info, LogFormat::Text));

        assert!(out.contains("info-record"), "output: {out}");
        assert!(out.contains("warn-record"), "output: {out}");
        assert!(!out.contains("debug-record"), "output: {out}");
        assert!(!out.contains("trace-record"), "output: {out}");
    }

    #[test]
    fn debug_threshold_emits_debug_but_not_trace() {
        // ---
        let logger = logger(LogLevel::Debug, LogFormat::Text);
        assert_eq!(logger.level(), LogLevel::Debug);

        let out = emit_all(&logger);
        assert!(out.contains("debug-record"), "output: {out}");
        assert!(!out.contains("trace-record"), "output: {out}");
    }

    #[test]
    fn records_are_tagged_with_service_name() {
        // ---
        let out = emit_all(&logger(LogLevel::Info, LogFormat::Text));
        assert!(out.contains("service.name=evaluation-coordinator"), "output: {out}");
    }

    #[test]
    fn json_format_carries_service_span() {
        // ---
        let out = emit_all(&logger(LogLevel::Warn, LogFormat::Json));

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2, "output: {out}");

        let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record["level"], "WARN");
        assert_eq!(record["fields"]["message"], "warn-record");
        assert_eq!(record["span"]["service.name"], "evaluation-coordinator");
    }

    #[test]
    fn error_threshold_still_tags_service_name_in_text() {
        // ---
        let out = emit_all(&logger(LogLevel::Error, LogFormat::Text));

        assert!(out.contains("error-record"), "output: {out}");
        assert!(!out.contains("warn-record"), "output: {out}");
        assert!(out.contains("service.name=evaluation-coordinator"), "output: {out}");
    }

    #[test]
    fn error_threshold_still_tags_service_name_in_json() {
        // ---
        let out = emit_all(&logger(LogLevel::Error, LogFormat::Json));

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 1, "output: {out}");

        let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record["level"], "ERROR");
        assert_eq!(record["fields"]["message"], "error-record");
        assert_eq!(record["span"]["service.name"], "evaluation-coordinator");
    }
}
