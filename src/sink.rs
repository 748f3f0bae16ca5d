//! Output destinations for formatted lines.
//!
//! Sinks never filter by severity: the [`SeverityGate`](crate::severity::SeverityGate)
//! decides once for all of them.

use std::{
    io::Write,
    sync::{Mutex, PoisonError},
};

use crate::{error::SinkError, format::LogEvent, severity::Severity};

pub trait Sink: Send + Sync {
    fn name(&self) -> &str;

    /// Delivers one already formatted line. `event` carries the structured
    /// fields for sinks that want them.
    fn write(&self, event: &LogEvent, line: &str) -> Result<(), SinkError>;
}

/// Writes every line to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn write(&self, _event: &LogEvent, line: &str) -> Result<(), SinkError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", line)?;
        Ok(())
    }
}

/// Forwards lines into the installed `tracing` subscriber.
#[derive(Debug, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn name(&self) -> &str {
        "tracing"
    }

    fn write(&self, event: &LogEvent, line: &str) -> Result<(), SinkError> {
        let request_id = event.request_id.as_deref().unwrap_or("-");
        let text = event.message().unwrap_or_default();
        match event.severity {
            Severity::Debug => tracing::debug!(target: "dm_logger", request_id, text, "{}", line),
            Severity::Info | Severity::Notice => {
                tracing::info!(target: "dm_logger", request_id, text, "{}", line)
            }
            Severity::Warning => {
                tracing::warn!(target: "dm_logger", request_id, text, "{}", line)
            }
            Severity::Error | Severity::Crit | Severity::Alert | Severity::Emerg => {
                tracing::error!(target: "dm_logger", request_id, text, "{}", line)
            }
        }
        Ok(())
    }
}

/// A line captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    pub severity: Severity,
    pub request_id: Option<String>,
    /// Unformatted text of plain and response lines.
    pub message: Option<String>,
    pub line: String,
}

/// Keeps every line in memory, for tests and for hosts that ship lines
/// elsewhere themselves.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<CapturedLine>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<CapturedLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Vec<CapturedLine> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn write(&self, event: &LogEvent, line: &str) -> Result<(), SinkError> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedLine {
                severity: event.severity,
                request_id: event.request_id.clone(),
                message: event.message().map(String::from),
                line: line.to_string(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::EventKind;

    #[test]
    fn test_memory_sink_captures_and_drains() {
        let sink = MemorySink::new();
        let event = LogEvent::now(
            Severity::Info,
            EventKind::PlainMessage("hello".into()),
            Some("id".into()),
        );
        sink.write(&event, "line one").unwrap();
        sink.write(&event, "line two").unwrap();

        let lines = sink.take();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, "line one");
        assert_eq!(lines[1].request_id.as_deref(), Some("id"));
        assert_eq!(lines[1].message.as_deref(), Some("hello"));
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_inbound_lines_carry_no_message() {
        let sink = MemorySink::new();
        let record = crate::format::RequestRecord::new(
            &axum::http::Method::GET,
            &"/".parse().unwrap(),
            &axum::http::HeaderMap::new(),
        );
        let event = LogEvent::now(Severity::Notice, EventKind::InboundRequest(record), None);
        sink.write(&event, "inbound").unwrap();
        assert_eq!(sink.take()[0].message, None);
    }

    #[test]
    fn test_stream_sinks_accept_every_severity() {
        for severity in Severity::ALL {
            let event = LogEvent::now(severity, EventKind::PlainMessage("m".into()), None);
            assert!(TracingSink.write(&event, "line").is_ok());
            assert!(ConsoleSink.write(&event, "line").is_ok());
        }
    }
}
