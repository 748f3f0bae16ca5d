//! The emission pipeline: gate, formatter and sinks behind one handle.

use std::sync::Arc;

use crate::{
    classifier::AssetClassifier,
    config::LoggerConfig,
    context,
    error::EmitError,
    format::{EventKind, LogEvent, format_line},
    severity::{Severity, SeverityGate},
    sink::Sink,
};

/// Outcome of [`Logger::set_minimum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    Unchanged,
    Changed {
        previous: Severity,
        current: Severity,
        sinks: usize,
    },
}

/// Cheaply cloneable logging handle shared by the middleware, the intake
/// endpoint and application code.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

struct LoggerInner {
    config: LoggerConfig,
    gate: SeverityGate,
    classifier: AssetClassifier,
    sinks: Vec<Arc<dyn Sink>>,
}

pub struct LoggerBuilder {
    config: LoggerConfig,
    sinks: Vec<Arc<dyn Sink>>,
}

impl LoggerBuilder {
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Registers a sink the caller keeps a handle to (e.g. a `MemorySink`).
    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn build(self) -> Logger {
        if let Some(path) = self.config.client_msg_path.as_deref() {
            if self.config.intake_path().is_none() {
                tracing::warn!("client message path '{path}' must start with '/', intake disabled");
            }
        }
        let classifier = AssetClassifier::new(self.config.asset_path_pattern.as_deref());
        Logger {
            inner: Arc::new(LoggerInner {
                gate: SeverityGate::new(self.config.default_level),
                classifier,
                sinks: self.sinks,
                config: self.config,
            }),
        }
    }
}

impl Logger {
    pub fn builder(config: LoggerConfig) -> LoggerBuilder {
        LoggerBuilder {
            config,
            sinks: Vec::new(),
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    pub fn classifier(&self) -> &AssetClassifier {
        &self.inner.classifier
    }

    pub fn minimum(&self) -> Severity {
        self.inner.gate.minimum()
    }

    pub fn sink_count(&self) -> usize {
        self.inner.sinks.len()
    }

    /// Whether an event at `severity` would currently reach the sinks.
    pub fn enabled(&self, severity: Severity) -> bool {
        self.inner.gate.allows(severity)
    }

    /// Emits a plain message tagged with the current request's id.
    pub fn log(&self, severity: Severity, message: impl Into<String>) -> Result<(), EmitError> {
        self.emit(LogEvent::now(
            severity,
            EventKind::PlainMessage(message.into()),
            context::request_id(),
        ))
    }

    pub fn debug(&self, message: impl Into<String>) -> Result<(), EmitError> {
        self.log(Severity::Debug, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Result<(), EmitError> {
        self.log(Severity::Info, message)
    }

    pub fn notice(&self, message: impl Into<String>) -> Result<(), EmitError> {
        self.log(Severity::Notice, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Result<(), EmitError> {
        self.log(Severity::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Result<(), EmitError> {
        self.log(Severity::Error, message)
    }

    pub fn crit(&self, message: impl Into<String>) -> Result<(), EmitError> {
        self.log(Severity::Crit, message)
    }

    pub fn alert(&self, message: impl Into<String>) -> Result<(), EmitError> {
        self.log(Severity::Alert, message)
    }

    pub fn emerg(&self, message: impl Into<String>) -> Result<(), EmitError> {
        self.log(Severity::Emerg, message)
    }

    /// Sends `event` to every sink if the gate lets it through.
    pub fn emit(&self, event: LogEvent) -> Result<(), EmitError> {
        if !self.enabled(event.severity) {
            return Ok(());
        }
        self.dispatch(&event)
    }

    /// Formats once and writes to every sink. A failing sink does not stop
    /// the others; the first failure is returned.
    fn dispatch(&self, event: &LogEvent) -> Result<(), EmitError> {
        let line = format_line(event, self.inner.config.colorize);
        let mut first_failure = None;

        for sink in &self.inner.sinks {
            if let Err(source) = sink.write(event, &line) {
                tracing::warn!(sink = sink.name(), "log sink failed: {source}");
                first_failure.get_or_insert(EmitError::Sink {
                    sink: sink.name().to_string(),
                    source,
                });
            }
        }

        first_failure.map_or(Ok(()), Err)
    }

    /// Moves the gate to `level` for every sink at once.
    ///
    /// Setting the current level is a no-op. A real change is confirmed with
    /// one `notice` line that bypasses the gate, so it shows up even when the
    /// new level would hide it.
    pub fn set_minimum(&self, level: Severity) -> LevelChange {
        let Some(previous) = self.inner.gate.replace(level) else {
            return LevelChange::Unchanged;
        };

        let sinks = self.sink_count();
        let confirmation = LogEvent::now(
            Severity::Notice,
            EventKind::PlainMessage(format!(
                "All sinks ({}) were set to '{}' level.",
                sinks, level
            )),
            context::request_id(),
        );
        if let Err(err) = self.dispatch(&confirmation) {
            tracing::error!("could not confirm log level change: {err}");
        }

        LevelChange::Changed {
            previous,
            current: level,
            sinks,
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.inner.config)
            .field("minimum", &self.minimum())
            .field(
                "sinks",
                &self.inner.sinks.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
